use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::{Builder, Env};
use log::info;
use rembo::{AcquisitionStrategy, InitialDesignKind, RemboBuilder, REMBO_LOG};
use rembo_experiments::loader::{load_experiments, parse_date, summarize, RunFilter};
use rembo_experiments::Function;
use std::path::Path;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about = "REMBO experiments on benchmark functions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Optimize a benchmark function, each run is saved in the storage directory
    Run(RunArgs),
    /// Mean and standard deviation of the best value so far across saved runs
    Summary(SummaryArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum Acquisition {
    Lcb,
    Ei,
    Pi,
}

impl From<Acquisition> for AcquisitionStrategy {
    fn from(acq: Acquisition) -> Self {
        match acq {
            Acquisition::Lcb => AcquisitionStrategy::LCB,
            Acquisition::Ei => AcquisitionStrategy::EI,
            Acquisition::Pi => AcquisitionStrategy::PI,
        }
    }
}

#[derive(clap::Args)]
struct RunArgs {
    #[arg(short, long, value_enum, default_value_t = Function::GaussianMixture)]
    function: Function,
    /// Dimension of the original domain
    #[arg(short, long, default_value_t = 10)]
    dim: usize,
    /// Dimension of the random embedding
    #[arg(short, long, default_value_t = 5)]
    subspace_dim: usize,
    #[arg(long, default_value_t = 500)]
    max_iter: u64,
    /// Time budget in seconds
    #[arg(long)]
    max_time: Option<f64>,
    #[arg(long, default_value_t = 0.)]
    eps: f64,
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    maximize: bool,
    #[arg(long, default_value_t = 1)]
    n_doe: usize,
    #[arg(long)]
    lhs: bool,
    #[arg(short, long, value_enum, default_value_t = Acquisition::Lcb)]
    acquisition: Acquisition,
    #[arg(long)]
    de_duplication: bool,
    /// Number of repeated runs
    #[arg(short, long, default_value_t = 1)]
    rep: usize,
    /// Seed of the first run, incremented for the following ones
    #[arg(long)]
    seed: Option<u64>,
    #[arg(short, long, default_value = "storage")]
    outdir: String,
}

#[derive(clap::Args)]
struct SummaryArgs {
    #[arg(short, long, value_enum, default_value_t = Function::GaussianMixture)]
    function: Function,
    #[arg(short, long, default_value_t = 10)]
    dim: usize,
    /// Method tag of the runs
    #[arg(long, default_value = "REMBO_5")]
    feature: String,
    /// Whether the runs maximized the function
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    maximize: bool,
    /// Keep runs started at or after "YYYY-mm-dd HH:MM:SS"
    #[arg(long)]
    start: Option<String>,
    /// Keep runs started at or before "YYYY-mm-dd HH:MM:SS"
    #[arg(long)]
    end: Option<String>,
    /// Minimal number of samples expected in every run
    #[arg(long)]
    min_len: Option<usize>,
    #[arg(short, long, default_value = "storage")]
    outdir: String,
}

fn run(args: &RunArgs) -> Result<()> {
    let xlimits = args.function.domain(args.dim);
    let max_time = args.max_time.map(Duration::from_secs_f64);
    for num in 1..=args.rep {
        info!(">>>> Run {num} of {}", args.rep);
        let mut rembo = RemboBuilder::optimize(args.function)
            .configure(|config| {
                let config = config
                    .subspace_dim(args.subspace_dim)
                    .n_doe(args.n_doe)
                    .doe_kind(if args.lhs {
                        InitialDesignKind::Lhs
                    } else {
                        InitialDesignKind::Random
                    })
                    .acquisition(args.acquisition.into())
                    .maximize(args.maximize)
                    .de_duplication(args.de_duplication)
                    .outdir(args.outdir.clone());
                match args.seed {
                    Some(seed) => config.seed(seed + num as u64 - 1),
                    None => config,
                }
            })
            .within(&xlimits)?;
        let res = rembo.run(Some(args.max_iter), max_time, args.eps)?;
        println!(
            "{} run {num}: best y = {} at x = {} ({})",
            args.function.name(),
            res.y_opt,
            res.x_opt_original,
            res.termination
        );
    }
    Ok(())
}

fn summary(args: &SummaryArgs) -> Result<()> {
    let filter = RunFilter {
        dim: format!("{}D", args.dim),
        feature: args.feature.clone(),
        start: args.start.as_deref().map(parse_date).transpose()?,
        end: args.end.as_deref().map(parse_date).transpose()?,
    };
    let results = load_experiments(
        Path::new(&args.outdir),
        args.function.name(),
        &filter,
        args.min_len,
    )?;
    let (mean, std) = summarize(&results, args.maximize);
    println!("# {} runs of {} {}D {}", results.nrows(), args.function.name(), args.dim, args.feature);
    println!("Sample\tMean\tStd");
    for (i, (m, s)) in mean.iter().zip(std.iter()).enumerate() {
        println!("{}\t{m}\t{s}", i + 1);
    }
    Ok(())
}

fn main() -> Result<()> {
    let env = Env::new().filter_or(REMBO_LOG, "info");
    let mut builder = Builder::from_env(env);
    let builder = builder.target(env_logger::Target::Stdout);
    builder.try_init().ok();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Run(args) => run(args),
        Commands::Summary(args) => summary(args),
    }
}
