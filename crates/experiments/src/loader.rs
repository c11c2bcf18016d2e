//! Loading of saved runs for comparison: run directories are named
//! `<date> <time> <D>D <feature>` under `<storage>/<function name>/`,
//! each one holding the tab separated `evaluation.csv` log.
use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDateTime;
use csv::ReaderBuilder;
use log::{debug, info};
use ndarray::{Array1, Array2, Axis};
use rembo::EVALUATIONS_FILE;
use std::path::{Path, PathBuf};

const RUN_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Parse a date given as `%Y-%m-%d %H:%M:%S` with optional fractional seconds
pub fn parse_date(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, RUN_DATE_FORMAT)
        .with_context(|| format!("Invalid date {s:?}, expected YYYY-mm-dd HH:MM:SS"))
}

/// Selection of saved runs
#[derive(Clone, Debug, Default)]
pub struct RunFilter {
    /// Dimension tag, e.g. "10D"
    pub dim: String,
    /// Method tag, e.g. "REMBO_5"
    pub feature: String,
    /// Keep runs started at or after this date
    pub start: Option<NaiveDateTime>,
    /// Keep runs started at or before this date
    pub end: Option<NaiveDateTime>,
}

impl RunFilter {
    fn accept(&self, run_name: &str) -> bool {
        let fields: Vec<&str> = run_name.split(' ').collect();
        let &[date, time, dim, feature] = fields.as_slice() else {
            debug!("Discard {run_name}");
            return false;
        };
        let Ok(started) = parse_date(&format!("{date} {time}")) else {
            debug!("Discard {run_name}");
            return false;
        };
        self.start.map_or(true, |start| start <= started)
            && self.end.map_or(true, |end| started <= end)
            && dim == self.dim
            && feature == self.feature
    }
}

/// Run directories of `function` matching the filter, sorted by name
pub fn load_files(storage: &Path, function: &str, filter: &RunFilter) -> Result<Vec<PathBuf>> {
    let dir = storage.join(function);
    let mut runs = vec![];
    for entry in std::fs::read_dir(&dir).with_context(|| format!("Cannot list {}", dir.display()))? {
        let path = entry?.path();
        let accepted = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| filter.accept(name));
        if accepted && path.is_dir() {
            runs.push(path);
        }
    }
    runs.sort();
    Ok(runs)
}

/// Objective values (column `Y`) of an evaluation log
pub fn read_evaluations(file: &Path) -> Result<Array1<f64>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_path(file)
        .with_context(|| format!("Cannot read {}", file.display()))?;
    let column = rdr
        .headers()
        .with_context(|| format!("No header in {}", file.display()))?
        .iter()
        .position(|h| h == "Y")
        .ok_or_else(|| anyhow!("No Y column in {}", file.display()))?;
    let mut y = vec![];
    for (i, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("Bad record line {} of {}", i + 2, file.display()))?;
        let value = record
            .get(column)
            .ok_or_else(|| anyhow!("Missing Y value line {} of {}", i + 2, file.display()))?;
        y.push(
            value
                .trim()
                .parse::<f64>()
                .with_context(|| format!("Bad Y value line {} of {}", i + 2, file.display()))?,
        );
    }
    Ok(Array1::from(y))
}

/// Objective values of the selected runs as a (n_runs, n_samples) array where
/// runs are truncated to the shortest one. When `min_len` is given, a shorter
/// run is an error.
pub fn load_experiments(
    storage: &Path,
    function: &str,
    filter: &RunFilter,
    min_len: Option<usize>,
) -> Result<Array2<f64>> {
    let runs = load_files(storage, function, filter)?;
    if runs.is_empty() {
        bail!(
            "No {} {} experiment of {function} found in {}",
            filter.dim,
            filter.feature,
            storage.display()
        );
    }
    let mut results = vec![];
    for run in runs.iter() {
        let y = read_evaluations(&run.join(EVALUATIONS_FILE))?;
        if let Some(min_len) = min_len {
            if y.len() < min_len {
                bail!(
                    "Not enough samples in {}: expected {min_len}, got {}",
                    run.display(),
                    y.len()
                );
            }
        }
        info!("Load {}", run.display());
        results.push(y);
    }
    let len = results.iter().map(|y| y.len()).min().unwrap_or(0);
    let mut data = Array2::zeros((results.len(), len));
    for (mut row, y) in data.rows_mut().into_iter().zip(results.iter()) {
        row.assign(&y.slice(ndarray::s![..len]));
    }
    Ok(data)
}

/// Best value found so far along `y`
pub fn running_best(y: &Array1<f64>, maximize: bool) -> Array1<f64> {
    let mut best = if maximize {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    };
    y.mapv(|v| {
        best = if maximize { best.max(v) } else { best.min(v) };
        best
    })
}

/// Mean and standard deviation across runs of the best value so far.
/// `results` holds the logged (minimization oriented) values, turned back
/// to the user orientation when the runs maximized.
pub fn summarize(results: &Array2<f64>, maximize: bool) -> (Array1<f64>, Array1<f64>) {
    let mut best = Array2::zeros(results.raw_dim());
    for (mut row, y) in best.rows_mut().into_iter().zip(results.rows()) {
        let y = if maximize { y.mapv(|v| -v) } else { y.to_owned() };
        row.assign(&running_best(&y, maximize));
    }
    let mean = best
        .mean_axis(Axis(0))
        .unwrap_or_else(|| Array1::zeros(results.ncols()));
    let std = best.std_axis(Axis(0), 0.);
    (mean, std)
}
