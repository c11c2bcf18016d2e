use criterion::{criterion_group, criterion_main, Criterion};
use env_logger::{Builder, Env};
use ndarray::{Array2, ArrayView1};
use rembo::{RemboBuilder, REMBO_LOG};

/// Ackley test function of the 3 first variables: min f(x)=0 at x=(0, 0, 0, ...)
fn ackley(x: &ArrayView1<f64>) -> f64 {
    argmin_testfunctions::ackley(&[x[0], x[1], x[2]])
}

fn criterion_rembo(c: &mut Criterion) {
    let mut xlimits = Array2::zeros((10, 2));
    xlimits.column_mut(0).fill(-32.768);
    xlimits.column_mut(1).fill(32.768);
    let mut group = c.benchmark_group("rembo");
    group.sample_size(20);
    group.bench_function("rembo ackley 10D", |b| {
        let env = Env::new().filter_or(REMBO_LOG, "error");
        let mut builder = Builder::from_env(env);
        let builder = builder.target(env_logger::Target::Stdout);
        builder.try_init().ok();

        b.iter(|| {
            let mut rembo = RemboBuilder::optimize(ackley)
                .configure(|config| config.subspace_dim(3).n_doe(5).seed(42))
                .within(&xlimits)
                .expect("Rembo configured");
            std::hint::black_box(rembo.run(Some(10), None, 0.).expect("Minimization"))
        });
    });

    group.finish();
}

criterion_group!(benches, criterion_rembo);
criterion_main!(benches);
