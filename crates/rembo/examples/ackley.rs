use ndarray::{Array2, ArrayView1};
use rembo::{AcquisitionStrategy, InitialDesignKind, NamedObjective, RemboBuilder};
use std::time::Duration;

/// Ackley test function on 3 effective variables: min f(x)=0 at x=(0, 0, 0, ...)
fn ackley(x: &ArrayView1<f64>) -> f64 {
    argmin_testfunctions::ackley(&[x[0], x[1], x[2]])
}

fn main() {
    let mut xlimits = Array2::zeros((25, 2));
    xlimits.column_mut(0).fill(-32.768);
    xlimits.column_mut(1).fill(32.768);

    let mut rembo = RemboBuilder::optimize(NamedObjective::new("ackley", ackley))
        .configure(|config| {
            config
                .subspace_dim(4)
                .n_doe(10)
                .doe_kind(InitialDesignKind::Lhs)
                .acquisition(AcquisitionStrategy::EI)
                .de_duplication(true)
                .seed(0)
                .outdir("target/storage")
        })
        .within(&xlimits)
        .expect("Rembo configured");
    let res = rembo
        .run(Some(40), Some(Duration::from_secs(60)), 1e-8)
        .expect("Minimize failure");
    println!("Ackley minimum y = {} ({})", res.y_opt, res.termination);
}
