use ndarray::{Array2, ArrayView1};
use rembo::{NamedObjective, RemboBuilder};

/// Rosenbrock function of the 2 first variables of a 100-dimensional domain:
/// min f(x)=0 at x=(1, 1, ...)
fn rosenbrock(x: &ArrayView1<f64>) -> f64 {
    argmin_testfunctions::rosenbrock(&[x[0], x[1]])
}

fn main() {
    let dim = 100;
    let mut xlimits = Array2::zeros((dim, 2));
    xlimits.column_mut(0).fill(-2.);
    xlimits.column_mut(1).fill(2.);

    let mut rembo = RemboBuilder::optimize(NamedObjective::new("rosenbrock", rosenbrock))
        .configure(|config| config.subspace_dim(2).n_doe(5).seed(42))
        .within(&xlimits)
        .expect("Rembo configured");
    let res = rembo.run(Some(50), None, 0.).expect("Minimize failure");
    println!(
        "Rosenbrock minimum y = {} at x[..2] = [{}, {}] after {} iterations",
        res.y_opt, res.x_opt_original[0], res.x_opt_original[1], res.n_iters
    );
}
