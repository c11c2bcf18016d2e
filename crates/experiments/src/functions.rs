//! Benchmark functions of the experiments, each one with its customary domain.
use ndarray::{Array2, ArrayView1};
use rembo::{ObjectiveFn, ObjectiveResult};
use std::f64::consts::PI;

/// Available benchmark functions
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Function {
    /// Alpine N.1: min f(x)=0 at x=(0, ..., 0) in [-10, 10]^D
    Alpine,
    /// Schwefel: min f(x)=0 at x=(420.9687, ..., 420.9687) in [-500, 500]^D
    Schwefel,
    /// Michalewicz (m=10): min D=10 f(x)=-9.66015 in [0, pi]^D
    Michalewicz,
    /// Sum of two unit gaussian bumps centred at 2.(1, ..., 1) and 3.(1, ..., 1)
    /// in [1, 4]^D, to be maximized
    GaussianMixture,
}

impl Function {
    /// Name used to label the run directories
    pub fn name(&self) -> &'static str {
        match self {
            Function::Alpine => "alpine",
            Function::Schwefel => "schwefel",
            Function::Michalewicz => "michalewicz",
            Function::GaussianMixture => "gaussian_mixture",
        }
    }

    /// Domain as a (dim, 2) array of [lower, upper] bounds
    pub fn domain(&self, dim: usize) -> Array2<f64> {
        let (lo, up) = match self {
            Function::Alpine => (-10., 10.),
            Function::Schwefel => (-500., 500.),
            Function::Michalewicz => (0., PI),
            Function::GaussianMixture => (1., 4.),
        };
        let mut xlimits = Array2::zeros((dim, 2));
        xlimits.column_mut(0).fill(lo);
        xlimits.column_mut(1).fill(up);
        xlimits
    }

    /// Value at `x`
    pub fn value(&self, x: &ArrayView1<f64>) -> f64 {
        match self {
            Function::Alpine => alpine(x),
            Function::Schwefel => schwefel(x),
            Function::Michalewicz => michalewicz(x, 10.),
            Function::GaussianMixture => gaussian_mixture(x, 2., 3.),
        }
    }
}

impl ObjectiveFn for Function {
    fn name(&self) -> &str {
        Function::name(self)
    }

    fn eval(&self, x: &ArrayView1<f64>) -> ObjectiveResult {
        let y = self.value(x);
        if y.is_nan() {
            return Err(format!("{} is not defined at {x}", Function::name(self)).into());
        }
        Ok(y)
    }
}

pub fn alpine(x: &ArrayView1<f64>) -> f64 {
    x.iter().map(|v| (v * v.sin() + 0.1 * v).abs()).sum()
}

pub fn schwefel(x: &ArrayView1<f64>) -> f64 {
    418.9829 * x.len() as f64 - x.iter().map(|v| v * v.abs().sqrt().sin()).sum::<f64>()
}

pub fn michalewicz(x: &ArrayView1<f64>, m: f64) -> f64 {
    -x.iter()
        .enumerate()
        .map(|(j, v)| {
            let i = (j + 1) as f64;
            v.sin() * (i * v * v / PI).sin().powf(2. * m)
        })
        .sum::<f64>()
}

/// Two unit gaussian bumps centred at `mean_1.(1, ..., 1)` and `mean_2.(1, ..., 1)`
pub fn gaussian_mixture(x: &ArrayView1<f64>, mean_1: f64, mean_2: f64) -> f64 {
    let sq_dist = |m: f64| x.iter().map(|v| (v - m) * (v - m)).sum::<f64>();
    (-0.5 * sq_dist(mean_1)).exp() + (-0.5 * sq_dist(mean_2)).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1};

    #[test]
    fn test_alpine_minimum() {
        assert_abs_diff_eq!(alpine(&Array1::zeros(5).view()), 0.);
        assert!(alpine(&array![1., -2.].view()) > 0.);
    }

    #[test]
    fn test_schwefel_minimum() {
        let x = Array1::from_elem(4, 420.9687);
        assert_abs_diff_eq!(schwefel(&x.view()), 0., epsilon = 1e-3);
    }

    #[test]
    fn test_michalewicz_known_minimum() {
        let x = array![2.20290552, 1.57079633];
        assert_abs_diff_eq!(michalewicz(&x.view(), 10.), -1.8013, epsilon = 1e-4);
    }

    #[test]
    fn test_gaussian_mixture_peaks() {
        let dim = 10;
        let at_first = gaussian_mixture(&Array1::from_elem(dim, 2.).view(), 2., 3.);
        assert_abs_diff_eq!(at_first, 1. + (-0.5 * dim as f64).exp());
        let between = gaussian_mixture(&Array1::from_elem(dim, 2.5).view(), 2., 3.);
        assert!(between < at_first);
    }

    #[test]
    fn test_domains() {
        let xlimits = Function::Michalewicz.domain(3);
        assert_eq!(xlimits.dim(), (3, 2));
        assert_abs_diff_eq!(xlimits[[2, 1]], PI);
        assert_eq!(Function::GaussianMixture.domain(2), array![[1., 4.], [1., 4.]]);
    }

    #[test]
    fn test_objective_names() {
        assert_eq!(ObjectiveFn::name(&Function::Alpine), "alpine");
        assert_eq!(ObjectiveFn::name(&Function::GaussianMixture), "gaussian_mixture");
        let y = Function::Alpine.eval(&array![0., 0.].view()).unwrap();
        assert_abs_diff_eq!(y, 0.);
    }
}
