use egobox_doe::{Lhs, LhsKind, SamplingMethod};
use ndarray::{arr1, s, Array1, Array2, Zip};
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

pub(crate) struct CobylaParams {
    pub rhobeg: f64,
    pub ftol_rel: f64,
    pub maxeval: usize,
}

impl Default for CobylaParams {
    fn default() -> Self {
        CobylaParams {
            rhobeg: 0.5,
            ftol_rel: 1e-4,
            maxeval: 200,
        }
    }
}

/// Build the starting points of the likelihood optimization in log10 space:
/// the initial guess followed by `n_start` points spread over the bounds.
pub(crate) fn prepare_multistart(
    n_start: usize,
    theta0: &Array1<f64>,
    bounds: &[(f64, f64)],
) -> (Array2<f64>, Vec<(f64, f64)>) {
    // Use log10 theta as optimization parameter
    let bounds: Vec<(f64, f64)> = bounds
        .iter()
        .map(|(lo, up)| (lo.log10(), up.log10()))
        .collect();

    let mut theta0s = Array2::zeros((n_start + 1, theta0.len()));
    theta0s.row_mut(0).assign(&theta0.mapv(f64::log10));

    if n_start > 0 {
        let mut xlimits: Array2<f64> = Array2::zeros((bounds.len(), 2));
        Zip::from(xlimits.rows_mut())
            .and(&bounds)
            .for_each(|mut row, limits| row.assign(&arr1(&[limits.0, limits.1])));
        // Seeded: starting points only need to be spread over the bounds
        let seeds = Lhs::new(&xlimits)
            .kind(LhsKind::Maximin)
            .with_rng(Xoshiro256Plus::seed_from_u64(42))
            .sample(n_start);
        theta0s.slice_mut(s![1.., ..]).assign(&seeds);
    }
    (theta0s, bounds)
}

/// Optimize hyper parameters given an initial guess and bounds with cobyla
pub(crate) fn optimize_params<ObjF>(
    objfn: ObjF,
    param0: &Array1<f64>,
    bounds: &[(f64, f64)],
    cobyla: CobylaParams,
) -> (f64, Array1<f64>)
where
    ObjF: Fn(&[f64]) -> f64,
{
    use cobyla::{minimize, Func, RhoBeg, StopTols};

    let cons: Vec<&dyn Func<()>> = vec![];
    let param0 = param0.to_vec();

    match minimize(
        |x: &[f64], _u: &mut ()| objfn(x),
        &param0,
        bounds,
        &cons,
        (),
        cobyla.maxeval,
        RhoBeg::All(cobyla.rhobeg),
        Some(StopTols {
            ftol_rel: cobyla.ftol_rel,
            ..StopTols::default()
        }),
    ) {
        Ok((_, x_opt, fopt)) => {
            let fopt = if f64::is_nan(fopt) {
                f64::INFINITY
            } else {
                fopt
            };
            (fopt, arr1(&x_opt))
        }
        Err((_, x_opt, _)) => (f64::INFINITY, arr1(&x_opt)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_prepare_multistart() {
        let (theta0s, bounds) = prepare_multistart(4, &array![0.01, 0.01], &[(1e-6, 1e2); 2]);
        assert_eq!(theta0s.dim(), (5, 2));
        assert_abs_diff_eq!(theta0s.row(0), array![-2., -2.], epsilon = 1e-12);
        assert_abs_diff_eq!(bounds[0].0, -6., epsilon = 1e-12);
        assert_abs_diff_eq!(bounds[0].1, 2., epsilon = 1e-12);
        for v in theta0s.iter() {
            assert!((-6. ..=2.).contains(v));
        }
    }

    #[test]
    fn test_optimize_params() {
        let objfn = |x: &[f64]| (x[0] - 0.5).powi(2) + (x[1] + 1.).powi(2);
        let (fmin, xmin) = optimize_params(
            objfn,
            &array![0., 0.],
            &[(-2., 2.), (-2., 2.)],
            CobylaParams::default(),
        );
        assert_abs_diff_eq!(fmin, 0., epsilon = 1e-4);
        assert_abs_diff_eq!(xmin, array![0.5, -1.], epsilon = 1e-2);
    }
}
