use libm::erfc;
use ndarray::{Array1, ArrayBase, Data, Ix1, Ix2};
use ndarray_stats::DeviationExt;

const SQRT_2PI: f64 = 2.5066282746310007;

/// Env variable to set logging level
pub const REMBO_LOG: &str = "REMBO_LOG";

/// Cumulative distribution function of Standard Normal at x
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}

/// Probability density function of Standard Normal at x
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / SQRT_2PI
}

/// Check if new point is not too close to previous ones `x_data`
pub fn is_update_ok(
    x_data: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    x_new: &ArrayBase<impl Data<Elem = f64>, Ix1>,
) -> bool {
    for row in x_data.rows() {
        match row.l1_dist(x_new) {
            Ok(d) if d < 100. * f64::EPSILON => return false,
            Ok(_) => (),
            Err(_) => return false,
        }
    }
    true
}

/// Index of the smallest value of `y`, first occurrence wins on ties.
/// NaN values are ignored. Returns None when no value is comparable.
pub fn find_best_index(y: &ArrayBase<impl Data<Elem = f64>, Ix1>) -> Option<usize> {
    y.iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b <= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// Center and reduce `y` (population standard deviation).
/// Constant data is only centered.
pub fn normalize_stats(y: &ArrayBase<impl Data<Elem = f64>, Ix1>) -> Array1<f64> {
    let mean = y.mean().unwrap_or(0.);
    let std = y.std(0.);
    let centered = y.mapv(|v| v - mean);
    if std > 0. {
        centered / std
    } else {
        centered
    }
}

/// Euclidean distance between two points
pub fn distance(
    a: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    b: &ArrayBase<impl Data<Elem = f64>, Ix1>,
) -> f64 {
    a.l2_dist(b).unwrap_or(f64::INFINITY)
}
