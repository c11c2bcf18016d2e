use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix2};

/// A structure to store (n, xdim) matrix data and its mean and standard deviation vectors.
#[derive(Debug, Clone)]
pub(crate) struct NormalizedData {
    /// normalized data
    pub data: Array2<f64>,
    /// mean vector computed from data
    pub mean: Array1<f64>,
    /// standard deviation vector computed from data
    pub std: Array1<f64>,
}

impl NormalizedData {
    /// Constructor
    pub fn new(x: &ArrayBase<impl Data<Elem = f64>, Ix2>) -> NormalizedData {
        let (data, mean, std) = normalize(x);
        NormalizedData { data, mean, std }
    }
}

/// Center and reduce columns of `x`. A column with no spread (or a single row)
/// keeps a unit standard deviation.
pub fn normalize(x: &ArrayBase<impl Data<Elem = f64>, Ix2>) -> (Array2<f64>, Array1<f64>, Array1<f64>) {
    let x_mean = x
        .mean_axis(Axis(0))
        .unwrap_or_else(|| Array1::zeros(x.ncols()));
    let ddof = if x.nrows() > 1 { 1. } else { 0. };
    let mut x_std = x.std_axis(Axis(0), ddof);
    x_std.mapv_inplace(|v| if v == 0. || !v.is_finite() { 1. } else { v });
    let xnorm = (x - &x_mean) / &x_std;

    (xnorm, x_mean, x_std)
}

/// A structure to retain absolute differences computation used to compute covariance matrix
#[derive(Debug)]
pub struct DiffMatrix {
    /// Differences as (n_obs * (n_obs-1))/2, nx) array
    pub d: Array2<f64>,
    /// Indices of the differences in the original data array
    pub d_indices: Array2<usize>,
    /// Number of observations
    pub n_obs: usize,
}

impl DiffMatrix {
    /// Compute differences given points given as an array (n_obs, nx)
    pub fn new(x: &ArrayBase<impl Data<Elem = f64>, Ix2>) -> DiffMatrix {
        let n_obs = x.nrows();
        let n_non_zero_distances = n_obs * (n_obs.saturating_sub(1)) / 2;
        let mut d = Array2::zeros((n_non_zero_distances, x.ncols()));
        let mut d_indices = Array2::zeros((n_non_zero_distances, 2));
        let mut idx = 0;
        for i in 0..n_obs {
            for j in (i + 1)..n_obs {
                d.row_mut(idx).assign(&(&x.row(i) - &x.row(j)));
                d_indices[[idx, 0]] = i;
                d_indices[[idx, 1]] = j;
                idx += 1;
            }
        }
        DiffMatrix {
            d,
            d_indices,
            n_obs,
        }
    }
}
