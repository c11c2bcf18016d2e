use crate::errors::{GpError, Result};
use crate::optimization::{optimize_params, prepare_multistart, CobylaParams};
use crate::parameters::{KrigingParams, KrigingValidParams};
use crate::utils::{DiffMatrix, NormalizedData};
use crate::GP_COBYLA_MIN_EVAL;

use linfa::prelude::{DatasetBase, Fit};
use linfa_linalg::{cholesky::*, triangular::*};
use log::debug;
use ndarray::{Array, Array1, Array2, ArrayBase, Axis, Data, Ix1, Ix2, Zip};
use std::fmt;

/// Internal parameters computed from the training data and the optimal hyperparameters
#[derive(Debug, Clone)]
pub(crate) struct KrigingInnerParams {
    /// Process variance (in normalized output units)
    sigma2: f64,
    /// Constant mean (in normalized output units)
    beta: f64,
    /// Weights of the correlation terms
    gamma: Array1<f64>,
    /// Cholesky decomposition of the correlation matrix \[R\]
    r_chol: Array2<f64>,
    /// Solution of the linear equation system : \[R\] x Ft = y
    ft: Array1<f64>,
}

/// Ordinary kriging model: a gaussian process with a constant mean
/// and a stationary correlation model.
///
/// The model is built with [`Kriging::params`] and fitted on a [`linfa::Dataset`]
/// of (n, nx) inputs and n outputs.
#[derive(Debug, Clone)]
pub struct Kriging {
    /// Parameter of the autocorrelation model
    theta: Array1<f64>,
    /// Reduced likelihood value (result from internal optimization)
    likelihood: f64,
    /// Inner parameters (ie depending on training data)
    inner_params: KrigingInnerParams,
    /// Training inputs
    xt_norm: NormalizedData,
    /// Training outputs
    yt_norm: NormalizedData,
    /// Parameters used to fit this model
    params: KrigingValidParams,
}

impl Kriging {
    /// Kriging parameters builder with default settings
    pub fn params() -> KrigingParams {
        KrigingParams::default()
    }

    /// Predict output values at n given `x` points of nx components specified as a (n, nx) matrix.
    /// Returns n scalar output values as (n,) vector.
    pub fn predict(&self, x: &ArrayBase<impl Data<Elem = f64>, Ix2>) -> Result<Array1<f64>> {
        self.check_dims(x)?;
        let xnorm = (x - &self.xt_norm.mean) / &self.xt_norm.std;
        let corr = self.compute_correlation(&xnorm);
        Ok(self.scaled_predictor(&corr))
    }

    /// Predict variance values at n given `x` points of nx components specified as a (n, nx) matrix.
    /// Returns n variance values as (n,) vector.
    pub fn predict_var(&self, x: &ArrayBase<impl Data<Elem = f64>, Ix2>) -> Result<Array1<f64>> {
        self.check_dims(x)?;
        let xnorm = (x - &self.xt_norm.mean) / &self.xt_norm.std;
        let corr = self.compute_correlation(&xnorm);
        self.mse(&corr)
    }

    /// Predict both output values and variance at n given `x` points of nx components
    pub fn predict_valvar(
        &self,
        x: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    ) -> Result<(Array1<f64>, Array1<f64>)> {
        self.check_dims(x)?;
        let xnorm = (x - &self.xt_norm.mean) / &self.xt_norm.std;
        let corr = self.compute_correlation(&xnorm);
        Ok((self.scaled_predictor(&corr), self.mse(&corr)?))
    }

    /// Optimal correlation lengths
    pub fn theta(&self) -> &Array1<f64> {
        &self.theta
    }

    /// Estimated process variance (in output units)
    pub fn variance(&self) -> f64 {
        self.inner_params.sigma2 * self.yt_norm.std[0] * self.yt_norm.std[0]
    }

    /// Estimated constant mean (in output units)
    pub fn mean(&self) -> f64 {
        self.inner_params.beta * self.yt_norm.std[0] + self.yt_norm.mean[0]
    }

    /// Reduced likelihood value reached by the hyperparameters optimization
    pub fn likelihood(&self) -> f64 {
        self.likelihood
    }

    /// Input and output dimensions
    pub fn dims(&self) -> (usize, usize) {
        (self.xt_norm.data.ncols(), 1)
    }

    /// Parameters used to fit this model
    pub fn params_used(&self) -> &KrigingValidParams {
        &self.params
    }

    fn check_dims(&self, x: &ArrayBase<impl Data<Elem = f64>, Ix2>) -> Result<()> {
        if x.ncols() != self.xt_norm.data.ncols() {
            return Err(GpError::InvalidValueError(format!(
                "Expected points with {} components, got {}",
                self.xt_norm.data.ncols(),
                x.ncols()
            )));
        }
        Ok(())
    }

    /// Correlations between the given (normalized) points and the training points
    /// as a (n, nt) matrix
    fn compute_correlation(&self, xnorm: &ArrayBase<impl Data<Elem = f64>, Ix2>) -> Array2<f64> {
        let mut r = Array2::zeros((xnorm.nrows(), self.xt_norm.data.nrows()));
        Zip::from(r.rows_mut())
            .and(xnorm.rows())
            .for_each(|mut r_i, x_i| {
                let d = &self.xt_norm.data - &x_i;
                r_i.assign(&self.params.corr.value(&d, &self.theta));
            });
        r
    }

    fn scaled_predictor(&self, corr: &Array2<f64>) -> Array1<f64> {
        let y_ = corr.dot(&self.inner_params.gamma) + self.inner_params.beta;
        y_ * self.yt_norm.std[0] + self.yt_norm.mean[0]
    }

    fn mse(&self, corr: &Array2<f64>) -> Result<Array1<f64>> {
        let inners = &self.inner_params;
        let rt = inners
            .r_chol
            .solve_triangular(&corr.t().to_owned(), UPLO::Lower)?;
        // Constant mean regression: F = 1, QR decomposition of Ft reduces to its norm
        let ft_norm = inners.ft.dot(&inners.ft).sqrt();
        let u = (inners.ft.dot(&rt) - 1.) / ft_norm;

        let mse = (Array::ones(rt.ncols()) - rt.mapv(|v| v * v).sum_axis(Axis(0))
            + u.mapv(|v| v * v))
            * self.variance();

        // Mean Squared Error might be slightly negative depending on
        // machine precision: set to zero in that case
        Ok(mse.mapv(|v| if v < 0. { 0. } else { v }))
    }
}

impl fmt::Display for Kriging {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Kriging(corr={}, theta={}, variance={}, likelihood={})",
            self.params.corr,
            self.theta,
            self.variance(),
            self.likelihood
        )
    }
}

impl<D: Data<Elem = f64>> Fit<ArrayBase<D, Ix2>, ArrayBase<D, Ix1>, GpError>
    for KrigingValidParams
{
    type Object = Kriging;

    /// Fit kriging parameters using maximum likelihood
    fn fit(
        &self,
        dataset: &DatasetBase<ArrayBase<D, Ix2>, ArrayBase<D, Ix1>>,
    ) -> Result<Self::Object> {
        let x = dataset.records();
        let y = dataset.targets().to_owned().insert_axis(Axis(1));

        if x.nrows() == 0 {
            return Err(GpError::InvalidValueError(
                "At least one training point is required".to_string(),
            ));
        }
        if x.nrows() != y.nrows() {
            return Err(GpError::InvalidValueError(format!(
                "Training inputs ({}) and outputs ({}) counts differ",
                x.nrows(),
                y.nrows()
            )));
        }

        let xtrain = NormalizedData::new(x);
        let ytrain = NormalizedData::new(&y);
        let x_distances = DiffMatrix::new(&xtrain.data);
        let dim = x.ncols();
        let theta0 = Array1::from_elem(dim, self.theta_init());

        let opt_theta = if x_distances.n_obs < 2 {
            // Likelihood is flat with a single point
            theta0
        } else {
            let base: f64 = 10.;
            let objfn = |x: &[f64]| -> f64 {
                let theta = Array1::from_iter(x.iter().map(|v| base.powf(*v)));
                // check theta as optimizer may return nan values
                if theta.iter().any(|v| v.is_nan()) {
                    // shortcut return worst value wrt to rlf minimization
                    return f64::INFINITY;
                }
                let rxx = self.corr().value(&x_distances.d, &theta);
                match reduced_likelihood(&rxx, &x_distances, &ytrain, self.nugget()) {
                    Ok(r) => -r.0,
                    Err(_) => f64::INFINITY,
                }
            };

            let bounds = vec![self.theta_bounds(); dim];
            let (theta_inits, bounds) = prepare_multistart(self.n_start(), &theta0, &bounds);
            debug!("Optimize with multistart theta = {theta_inits:?} and bounds = {bounds:?}");
            let opt_params = (0..theta_inits.nrows())
                .map(|i| {
                    optimize_params(
                        objfn,
                        &theta_inits.row(i).to_owned(),
                        &bounds,
                        CobylaParams {
                            maxeval: (10 * theta_inits.ncols())
                                .clamp(GP_COBYLA_MIN_EVAL, self.max_eval()),
                            ..CobylaParams::default()
                        },
                    )
                })
                .fold((f64::INFINITY, theta_inits.row(0).to_owned()), |a, b| {
                    if b.0 < a.0 {
                        b
                    } else {
                        a
                    }
                });
            opt_params.1.mapv(|v| base.powf(v))
        };

        let rxx = self.corr().value(&x_distances.d, &opt_theta);
        let (likelihood, inner_params) =
            reduced_likelihood(&rxx, &x_distances, &ytrain, self.nugget())?;
        Ok(Kriging {
            theta: opt_theta,
            likelihood,
            inner_params,
            xt_norm: xtrain,
            yt_norm: ytrain,
            params: self.clone(),
        })
    }
}

/// Compute reduced likelihood function
/// rxx: correlation factors at x samples,
/// x_distances: pairwise distances between x samples
/// ytrain: normalized output training values
/// nugget: factor to improve numerical stability
fn reduced_likelihood(
    rxx: &Array1<f64>,
    x_distances: &DiffMatrix,
    ytrain: &NormalizedData,
    nugget: f64,
) -> Result<(f64, KrigingInnerParams)> {
    // Set up R
    let mut r_mx: Array2<f64> = Array2::<f64>::eye(x_distances.n_obs).mapv(|v| v + v * nugget);
    for (i, ij) in x_distances.d_indices.outer_iter().enumerate() {
        r_mx[[ij[0], ij[1]]] = rxx[i];
        r_mx[[ij[1], ij[0]]] = rxx[i];
    }
    // R cholesky decomposition
    let r_chol = r_mx.cholesky()?;
    // Solve generalized least squared problem with constant regression F = 1
    let fx = Array2::<f64>::ones((x_distances.n_obs, 1));
    let ft = r_chol.solve_triangular(&fx, UPLO::Lower)?.column(0).to_owned();
    let ft_sqr = ft.dot(&ft);
    if ft_sqr < 1e-20 {
        return Err(GpError::LikelihoodComputationError(
            "ft is too ill conditioned, try another theta again".to_string(),
        ));
    }
    let yt = r_chol
        .solve_triangular(&ytrain.data, UPLO::Lower)?
        .column(0)
        .to_owned();

    let beta = ft.dot(&yt) / ft_sqr;
    let rho = &yt - &(&ft * beta);
    let rho_sqr = rho.dot(&rho);

    let gamma = r_chol
        .t()
        .solve_triangular_into(rho.insert_axis(Axis(1)), UPLO::Upper)?
        .column(0)
        .to_owned();

    // The determinant of R is equal to the squared product of
    // the diagonal elements of its Cholesky decomposition r_chol
    let n_obs = x_distances.n_obs as f64;
    let logdet = r_chol.diag().mapv(|v| v.log10()).sum() * 2. / n_obs;

    // Reduced likelihood
    let sigma2 = (rho_sqr / n_obs).max(f64::MIN_POSITIVE);
    let reduced_likelihood = -n_obs * (sigma2.log10() + logdet);
    if !reduced_likelihood.is_finite() {
        return Err(GpError::LikelihoodComputationError(format!(
            "Reduced likelihood is not finite ({reduced_likelihood})"
        )));
    }

    Ok((
        reduced_likelihood,
        KrigingInnerParams {
            sigma2,
            beta,
            gamma,
            r_chol,
            ft,
        },
    ))
}
