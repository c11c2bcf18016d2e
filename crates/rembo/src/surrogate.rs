//! Surrogate model seam of the optimizer: any regression model able to predict
//! a mean and a variance can drive the subspace search.
use crate::errors::{RemboError, Result};

use linfa::prelude::{Dataset, Fit};
use linfa::ParamGuard;
use ndarray::{Array1, ArrayView1, ArrayView2};
use rembo_gp::{GpError, Kriging, KrigingParams};

/// A trained surrogate model of the (minimization oriented) objective in the subspace
pub trait SurrogateModel {
    /// Predict mean and variance values at (n, d) points
    fn predict_valvar(&self, x: &ArrayView2<f64>) -> Result<(Array1<f64>, Array1<f64>)>;

    /// Names of the model parameters recorded after each refit
    fn parameter_names(&self) -> Vec<String>;

    /// Values of the model parameters, same order as [`SurrogateModel::parameter_names`]
    fn parameter_values(&self) -> Vec<f64>;
}

/// A surrogate factory: fits a new model from scratch on the given data.
///
/// Numerical failures (singular covariance matrix) are reported as
/// [`RemboError::NumericalDegeneracy`].
pub trait SurrogateBuilder {
    /// Model name used in reports
    fn name(&self) -> String;

    /// Whether the model interpolates the data, i.e. evaluations are noiseless
    fn noiseless(&self) -> bool {
        false
    }

    /// Train a model on (n, d) inputs `xt` and n outputs `yt`
    fn train(&self, xt: &ArrayView2<f64>, yt: &ArrayView1<f64>) -> Result<Box<dyn SurrogateModel>>;
}

impl SurrogateModel for Kriging {
    fn predict_valvar(&self, x: &ArrayView2<f64>) -> Result<(Array1<f64>, Array1<f64>)> {
        Ok(Kriging::predict_valvar(self, x)?)
    }

    fn parameter_names(&self) -> Vec<String> {
        let corr = self.params_used().corr();
        let mut names: Vec<String> = (1..=self.theta().len())
            .map(|i| format!("{corr}.theta_{i}"))
            .collect();
        names.push(format!("{corr}.variance"));
        names.push("likelihood".to_string());
        names
    }

    fn parameter_values(&self) -> Vec<f64> {
        let mut values = self.theta().to_vec();
        values.push(self.variance());
        values.push(self.likelihood());
        values
    }
}

impl SurrogateBuilder for KrigingParams {
    fn name(&self) -> String {
        "GP".to_string()
    }

    fn noiseless(&self) -> bool {
        self.check_ref().is_ok_and(|params| params.nugget() == 0.)
    }

    fn train(&self, xt: &ArrayView2<f64>, yt: &ArrayView1<f64>) -> Result<Box<dyn SurrogateModel>> {
        let dataset = Dataset::new(xt.to_owned(), yt.to_owned());
        match self.clone().fit(&dataset) {
            Ok(gp) => Ok(Box::new(gp)),
            Err(err) => Err(degeneracy_or(err)),
        }
    }
}

fn degeneracy_or(err: GpError) -> RemboError {
    if err.is_numerical() {
        RemboError::NumericalDegeneracy(err.to_string())
    } else {
        RemboError::GpError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_kriging_as_surrogate() {
        let xt = array![[-1., 0.], [0., 1.], [1., -1.], [0.5, 0.5]];
        let yt = array![1., 0., 2., 0.5];
        let builder = KrigingParams::default();
        assert_eq!(builder.name(), "GP");
        let model = builder.train(&xt.view(), &yt.view()).expect("model trained");
        let (mean, var) = model.predict_valvar(&xt.view()).expect("prediction");
        assert_abs_diff_eq!(mean, yt, epsilon = 1e-2);
        assert!(var.iter().all(|v| *v >= 0.));
        let names = model.parameter_names();
        assert_eq!(names.len(), model.parameter_values().len());
        assert_eq!(names[0], "Matern52.theta_1");
        assert_eq!(names[3], "likelihood");
    }

    #[test]
    fn test_invalid_params_are_not_degeneracies() {
        let builder = KrigingParams::default().nugget(-1.);
        let err = builder
            .train(&array![[0.]].view(), &array![1.].view())
            .err()
            .expect("invalid nugget");
        assert!(matches!(err, RemboError::GpError(_)));
    }

    #[test]
    fn test_kriging_noiseless_only_without_nugget() {
        assert!(!KrigingParams::default().noiseless());
        assert!(KrigingParams::default().nugget(0.).noiseless());
    }
}
