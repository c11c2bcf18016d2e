use crate::correlation_models::CorrelationKind;
use crate::errors::{GpError, Result};
use crate::{GP_COBYLA_MAX_EVAL, GP_OPTIM_N_START};
use linfa::ParamGuard;

/// A set of validated kriging parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct KrigingValidParams {
    /// Correlation model representing the spatial correlation between errors at e(x) and e(x')
    pub(crate) corr: CorrelationKind,
    /// Initial guess of the correlation lengths (same value for every component)
    pub(crate) theta_init: f64,
    /// Bounds of the correlation lengths (lower, upper)
    pub(crate) theta_bounds: (f64, f64),
    /// Number of internal likelihood optimization restart
    pub(crate) n_start: usize,
    /// Max number of internal likelihood evaluation during optimization
    pub(crate) max_eval: usize,
    /// Parameter to improve numerical stability
    pub(crate) nugget: f64,
}

impl Default for KrigingValidParams {
    fn default() -> KrigingValidParams {
        KrigingValidParams {
            corr: CorrelationKind::default(),
            theta_init: KrigingValidParams::DEFAULT_THETA_INIT,
            theta_bounds: KrigingValidParams::DEFAULT_THETA_BOUNDS,
            n_start: GP_OPTIM_N_START,
            max_eval: GP_COBYLA_MAX_EVAL,
            nugget: 1e-6,
        }
    }
}

impl KrigingValidParams {
    /// Default initial theta value
    pub const DEFAULT_THETA_INIT: f64 = 1e-2;
    /// Default bounds for theta values
    pub const DEFAULT_THETA_BOUNDS: (f64, f64) = (1e-6, 1e2);

    /// Get correlation model
    pub fn corr(&self) -> CorrelationKind {
        self.corr
    }

    /// Get starting theta value for optimization
    pub fn theta_init(&self) -> f64 {
        self.theta_init
    }

    /// Get theta bounds
    pub fn theta_bounds(&self) -> (f64, f64) {
        self.theta_bounds
    }

    /// Get the number of internal optimization restart
    pub fn n_start(&self) -> usize {
        self.n_start
    }

    /// Get the max number of internal likelihood evaluations during one optimization
    pub fn max_eval(&self) -> usize {
        self.max_eval
    }

    /// Get nugget
    pub fn nugget(&self) -> f64 {
        self.nugget
    }
}

#[derive(Clone, Debug, Default)]
/// The set of hyperparameters that can be specified for the execution of
/// the [kriging algorithm](crate::Kriging).
pub struct KrigingParams(pub(crate) KrigingValidParams);

impl KrigingParams {
    /// A constructor for kriging parameters given a correlation model
    pub fn new(corr: CorrelationKind) -> KrigingParams {
        Self(KrigingValidParams {
            corr,
            ..Default::default()
        })
    }

    /// Set correlation model.
    pub fn corr(mut self, corr: CorrelationKind) -> Self {
        self.0.corr = corr;
        self
    }

    /// Set the initial guess of the correlation lengths
    pub fn theta_init(mut self, theta_init: f64) -> Self {
        self.0.theta_init = theta_init;
        self
    }

    /// Set the bounds of the correlation lengths
    pub fn theta_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.0.theta_bounds = (lower, upper);
        self
    }

    /// Set the number of internal likelihood optimization restarts
    pub fn n_start(mut self, n_start: usize) -> Self {
        self.0.n_start = n_start;
        self
    }

    /// Set the max number of likelihood evaluations during one internal optimization
    pub fn max_eval(mut self, max_eval: usize) -> Self {
        self.0.max_eval = max_eval;
        self
    }

    /// Set nugget.
    ///
    /// Nugget is used to improve numerical stability
    pub fn nugget(mut self, nugget: f64) -> Self {
        self.0.nugget = nugget;
        self
    }
}

impl ParamGuard for KrigingParams {
    type Checked = KrigingValidParams;
    type Error = GpError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        let (lo, up) = self.0.theta_bounds;
        if !(lo > 0. && lo < up) {
            return Err(GpError::InvalidValueError(format!(
                "Theta bounds should satisfy 0 < lower < upper, got ({lo}, {up})"
            )));
        }
        if self.0.theta_init <= 0. {
            return Err(GpError::InvalidValueError(format!(
                "Initial theta should be positive, got {}",
                self.0.theta_init
            )));
        }
        if self.0.n_start < 1 {
            return Err(GpError::InvalidValueError(
                "Number of likelihood optimization starts should be at least 1".to_string(),
            ));
        }
        if self.0.nugget < 0. {
            return Err(GpError::InvalidValueError(format!(
                "Nugget should be non negative, got {}",
                self.0.nugget
            )));
        }
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_are_valid() {
        let params = KrigingParams::default().check().expect("valid params");
        assert_eq!(params.corr(), CorrelationKind::Matern52);
        assert_eq!(params.n_start(), GP_OPTIM_N_START);
    }

    #[test]
    fn test_invalid_params() {
        assert!(KrigingParams::default()
            .theta_bounds(1., 0.1)
            .check_ref()
            .is_err());
        assert!(KrigingParams::default().nugget(-1.).check_ref().is_err());
        assert!(KrigingParams::default().n_start(0).check_ref().is_err());
        assert!(KrigingParams::default().theta_init(0.).check_ref().is_err());
    }
}
