//! REMBO optimizer configuration.
use crate::errors::{RemboError, Result};
use crate::types::*;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Default number of infill optimization restarts
pub const DEFAULT_N_START: usize = 5;
/// Default number of infill candidates per subspace dimension
pub const DEFAULT_N_POINTS: usize = 100;

/// REMBO optimizer configuration
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct RemboConfig {
    /// Dimension of the searched subspace (d <= D)
    pub(crate) subspace_dim: usize,
    /// Number of points of the initial design when it is not given
    pub(crate) n_doe: usize,
    /// Sampling method of the initial design
    pub(crate) doe_kind: InitialDesignKind,
    /// Optional initial design given as (n, d) subspace points
    pub(crate) doe: Option<Array2<f64>>,
    /// Optional user objective values of the initial design.
    /// When missing the initial design is evaluated.
    pub(crate) doe_values: Option<Array1<f64>>,
    /// Criterion to select next point to evaluate
    pub(crate) acquisition: AcquisitionStrategy,
    /// Weight of the standard deviation in the LCB criterion
    pub(crate) exploration_weight: f64,
    /// Improvement margin of EI and PI criteria
    pub(crate) jitter: f64,
    /// Whether outputs are centered and reduced before fitting the surrogate
    pub(crate) normalize_y: bool,
    /// Interval between two surrogate refits (as iteration number modulo)
    pub(crate) model_update_interval: u64,
    /// Whether the objective is maximized
    pub(crate) maximize: bool,
    /// Whether already sampled points are excluded from proposals
    pub(crate) de_duplication: bool,
    /// Number of local refinements of the infill criterion optimization
    pub(crate) n_start: usize,
    /// Number of infill candidates scanned per subspace dimension
    pub(crate) n_points: usize,
    /// A random generator seed used to get reproducible results.
    pub(crate) seed: Option<u64>,
    /// Directory where run reports are saved
    pub(crate) outdir: Option<String>,
}

impl Default for RemboConfig {
    fn default() -> Self {
        RemboConfig {
            subspace_dim: 1,
            n_doe: 1,
            doe_kind: InitialDesignKind::Random,
            doe: None,
            doe_values: None,
            acquisition: AcquisitionStrategy::LCB,
            exploration_weight: 2.,
            jitter: 0.01,
            normalize_y: true,
            model_update_interval: 1,
            maximize: false,
            de_duplication: false,
            n_start: DEFAULT_N_START,
            n_points: DEFAULT_N_POINTS,
            seed: None,
            outdir: None,
        }
    }
}

impl RemboConfig {
    /// Sets the dimension of the random subspace
    pub fn subspace_dim(mut self, subspace_dim: usize) -> Self {
        self.subspace_dim = subspace_dim;
        self
    }

    /// Sets the number of points of the initial design
    pub fn n_doe(mut self, n_doe: usize) -> Self {
        self.n_doe = n_doe;
        self
    }

    /// Sets the sampling method of the initial design
    pub fn doe_kind(mut self, doe_kind: InitialDesignKind) -> Self {
        self.doe_kind = doe_kind;
        self
    }

    /// Sets an initial design as (n, d) subspace points
    pub fn doe(mut self, doe: &Array2<f64>) -> Self {
        self.doe = Some(doe.to_owned());
        self
    }

    /// Sets the user objective values of the initial design given with [`RemboConfig::doe`]
    pub fn doe_values(mut self, values: &Array1<f64>) -> Self {
        self.doe_values = Some(values.to_owned());
        self
    }

    /// Sets the acquisition function
    pub fn acquisition(mut self, acquisition: AcquisitionStrategy) -> Self {
        self.acquisition = acquisition;
        self
    }

    /// Sets the exploration weight of the LCB criterion
    pub fn exploration_weight(mut self, weight: f64) -> Self {
        self.exploration_weight = weight;
        self
    }

    /// Sets the improvement margin of EI and PI criteria
    pub fn jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter;
        self
    }

    /// Whether outputs are normalized before fitting the surrogate
    pub fn normalize_y(mut self, normalize_y: bool) -> Self {
        self.normalize_y = normalize_y;
        self
    }

    /// Sets the number of iterations between two surrogate refits
    pub fn model_update_interval(mut self, interval: u64) -> Self {
        self.model_update_interval = interval;
        self
    }

    /// Maximize the objective instead of minimizing it
    pub fn maximize(mut self, maximize: bool) -> Self {
        self.maximize = maximize;
        self
    }

    /// Never propose an already sampled point
    pub fn de_duplication(mut self, de_duplication: bool) -> Self {
        self.de_duplication = de_duplication;
        self
    }

    /// Sets the number of local refinements of the infill criterion optimization
    pub fn n_start(mut self, n_start: usize) -> Self {
        self.n_start = n_start;
        self
    }

    /// Sets the number of infill candidates scanned per subspace dimension
    pub fn n_points(mut self, n_points: usize) -> Self {
        self.n_points = n_points;
        self
    }

    /// Allow to specify a seed for random number generator to allow
    /// reproducible runs.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the directory where run reports are written
    pub fn outdir(mut self, outdir: impl Into<String>) -> Self {
        self.outdir = Some(outdir.into());
        self
    }

    /// Check the configuration against the original domain dimension
    pub fn check(self, dim: usize) -> Result<ValidRemboConfig> {
        if dim == 0 {
            return Err(RemboError::InvalidConfigError(
                "Original domain should have at least one dimension".to_string(),
            ));
        }
        if self.subspace_dim == 0 || self.subspace_dim > dim {
            return Err(RemboError::InvalidConfigError(format!(
                "Subspace dimension should be in [1, {dim}], got {}",
                self.subspace_dim
            )));
        }
        if self.model_update_interval == 0 {
            return Err(RemboError::InvalidConfigError(
                "Model update interval should be at least 1".to_string(),
            ));
        }
        if self.n_start == 0 || self.n_points == 0 {
            return Err(RemboError::InvalidConfigError(
                "Infill optimization needs at least one start and one candidate".to_string(),
            ));
        }
        if !(self.exploration_weight >= 0. && self.exploration_weight.is_finite()) {
            return Err(RemboError::InvalidConfigError(format!(
                "Exploration weight should be a non negative number, got {}",
                self.exploration_weight
            )));
        }
        match (&self.doe, &self.doe_values) {
            (None, Some(_)) => {
                return Err(RemboError::InvalidConfigError(
                    "Initial objective values given without initial design".to_string(),
                ))
            }
            (Some(doe), values) => {
                if doe.nrows() == 0 {
                    return Err(RemboError::InvalidConfigError(
                        "Initial design should not be empty".to_string(),
                    ));
                }
                if doe.ncols() != self.subspace_dim {
                    return Err(RemboError::ShapeError(format!(
                        "Initial design points should have {} components, got {}",
                        self.subspace_dim,
                        doe.ncols()
                    )));
                }
                if let Some(values) = values {
                    if values.len() != doe.nrows() {
                        return Err(RemboError::InvalidConfigError(format!(
                            "Initial design has {} points but {} objective values",
                            doe.nrows(),
                            values.len()
                        )));
                    }
                }
            }
            (None, None) => {
                if self.n_doe == 0 {
                    return Err(RemboError::InvalidConfigError(
                        "Initial design should have at least one point".to_string(),
                    ));
                }
            }
        }
        Ok(ValidRemboConfig { config: self, dim })
    }
}

/// A configuration checked against the dimension of the original domain
#[derive(Clone, Serialize, Debug)]
pub struct ValidRemboConfig {
    #[serde(flatten)]
    pub(crate) config: RemboConfig,
    pub(crate) dim: usize,
}

impl std::ops::Deref for ValidRemboConfig {
    type Target = RemboConfig;

    fn deref(&self) -> &RemboConfig {
        &self.config
    }
}

impl ValidRemboConfig {
    /// Dimension of the original domain
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Dimension of the subspace
    pub fn subspace_dim(&self) -> usize {
        self.config.subspace_dim
    }

    /// Number of initial design points
    pub fn n_doe(&self) -> usize {
        self.config
            .doe
            .as_ref()
            .map_or(self.config.n_doe, |doe| doe.nrows())
    }

    /// Sampling method of the initial design
    pub fn doe_kind(&self) -> InitialDesignKind {
        self.config.doe_kind
    }

    /// Acquisition function
    pub fn acquisition(&self) -> AcquisitionStrategy {
        self.config.acquisition
    }

    /// Whether outputs are normalized
    pub fn normalize_y(&self) -> bool {
        self.config.normalize_y
    }

    /// Number of iterations between two refits
    pub fn model_update_interval(&self) -> u64 {
        self.config.model_update_interval
    }

    /// Whether the objective is maximized
    pub fn maximize(&self) -> bool {
        self.config.maximize
    }

    /// Whether duplicates are excluded
    pub fn de_duplication(&self) -> bool {
        self.config.de_duplication
    }

    /// Output directory
    pub fn outdir(&self) -> Option<&str> {
        self.config.outdir.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_default_config() {
        let config = RemboConfig::default().subspace_dim(2).check(5).expect("valid");
        assert_eq!(config.n_doe(), 1);
        assert_eq!(config.doe_kind(), InitialDesignKind::Random);
        assert_eq!(config.acquisition(), AcquisitionStrategy::LCB);
        assert!(config.normalize_y());
        assert_eq!(config.model_update_interval(), 1);
        assert!(!config.maximize());
        assert!(!config.de_duplication());
        assert_eq!(config.dim(), 5);
    }

    #[test]
    fn test_invalid_subspace_dim() {
        assert!(matches!(
            RemboConfig::default().subspace_dim(0).check(5),
            Err(RemboError::InvalidConfigError(_))
        ));
        assert!(matches!(
            RemboConfig::default().subspace_dim(6).check(5),
            Err(RemboError::InvalidConfigError(_))
        ));
    }

    #[test]
    fn test_invalid_initial_design() {
        let doe = array![[0., 1.], [1., 0.]];
        assert!(matches!(
            RemboConfig::default()
                .subspace_dim(2)
                .doe_values(&array![1., 2.])
                .check(5),
            Err(RemboError::InvalidConfigError(_))
        ));
        assert!(matches!(
            RemboConfig::default()
                .subspace_dim(2)
                .doe(&doe)
                .doe_values(&array![1.])
                .check(5),
            Err(RemboError::InvalidConfigError(_))
        ));
        assert!(matches!(
            RemboConfig::default().subspace_dim(3).doe(&doe).check(5),
            Err(RemboError::ShapeError(_))
        ));
        let config = RemboConfig::default()
            .subspace_dim(2)
            .doe(&doe)
            .check(5)
            .expect("valid");
        assert_eq!(config.n_doe(), 2);
    }

    #[test]
    fn test_invalid_settings() {
        assert!(RemboConfig::default().model_update_interval(0).check(2).is_err());
        assert!(RemboConfig::default().n_doe(0).check(2).is_err());
        assert!(RemboConfig::default().exploration_weight(-1.).check(2).is_err());
        assert!(RemboConfig::default().n_start(0).check(2).is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = RemboConfig::default().subspace_dim(2).seed(42).check(4).expect("valid");
        let json = serde_json::to_string(&config).expect("serialized");
        assert!(json.contains("\"subspace_dim\":2"));
        assert!(json.contains("\"dim\":4"));
    }
}
