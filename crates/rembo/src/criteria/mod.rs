//! Available infill criteria used to select the next subspace point
mod ei;
mod lcb;
mod pi;

pub use ei::ExpectedImprovement;
pub use lcb::LowerConfidenceBound;
pub use pi::ProbabilityOfImprovement;

use crate::surrogate::SurrogateModel;
use crate::types::AcquisitionStrategy;
use ndarray::ArrayView;

/// A trait for infill criterion which maximum location will
/// determine the next most promising point expected to be the
/// optimum location of the objective function
pub trait InfillCriterion {
    /// Name of the infill criterion
    fn name(&self) -> &'static str;

    /// Criterion value at given point x with regards to given
    /// surrogate of the objective function and the current found min
    fn value(&self, x: &[f64], obj_model: &dyn SurrogateModel, fmin: f64) -> f64;
}

impl std::fmt::Debug for dyn InfillCriterion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Predicted mean and standard deviation at a single point
pub(crate) fn predict_mean_std(x: &[f64], obj_model: &dyn SurrogateModel) -> Option<(f64, f64)> {
    let pt = ArrayView::from_shape((1, x.len()), x).ok()?;
    let (p, v) = obj_model.predict_valvar(&pt).ok()?;
    Some((p[0], v[0].max(0.).sqrt()))
}

impl AcquisitionStrategy {
    /// Build the criterion matching the strategy. `weight` is the LCB exploration
    /// weight, `jitter` the EI/PI improvement margin.
    pub fn criterion(&self, weight: f64, jitter: f64) -> Box<dyn InfillCriterion> {
        match self {
            AcquisitionStrategy::LCB => Box::new(LowerConfidenceBound { weight }),
            AcquisitionStrategy::EI => Box::new(ExpectedImprovement { jitter }),
            AcquisitionStrategy::PI => Box::new(ProbabilityOfImprovement { jitter }),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::errors::Result;
    use ndarray::{Array1, ArrayView2};

    /// Model with mean x0 and variance x1^2
    pub(crate) struct LinearModel;

    impl SurrogateModel for LinearModel {
        fn predict_valvar(&self, x: &ArrayView2<f64>) -> Result<(Array1<f64>, Array1<f64>)> {
            Ok((x.column(0).to_owned(), x.column(1).mapv(|v| v * v)))
        }
        fn parameter_names(&self) -> Vec<String> {
            vec![]
        }
        fn parameter_values(&self) -> Vec<f64> {
            vec![]
        }
    }

    #[test]
    fn test_strategy_criterion() {
        assert_eq!(AcquisitionStrategy::LCB.criterion(2., 0.01).name(), "LCB");
        assert_eq!(AcquisitionStrategy::EI.criterion(2., 0.01).name(), "EI");
        assert_eq!(AcquisitionStrategy::PI.criterion(2., 0.01).name(), "PI");
    }

    #[test]
    fn test_predict_mean_std() {
        assert_eq!(predict_mean_std(&[1., -2.], &LinearModel), Some((1., 2.)));
    }
}
