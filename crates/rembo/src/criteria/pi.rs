use crate::criteria::{predict_mean_std, InfillCriterion};
use crate::surrogate::SurrogateModel;
use crate::utils::norm_cdf;

/// Probability of improving the current minimum by at least `jitter`
#[derive(Clone, Debug)]
pub struct ProbabilityOfImprovement {
    /// Improvement margin
    pub jitter: f64,
}

impl Default for ProbabilityOfImprovement {
    fn default() -> Self {
        ProbabilityOfImprovement { jitter: 0.01 }
    }
}

impl InfillCriterion for ProbabilityOfImprovement {
    fn name(&self) -> &'static str {
        "PI"
    }

    fn value(&self, x: &[f64], obj_model: &dyn SurrogateModel, fmin: f64) -> f64 {
        match predict_mean_std(x, obj_model) {
            Some((pred, sigma)) => {
                if sigma < f64::EPSILON {
                    if pred < fmin - self.jitter {
                        1.
                    } else {
                        0.
                    }
                } else {
                    norm_cdf((fmin - pred - self.jitter) / sigma)
                }
            }
            None => f64::NAN,
        }
    }
}
