use crate::criteria::{predict_mean_std, InfillCriterion};
use crate::surrogate::SurrogateModel;
use crate::utils::{norm_cdf, norm_pdf};

/// A structure for Expected Improvement implementation
#[derive(Clone, Debug)]
pub struct ExpectedImprovement {
    /// Improvement margin
    pub jitter: f64,
}

impl Default for ExpectedImprovement {
    fn default() -> Self {
        ExpectedImprovement { jitter: 0.01 }
    }
}

impl InfillCriterion for ExpectedImprovement {
    fn name(&self) -> &'static str {
        "EI"
    }

    /// Compute EI infill criterion at given `x` point using the surrogate model `obj_model`
    /// and the current minimum of the objective function.
    fn value(&self, x: &[f64], obj_model: &dyn SurrogateModel, fmin: f64) -> f64 {
        match predict_mean_std(x, obj_model) {
            Some((pred, sigma)) => {
                if sigma < f64::EPSILON {
                    0.0
                } else {
                    let args0 = (fmin - pred - self.jitter) / sigma;
                    let args1 = args0 * norm_cdf(args0);
                    let args2 = norm_pdf(args0);
                    sigma * (args1 + args2)
                }
            }
            None => f64::NAN,
        }
    }
}
