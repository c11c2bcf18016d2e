use crate::criteria::{predict_mean_std, InfillCriterion};
use crate::surrogate::SurrogateModel;

/// Lower confidence bound `mean - weight * std`, returned negated
/// so that the most promising point is the maximum.
#[derive(Clone, Debug)]
pub struct LowerConfidenceBound {
    /// Exploration weight of the standard deviation
    pub weight: f64,
}

impl Default for LowerConfidenceBound {
    fn default() -> Self {
        LowerConfidenceBound { weight: 2. }
    }
}

impl InfillCriterion for LowerConfidenceBound {
    fn name(&self) -> &'static str {
        "LCB"
    }

    fn value(&self, x: &[f64], obj_model: &dyn SurrogateModel, _fmin: f64) -> f64 {
        match predict_mean_std(x, obj_model) {
            Some((mean, std)) => -mean + self.weight * std,
            None => f64::NAN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::tests::LinearModel;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_lcb() {
        let lcb = LowerConfidenceBound::default();
        assert_abs_diff_eq!(lcb.value(&[1., 0.5], &LinearModel, 0.), -1. + 2. * 0.5);
        // lower mean or larger uncertainty is preferred
        assert!(lcb.value(&[0., 0.5], &LinearModel, 0.) > lcb.value(&[1., 0.5], &LinearModel, 0.));
        assert!(lcb.value(&[1., 1.], &LinearModel, 0.) > lcb.value(&[1., 0.5], &LinearModel, 0.));
    }
}
