use crate::criteria::InfillCriterion;
use crate::surrogate::SurrogateModel;
use crate::utils::is_update_ok;

use cobyla::{minimize, Func, RhoBeg, StopTols};
use egobox_doe::{Lhs, LhsKind, Random, SamplingMethod};
use log::{debug, warn};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use ndarray_rand::rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

/// Max number of random draws when every candidate is a duplicate
const MAX_RANDOM_DRAWS: usize = 1000;

/// Maximizes an infill criterion over the subspace box: a Latin hypercube
/// scan selects the most promising candidates which are then refined with
/// COBYLA. When duplicates are excluded, points already sampled are never
/// returned.
pub(crate) struct InfillOptimizer<'a> {
    xlimits: &'a Array2<f64>,
    criterion: &'a dyn InfillCriterion,
    obj_model: &'a dyn SurrogateModel,
    fmin: f64,
    n_start: usize,
    n_points: usize,
    exclude: Option<&'a Array2<f64>>,
}

impl<'a> InfillOptimizer<'a> {
    pub fn new(
        xlimits: &'a Array2<f64>,
        criterion: &'a dyn InfillCriterion,
        obj_model: &'a dyn SurrogateModel,
        fmin: f64,
    ) -> Self {
        InfillOptimizer {
            xlimits,
            criterion,
            obj_model,
            fmin,
            n_start: 5,
            n_points: 100,
            exclude: None,
        }
    }

    /// Number of best candidates refined by local optimization
    pub fn n_start(mut self, n_start: usize) -> Self {
        self.n_start = n_start;
        self
    }

    /// Number of scanned candidates per subspace dimension
    pub fn n_points(mut self, n_points: usize) -> Self {
        self.n_points = n_points;
        self
    }

    /// Points which must not be proposed again
    pub fn exclude(mut self, exclude: Option<&'a Array2<f64>>) -> Self {
        self.exclude = exclude;
        self
    }

    fn criterion_value(&self, x: &[f64]) -> f64 {
        self.criterion.value(x, self.obj_model, self.fmin)
    }

    fn is_admissible(&self, x: &ArrayView1<f64>) -> bool {
        x.iter().all(|v| v.is_finite()) && self.exclude.map_or(true, |data| is_update_ok(data, x))
    }

    fn clip(&self, x: &[f64]) -> Array1<f64> {
        Array1::from_iter(
            x.iter()
                .zip(self.xlimits.rows())
                .map(|(v, lim)| v.clamp(lim[0], lim[1])),
        )
    }

    /// Local maximization of the criterion starting from `x0`
    fn refine(&self, x0: &ArrayView1<f64>) -> Option<(Array1<f64>, f64)> {
        let cons: Vec<&dyn Func<()>> = vec![];
        let bounds: Vec<(f64, f64)> = self.xlimits.rows().into_iter().map(|r| (r[0], r[1])).collect();
        let obj = |x: &[f64], _u: &mut ()| -> f64 {
            let v = self.criterion_value(x);
            if v.is_finite() {
                -v
            } else {
                f64::INFINITY
            }
        };
        let x_opt = match minimize(
            obj,
            &x0.to_vec(),
            &bounds,
            &cons,
            (),
            200,
            RhoBeg::All(0.5),
            Some(StopTols {
                ftol_rel: 1e-4,
                ..StopTols::default()
            }),
        ) {
            Ok((_, x_opt, _)) => x_opt,
            Err((status, x_opt, _)) => {
                debug!("Infill refinement stopped: {status:?}");
                x_opt
            }
        };
        let x_opt = self.clip(&x_opt);
        let value = self.criterion_value(&x_opt.to_vec());
        if value.is_finite() && self.is_admissible(&x_opt.view()) {
            Some((x_opt, value))
        } else {
            None
        }
    }

    fn draw<R: Rng>(&self, rng: &mut R) -> Array1<f64> {
        Random::new_with_rng(self.xlimits, Xoshiro256Plus::seed_from_u64(rng.gen()))
            .sample(1)
            .row(0)
            .to_owned()
    }

    fn random_point<R: Rng>(&self, rng: &mut R) -> Array1<f64> {
        let mut x = self.draw(rng);
        for _ in 0..MAX_RANDOM_DRAWS {
            if self.is_admissible(&x.view()) {
                break;
            }
            x = self.draw(rng);
        }
        x
    }

    /// Returns the location of the best criterion value found
    pub fn maximize<R: Rng>(&self, rng: &mut R) -> Array1<f64> {
        let dim = self.xlimits.nrows();
        let lhs = Lhs::new_with_rng(self.xlimits, Xoshiro256Plus::seed_from_u64(rng.gen()))
            .kind(LhsKind::Classic);
        let candidates = lhs.sample(self.n_points * dim);
        let values: Array1<f64> = candidates.map_axis(Axis(1), |x| self.criterion_value(&x.to_vec()));

        let mut valid: Vec<usize> = (0..candidates.nrows())
            .filter(|&i| values[i].is_finite() && self.is_admissible(&candidates.row(i)))
            .collect();
        if valid.is_empty() {
            warn!("No admissible infill candidate, pick a random subspace point");
            return self.random_point(rng);
        }
        valid.sort_by(|&a, &b| values[b].total_cmp(&values[a]));

        let mut best = (candidates.row(valid[0]).to_owned(), values[valid[0]]);
        for &i in valid.iter().take(self.n_start) {
            if let Some((x, v)) = self.refine(&candidates.row(i)) {
                if v > best.1 {
                    best = (x, v);
                }
            }
        }
        debug!("Infill criterion {} = {} at {}", self.criterion.name(), best.1, best.0);
        best.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::LowerConfidenceBound;
    use crate::errors::Result;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, ArrayView2};

    /// Model with mean (x0 - 0.3)^2 + (x1 + 0.2)^2 and no uncertainty
    struct Bowl;

    impl SurrogateModel for Bowl {
        fn predict_valvar(&self, x: &ArrayView2<f64>) -> Result<(Array1<f64>, Array1<f64>)> {
            let mean = x.map_axis(Axis(1), |r| (r[0] - 0.3).powi(2) + (r[1] + 0.2).powi(2));
            Ok((mean, Array1::zeros(x.nrows())))
        }
        fn parameter_names(&self) -> Vec<String> {
            vec![]
        }
        fn parameter_values(&self) -> Vec<f64> {
            vec![]
        }
    }

    #[test]
    fn test_infill_optimizer_finds_bowl_minimum() {
        let xlimits = array![[-1., 1.], [-1., 1.]];
        let lcb = LowerConfidenceBound::default();
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let x = InfillOptimizer::new(&xlimits, &lcb, &Bowl, 0.).maximize(&mut rng);
        assert_abs_diff_eq!(x, array![0.3, -0.2], epsilon = 1e-2);
    }

    #[test]
    fn test_infill_optimizer_stays_in_bounds() {
        // minimum of the bowl is outside the box
        let xlimits = array![[0.5, 1.], [0., 1.]];
        let lcb = LowerConfidenceBound::default();
        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        let x = InfillOptimizer::new(&xlimits, &lcb, &Bowl, 0.).maximize(&mut rng);
        assert!(x[0] >= 0.5 && x[0] <= 1.);
        assert!(x[1] >= 0. && x[1] <= 1.);
        assert_abs_diff_eq!(x, array![0.5, 0.], epsilon = 1e-2);
    }

    #[test]
    fn test_infill_optimizer_excludes_duplicates() {
        let xlimits = array![[-1., 1.], [-1., 1.]];
        let lcb = LowerConfidenceBound::default();
        let mut rng = Xoshiro256Plus::seed_from_u64(3);
        let first = InfillOptimizer::new(&xlimits, &lcb, &Bowl, 0.).maximize(&mut rng);
        let sampled = first.clone().insert_axis(Axis(0));
        let second = InfillOptimizer::new(&xlimits, &lcb, &Bowl, 0.)
            .exclude(Some(&sampled))
            .maximize(&mut rng);
        assert!(is_update_ok(&sampled, &second));
    }
}
