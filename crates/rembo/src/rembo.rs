//! REMBO optimizer: builds a random embedding of a low dimensional subspace
//! into the original domain, then runs a bayesian optimization loop within
//! the subspace.
//!
//! Each pass of the loop refits the surrogate model, checks the stopping
//! criteria, then proposes and evaluates one new point. A numerical failure
//! of the surrogate fit stops the loop without error: the best point found
//! so far is still available.
use crate::embedding::{subspace_limits, Embedding};
use crate::errors::{RemboError, Result};
use crate::objective::{ObjectiveFn, SignedObjective};
use crate::optimizers::InfillOptimizer;
use crate::rembo_config::{RemboConfig, ValidRemboConfig};
use crate::surrogate::{SurrogateBuilder, SurrogateModel};
use crate::types::*;
use crate::utils::{distance, find_best_index, normalize_stats, REMBO_LOG};

use egobox_doe::{Lhs, LhsKind, Random, SamplingMethod};
use env_logger::{Builder, Env};
use log::{debug, info, warn};
use ndarray::{aview1, Array1, Array2, ArrayBase, Axis, Data, Ix2};
use ndarray_rand::rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
use rembo_gp::KrigingParams;
use std::time::Duration;
use web_time::Instant;

/// REMBO optimizer builder allowing to specify the function to be optimized,
/// the configuration, the surrogate model and the random generator.
pub struct RemboBuilder<O: ObjectiveFn> {
    fobj: O,
    config: RemboConfig,
    surrogate: Option<Box<dyn SurrogateBuilder>>,
    rng: Option<Xoshiro256Plus>,
}

impl<O: ObjectiveFn> RemboBuilder<O> {
    /// Function to be optimized: R^D -> R where D is the dimension
    /// of the original domain
    pub fn optimize(fobj: O) -> Self {
        RemboBuilder {
            fobj,
            config: RemboConfig::default(),
            surrogate: None,
            rng: None,
        }
    }

    /// Set configuration of the optimizer
    pub fn configure<F: FnOnce(RemboConfig) -> RemboConfig>(mut self, init: F) -> Self {
        self.config = init(self.config);
        self
    }

    /// Set the surrogate model builder (default: [`KrigingParams`] defaults)
    pub fn surrogate<S: SurrogateBuilder + 'static>(mut self, surrogate: S) -> Self {
        self.surrogate = Some(Box::new(surrogate));
        self
    }

    /// Set the random generator used for the embedding, the initial design
    /// and the infill optimization. Takes precedence over the configured seed.
    pub fn rng(mut self, rng: Xoshiro256Plus) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Build the optimizer for the original domain `xlimits` specified as
    /// [[lower, upper], ...] array where the number of rows gives the dimension D.
    ///
    /// The embedding is drawn and the initial design is evaluated.
    pub fn within(self, xlimits: &ArrayBase<impl Data<Elem = f64>, Ix2>) -> Result<Rembo<O>> {
        let env = Env::new().filter_or(REMBO_LOG, "info");
        let mut builder = Builder::from_env(env);
        let builder = builder.target(env_logger::Target::Stdout);
        builder.try_init().ok();

        if xlimits.ncols() != 2 || xlimits.nrows() == 0 {
            return Err(RemboError::InvalidConfigError(format!(
                "Domain should be given as a (dim, 2) array of [lower, upper] bounds, got {:?}",
                xlimits.dim()
            )));
        }
        let config = self.config.check(xlimits.nrows())?;
        let rng = match (self.rng, config.seed) {
            (Some(rng), _) => rng,
            (None, Some(seed)) => Xoshiro256Plus::seed_from_u64(seed),
            (None, None) => Xoshiro256Plus::from_entropy(),
        };
        let surrogate = self
            .surrogate
            .unwrap_or_else(|| Box::new(KrigingParams::default()));
        let objective = SignedObjective::wrap(self.fobj, config.maximize());

        let mut rembo = Rembo::new(config, xlimits.to_owned(), objective, surrogate, rng)?;
        rembo.initial_design()?;
        Ok(rembo)
    }
}

/// Stopping criteria given to [`Rembo::run`]
#[derive(Clone, Debug)]
pub(crate) struct RunSettings {
    pub max_iter: Option<u64>,
    pub max_time: Option<Duration>,
    pub eps: f64,
}

/// REMBO optimizer holding the embedding, the sample history and the run state
pub struct Rembo<O: ObjectiveFn> {
    pub(crate) config: ValidRemboConfig,
    pub(crate) xlimits: Array2<f64>,
    pub(crate) objective: SignedObjective<O>,
    pub(crate) embedding: Embedding,
    pub(crate) subspace_limits: Array2<f64>,
    surrogate: Box<dyn SurrogateBuilder>,
    rng: Xoshiro256Plus,
    status: RemboStatus,
    pub(crate) x_data: Array2<f64>,
    pub(crate) y_data: Array1<f64>,
    pub(crate) n_iters: u64,
    model: Option<Box<dyn SurrogateModel>>,
    model_fmin: f64,
    pub(crate) model_records: Vec<ModelRecord>,
    pub(crate) elapsed: Duration,
    pub(crate) settings: Option<RunSettings>,
    pub(crate) termination: Option<TerminationReason>,
}

impl<O: ObjectiveFn> Rembo<O> {
    fn new(
        config: ValidRemboConfig,
        xlimits: Array2<f64>,
        objective: SignedObjective<O>,
        surrogate: Box<dyn SurrogateBuilder>,
        mut rng: Xoshiro256Plus,
    ) -> Result<Self> {
        let dim = config.dim();
        let subspace_dim = config.subspace_dim();
        let embedding = Embedding::new(dim, subspace_dim, &mut rng)?;
        Ok(Rembo {
            subspace_limits: subspace_limits(dim, subspace_dim),
            config,
            xlimits,
            objective,
            embedding,
            surrogate,
            rng,
            status: RemboStatus::Uninitialized,
            x_data: Array2::zeros((0, subspace_dim)),
            y_data: Array1::zeros(0),
            n_iters: 0,
            model: None,
            model_fmin: f64::INFINITY,
            model_records: vec![],
            elapsed: Duration::ZERO,
            settings: None,
            termination: None,
        })
    }

    /// Build and evaluate the initial design
    fn initial_design(&mut self) -> Result<()> {
        let x = match self.config.doe.as_ref() {
            Some(doe) => doe.to_owned(),
            None => {
                let seed = self.rng.gen();
                let n = self.config.n_doe();
                match self.config.doe_kind() {
                    InitialDesignKind::Random => Random::new_with_rng(
                        &self.subspace_limits,
                        Xoshiro256Plus::seed_from_u64(seed),
                    )
                    .sample(n),
                    InitialDesignKind::Lhs => Lhs::new_with_rng(
                        &self.subspace_limits,
                        Xoshiro256Plus::seed_from_u64(seed),
                    )
                    .kind(LhsKind::Maximin)
                    .sample(n),
                }
            }
        };
        let y = match self.config.doe_values.as_ref() {
            Some(values) => values.mapv(|v| self.objective.to_caller(v)),
            None => {
                let x_original = self.embedding.project_rows(&x)?;
                self.objective.evaluate_batch(&x_original)?
            }
        };
        info!(
            "REMBO {}D -> {}D on {}: initial design of {} points",
            self.config.dim(),
            self.config.subspace_dim(),
            self.objective.name(),
            x.nrows()
        );
        debug!("Initial design X={x} Y={y}");
        self.x_data = x;
        self.y_data = y;
        self.status = RemboStatus::InitialDesign;
        Ok(())
    }

    /// Runs the optimization loop until one of the stopping criteria is met:
    /// `max_iter` iterations done (initial design excluded), `max_time` elapsed,
    /// or the distance between the two last samples not greater than `eps`.
    ///
    /// At least one of `max_iter` or `max_time` has to be given. The loop can be
    /// run only once, right after construction.
    pub fn run(
        &mut self,
        max_iter: Option<u64>,
        max_time: Option<Duration>,
        eps: f64,
    ) -> Result<OptimResult> {
        if max_iter.is_none() && max_time.is_none() {
            return Err(RemboError::InvalidConfigError(
                "At least one of max_iter or max_time should be given".to_string(),
            ));
        }
        if !(eps >= 0.) {
            return Err(RemboError::InvalidConfigError(format!(
                "Tolerance should be non negative, got {eps}"
            )));
        }
        if self.status != RemboStatus::InitialDesign {
            return Err(RemboError::InvalidConfigError(format!(
                "Optimization can only be run once after initial design, status is {:?}",
                self.status
            )));
        }

        self.settings = Some(RunSettings {
            max_iter,
            max_time,
            eps,
        });
        self.status = RemboStatus::Iterating;
        info!(
            "Run REMBO with max_iter={max_iter:?}, max_time={max_time:?}, eps={eps}, {:?}",
            self.config
        );

        let start = Instant::now();
        let outcome = self.iterate(max_iter, max_time, eps, start);
        self.elapsed = start.elapsed();
        self.status = RemboStatus::Stopped;
        let reason = outcome?;
        if reason.is_early_stop() {
            warn!("REMBO stopped early after {} iterations: {reason}", self.n_iters);
        } else {
            info!("REMBO stopped after {} iterations: {reason}", self.n_iters);
        }
        self.termination = Some(reason);

        if let Some(outdir) = self.config.outdir().map(|s| s.to_string()) {
            let dir = self.save(&outdir)?;
            info!("Run report saved in {}", dir.display());
        }

        let res = self.result()?;
        info!("{res}");
        Ok(res)
    }

    fn iterate(
        &mut self,
        max_iter: Option<u64>,
        max_time: Option<Duration>,
        eps: f64,
        start: Instant,
    ) -> Result<TerminationReason> {
        loop {
            if self.model.is_none() || self.n_iters % self.config.model_update_interval() == 0 {
                match self.update_model() {
                    Ok(()) => (),
                    Err(RemboError::NumericalDegeneracy(msg)) => {
                        return Ok(TerminationReason::NumericalDegeneracy(msg))
                    }
                    Err(err) => return Err(err),
                }
            }

            if max_iter.is_some_and(|max_iter| self.n_iters >= max_iter) {
                return Ok(TerminationReason::MaxItersReached);
            }
            if max_time.is_some_and(|max_time| start.elapsed() >= max_time) {
                return Ok(TerminationReason::MaxTimeReached);
            }
            if self.n_iters > 0 && self.last_step() <= eps {
                return Ok(TerminationReason::Converged);
            }

            let x_new = self.propose_next()?;
            let x_original = self.embedding.project(&x_new)?;
            let y_new = self.objective.evaluate(&x_original.view())?;
            self.x_data.push_row(x_new.view())?;
            self.y_data.append(Axis(0), aview1(&[y_new]))?;
            self.n_iters += 1;
            debug!(
                "Iteration {}: f({x_original}) = {}",
                self.n_iters,
                self.objective.to_caller(y_new)
            );
        }
    }

    /// Refit the surrogate from scratch on the whole history
    fn update_model(&mut self) -> Result<()> {
        let y = if self.config.normalize_y() {
            normalize_stats(&self.y_data)
        } else {
            self.y_data.to_owned()
        };
        let model = self.surrogate.train(&self.x_data.view(), &y.view())?;
        self.model_records.push(ModelRecord {
            iteration: self.n_iters,
            names: model.parameter_names(),
            values: model.parameter_values(),
        });
        self.model_fmin = y.iter().cloned().fold(f64::INFINITY, f64::min);
        self.model = Some(model);
        Ok(())
    }

    fn propose_next(&mut self) -> Result<Array1<f64>> {
        let model = self
            .model
            .as_deref()
            .ok_or_else(|| RemboError::InvalidValue("No surrogate model available".to_string()))?;
        let criterion = self
            .config
            .acquisition()
            .criterion(self.config.exploration_weight, self.config.jitter);
        let exclude = if self.config.de_duplication() {
            Some(&self.x_data)
        } else {
            None
        };
        let x = InfillOptimizer::new(&self.subspace_limits, criterion.as_ref(), model, self.model_fmin)
            .n_start(self.config.n_start)
            .n_points(self.config.n_points)
            .exclude(exclude)
            .maximize(&mut self.rng);
        Ok(x)
    }

    /// Distance between the two last samples
    fn last_step(&self) -> f64 {
        let n = self.x_data.nrows();
        if n < 2 {
            return f64::INFINITY;
        }
        distance(&self.x_data.row(n - 1), &self.x_data.row(n - 2))
    }

    /// Best sample found so far, the first one wins on ties
    pub fn get_best_point(&self) -> Result<BestPoint> {
        let index = find_best_index(&self.y_data).ok_or_else(|| {
            RemboError::InvalidValue("No comparable objective value in history".to_string())
        })?;
        let x = self.x_data.row(index).to_owned();
        let x_original = self.embedding.project(&x)?;
        let y_internal = self.y_data[index];
        Ok(BestPoint {
            index,
            x,
            x_original,
            y: self.objective.to_caller(y_internal),
            y_internal,
        })
    }

    fn result(&self) -> Result<OptimResult> {
        let best = self.get_best_point()?;
        Ok(OptimResult {
            x_opt: best.x,
            x_opt_original: best.x_original,
            y_opt: best.y,
            x_doe: self.x_data.to_owned(),
            y_doe: self.y_data.to_owned(),
            n_iters: self.n_iters,
            termination: self
                .termination
                .clone()
                .unwrap_or(TerminationReason::MaxItersReached),
        })
    }

    /// Current state
    pub fn status(&self) -> RemboStatus {
        self.status
    }

    /// Number of iterations done (initial design excluded)
    pub fn iterations(&self) -> u64 {
        self.n_iters
    }

    /// Subspace samples as (n, d) array
    pub fn x_data(&self) -> &Array2<f64> {
        &self.x_data
    }

    /// Minimization oriented objective values of the samples
    pub fn y_data(&self) -> &Array1<f64> {
        &self.y_data
    }

    /// Embedding used by the run
    pub fn embedding(&self) -> &Embedding {
        &self.embedding
    }

    /// Subspace domain as (d, 2) array
    pub fn subspace_limits(&self) -> &Array2<f64> {
        &self.subspace_limits
    }

    /// Original domain as (D, 2) array
    pub fn xlimits(&self) -> &Array2<f64> {
        &self.xlimits
    }

    /// Checked configuration
    pub fn config(&self) -> &ValidRemboConfig {
        &self.config
    }

    /// Duration of the optimization loop
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Surrogate parameters recorded at each refit
    pub fn model_records(&self) -> &[ModelRecord] {
        &self.model_records
    }

    /// Why the run stopped, None before the run ends
    pub fn termination(&self) -> Option<&TerminationReason> {
        self.termination.as_ref()
    }

    /// Name of the objective function
    pub fn objective_name(&self) -> &str {
        self.objective.name()
    }

    /// Name of the surrogate model
    pub fn surrogate_name(&self) -> String {
        self.surrogate.name()
    }

    /// Whether the surrogate model assumes noiseless evaluations
    pub fn surrogate_noiseless(&self) -> bool {
        self.surrogate.noiseless()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::NamedObjective;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, ArrayView1, ArrayView2};
    use std::cell::Cell;
    use std::rc::Rc;

    fn sphere(x: &ArrayView1<f64>) -> f64 {
        x.mapv(|v| (v - 0.5) * (v - 0.5)).sum()
    }

    fn domain(dim: usize) -> Array2<f64> {
        let mut xlimits = Array2::zeros((dim, 2));
        xlimits.column_mut(0).fill(-5.);
        xlimits.column_mut(1).fill(5.);
        xlimits
    }

    /// Model predicting the squared norm with unit variance, the LCB maximum
    /// is at the corners of the subspace box
    struct Quadratic;

    impl SurrogateModel for Quadratic {
        fn predict_valvar(&self, x: &ArrayView2<f64>) -> Result<(Array1<f64>, Array1<f64>)> {
            Ok((
                x.map_axis(Axis(1), |r| r.dot(&r)),
                Array1::ones(x.nrows()),
            ))
        }
        fn parameter_names(&self) -> Vec<String> {
            vec!["scale".to_string()]
        }
        fn parameter_values(&self) -> Vec<f64> {
            vec![1.]
        }
    }

    /// Builder failing with a numerical degeneracy from the given fit onwards
    struct FailingFrom {
        fit: usize,
        calls: Rc<Cell<usize>>,
    }

    impl SurrogateBuilder for FailingFrom {
        fn name(&self) -> String {
            "Quadratic".to_string()
        }
        fn train(&self, _xt: &ArrayView2<f64>, _yt: &ArrayView1<f64>) -> Result<Box<dyn SurrogateModel>> {
            let n = self.calls.get();
            self.calls.set(n + 1);
            if n >= self.fit {
                Err(RemboError::NumericalDegeneracy("singular matrix".to_string()))
            } else {
                Ok(Box::new(Quadratic))
            }
        }
    }

    #[test]
    fn test_rembo_run_max_iter() {
        let mut rembo = RemboBuilder::optimize(sphere)
            .configure(|config| {
                config
                    .subspace_dim(2)
                    .n_doe(1)
                    .de_duplication(true)
                    .seed(42)
            })
            .within(&domain(5))
            .expect("Rembo built");
        assert_eq!(rembo.status(), RemboStatus::InitialDesign);
        assert_eq!(rembo.x_data().nrows(), 1);

        let res = rembo.run(Some(10), None, 0.).expect("Rembo run");
        assert_eq!(rembo.iterations(), 10);
        assert_eq!(rembo.x_data().dim(), (11, 2));
        assert_eq!(rembo.y_data().len(), 11);
        assert_eq!(rembo.status(), RemboStatus::Stopped);
        assert_eq!(res.termination, TerminationReason::MaxItersReached);
        assert!(res.completed());
        assert_eq!(res.n_iters, 10);
        // one refit per iteration plus the final one
        assert_eq!(rembo.model_records().len(), 11);
    }

    #[test]
    fn test_rembo_samples_stay_in_subspace_box() {
        let mut rembo = RemboBuilder::optimize(sphere)
            .configure(|config| config.subspace_dim(2).n_doe(3).seed(0))
            .surrogate(FailingFrom {
                fit: usize::MAX,
                calls: Rc::new(Cell::new(0)),
            })
            .within(&domain(4))
            .expect("Rembo built");
        rembo.run(Some(5), None, 0.).expect("Rembo run");
        let bound = 2.;
        assert!(rembo.x_data().iter().all(|v| *v >= -bound && *v <= bound));
    }

    #[test]
    fn test_rembo_requires_a_stopping_criterion() {
        let mut rembo = RemboBuilder::optimize(sphere)
            .configure(|config| config.subspace_dim(2).seed(42))
            .within(&domain(5))
            .expect("Rembo built");
        let x_before = rembo.x_data().to_owned();
        let res = rembo.run(None, None, 0.);
        assert!(matches!(res, Err(RemboError::InvalidConfigError(_))));
        assert_eq!(rembo.status(), RemboStatus::InitialDesign);
        assert_eq!(rembo.iterations(), 0);
        assert_eq!(rembo.x_data(), &x_before);
        assert!(rembo.model_records().is_empty());
    }

    #[test]
    fn test_rembo_negative_tolerance() {
        let mut rembo = RemboBuilder::optimize(sphere)
            .configure(|config| config.subspace_dim(1).seed(42))
            .within(&domain(3))
            .expect("Rembo built");
        let res = rembo.run(Some(3), None, -1.);
        assert!(matches!(res, Err(RemboError::InvalidConfigError(_))));
        assert_eq!(rembo.status(), RemboStatus::InitialDesign);
    }

    #[test]
    fn test_rembo_stops_on_numerical_degeneracy() {
        let calls = Rc::new(Cell::new(0));
        let mut rembo = RemboBuilder::optimize(sphere)
            .configure(|config| {
                config
                    .subspace_dim(2)
                    .n_doe(2)
                    .de_duplication(true)
                    .seed(7)
            })
            .surrogate(FailingFrom {
                fit: 3,
                calls: calls.clone(),
            })
            .within(&domain(5))
            .expect("Rembo built");
        let res = rembo.run(Some(10), None, 0.).expect("no error escapes");
        assert_eq!(calls.get(), 4);
        assert_eq!(rembo.iterations(), 3);
        assert_eq!(rembo.x_data().nrows(), 5);
        assert_eq!(rembo.status(), RemboStatus::Stopped);
        assert!(matches!(res.termination, TerminationReason::NumericalDegeneracy(_)));
        assert!(!res.completed());

        let best = rembo.get_best_point().expect("best point");
        let y_min = rembo.y_data().iter().cloned().fold(f64::INFINITY, f64::min);
        assert_abs_diff_eq!(best.y, y_min);
        assert_abs_diff_eq!(res.y_opt, y_min);
    }

    #[test]
    fn test_rembo_singular_kriging_stops_softly() {
        // interpolating kriging cannot fit two identical samples
        let doe = array![[0.5, -0.5], [0.5, -0.5], [-1., 1.]];
        let mut rembo = RemboBuilder::optimize(sphere)
            .configure(|config| config.subspace_dim(2).doe(&doe).seed(11))
            .surrogate(KrigingParams::default().nugget(0.))
            .within(&domain(5))
            .expect("Rembo built");
        let res = rembo.run(Some(10), None, 0.).expect("no error escapes");
        assert!(matches!(res.termination, TerminationReason::NumericalDegeneracy(_)));
        assert!(!res.completed());
        assert_eq!(rembo.iterations(), 0);
        assert_eq!(rembo.x_data(), &doe);
        assert_eq!(rembo.status(), RemboStatus::Stopped);

        let y_min = rembo.y_data().iter().cloned().fold(f64::INFINITY, f64::min);
        assert_abs_diff_eq!(res.y_opt, y_min);
    }

    #[test]
    fn test_rembo_maximize() {
        let f = |x: &ArrayView1<f64>| -sphere(x);
        let mut rembo = RemboBuilder::optimize(f)
            .configure(|config| config.subspace_dim(2).n_doe(4).maximize(true).seed(1))
            .surrogate(FailingFrom {
                fit: usize::MAX,
                calls: Rc::new(Cell::new(0)),
            })
            .within(&domain(3))
            .expect("Rembo built");
        let res = rembo.run(Some(4), None, 0.).expect("Rembo run");

        let y_max = rembo
            .y_data()
            .iter()
            .map(|v| -v)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_abs_diff_eq!(res.y_opt, y_max);
        // user value at the returned location
        assert_abs_diff_eq!(res.y_opt, f(&res.x_opt_original.view()), epsilon = 1e-12);
        assert!(res.y_opt <= 0.);
    }

    #[test]
    fn test_rembo_best_point_is_idempotent() {
        let mut rembo = RemboBuilder::optimize(sphere)
            .configure(|config| config.subspace_dim(2).n_doe(3).seed(3))
            .surrogate(FailingFrom {
                fit: usize::MAX,
                calls: Rc::new(Cell::new(0)),
            })
            .within(&domain(5))
            .expect("Rembo built");
        rembo.run(Some(3), None, 0.).expect("Rembo run");
        let first = rembo.get_best_point().expect("best point");
        let second = rembo.get_best_point().expect("best point");
        assert_eq!(first, second);
        assert_eq!(
            first.x_original,
            rembo.embedding().project(&first.x).expect("projection")
        );
    }

    #[test]
    fn test_rembo_best_point_first_occurrence() {
        let doe = array![[0.1, 0.], [0.2, 0.], [0.3, 0.]];
        let values = array![2., 1., 1.];
        let rembo = RemboBuilder::optimize(sphere)
            .configure(|config| config.subspace_dim(2).doe(&doe).doe_values(&values).seed(3))
            .within(&domain(5))
            .expect("Rembo built");
        let best = rembo.get_best_point().expect("best point");
        assert_eq!(best.index, 1);
        assert_eq!(best.x, array![0.2, 0.]);
    }

    #[test]
    fn test_rembo_user_initial_values_follow_sign() {
        let doe = array![[0.1], [0.2]];
        let values = array![3., 5.];
        let rembo = RemboBuilder::optimize(sphere)
            .configure(|config| {
                config
                    .subspace_dim(1)
                    .doe(&doe)
                    .doe_values(&values)
                    .maximize(true)
            })
            .within(&domain(2))
            .expect("Rembo built");
        assert_eq!(rembo.y_data(), &array![-3., -5.]);
        let best = rembo.get_best_point().expect("best point");
        assert_eq!(best.index, 1);
        assert_abs_diff_eq!(best.y, 5.);
    }

    #[test]
    fn test_rembo_initial_design_is_evaluated() {
        let doe = array![[0.1, -0.3], [1.2, 0.4]];
        let rembo = RemboBuilder::optimize(sphere)
            .configure(|config| config.subspace_dim(2).doe(&doe))
            .within(&domain(3))
            .expect("Rembo built");
        for (i, x) in doe.rows().into_iter().enumerate() {
            let x_original = rembo.embedding().project(&x).expect("projection");
            assert_abs_diff_eq!(rembo.y_data()[i], sphere(&x_original.view()));
        }
    }

    #[test]
    fn test_rembo_initial_design_errors() {
        let doe = array![[0.1, -0.3], [1.2, 0.4]];
        let res = RemboBuilder::optimize(sphere)
            .configure(|config| config.subspace_dim(2).doe(&doe).doe_values(&array![1.]))
            .within(&domain(3));
        assert!(matches!(res, Err(RemboError::InvalidConfigError(_))));

        let res = RemboBuilder::optimize(sphere)
            .configure(|config| config.subspace_dim(2).doe_values(&array![1.]))
            .within(&domain(3));
        assert!(matches!(res, Err(RemboError::InvalidConfigError(_))));

        let res = RemboBuilder::optimize(sphere)
            .configure(|config| config.subspace_dim(3).doe(&doe))
            .within(&domain(3));
        assert!(matches!(res, Err(RemboError::ShapeError(_))));

        let res = RemboBuilder::optimize(sphere).within(&array![[0., 1., 2.]]);
        assert!(matches!(res, Err(RemboError::InvalidConfigError(_))));
    }

    #[test]
    fn test_rembo_runs_once() {
        let mut rembo = RemboBuilder::optimize(sphere)
            .configure(|config| config.subspace_dim(1).seed(42))
            .surrogate(FailingFrom {
                fit: usize::MAX,
                calls: Rc::new(Cell::new(0)),
            })
            .within(&domain(3))
            .expect("Rembo built");
        rembo.run(Some(2), None, 0.).expect("Rembo run");
        let res = rembo.run(Some(2), None, 0.);
        assert!(matches!(res, Err(RemboError::InvalidConfigError(_))));
        assert_eq!(rembo.x_data().nrows(), 3);
    }

    #[test]
    fn test_rembo_converged_within_tolerance() {
        // any two points of the [-2, 2]^2 subspace box are closer than 10
        let mut rembo = RemboBuilder::optimize(sphere)
            .configure(|config| config.subspace_dim(2).seed(5))
            .surrogate(FailingFrom {
                fit: usize::MAX,
                calls: Rc::new(Cell::new(0)),
            })
            .within(&domain(4))
            .expect("Rembo built");
        let res = rembo.run(Some(50), None, 10.).expect("Rembo run");
        assert_eq!(res.termination, TerminationReason::Converged);
        assert_eq!(res.n_iters, 1);
        assert_eq!(rembo.x_data().nrows(), 2);
    }

    #[test]
    fn test_rembo_max_time() {
        let mut rembo = RemboBuilder::optimize(sphere)
            .configure(|config| config.subspace_dim(1).seed(42))
            .surrogate(FailingFrom {
                fit: usize::MAX,
                calls: Rc::new(Cell::new(0)),
            })
            .within(&domain(3))
            .expect("Rembo built");
        let res = rembo
            .run(None, Some(Duration::ZERO), 0.)
            .expect("Rembo run");
        assert_eq!(res.termination, TerminationReason::MaxTimeReached);
        assert_eq!(rembo.iterations(), 0);
        assert_eq!(rembo.x_data().nrows(), 1);
    }

    #[test]
    fn test_rembo_objective_error_propagates() {
        struct Exploding;
        impl ObjectiveFn for Exploding {
            fn eval(&self, x: &ArrayView1<f64>) -> crate::objective::ObjectiveResult {
                if x.iter().any(|v| v.abs() > 100.) {
                    Ok(0.)
                } else {
                    Err("simulation crashed".into())
                }
            }
        }
        let res = RemboBuilder::optimize(Exploding)
            .configure(|config| config.subspace_dim(1).seed(42))
            .within(&domain(2));
        assert!(matches!(res, Err(RemboError::ObjectiveError(_))));
    }

    #[test]
    fn test_rembo_named_objective() {
        let rembo = RemboBuilder::optimize(NamedObjective::new("sphere", sphere))
            .configure(|config| config.subspace_dim(1).seed(42))
            .within(&domain(2))
            .expect("Rembo built");
        assert_eq!(rembo.objective_name(), "sphere");
        assert_eq!(rembo.surrogate_name(), "GP");
    }
}
