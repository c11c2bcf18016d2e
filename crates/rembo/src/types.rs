use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a [`Rembo`](crate::Rembo) optimizer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemboStatus {
    /// Embedding and initial design not built yet
    Uninitialized,
    /// Initial design evaluated, ready to run
    InitialDesign,
    /// Optimization loop in progress
    Iterating,
    /// Terminal state: sample history is frozen
    Stopped,
}

/// Why the optimization loop stopped
#[derive(Clone, Debug, PartialEq)]
pub enum TerminationReason {
    /// The iteration budget is exhausted
    MaxItersReached,
    /// The time budget is exhausted
    MaxTimeReached,
    /// The two last samples are closer than the requested tolerance
    Converged,
    /// The surrogate model could not be fitted, the run stopped early
    NumericalDegeneracy(String),
}

impl TerminationReason {
    /// Whether the run was cut short by a numerical failure
    pub fn is_early_stop(&self) -> bool {
        matches!(self, TerminationReason::NumericalDegeneracy(_))
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TerminationReason::MaxItersReached => write!(f, "maximum number of iterations reached"),
            TerminationReason::MaxTimeReached => write!(f, "maximum time reached"),
            TerminationReason::Converged => write!(f, "distance between last two samples below tolerance"),
            TerminationReason::NumericalDegeneracy(msg) => write!(f, "numerical degeneracy ({msg})"),
        }
    }
}

/// Acquisition function used to select the next subspace point
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcquisitionStrategy {
    /// Lower confidence bound
    #[default]
    LCB,
    /// Expected improvement
    EI,
    /// Probability of improvement
    PI,
}

impl fmt::Display for AcquisitionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            AcquisitionStrategy::LCB => "LCB",
            AcquisitionStrategy::EI => "EI",
            AcquisitionStrategy::PI => "PI",
        };
        write!(f, "{s}")
    }
}

/// Sampling method of the initial design
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitialDesignKind {
    /// Uniform random sampling
    #[default]
    Random,
    /// Latin hypercube sampling
    Lhs,
}

impl fmt::Display for InitialDesignKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InitialDesignKind::Random => write!(f, "random"),
            InitialDesignKind::Lhs => write!(f, "latin"),
        }
    }
}

/// Best sample found so far
#[derive(Clone, Debug, PartialEq)]
pub struct BestPoint {
    /// Position of the sample in the history
    pub index: usize,
    /// Location in the subspace
    pub x: Array1<f64>,
    /// Location in the original space
    pub x_original: Array1<f64>,
    /// Objective value as returned by the user function
    pub y: f64,
    /// Objective value as tracked internally (minimization oriented)
    pub y_internal: f64,
}

/// Parameters of one surrogate refit
#[derive(Clone, Debug, PartialEq)]
pub struct ModelRecord {
    /// Iteration at which the model was fitted
    pub iteration: u64,
    /// Parameter names
    pub names: Vec<String>,
    /// Parameter values
    pub values: Vec<f64>,
}

/// Optimization result
#[derive(Clone, Debug)]
pub struct OptimResult {
    /// Optimum location in the subspace
    pub x_opt: Array1<f64>,
    /// Optimum location in the original space
    pub x_opt_original: Array1<f64>,
    /// Optimum value (as returned by the user function)
    pub y_opt: f64,
    /// History of subspace samples
    pub x_doe: Array2<f64>,
    /// History of objective values (minimization oriented)
    pub y_doe: Array1<f64>,
    /// Number of iterations done (initial design excluded)
    pub n_iters: u64,
    /// Why the run stopped
    pub termination: TerminationReason,
}

impl OptimResult {
    /// Whether the run ended on one of its stopping criteria
    /// rather than on a numerical failure
    pub fn completed(&self) -> bool {
        !self.termination.is_early_stop()
    }
}

impl fmt::Display for OptimResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Optim Result: f(x)={} at x={} (subspace x={}) after {} iterations, {}",
            self.y_opt, self.x_opt_original, self.x_opt, self.n_iters, self.termination
        )
    }
}
