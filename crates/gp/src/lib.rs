//! This library implements a [Kriging](https://en.wikipedia.org/wiki/Kriging) model
//! (ordinary kriging: constant mean, stationary correlation) used as the surrogate
//! model of the REMBO optimizer.
//!
//! Hyperparameters (one correlation length per input component) are estimated by
//! maximizing the reduced likelihood with the COBYLA algorithm started from the
//! user guess plus a Latin hypercube multistart.
//!
//! ```no_run
//! use linfa::prelude::*;
//! use ndarray::array;
//! use rembo_gp::Kriging;
//!
//! let xt = array![[0.0], [1.0], [2.0], [3.0], [4.0]];
//! let yt = array![0.0, 1.0, 1.5, 0.9, 1.0];
//! let gp = Kriging::params()
//!     .fit(&Dataset::new(xt, yt))
//!     .expect("GP fitted");
//! let (mean, var) = gp.predict_valvar(&array![[2.5]]).expect("prediction");
//! println!("mean={mean} var={var}");
//! ```
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod algorithm;
pub mod correlation_models;
mod errors;
mod optimization;
mod parameters;
mod utils;

pub use algorithm::*;
pub use errors::*;
pub use parameters::*;
pub use utils::DiffMatrix;

/// Default number of multistart for hyperparameters optimization
pub const GP_OPTIM_N_START: usize = 10;
/// Minimum of function evaluations for COBYLA optimizer
pub const GP_COBYLA_MIN_EVAL: usize = 25;
/// Maximum of function evaluations for COBYLA optimizer
pub const GP_COBYLA_MAX_EVAL: usize = 1000;
