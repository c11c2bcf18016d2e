//! This library implements REMBO, Random EMbedding Bayesian Optimization,
//! a bayesian optimization method for black-box functions of many variables
//! which only depend on a few effective directions.
//!
//! A random matrix `A` of shape (D, d) with standard normal entries maps a
//! low dimensional search space of dimension d, the subspace, into the original
//! domain of dimension D. The bayesian optimization loop (surrogate model
//! fitting, infill criterion maximization, evaluation) runs entirely in the
//! subspace, the objective is only ever evaluated at projected points `A.z`.
//!
//! The optimizer comes with a set of options to:
//! * specify the subspace dimension and the initial design,
//! * choose the acquisition function (LCB, EI or PI),
//! * normalize outputs and refit the surrogate every n iterations,
//! * avoid sampling the same subspace point twice,
//! * save the run report and evaluation log in a given directory.
//!
//! # Example
//!
//! ```no_run
//! use ndarray::{Array2, ArrayView1};
//! use rembo::RemboBuilder;
//!
//! // A 20-dimensional function which only depends on its two first variables
//! fn branin_like(x: &ArrayView1<f64>) -> f64 {
//!     (x[0] - 1.).powi(2) + (x[1] + 0.5).powi(2)
//! }
//!
//! let mut xlimits = Array2::zeros((20, 2));
//! xlimits.column_mut(0).fill(-5.);
//! xlimits.column_mut(1).fill(5.);
//!
//! let mut rembo = RemboBuilder::optimize(branin_like)
//!     .configure(|config| config.subspace_dim(2).n_doe(5).seed(42))
//!     .within(&xlimits)
//!     .expect("optimizer configured");
//! let res = rembo.run(Some(30), None, 0.).expect("function minimized");
//! println!("Minimum found f(x) = {} at x = {}", res.y_opt, res.x_opt_original);
//! ```
//!
//! The default surrogate model is the [Kriging](rembo_gp::Kriging) model of the
//! `rembo-gp` crate, any model implementing [`SurrogateBuilder`] can be used instead.
//!
//! # Logging
//!
//! Progress is reported through the [log](https://docs.rs/log) facade. When no logger
//! is set, the optimizer installs an `env_logger` writing to stdout whose level is
//! read from the `REMBO_LOG` environment variable (default: `info`).
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
pub mod criteria;
pub mod embedding;

mod errors;
mod objective;
mod optimizers;
mod rembo;
mod rembo_config;
mod report;
mod surrogate;
mod types;
mod utils;

pub use crate::embedding::{subspace_bounds, subspace_limits, Embedding};
pub use crate::errors::*;
pub use crate::objective::*;
pub use crate::rembo::*;
pub use crate::rembo_config::*;
pub use crate::report::{CONFIG_FILE, EVALUATIONS_FILE, HISTORY_FILE, MODELS_FILE, REPORT_FILE};
pub use crate::surrogate::*;
pub use crate::types::*;
pub use crate::utils::{find_best_index, normalize_stats, REMBO_LOG};
