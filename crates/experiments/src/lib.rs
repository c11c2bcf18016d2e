//! Experiments of the REMBO optimizer on classic benchmark functions
//! and comparison of the saved runs.
pub mod functions;
pub mod loader;

pub use functions::Function;
