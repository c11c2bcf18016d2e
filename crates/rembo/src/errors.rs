use thiserror::Error;

/// A result type for REMBO errors
pub type Result<T> = std::result::Result<T, RemboError>;

/// An error for random embedding bayesian optimization
#[derive(Error, Debug)]
pub enum RemboError {
    /// When configuration is invalid
    #[error("Invalid configuration: {0}")]
    InvalidConfigError(String),
    /// When a point does not have the expected number of components
    #[error("Shape error: {0}")]
    ShapeError(String),
    /// When the surrogate model cannot be fitted (singular covariance, degenerate likelihood)
    #[error("Numerical degeneracy: {0}")]
    NumericalDegeneracy(String),
    /// When an invalid value is encountered
    #[error("Value error: {0}")]
    InvalidValue(String),
    /// When the user objective function fails
    #[error("Objective evaluation failed: {0}")]
    ObjectiveError(Box<dyn std::error::Error + Send + Sync>),
    /// When GP fitting or prediction fails
    #[error("GP error")]
    GpError(#[from] rembo_gp::GpError),
    /// When IO fails
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    /// When numpy array write fails
    #[error("IO error")]
    WriteNpyError(#[from] ndarray_npy::WriteNpyError),
    /// When configuration serialization fails
    #[error("Save error: {0}")]
    JsonError(#[from] serde_json::Error),
    /// When a tab separated log cannot be written
    #[error("Log error: {0}")]
    CsvError(#[from] csv::Error),
    /// When a `linfa` error occurs
    #[error(transparent)]
    LinfaError(#[from] linfa::error::Error),
}

impl From<ndarray::ShapeError> for RemboError {
    fn from(err: ndarray::ShapeError) -> Self {
        RemboError::ShapeError(err.to_string())
    }
}
