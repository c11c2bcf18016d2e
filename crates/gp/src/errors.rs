use thiserror::Error;

/// A result type for kriging model
pub type Result<T> = std::result::Result<T, GpError>;

/// An error when fitting or using a [`Kriging`](crate::Kriging) model
#[derive(Error, Debug)]
pub enum GpError {
    /// When likelihood computation fails
    #[error("LikelihoodComputation computation error: {0}")]
    LikelihoodComputationError(String),
    /// When linear algebra computation fails
    #[error(transparent)]
    LinalgError(#[from] linfa_linalg::LinalgError),
    /// When a linfa error occurs
    #[error(transparent)]
    LinfaError(#[from] linfa::error::Error),
    /// When error due to a bad value
    #[error("InvalidValue error: {0}")]
    InvalidValueError(String),
}

impl GpError {
    /// Whether the error comes from an ill-conditioned training problem
    /// (singular correlation matrix or degenerate likelihood) rather than
    /// from a misuse of the model.
    pub fn is_numerical(&self) -> bool {
        matches!(
            self,
            GpError::LinalgError(_) | GpError::LikelihoodComputationError(_)
        )
    }
}
