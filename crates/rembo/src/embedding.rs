//! Random linear embedding of a low dimensional search space into the
//! original high dimensional domain of the objective function.
//!
//! The embedding matrix `A` has shape (D, d) with i.i.d. standard normal entries
//! and a subspace point `z` is mapped to `A.z`. Every subspace coordinate is
//! searched within `[-sqrt(D), sqrt(D)]`.
use crate::errors::{RemboError, Result};

use ndarray::{Array1, Array2, ArrayBase, Data, Ix1, Ix2};
use ndarray_rand::rand::Rng;
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;

/// Bounds (lower, upper) of every subspace coordinate for an original domain of dimension `dim`
pub fn subspace_bounds(dim: usize) -> (f64, f64) {
    let b = (dim as f64).sqrt();
    (-b, b)
}

/// Subspace domain as a (subspace_dim, 2) array of [lower, upper] rows
pub fn subspace_limits(dim: usize, subspace_dim: usize) -> Array2<f64> {
    let (lo, up) = subspace_bounds(dim);
    let mut xlimits = Array2::zeros((subspace_dim, 2));
    xlimits.column_mut(0).fill(lo);
    xlimits.column_mut(1).fill(up);
    xlimits
}

/// A fixed random linear map from the subspace to the original domain
#[derive(Clone, Debug, PartialEq)]
pub struct Embedding {
    matrix: Array2<f64>,
}

impl Embedding {
    /// Draw a (dim, subspace_dim) embedding matrix using the given random generator
    pub fn new<R: Rng>(dim: usize, subspace_dim: usize, rng: &mut R) -> Result<Self> {
        if dim == 0 || subspace_dim == 0 {
            return Err(RemboError::InvalidConfigError(format!(
                "Embedding dimensions should be positive, got ({dim}, {subspace_dim})"
            )));
        }
        let matrix = Array2::random_using((dim, subspace_dim), StandardNormal, rng);
        Ok(Embedding { matrix })
    }

    /// Use the given (dim, subspace_dim) matrix as embedding
    pub fn from_matrix(matrix: Array2<f64>) -> Result<Self> {
        if matrix.is_empty() {
            return Err(RemboError::InvalidConfigError(
                "Embedding matrix should not be empty".to_string(),
            ));
        }
        Ok(Embedding { matrix })
    }

    /// The (dim, subspace_dim) embedding matrix
    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// Dimension of the original domain
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// Dimension of the subspace
    pub fn subspace_dim(&self) -> usize {
        self.matrix.ncols()
    }

    /// Map a subspace point to the original domain
    pub fn project(&self, x: &ArrayBase<impl Data<Elem = f64>, Ix1>) -> Result<Array1<f64>> {
        if x.len() != self.subspace_dim() {
            return Err(RemboError::ShapeError(format!(
                "Subspace point should have {} components, got {}",
                self.subspace_dim(),
                x.len()
            )));
        }
        Ok(self.matrix.dot(x))
    }

    /// Map (n, subspace_dim) subspace points to (n, dim) points of the original domain
    pub fn project_rows(&self, x: &ArrayBase<impl Data<Elem = f64>, Ix2>) -> Result<Array2<f64>> {
        if x.ncols() != self.subspace_dim() {
            return Err(RemboError::ShapeError(format!(
                "Subspace points should have {} components, got {}",
                self.subspace_dim(),
                x.ncols()
            )));
        }
        Ok(x.dot(&self.matrix.t()))
    }
}
