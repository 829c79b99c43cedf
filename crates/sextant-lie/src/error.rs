use thiserror::Error;

/// Error type for the checked constructors and operations of the Lie groups.
#[derive(Debug, Error, PartialEq)]
pub enum LieError {
    /// Interpolation ratio outside of `[0, 1]`
    #[error("Interpolation ratio must be in [0, 1], got {0}")]
    InvalidRatio(f64),

    /// The matrix is not a proper rotation
    #[error("Matrix is not a rotation (determinant {determinant}, orthogonality error {error})")]
    NotARotation {
        /// Determinant of the input matrix
        determinant: f64,
        /// Largest deviation of `R^T R` from the identity
        error: f64,
    },
}
