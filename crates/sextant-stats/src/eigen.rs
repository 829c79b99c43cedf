use nalgebra::{DMatrix, SMatrix, SVector};

/// Eigen-decomposition of a symmetric matrix.
///
/// Returns the eigenvalues (unsorted) and the matrix whose columns are the
/// matching unit eigenvectors.
pub fn symmetric_eigen<const D: usize>(
    matrix: &SMatrix<f64, D, D>,
) -> (SVector<f64, D>, SMatrix<f64, D, D>) {
    let eigen = DMatrix::from_column_slice(D, D, matrix.as_slice()).symmetric_eigen();
    (
        SVector::from_column_slice(eigen.eigenvalues.as_slice()),
        SMatrix::from_column_slice(eigen.eigenvectors.as_slice()),
    )
}

fn recompose<const D: usize>(
    eigenvalues: &SVector<f64, D>,
    eigenvectors: &SMatrix<f64, D, D>,
) -> SMatrix<f64, D, D> {
    eigenvectors * SMatrix::from_diagonal(eigenvalues) * eigenvectors.transpose()
}

/// Keeps the eigenvalues of a covariance matrix from collapsing.
///
/// Every eigenvalue whose magnitude falls below `ratio * lambda_max` is raised to
/// `ratio * lambda_max`, where `ratio = 10^-exponent`. The eigenvectors are kept,
/// so the distribution keeps its orientation but cannot become flat along any axis.
/// An exponent of zero disables the limit.
///
/// Example:
///
/// ```
/// use nalgebra::Matrix2;
/// use sextant_stats::EigenValueLimit;
///
/// let flat = Matrix2::new(100.0, 0.0, 0.0, 0.01);
/// let limited = EigenValueLimit::from_exponent(1).apply(&flat);
/// assert!((limited[(1, 1)] - 10.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EigenValueLimit {
    exponent: u32,
    lambda_ratio: f64,
}

impl EigenValueLimit {
    /// A limit that leaves every matrix unchanged.
    pub const DISABLED: Self = Self {
        exponent: 0,
        lambda_ratio: 1.0,
    };

    /// Create a limit with `ratio = 10^-exponent`.
    pub fn from_exponent(exponent: u32) -> Self {
        let lambda_ratio = (0..exponent).fold(1.0, |ratio, _| ratio * 0.1);
        Self {
            exponent,
            lambda_ratio,
        }
    }

    /// The exponent `k` of the ratio `10^-k`.
    #[inline]
    pub fn exponent(&self) -> u32 {
        self.exponent
    }

    /// The smallest allowed ratio between an eigenvalue and the largest one.
    #[inline]
    pub fn lambda_ratio(&self) -> f64 {
        self.lambda_ratio
    }

    /// Apply the limit to a symmetric matrix.
    pub fn apply<const D: usize>(&self, matrix: &SMatrix<f64, D, D>) -> SMatrix<f64, D, D> {
        if self.exponent == 0 {
            return *matrix;
        }

        let (eigenvalues, eigenvectors) = symmetric_eigen(matrix);
        let lambda_max = eigenvalues.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let lambda = self.lambda_ratio * lambda_max;

        let limited = eigenvalues.map(|value| {
            if value.abs() < lambda.abs() {
                lambda
            } else {
                value
            }
        });
        recompose(&limited, &eigenvectors)
    }
}

impl Default for EigenValueLimit {
    fn default() -> Self {
        Self::DISABLED
    }
}

/// Project a symmetric matrix onto the positive semi-definite cone.
///
/// Negative eigenvalues are clamped to zero; no minimum spread is enforced.
pub fn limit_eigenvalues_by_zero<const D: usize>(
    matrix: &SMatrix<f64, D, D>,
) -> SMatrix<f64, D, D> {
    let (eigenvalues, eigenvectors) = symmetric_eigen(matrix);
    recompose(&eigenvalues.map(|value| value.max(0.0)), &eigenvectors)
}
