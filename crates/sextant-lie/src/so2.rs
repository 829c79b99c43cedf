use crate::{check_ratio, LieError};
use glam::{DMat2, DVec2};
use serde::{Deserialize, Serialize};

/// A 2D rotation stored as a unit complex number `[cos(theta), sin(theta)]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SO2 {
    /// representing complex number [real, imaginary]
    pub z: DVec2,
}

impl SO2 {
    /// The identity rotation.
    pub const IDENTITY: Self = Self {
        z: DVec2::new(1.0, 0.0),
    };

    /// Create a new SO2 from a complex number.
    /// NOTE: the complex number should have unit norm
    #[inline]
    pub fn new(z: DVec2) -> Self {
        Self { z }
    }

    /// Create a rotation from an angle in radians.
    pub fn exp(theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self {
            z: DVec2::new(cos, sin),
        }
    }

    /// Create a rotation from the first column of a rotation matrix.
    pub fn from_matrix(mat: &DMat2) -> Self {
        Self {
            z: DVec2::new(mat.x_axis.x, mat.x_axis.y),
        }
    }

    /// Create a rotation from a matrix, checking that it is a proper rotation.
    pub fn try_from_matrix(mat: &DMat2) -> Result<Self, LieError> {
        let determinant = mat.determinant();
        let error = (mat.transpose() * *mat - DMat2::IDENTITY)
            .to_cols_array()
            .iter()
            .fold(0.0f64, |acc, v| acc.max(v.abs()));
        if error > 1e-6 || (determinant - 1.0).abs() > 1e-6 {
            return Err(LieError::NotARotation { determinant, error });
        }
        Ok(Self::from_matrix(mat))
    }

    /// The rotation matrix.
    pub fn matrix(&self) -> DMat2 {
        DMat2::from_cols(
            DVec2::new(self.z.x, self.z.y),
            DVec2::new(-self.z.y, self.z.x),
        )
    }

    /// inverting the complex number z, assumes unit norm
    pub fn inverse(&self) -> Self {
        Self {
            z: DVec2::new(self.z.x, -self.z.y),
        }
    }

    /// The rotation angle in `(-pi, pi]`.
    pub fn log(&self) -> f64 {
        self.z.y.atan2(self.z.x)
    }

    /// Magnitude of the rotation angle with respect to the identity.
    pub fn angle(&self) -> f64 {
        self.log().abs()
    }

    /// Re-project onto the unit circle to remove drift after many compositions.
    pub fn normalize(&self) -> Self {
        Self {
            z: self.z.normalize_or(DVec2::X),
        }
    }

    /// Interpolate towards `other` along the shortest arc.
    ///
    /// PRECONDITION: `ratio` is in `[0, 1]`.
    pub fn interpolate(&self, other: &Self, ratio: f64) -> Self {
        let delta = (self.inverse() * *other).log();
        *self * Self::exp(ratio * delta)
    }

    /// Checked version of [`SO2::interpolate`].
    pub fn try_interpolate(&self, other: &Self, ratio: f64) -> Result<Self, LieError> {
        check_ratio(ratio)?;
        Ok(self.interpolate(other, ratio))
    }
}

impl Default for SO2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Mul<DVec2> for SO2 {
    type Output = DVec2;

    fn mul(self, rhs: DVec2) -> Self::Output {
        DVec2::new(
            self.z.x * rhs.x - self.z.y * rhs.y,
            self.z.y * rhs.x + self.z.x * rhs.y,
        )
    }
}

impl std::ops::Mul<SO2> for SO2 {
    type Output = SO2;

    fn mul(self, other: SO2) -> Self::Output {
        // (a + bi)(c + di) = (ac - bd) + (ad + bc)i
        let real = self.z.x * other.z.x - self.z.y * other.z.y;
        let imag = self.z.x * other.z.y + self.z.y * other.z.x;
        SO2::new(DVec2::new(real, imag))
    }
}
