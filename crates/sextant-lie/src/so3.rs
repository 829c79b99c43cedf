use crate::{check_ratio, LieError};
use glam::{DMat3, DQuat, DVec3};
use serde::{Deserialize, Serialize};

const SMALL_ANGLE_EPSILON: f64 = 1.0e-10;

/// A 3D rotation, stored as a unit quaternion.
///
/// `q` and `-q` represent the same rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SO3 {
    /// The unit quaternion.
    pub q: DQuat,
}

impl SO3 {
    /// The identity rotation.
    pub const IDENTITY: Self = Self { q: DQuat::IDENTITY };

    /// Create a new SO3 from a quaternion.
    /// NOTE: quaternion should be normalized
    #[inline]
    pub fn new(q: DQuat) -> Self {
        Self { q }
    }

    /// Create a rotation from a rotation matrix.
    pub fn from_matrix(mat: &DMat3) -> Self {
        Self {
            q: DQuat::from_mat3(mat).normalize(),
        }
    }

    /// Create a rotation from a matrix, checking that it is a proper rotation.
    pub fn try_from_matrix(mat: &DMat3) -> Result<Self, LieError> {
        let determinant = mat.determinant();
        let error = (mat.transpose() * *mat - DMat3::IDENTITY)
            .to_cols_array()
            .iter()
            .fold(0.0f64, |acc, v| acc.max(v.abs()));
        if error > 1e-6 || (determinant - 1.0).abs() > 1e-6 {
            return Err(LieError::NotARotation { determinant, error });
        }
        Ok(Self::from_matrix(mat))
    }

    /// Create a rotation about the z axis.
    pub fn from_yaw(yaw: f64) -> Self {
        Self {
            q: DQuat::from_rotation_z(yaw),
        }
    }

    /// Create a rotation from roll, pitch and yaw (applied as `Rz(yaw) * Ry(pitch) * Rx(roll)`).
    pub fn from_rpy(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self {
            q: DQuat::from_euler(glam::EulerRot::ZYX, yaw, pitch, roll),
        }
    }

    /// Roll, pitch and yaw of the rotation, inverse of [`SO3::from_rpy`].
    pub fn to_rpy(&self) -> [f64; 3] {
        let (yaw, pitch, roll) = self.q.to_euler(glam::EulerRot::ZYX);
        [roll, pitch, yaw]
    }

    /// Exponential map from an axis-angle vector.
    pub fn exp(v: DVec3) -> Self {
        let theta = v.length();
        if theta < SMALL_ANGLE_EPSILON {
            // first order expansion
            let half = 0.5 * v;
            return Self {
                q: DQuat::from_xyzw(half.x, half.y, half.z, 1.0).normalize(),
            };
        }
        Self {
            q: DQuat::from_axis_angle(v / theta, theta),
        }
    }

    /// Logarithmic map to an axis-angle vector.
    pub fn log(&self) -> DVec3 {
        let (axis, angle) = self.q.to_axis_angle();
        if angle < SMALL_ANGLE_EPSILON {
            return 2.0 * self.q.xyz() * self.q.w.signum();
        }
        // take the shortest rotation
        if angle > std::f64::consts::PI {
            axis * (angle - std::f64::consts::TAU)
        } else {
            axis * angle
        }
    }

    /// The rotation matrix.
    pub fn matrix(&self) -> DMat3 {
        DMat3::from_quat(self.q)
    }

    /// The inverse rotation.
    pub fn inverse(&self) -> Self {
        Self {
            q: self.q.conjugate(),
        }
    }

    /// Angle of the rotation with respect to the identity, in `[0, pi]`.
    pub fn angle(&self) -> f64 {
        self.q.angle_between(DQuat::IDENTITY)
    }

    /// Spherical linear interpolation towards `other`.
    ///
    /// PRECONDITION: `ratio` is in `[0, 1]`.
    pub fn interpolate(&self, other: &Self, ratio: f64) -> Self {
        Self {
            q: self.q.slerp(other.q, ratio),
        }
    }

    /// Checked version of [`SO3::interpolate`].
    pub fn try_interpolate(&self, other: &Self, ratio: f64) -> Result<Self, LieError> {
        check_ratio(ratio)?;
        Ok(self.interpolate(other, ratio))
    }
}

impl Default for SO3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Mul<SO3> for SO3 {
    type Output = SO3;

    fn mul(self, rhs: SO3) -> Self::Output {
        Self { q: self.q * rhs.q }
    }
}

impl std::ops::Mul<DVec3> for SO3 {
    type Output = DVec3;

    fn mul(self, rhs: DVec3) -> Self::Output {
        self.q * rhs
    }
}
