use crate::{check_ratio, so3::SO3, LieError};
use glam::{DMat3, DMat4, DVec3};
use serde::{Deserialize, Serialize};

/// A 3D rigid body transformation.
///
/// Maps a point `p` to `r * p + t`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SE3 {
    /// The rotational part.
    pub r: SO3,
    /// The translational part.
    pub t: DVec3,
}

impl SE3 {
    /// The identity transformation.
    pub const IDENTITY: Self = Self {
        r: SO3::IDENTITY,
        t: DVec3::ZERO,
    };

    /// Create a new transformation from a rotation and a translation.
    pub fn new(r: SO3, t: DVec3) -> Self {
        Self { r, t }
    }

    /// Create a pure translation.
    pub fn from_translation(t: DVec3) -> Self {
        Self {
            r: SO3::IDENTITY,
            t,
        }
    }

    /// Create a transformation from a rotation matrix and a translation.
    pub fn from_rotation_translation(rotation: &DMat3, t: DVec3) -> Self {
        Self {
            r: SO3::from_matrix(rotation),
            t,
        }
    }

    /// Create a transformation from a pose `(x, y, z, roll, pitch, yaw)`.
    pub fn from_xyz_rpy(xyz: [f64; 3], rpy: [f64; 3]) -> Self {
        Self {
            r: SO3::from_rpy(rpy[0], rpy[1], rpy[2]),
            t: DVec3::from_array(xyz),
        }
    }

    /// The pose `[x, y, z, roll, pitch, yaw]`.
    pub fn to_array(&self) -> [f64; 6] {
        let [roll, pitch, yaw] = self.r.to_rpy();
        [self.t.x, self.t.y, self.t.z, roll, pitch, yaw]
    }

    /// The homogeneous 4x4 matrix.
    pub fn matrix(&self) -> DMat4 {
        DMat4::from_rotation_translation(self.r.q, self.t)
    }

    /// The inverse transformation.
    pub fn inverse(&self) -> Self {
        let r_inv = self.r.inverse();
        Self {
            r: r_inv,
            t: r_inv * (-self.t),
        }
    }

    /// Linear interpolation of the translation and slerp of the rotation.
    ///
    /// PRECONDITION: `ratio` is in `[0, 1]`. The end points are returned unchanged.
    pub fn interpolate(&self, other: &Self, ratio: f64) -> Self {
        if ratio == 0.0 {
            return *self;
        }
        if ratio == 1.0 {
            return *other;
        }
        Self {
            r: self.r.interpolate(&other.r, ratio),
            t: self.t * (1.0 - ratio) + other.t * ratio,
        }
    }

    /// Checked version of [`SE3::interpolate`].
    pub fn try_interpolate(&self, other: &Self, ratio: f64) -> Result<Self, LieError> {
        check_ratio(ratio)?;
        Ok(self.interpolate(other, ratio))
    }
}

impl Default for SE3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Mul<SE3> for SE3 {
    type Output = SE3;

    fn mul(self, rhs: SE3) -> Self::Output {
        Self {
            r: self.r * rhs.r,
            t: self.r * rhs.t + self.t,
        }
    }
}

impl std::ops::MulAssign<SE3> for SE3 {
    fn mul_assign(&mut self, rhs: SE3) {
        *self = *self * rhs;
    }
}

impl std::ops::Mul<DVec3> for SE3 {
    type Output = DVec3;

    fn mul(self, rhs: DVec3) -> Self::Output {
        self.r * rhs + self.t
    }
}
