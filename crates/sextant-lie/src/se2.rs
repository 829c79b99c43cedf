use crate::{check_ratio, normalize_angle, so2::SO2, LieError};
use glam::{DMat3, DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// A 2D rigid body transformation.
///
/// Maps a point `p` to `r * p + t`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SE2 {
    /// The rotational part.
    pub r: SO2,
    /// The translational part.
    pub t: DVec2,
}

impl SE2 {
    /// The identity transformation.
    pub const IDENTITY: Self = Self {
        r: SO2::IDENTITY,
        t: DVec2::ZERO,
    };

    /// Create a new transformation from a rotation and a translation.
    pub fn new(r: SO2, t: DVec2) -> Self {
        Self { r, t }
    }

    /// Create a transformation from a planar pose `(x, y, yaw)`.
    pub fn from_xy_theta(x: f64, y: f64, theta: f64) -> Self {
        Self {
            r: SO2::exp(theta),
            t: DVec2::new(x, y),
        }
    }

    /// Create a pure translation.
    pub fn from_translation(t: DVec2) -> Self {
        Self {
            r: SO2::IDENTITY,
            t,
        }
    }

    /// Create a transformation from a homogeneous 3x3 matrix.
    pub fn from_matrix(mat: &DMat3) -> Self {
        Self {
            r: SO2::new(DVec2::new(mat.x_axis.x, mat.x_axis.y)),
            t: DVec2::new(mat.z_axis.x, mat.z_axis.y),
        }
    }

    /// The homogeneous 3x3 matrix.
    pub fn matrix(&self) -> DMat3 {
        let r = self.r.matrix();
        DMat3::from_cols(
            r.x_axis.extend(0.0),
            r.y_axis.extend(0.0),
            DVec3::new(self.t.x, self.t.y, 1.0),
        )
    }

    /// The heading angle in `(-pi, pi]`.
    pub fn yaw(&self) -> f64 {
        self.r.log()
    }

    /// The planar pose `[x, y, yaw]`.
    pub fn to_array(&self) -> [f64; 3] {
        [self.t.x, self.t.y, self.yaw()]
    }

    /// The inverse transformation.
    pub fn inverse(&self) -> Self {
        let r_inv = self.r.inverse();
        Self {
            r: r_inv,
            t: r_inv * (-self.t),
        }
    }

    /// Linear interpolation of the translation and shortest-arc interpolation of the heading.
    ///
    /// PRECONDITION: `ratio` is in `[0, 1]`. The end points are returned unchanged.
    pub fn interpolate(&self, other: &Self, ratio: f64) -> Self {
        if ratio == 0.0 {
            return *self;
        }
        if ratio == 1.0 {
            return *other;
        }
        let t = self.t * (1.0 - ratio) + other.t * ratio;
        let yaw = normalize_angle(self.yaw() + ratio * normalize_angle(other.yaw() - self.yaw()));
        Self::new(SO2::exp(yaw), t)
    }

    /// Checked version of [`SE2::interpolate`].
    pub fn try_interpolate(&self, other: &Self, ratio: f64) -> Result<Self, LieError> {
        check_ratio(ratio)?;
        Ok(self.interpolate(other, ratio))
    }
}

impl Default for SE2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Mul<SE2> for SE2 {
    type Output = SE2;

    fn mul(self, other: SE2) -> SE2 {
        SE2::new(self.r * other.r, self.r * other.t + self.t)
    }
}

impl std::ops::MulAssign<SE2> for SE2 {
    fn mul_assign(&mut self, rhs: SE2) {
        *self = *self * rhs;
    }
}

impl std::ops::Mul<DVec2> for SE2 {
    type Output = DVec2;

    fn mul(self, rhs: DVec2) -> Self::Output {
        self.r * rhs + self.t
    }
}
