use glam::{DMat2, DMat3, DVec2, DVec3};
use nalgebra::{SMatrix, SVector};
use sextant_3d::Point;
use sextant_lie::{se2::SE2, se3::SE3, so2::SO2};

/// A rigid body transformation usable by [`crate::icp()`].
///
/// Implemented for [`SE2`] (`D = 2`) and [`SE3`] (`D = 3`). Composition with `*`
/// applies the right hand side first.
pub trait RigidTransform<const D: usize>:
    Copy + std::fmt::Debug + std::ops::Mul<Output = Self>
{
    /// The point type the transformation acts on.
    type Point: Point<D>;

    /// The identity transformation.
    fn identity() -> Self;

    /// Build a transformation from a rotation matrix and a translation vector.
    fn from_rotation_translation(
        rotation: &SMatrix<f64, D, D>,
        translation: &SVector<f64, D>,
    ) -> Self;

    /// Apply the transformation to a point.
    fn transform_point(&self, point: &Self::Point) -> Self::Point;

    /// Squared norm of the translational part.
    fn translation_norm_squared(&self) -> f64;

    /// Magnitude of the rotation angle with respect to the identity.
    fn rotation_angle(&self) -> f64;
}

impl RigidTransform<2> for SE2 {
    type Point = DVec2;

    fn identity() -> Self {
        SE2::IDENTITY
    }

    fn from_rotation_translation(
        rotation: &SMatrix<f64, 2, 2>,
        translation: &SVector<f64, 2>,
    ) -> Self {
        let rotation = DMat2::from_cols(
            DVec2::new(rotation[(0, 0)], rotation[(1, 0)]),
            DVec2::new(rotation[(0, 1)], rotation[(1, 1)]),
        );
        SE2::new(
            SO2::from_matrix(&rotation).normalize(),
            DVec2::from_vector(translation),
        )
    }

    #[inline]
    fn transform_point(&self, point: &DVec2) -> DVec2 {
        *self * *point
    }

    #[inline]
    fn translation_norm_squared(&self) -> f64 {
        self.t.length_squared()
    }

    #[inline]
    fn rotation_angle(&self) -> f64 {
        self.r.angle()
    }
}

impl RigidTransform<3> for SE3 {
    type Point = DVec3;

    fn identity() -> Self {
        SE3::IDENTITY
    }

    fn from_rotation_translation(
        rotation: &SMatrix<f64, 3, 3>,
        translation: &SVector<f64, 3>,
    ) -> Self {
        // nalgebra storage is column-major, as glam expects
        let mut cols = [0.0; 9];
        cols.copy_from_slice(rotation.as_slice());
        SE3::from_rotation_translation(
            &DMat3::from_cols_array(&cols),
            DVec3::from_vector(translation),
        )
    }

    #[inline]
    fn transform_point(&self, point: &DVec3) -> DVec3 {
        *self * *point
    }

    #[inline]
    fn translation_norm_squared(&self) -> f64 {
        self.t.length_squared()
    }

    #[inline]
    fn rotation_angle(&self) -> f64 {
        self.r.angle()
    }
}
