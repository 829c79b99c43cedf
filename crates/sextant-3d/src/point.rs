use glam::{DVec2, DVec3};
use nalgebra::SVector;

/// A point with `D` double precision coordinates.
///
/// Implemented for [`glam::DVec2`] (`D = 2`) and [`glam::DVec3`] (`D = 3`).
pub trait Point<const D: usize>: Copy + Send + Sync + std::fmt::Debug {
    /// Whether the point carries usable data.
    ///
    /// A point with a NaN or infinite component marks a sensor dropout and is
    /// skipped by every algorithm in this crate.
    fn is_normal(&self) -> bool;

    /// The coordinates as a column vector.
    fn to_vector(&self) -> SVector<f64, D>;

    /// Build a point from a column vector.
    fn from_vector(v: &SVector<f64, D>) -> Self;

    /// The squared euclidean distance to `other`.
    fn squared_distance(&self, other: &Self) -> f64;

    /// The euclidean distance to `other`.
    #[inline]
    fn distance(&self, other: &Self) -> f64 {
        self.squared_distance(other).sqrt()
    }
}

impl Point<2> for DVec2 {
    #[inline]
    fn is_normal(&self) -> bool {
        self.is_finite()
    }

    #[inline]
    fn to_vector(&self) -> SVector<f64, 2> {
        SVector::<f64, 2>::new(self.x, self.y)
    }

    #[inline]
    fn from_vector(v: &SVector<f64, 2>) -> Self {
        DVec2::new(v[0], v[1])
    }

    #[inline]
    fn squared_distance(&self, other: &Self) -> f64 {
        self.distance_squared(*other)
    }
}

impl Point<3> for DVec3 {
    #[inline]
    fn is_normal(&self) -> bool {
        self.is_finite()
    }

    #[inline]
    fn to_vector(&self) -> SVector<f64, 3> {
        SVector::<f64, 3>::new(self.x, self.y, self.z)
    }

    #[inline]
    fn from_vector(v: &SVector<f64, 3>) -> Self {
        DVec3::new(v[0], v[1], v[2])
    }

    #[inline]
    fn squared_distance(&self, other: &Self) -> f64 {
        self.distance_squared(*other)
    }
}
