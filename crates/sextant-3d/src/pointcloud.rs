use glam::{DVec2, DVec3};

/// An error type for building point clouds.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum PointCloudError {
    /// The flat coordinate buffer does not hold a whole number of points.
    #[error("buffer of length {len} is not a multiple of the point dimension {dim}")]
    InvalidBufferLength {
        /// Length of the coordinate buffer.
        len: usize,
        /// Number of coordinates per point.
        dim: usize,
    },
}

/// An ordered set of points.
///
/// The cloud may contain invalid points (see [`crate::Point::is_normal`]); they
/// keep their position so indices stay stable, and are skipped by the queries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointCloud<P> {
    points: Vec<P>,
}

impl<P> PointCloud<P> {
    /// Create a new point cloud from points.
    pub fn new(points: Vec<P>) -> Self {
        Self { points }
    }

    /// Get the number of points in the point cloud.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point cloud is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get as reference the points in the point cloud.
    #[inline]
    pub fn points(&self) -> &[P] {
        &self.points
    }

    /// Get the point at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&P> {
        self.points.get(index)
    }

    /// Iterate over the points, including invalid ones.
    pub fn iter(&self) -> std::slice::Iter<'_, P> {
        self.points.iter()
    }

    /// Consume the cloud and return its points.
    pub fn into_points(self) -> Vec<P> {
        self.points
    }
}

impl PointCloud<DVec2> {
    /// Build a 2D cloud from interleaved `[x0, y0, x1, y1, ..]` coordinates.
    pub fn from_flat_slice(data: &[f64]) -> Result<Self, PointCloudError> {
        if data.len() % 2 != 0 {
            return Err(PointCloudError::InvalidBufferLength {
                len: data.len(),
                dim: 2,
            });
        }
        Ok(Self::new(
            data.chunks_exact(2)
                .map(|c| DVec2::new(c[0], c[1]))
                .collect(),
        ))
    }
}

impl PointCloud<DVec3> {
    /// Build a 3D cloud from interleaved `[x0, y0, z0, x1, ..]` coordinates.
    pub fn from_flat_slice(data: &[f64]) -> Result<Self, PointCloudError> {
        if data.len() % 3 != 0 {
            return Err(PointCloudError::InvalidBufferLength {
                len: data.len(),
                dim: 3,
            });
        }
        Ok(Self::new(
            data.chunks_exact(3)
                .map(|c| DVec3::new(c[0], c[1], c[2]))
                .collect(),
        ))
    }
}

impl<P> From<Vec<P>> for PointCloud<P> {
    fn from(points: Vec<P>) -> Self {
        Self::new(points)
    }
}

impl<P> FromIterator<P> for PointCloud<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a, P> IntoIterator for &'a PointCloud<P> {
    type Item = &'a P;
    type IntoIter = std::slice::Iter<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
