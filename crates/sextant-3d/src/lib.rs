#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! Points are plain [`glam::DVec2`] and [`glam::DVec3`] values seen through the
//! [`Point`] trait, grouped in a [`PointCloud`]. Points with non-finite
//! coordinates stand for missing measurements and are ignored by every query.
//!
//! ```rust
//! use glam::DVec3;
//! use sextant_3d::{hausdorff, hausdorff_fraction, PointCloud};
//!
//! let scan = PointCloud::new(vec![
//!     DVec3::new(0.0, 0.0, 0.0),
//!     DVec3::new(1.0, 0.0, 0.0),
//!     DVec3::new(f64::NAN, 0.0, 0.0),
//! ]);
//! let map = PointCloud::new(vec![DVec3::new(0.0, 0.0, 0.1), DVec3::new(1.0, 0.0, 0.0)]);
//!
//! assert!((hausdorff(&scan, &map) - 0.1).abs() < 1e-12);
//! assert_eq!(hausdorff_fraction(&scan, &map, 0.05), 0.5);
//! ```

/// Hausdorff distance metrics between point clouds.
pub mod hausdorff;

/// Brute force nearest neighbour search.
pub mod nearest;

mod point;
mod pointcloud;

pub use crate::hausdorff::{
    hausdorff, hausdorff_avg, hausdorff_covariance, hausdorff_covariance_limited,
    hausdorff_fraction, hausdorff_mpe, hausdorff_point,
};
pub use crate::nearest::{
    nearest_neighbour, nearest_neighbour_index, nearest_neighbour_within, nearest_neighbours,
    Neighbour,
};
pub use crate::point::Point;
pub use crate::pointcloud::{PointCloud, PointCloudError};
