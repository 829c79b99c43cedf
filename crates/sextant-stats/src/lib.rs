#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Sextant Statistics
//!
//! Incremental estimators over `D`-dimensional samples:
//!
//! - [`Distribution`]: running mean and sample covariance, updated one sample at a time
//! - [`EigenValueLimit`]: keeps a covariance estimate from becoming degenerate
//! - [`WeightedQuaternionMean`]: running weighted average of orientations
//!
//! Distributions can be persisted with [`io::write_distribution`] and
//! [`io::read_distribution`], and implement `serde` traits.
//!
//! ```rust
//! use nalgebra::Vector3;
//! use sextant_stats::{Distribution, EigenValueLimit};
//!
//! // samples on a plane produce a flat covariance
//! let dist = (0..10)
//!     .flat_map(|i| (0..10).map(move |j| Vector3::new(i as f64, j as f64, 0.0)))
//!     .collect::<Distribution<3>>();
//! assert!(dist.is_valid());
//!
//! let limited = EigenValueLimit::from_exponent(2).apply(&dist.covariance());
//! assert!(limited.determinant() > 0.0);
//! ```

mod bincode;
mod distribution;
mod eigen;
/// Binary persistence of distributions.
pub mod io;
mod quaternion_mean;
mod serde;

pub use crate::distribution::{Distribution, MIN_SAMPLES};
pub use crate::eigen::{limit_eigenvalues_by_zero, symmetric_eigen, EigenValueLimit};
pub use crate::io::DistributionError;
pub use crate::quaternion_mean::WeightedQuaternionMean;
