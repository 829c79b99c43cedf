#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! The registration is generic over the dimension through [`RigidTransform`],
//! implemented for [`sextant_lie::se2::SE2`] on [`glam::DVec2`] clouds and for
//! [`sextant_lie::se3::SE3`] on [`glam::DVec3`] clouds.

mod icp;
pub use icp::*;

mod ops;

mod transform;
pub use transform::RigidTransform;
