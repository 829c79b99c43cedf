#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Sextant Lie Groups
//!
//! Rotations and rigid body transformations in double precision, used by the
//! registration and statistics crates of the workspace.
//!
//! ## Supported Groups
//!
//! - **SO(2)**: 2D rotation group, stored as a unit complex number
//! - **SE(2)**: 2D rigid body transformations (rotation + translation)
//! - **SO(3)**: 3D rotation group, stored as a unit quaternion
//! - **SE(3)**: 3D rigid body transformations (rotation + translation)
//!
//! ## Example
//!
//! ```rust
//! use glam::DVec2;
//! use sextant_lie::se2::SE2;
//!
//! let a = SE2::from_xy_theta(1.0, 0.0, std::f64::consts::FRAC_PI_2);
//! let b = SE2::from_xy_theta(0.0, 2.0, 0.0);
//!
//! // composition applies `b` first, then `a`
//! let p = (a * b) * DVec2::ZERO;
//! assert!((p - DVec2::new(-1.0, 0.0)).length() < 1e-12);
//!
//! // halfway between the two poses
//! let mid = a.interpolate(&b, 0.5);
//! assert!((mid.t - DVec2::new(0.5, 1.0)).length() < 1e-12);
//! ```

/// Special Euclidean group SE(2) for 2D rigid transformations.
pub mod se2;

/// Special Euclidean group SE(3) for 3D rigid transformations.
pub mod se3;

/// Special Orthogonal group SO(2) for 2D rotations.
pub mod so2;

/// Special Orthogonal group SO(3) for 3D rotations.
pub mod so3;

mod error;
pub use error::LieError;

/// Wrap an angle into the interval `(-pi, pi]`.
pub fn normalize_angle(theta: f64) -> f64 {
    let wrapped = (theta + std::f64::consts::PI).rem_euclid(std::f64::consts::TAU);
    if wrapped == 0.0 {
        std::f64::consts::PI
    } else {
        wrapped - std::f64::consts::PI
    }
}

pub(crate) fn check_ratio(ratio: f64) -> Result<(), LieError> {
    if (0.0..=1.0).contains(&ratio) {
        Ok(())
    } else {
        Err(LieError::InvalidRatio(ratio))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_normalize_angle() {
        assert_relative_eq!(normalize_angle(0.0), 0.0);
        assert_relative_eq!(normalize_angle(PI), PI);
        assert_relative_eq!(normalize_angle(-PI), PI);
        assert_relative_eq!(normalize_angle(3.0 * PI / 2.0), -PI / 2.0, epsilon = 1e-12);
        assert_relative_eq!(normalize_angle(-5.0 * PI / 2.0), -PI / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_check_ratio() {
        assert!(check_ratio(0.0).is_ok());
        assert!(check_ratio(1.0).is_ok());
        assert!(matches!(check_ratio(1.5), Err(LieError::InvalidRatio(_))));
        assert!(check_ratio(f64::NAN).is_err());
    }
}
