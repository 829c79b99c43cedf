#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use sextant_lie as lie;

#[doc(inline)]
pub use sextant_stats as stats;

#[doc(inline)]
pub use sextant_3d as k3d;

#[doc(inline)]
pub use sextant_icp as icp;
