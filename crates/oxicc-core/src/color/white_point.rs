//! Reference whites
//!
//! D50 is the ICC PCS illuminant as encoded in profiles (0.9642, 1, 0.8249).
//! D65 is the sRGB white.

use crate::color::Xyz;

/// ICC PCS illuminant
pub const D50: Xyz = Xyz::new(0.9642, 1.0, 0.8249);

/// sRGB reference white
pub const D65: Xyz = Xyz::new(0.95047, 1.0, 1.08883);
