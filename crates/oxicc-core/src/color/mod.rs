//! Color value types and analytic conversions
//!
//! - CIE XYZ and CIELAB (D50 PCS)
//! - Reference whites
//! - PCS to sRGB with optional gamut mapping

pub mod lab;
pub mod srgb;
pub mod white_point;
pub mod xyz;

pub use lab::{Lab, delta_e_2000};
pub use srgb::{lab_to_linear_srgb, lab_to_srgb, srgb_to_lab, srgb_to_xyz, xyz_to_srgb};
pub use white_point::{D50, D65};
pub use xyz::Xyz;
