//! Numeric building blocks
//!
//! - 3x3 matrices
//! - Parametric transfer functions and sRGB companding
//! - Bradford chromatic adaptation
//! - 1D, n-linear and tetrahedral interpolation

pub mod chromatic_adaptation;
pub mod gamma;
pub mod interpolation;
pub mod matrix;

pub use chromatic_adaptation::bradford_matrix;
pub use gamma::{ParametricCurve, ParametricCurveType, srgb_gamma_decode, srgb_gamma_encode};
pub use interpolation::{clamp_unit, lerp, lut1d_interp, nlinear_interp, tetrahedral_interp};
pub use matrix::Matrix3x3;
