//! # oxicc - ICC color profile engine
//!
//! Reads ICC v2 and v4 profiles and builds numeric transforms through them:
//! device → PCS, PCS → device and device → sRGB, with black point
//! compensation and optional gamut mapping.
//!
//! ## Layers
//!
//! - [`icc`]: header, signatures, fixed-point numbers and tag decoders
//!   (curves, matrices, CLUTs, mft1/mft2, mAB/mBA, text, XYZ)
//! - [`pipeline`]: composable stages with matrix fusion and identity
//!   elision, single-pixel and bulk application
//! - [`profile`]: lazily decoded, cached tag table, profile queries,
//!   transform factory and black point detection
//! - [`color`], [`math`]: Lab/XYZ/sRGB conversions, Bradford adaptation,
//!   interpolation kernels
//! - [`simd`]: CPU-dispatched batch kernels behind the bulk paths
//!
//! ## Quick Start
//!
//! ```no_run
//! use oxicc_core::{Profile, TransformOptions};
//!
//! # fn main() -> oxicc_core::Result<()> {
//! let bytes = std::fs::read("display.icc").expect("profile file");
//! let profile = Profile::parse(&bytes)?;
//!
//! let to_srgb = profile.to_srgb_pipeline(3, TransformOptions::default())?;
//! let rgb = to_srgb.transform([1.0, 0.5, 0.25]);
//!
//! let mut pixels = vec![255u8, 128, 64, 0, 0, 0];
//! let src = pixels.clone();
//! to_srgb.transform_rgb8(&src, &mut pixels)?;
//! # let _ = rgb;
//! # Ok(())
//! # }
//! ```
//!
//! Profiles and pipelines are `Send + Sync`; a pipeline holds no mutable
//! state and can be shared across threads converting different buffers.

pub mod color;
pub mod error;
pub mod icc;
pub mod math;
pub mod pipeline;
pub mod profile;
pub mod simd;

pub use color::{D50, D65, Lab, Xyz, delta_e_2000, lab_to_srgb, srgb_to_lab, srgb_to_xyz, xyz_to_srgb};
pub use error::{Error, Result};
pub use icc::tags::Interpolation;
pub use icc::{ColorSpace, IccHeader, ProfileClass, ProfileVersion, RenderingIntent, Signature};
pub use math::Matrix3x3;
pub use pipeline::{ChannelTransformer, Pipeline, TransformOptions};
pub use profile::{Profile, WellKnownProfile};

/// Version of oxicc
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
