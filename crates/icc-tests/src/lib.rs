//! # icc-tests
//!
//! Parity and scenario testing for oxicc.
//!
//! This crate provides:
//! - Synthetic profile bytes ([`fixtures`])
//! - Deterministic inputs ([`patterns`])
//! - deltaE2000 statistics ([`accuracy`])
//! - Parity bookkeeping against the reference CMM ([`parity`])
//!
//! ## Reference Implementation
//!
//! - **lcms2**: reference profiles are serialised by lcms2 and parsed by
//!   oxicc, so both sides read identical bytes.
//!
//! ## Test Categories
//!
//! 1. **Parity**: RGB, gray and black point against lcms2
//! 2. **End to end**: sRGB, gray and CMYK profiles through every factory path
//! 3. **Concurrency**: shared profiles and pipelines under rayon
//! 4. **Corrupt input**: truncated and mangled profiles
//! 5. **Lab/sRGB**: fixture table and gamut mapping

pub mod accuracy;
pub mod fixtures;
pub mod parity;
pub mod patterns;

pub use accuracy::{DeltaEStats, compare_rgb_buffers};
pub use parity::{ParityReport, ParityTest};
