//! ICC Profile Binary Format
//!
//! Header decoding, signatures and fixed-point numbers, and the tag
//! decoders, according to ICC.1:2022.
//!
//! # Structure
//!
//! An ICC profile consists of:
//! 1. A 128-byte header
//! 2. A tag table listing all tags
//! 3. Tag data (may overlap/share data)
//!
//! The profile-level model built on top of these lives in
//! [`crate::profile`].

pub mod header;
pub mod tags;
pub mod types;

pub use header::{
    ColorSpace, HEADER_SIZE, IccHeader, ProfileClass, ProfileVersion, RenderingIntent,
};
pub use tags::{TagValue, decode_tag};
pub use types::{DateTimeNumber, S15Fixed16, Signature, U8Fixed8, U16Fixed16, XyzNumber};
