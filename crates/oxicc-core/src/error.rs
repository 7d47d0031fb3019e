//! Error types for oxicc
//!
//! Every failure the engine reports is one of these variants. Tag decode
//! errors are cached alongside successful values, so the type is `Clone`
//! and comparable.

use thiserror::Error;

use crate::icc::Signature;

/// Result type for oxicc operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding profiles or building transforms
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Not enough bytes for a fixed-size or length-prefixed field
    #[error("data too short: need {needed} bytes, have {available}")]
    TooShort { needed: usize, available: usize },

    /// Wrong magic number or unknown enumerated signature
    #[error("invalid signature {found} (expected {expected})")]
    InvalidSignature {
        expected: &'static str,
        found: Signature,
    },

    /// A tag is present but its type is not one this engine decodes
    #[error("unsupported tag type '{0}'")]
    UnsupportedTagType(Signature),

    /// Structurally valid bytes describing an impossible or mismatched layout
    #[error("inconsistent data: {0}")]
    Inconsistent(String),

    /// Tag signature is not in the directory
    #[error("tag '{0}' not found")]
    NotFound(Signature),

    /// Device-direction transform requested but the profile has no inverse path
    #[error("no inverse available: {0}")]
    NoInverseAvailable(String),

    /// A parametric curve coefficient makes the formula undefined
    #[error("degenerate parameter: {0}")]
    DegenerateParameter(String),
}

impl Error {
    pub(crate) fn too_short(needed: usize, available: usize) -> Self {
        Self::TooShort { needed, available }
    }

    pub(crate) fn inconsistent(msg: impl Into<String>) -> Self {
        Self::Inconsistent(msg.into())
    }
}
