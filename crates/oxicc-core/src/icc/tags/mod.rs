//! ICC Profile Tag Decoding
//!
//! Tags contain the actual profile data. Each tag body has:
//! - A 4-byte type signature identifying the data format
//! - 4 reserved bytes
//! - Type-specific data
//!
//! Decoders receive the whole body and report how many bytes they used.
//! A type with no decoder here is an `UnsupportedTagType` error.
//!
//! See ICC.1:2022 Section 10.

mod clut;
mod curves;
mod lut;
mod matrix;
mod modular;
mod text;
mod xyz;

pub use clut::{Clut, Interpolation, decode_clut};
pub use curves::{Curve, decode_curve, decode_curve_set};
pub use lut::{LutTag, decode_lut};
pub use matrix::{MatrixWithOffset, decode_matrix};
pub use modular::{LutDirection, ModularTag, decode_modular};
pub use text::{LocalizedText, TextData, decode_text};
pub use xyz::{decode_sf32, decode_xyz, single_xyz};

use crate::color::Xyz;
use crate::error::{Error, Result};
use crate::icc::types::{Signature, read_signature};
use crate::math::Matrix3x3;

/// Decoded tag data
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    /// One or more XYZ triplets
    Xyz(Vec<Xyz>),
    /// `curv` or `para`
    Curve(Curve),
    /// `text`, `desc` or `mluc`
    Text(TextData),
    /// `mft1` or `mft2`
    Lut(LutTag),
    /// `mAB ` or `mBA `
    Modular(ModularTag),
    /// `sf32`
    Sf32(Vec<f64>),
}

impl TagValue {
    pub fn as_xyz(&self) -> Result<Xyz> {
        match self {
            TagValue::Xyz(values) => single_xyz(values),
            other => Err(other.wrong_type("XYZ")),
        }
    }

    pub fn as_curve(&self) -> Result<&Curve> {
        match self {
            TagValue::Curve(curve) => Ok(curve),
            other => Err(other.wrong_type("curve")),
        }
    }

    pub fn as_text(&self) -> Result<&TextData> {
        match self {
            TagValue::Text(text) => Ok(text),
            other => Err(other.wrong_type("text")),
        }
    }

    /// Nine sf32 values as a row-major matrix
    pub fn as_matrix(&self) -> Result<Matrix3x3> {
        match self {
            TagValue::Sf32(values) if values.len() == 9 => Ok(Matrix3x3::new([
                [values[0], values[1], values[2]],
                [values[3], values[4], values[5]],
                [values[6], values[7], values[8]],
            ])),
            TagValue::Sf32(values) => Err(Error::inconsistent(format!(
                "sf32 matrix with {} values",
                values.len()
            ))),
            other => Err(other.wrong_type("sf32")),
        }
    }

    pub fn is_lut(&self) -> bool {
        matches!(self, TagValue::Lut(_) | TagValue::Modular(_))
    }

    fn wrong_type(&self, expected: &str) -> Error {
        Error::inconsistent(format!("expected {} tag, found {}", expected, self.kind()))
    }

    fn kind(&self) -> &'static str {
        match self {
            TagValue::Xyz(_) => "XYZ",
            TagValue::Curve(_) => "curve",
            TagValue::Text(_) => "text",
            TagValue::Lut(_) => "legacy LUT",
            TagValue::Modular(_) => "modular LUT",
            TagValue::Sf32(_) => "sf32",
        }
    }
}

/// Decode a tag body by its type signature
pub fn decode_tag(data: &[u8]) -> Result<(TagValue, usize)> {
    let type_sig = read_signature(data, 0)?;
    tracing::trace!(%type_sig, len = data.len(), "Decoding tag");
    match type_sig {
        Signature::XYZ_TYPE => decode_xyz(data).map(|(v, n)| (TagValue::Xyz(v), n)),
        Signature::CURVE_TYPE | Signature::PARAMETRIC_TYPE => {
            decode_curve(data).map(|(v, n)| (TagValue::Curve(v), n))
        }
        Signature::TEXT_TYPE | Signature::DESC_TYPE | Signature::MLUC_TYPE => {
            decode_text(data).map(|(v, n)| (TagValue::Text(v), n))
        }
        Signature::LUT8_TYPE | Signature::LUT16_TYPE => {
            decode_lut(data).map(|(v, n)| (TagValue::Lut(v), n))
        }
        Signature::LUT_A2B_TYPE | Signature::LUT_B2A_TYPE => {
            decode_modular(data).map(|(v, n)| (TagValue::Modular(v), n))
        }
        Signature::SF32_TYPE => decode_sf32(data).map(|(v, n)| (TagValue::Sf32(v), n)),
        other => Err(Error::UnsupportedTagType(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_type_is_error() {
        let data = [b'u', b'n', b'k', b'n', 0, 0, 0, 0, 1, 2, 3, 4];
        assert_eq!(
            decode_tag(&data),
            Err(Error::UnsupportedTagType(Signature::from_bytes(*b"unkn")))
        );
    }

    #[test]
    fn test_dispatch_curve() {
        let data = b"curv\0\0\0\0\0\0\0\0".to_vec();
        let (value, used) = decode_tag(&data).unwrap();
        assert_eq!(used, 12);
        assert!(value.as_curve().unwrap().is_identity());
        assert!(value.as_xyz().is_err());
    }

    #[test]
    fn test_sf32_matrix() {
        let mut data = b"sf32\0\0\0\0".to_vec();
        for i in 0..9 {
            let v: i32 = if i % 4 == 0 { 0x10000 } else { 0 };
            data.extend_from_slice(&v.to_be_bytes());
        }
        let (value, _) = decode_tag(&data).unwrap();
        assert!(value.as_matrix().unwrap().is_identity(0.0));

        let (short, _) = decode_tag(&data[..8 + 8 * 4]).unwrap();
        assert!(matches!(short.as_matrix(), Err(Error::Inconsistent(_))));
    }

    #[test]
    fn test_too_short_header() {
        assert!(matches!(decode_tag(b"cu"), Err(Error::TooShort { .. })));
    }
}
