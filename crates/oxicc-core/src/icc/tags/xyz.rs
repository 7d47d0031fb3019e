//! XYZ and sf32 Tag Types
//!
//! XYZType carries one or more XYZ numbers (colorants, media white).
//! s15Fixed16ArrayType is used by `chad`.
//!
//! See ICC.1:2022 Sections 10.31 and 10.22

use crate::color::Xyz;
use crate::error::{Error, Result};
use crate::icc::types::{XyzNumber, ensure_len, read_s15f16};

/// Decode an `XYZ ` body into its triplets. At least one is required.
pub fn decode_xyz(data: &[u8]) -> Result<(Vec<Xyz>, usize)> {
    ensure_len(data, 20)?;
    let count = (data.len() - 8) / 12;
    let values = (0..count)
        .map(|i| XyzNumber::read(data, 8 + i * 12).map(|n| n.to_xyz()))
        .collect::<Result<Vec<_>>>()?;
    Ok((values, 8 + count * 12))
}

/// Decode an `sf32` body into its values
pub fn decode_sf32(data: &[u8]) -> Result<(Vec<f64>, usize)> {
    ensure_len(data, 8)?;
    let count = (data.len() - 8) / 4;
    let values = (0..count)
        .map(|i| read_s15f16(data, 8 + i * 4).map(|v| v.decode()))
        .collect::<Result<Vec<_>>>()?;
    Ok((values, 8 + count * 4))
}

/// The XYZ value of a colorant or white point tag
///
/// Some writers pad these tags with extra triplets; only the first counts.
pub fn single_xyz(values: &[Xyz]) -> Result<Xyz> {
    values
        .first()
        .copied()
        .ok_or_else(|| Error::inconsistent("XYZ tag holds no values"))
}
