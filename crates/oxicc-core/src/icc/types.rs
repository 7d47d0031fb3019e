//! ICC Profile Basic Types
//!
//! Signatures, fixed-point numbers and the checked big-endian readers every
//! decoder goes through. See ICC.1:2022 Section 4.

use std::fmt;

use crate::color::Xyz;
use crate::error::{Error, Result};

/// 4-byte big-endian signature, compared as an opaque `u32`
///
/// Used both for a tag's role ("rTRC") and for a tag's encoding type ("curv").
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Signature(pub u32);

impl Signature {
    /// Create from 4 ASCII characters
    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(b))
    }

    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    // Tag signatures
    pub const A2B0: Self = Self::from_bytes(*b"A2B0");
    pub const A2B1: Self = Self::from_bytes(*b"A2B1");
    pub const A2B2: Self = Self::from_bytes(*b"A2B2");
    pub const B2A0: Self = Self::from_bytes(*b"B2A0");
    pub const B2A1: Self = Self::from_bytes(*b"B2A1");
    pub const B2A2: Self = Self::from_bytes(*b"B2A2");
    pub const RED_COLORANT: Self = Self::from_bytes(*b"rXYZ");
    pub const GREEN_COLORANT: Self = Self::from_bytes(*b"gXYZ");
    pub const BLUE_COLORANT: Self = Self::from_bytes(*b"bXYZ");
    pub const RED_TRC: Self = Self::from_bytes(*b"rTRC");
    pub const GREEN_TRC: Self = Self::from_bytes(*b"gTRC");
    pub const BLUE_TRC: Self = Self::from_bytes(*b"bTRC");
    pub const GRAY_TRC: Self = Self::from_bytes(*b"kTRC");
    pub const MEDIA_WHITE: Self = Self::from_bytes(*b"wtpt");
    pub const MEDIA_BLACK: Self = Self::from_bytes(*b"bkpt");
    pub const CHAD: Self = Self::from_bytes(*b"chad");
    pub const DESC: Self = Self::from_bytes(*b"desc");
    pub const COPYRIGHT: Self = Self::from_bytes(*b"cprt");

    // Type signatures
    pub const XYZ_TYPE: Self = Self::from_bytes(*b"XYZ ");
    pub const CURVE_TYPE: Self = Self::from_bytes(*b"curv");
    pub const PARAMETRIC_TYPE: Self = Self::from_bytes(*b"para");
    pub const TEXT_TYPE: Self = Self::from_bytes(*b"text");
    pub const DESC_TYPE: Self = Self::from_bytes(*b"desc");
    pub const MLUC_TYPE: Self = Self::from_bytes(*b"mluc");
    pub const LUT8_TYPE: Self = Self::from_bytes(*b"mft1");
    pub const LUT16_TYPE: Self = Self::from_bytes(*b"mft2");
    pub const LUT_A2B_TYPE: Self = Self::from_bytes(*b"mAB ");
    pub const LUT_B2A_TYPE: Self = Self::from_bytes(*b"mBA ");
    pub const SF32_TYPE: Self = Self::from_bytes(*b"sf32");

    /// Profile file signature, 'acsp'
    pub const PROFILE_MAGIC: Self = Self::from_bytes(*b"acsp");
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.to_bytes() {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature('{}')", self)
    }
}

/// s15Fixed16Number - signed 16.16 fixed point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct S15Fixed16(pub i32);

impl S15Fixed16 {
    pub const MIN: f64 = -32768.0;
    pub const MAX: f64 = 32767.0 + 65535.0 / 65536.0;

    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Encode, saturating outside the representable range (NaN encodes as 0)
    pub fn encode(val: f64) -> Self {
        if val.is_nan() {
            return Self(0);
        }
        let raw = (val.clamp(Self::MIN, Self::MAX) * 65536.0).round();
        Self(raw.clamp(i32::MIN as f64, i32::MAX as f64) as i32)
    }

    /// Integer part is the signed high half, fraction the unsigned low half
    pub fn decode(self) -> f64 {
        let int = (self.0 >> 16) as i16 as f64;
        let frac = (self.0 as u32 & 0xFFFF) as f64 / 65536.0;
        int + frac
    }

    pub fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Self(i32::from_be_bytes(bytes))
    }

    pub fn to_be_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

/// u16Fixed16Number - unsigned 16.16 fixed point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct U16Fixed16(pub u32);

impl U16Fixed16 {
    pub fn decode(self) -> f64 {
        self.0 as f64 / 65536.0
    }

    pub fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(bytes))
    }
}

/// u8Fixed8Number - unsigned 8.8 fixed point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct U8Fixed8(pub u16);

impl U8Fixed8 {
    pub const MAX: f64 = 255.0 + 255.0 / 256.0;

    pub fn encode(val: f64) -> Self {
        if val.is_nan() {
            return Self(0);
        }
        Self((val.clamp(0.0, Self::MAX) * 256.0).round() as u16)
    }

    pub fn decode(self) -> f64 {
        self.0 as f64 / 256.0
    }

    pub fn from_be_bytes(bytes: [u8; 2]) -> Self {
        Self(u16::from_be_bytes(bytes))
    }
}

/// XYZNumber - ICC XYZ value (3 x s15Fixed16)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct XyzNumber {
    pub x: S15Fixed16,
    pub y: S15Fixed16,
    pub z: S15Fixed16,
}

impl XyzNumber {
    /// Parse from 12 bytes at `offset`
    pub fn read(data: &[u8], offset: usize) -> Result<Self> {
        Ok(Self {
            x: read_s15f16(data, offset)?,
            y: read_s15f16(data, offset + 4)?,
            z: read_s15f16(data, offset + 8)?,
        })
    }

    pub fn to_xyz(&self) -> Xyz {
        Xyz::new(self.x.decode(), self.y.decode(), self.z.decode())
    }
}

/// dateTimeNumber - ICC date/time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateTimeNumber {
    pub year: u16,
    pub month: u16,
    pub day: u16,
    pub hour: u16,
    pub minute: u16,
    pub second: u16,
}

impl DateTimeNumber {
    pub fn read(data: &[u8], offset: usize) -> Result<Self> {
        Ok(Self {
            year: read_u16(data, offset)?,
            month: read_u16(data, offset + 2)?,
            day: read_u16(data, offset + 4)?,
            hour: read_u16(data, offset + 6)?,
            minute: read_u16(data, offset + 8)?,
            second: read_u16(data, offset + 10)?,
        })
    }
}

/// Fail with `TooShort` unless `data` holds at least `needed` bytes
#[inline]
pub(crate) fn ensure_len(data: &[u8], needed: usize) -> Result<()> {
    if data.len() < needed {
        return Err(Error::too_short(needed, data.len()));
    }
    Ok(())
}

/// Checked sub-slice `data[offset..offset + len]`
#[inline]
pub(crate) fn slice_at(data: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    let end = offset
        .checked_add(len)
        .ok_or_else(|| Error::too_short(usize::MAX, data.len()))?;
    ensure_len(data, end)?;
    Ok(&data[offset..end])
}

#[inline]
pub(crate) fn read_u8(data: &[u8], offset: usize) -> Result<u8> {
    Ok(slice_at(data, offset, 1)?[0])
}

#[inline]
pub(crate) fn read_u16(data: &[u8], offset: usize) -> Result<u16> {
    let b = slice_at(data, offset, 2)?;
    Ok(u16::from_be_bytes([b[0], b[1]]))
}

#[inline]
pub(crate) fn read_u32(data: &[u8], offset: usize) -> Result<u32> {
    let b = slice_at(data, offset, 4)?;
    Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

#[inline]
pub(crate) fn read_signature(data: &[u8], offset: usize) -> Result<Signature> {
    read_u32(data, offset).map(Signature)
}

#[inline]
pub(crate) fn read_s15f16(data: &[u8], offset: usize) -> Result<S15Fixed16> {
    read_u32(data, offset).map(|raw| S15Fixed16(raw as i32))
}
