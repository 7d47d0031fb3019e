//! ICC Profile Header
//!
//! The header is exactly 128 bytes. See ICC.1:2022 Section 7.2.

use super::types::{
    DateTimeNumber, Signature, XyzNumber, read_signature, read_u32, read_u8, slice_at,
};
use crate::error::{Error, Result};

/// Header size, also the minimum size of any profile
pub const HEADER_SIZE: usize = 128;

/// Parsed 128-byte profile header
#[derive(Debug, Clone, PartialEq)]
pub struct IccHeader {
    /// Profile size in bytes as declared
    pub size: u32,
    /// CMM the creator prefers
    pub cmm_type: Signature,
    pub version: ProfileVersion,
    pub device_class: ProfileClass,
    /// Color space of device data
    pub color_space: ColorSpace,
    /// PCS encoding, XYZ or Lab
    pub pcs: ColorSpace,
    pub creation_date: DateTimeNumber,
    pub platform: Signature,
    pub flags: u32,
    pub manufacturer: Signature,
    pub model: Signature,
    pub attributes: u64,
    pub rendering_intent: RenderingIntent,
    /// Illuminant the PCS values are relative to, D50 in practice
    pub illuminant: XyzNumber,
    pub creator: Signature,
    /// MD5 of the profile with some header fields zeroed; all zero when absent
    pub profile_id: [u8; 16],
}

impl IccHeader {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let header = slice_at(data, 0, HEADER_SIZE)?;

        let magic = read_signature(header, 36)?;
        if magic != Signature::PROFILE_MAGIC {
            return Err(Error::InvalidSignature {
                expected: "acsp",
                found: magic,
            });
        }

        let size = read_u32(header, 0)?;
        if size as usize > data.len() {
            tracing::warn!(
                declared = size,
                actual = data.len(),
                "Profile header size exceeds data"
            );
        }

        let minor_patch = read_u8(header, 9)?;
        let version = ProfileVersion {
            major: read_u8(header, 8)?,
            minor: minor_patch >> 4,
            patch: minor_patch & 0x0F,
        };

        let pcs = ColorSpace::from_signature(read_signature(header, 20)?)?;
        if !pcs.is_pcs() {
            tracing::debug!(pcs = %pcs.signature(), "Non-XYZ/Lab PCS (device link)");
        }

        let mut attributes = [0u8; 8];
        attributes.copy_from_slice(slice_at(header, 56, 8)?);

        // Only the low 16 bits carry the intent
        let intent_raw = read_u32(header, 64)? & 0xFFFF;
        let rendering_intent = RenderingIntent::from_u32(intent_raw)?;

        let mut profile_id = [0u8; 16];
        profile_id.copy_from_slice(slice_at(header, 84, 16)?);

        Ok(Self {
            size,
            cmm_type: read_signature(header, 4)?,
            version,
            device_class: ProfileClass::from_signature(read_signature(header, 12)?)?,
            color_space: ColorSpace::from_signature(read_signature(header, 16)?)?,
            pcs,
            creation_date: DateTimeNumber::read(header, 24)?,
            platform: read_signature(header, 40)?,
            flags: read_u32(header, 44)?,
            manufacturer: read_signature(header, 48)?,
            model: read_signature(header, 52)?,
            attributes: u64::from_be_bytes(attributes),
            rendering_intent,
            illuminant: XyzNumber::read(header, 68)?,
            creator: read_signature(header, 80)?,
            profile_id,
        })
    }
}

/// Major and minor version from header bytes 8 and 9
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProfileVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl ProfileVersion {
    pub fn at_least(&self, major: u8, minor: u8) -> bool {
        self.major > major || (self.major == major && self.minor >= minor)
    }

    pub fn is_v4(&self) -> bool {
        self.major >= 4
    }
}

/// Device class from header bytes 12..16
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProfileClass {
    /// Scanner, camera
    Input,
    /// Monitor
    Display,
    /// Printer
    Output,
    DeviceLink,
    ColorSpace,
    Abstract,
    NamedColor,
}

const PROFILE_CLASSES: [(ProfileClass, [u8; 4]); 7] = [
    (ProfileClass::Input, *b"scnr"),
    (ProfileClass::Display, *b"mntr"),
    (ProfileClass::Output, *b"prtr"),
    (ProfileClass::DeviceLink, *b"link"),
    (ProfileClass::ColorSpace, *b"spac"),
    (ProfileClass::Abstract, *b"abst"),
    (ProfileClass::NamedColor, *b"nmcl"),
];

impl ProfileClass {
    pub fn from_signature(sig: Signature) -> Result<Self> {
        PROFILE_CLASSES
            .iter()
            .find(|(_, bytes)| Signature::from_bytes(*bytes) == sig)
            .map(|(class, _)| *class)
            .ok_or(Error::InvalidSignature {
                expected: "profile class",
                found: sig,
            })
    }

    pub fn signature(&self) -> Signature {
        PROFILE_CLASSES
            .iter()
            .find(|(class, _)| class == self)
            .map(|(_, bytes)| Signature::from_bytes(*bytes))
            .unwrap_or_default()
    }
}

/// Data color space of a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorSpace {
    Xyz,
    Lab,
    Luv,
    YCbCr,
    Yxy,
    Rgb,
    Gray,
    Hsv,
    Hls,
    Cmyk,
    Cmy,
    /// n-colour spaces, "2CLR" through "FCLR"
    Color(u8),
}

const NAMED_SPACES: [(ColorSpace, [u8; 4]); 11] = [
    (ColorSpace::Xyz, *b"XYZ "),
    (ColorSpace::Lab, *b"Lab "),
    (ColorSpace::Luv, *b"Luv "),
    (ColorSpace::YCbCr, *b"YCbr"),
    (ColorSpace::Yxy, *b"Yxy "),
    (ColorSpace::Rgb, *b"RGB "),
    (ColorSpace::Gray, *b"GRAY"),
    (ColorSpace::Hsv, *b"HSV "),
    (ColorSpace::Hls, *b"HLS "),
    (ColorSpace::Cmyk, *b"CMYK"),
    (ColorSpace::Cmy, *b"CMY "),
];

impl ColorSpace {
    pub fn from_signature(sig: Signature) -> Result<Self> {
        if let Some((space, _)) = NAMED_SPACES
            .iter()
            .find(|(_, bytes)| Signature::from_bytes(*bytes) == sig)
        {
            return Ok(*space);
        }
        // "nCLR" with n a hex digit 2..F
        let [n, c, l, r] = sig.to_bytes();
        if [c, l, r] == *b"CLR" {
            let count = match n {
                b'2'..=b'9' => Some(n - b'0'),
                b'A'..=b'F' => Some(n - b'A' + 10),
                _ => None,
            };
            if let Some(count) = count {
                return Ok(Self::Color(count));
            }
        }
        Err(Error::InvalidSignature {
            expected: "color space",
            found: sig,
        })
    }

    pub fn signature(&self) -> Signature {
        match self {
            Self::Color(n) => {
                let digit = if *n < 10 { b'0' + n } else { b'A' + n - 10 };
                Signature::from_bytes([digit, b'C', b'L', b'R'])
            }
            named => NAMED_SPACES
                .iter()
                .find(|(space, _)| space == named)
                .map(|(_, bytes)| Signature::from_bytes(*bytes))
                .unwrap_or_default(),
        }
    }

    /// Number of channels for this color space
    pub fn channels(&self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Cmyk => 4,
            Self::Color(n) => *n as usize,
            _ => 3,
        }
    }

    /// XYZ or Lab
    pub fn is_pcs(&self) -> bool {
        matches!(self, Self::Xyz | Self::Lab)
    }
}

/// Rendering intent as stored in the header and used to pick LUT tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RenderingIntent {
    #[default]
    Perceptual,
    RelativeColorimetric,
    Saturation,
    AbsoluteColorimetric,
}

impl RenderingIntent {
    pub fn from_u32(val: u32) -> Result<Self> {
        match val {
            0 => Ok(Self::Perceptual),
            1 => Ok(Self::RelativeColorimetric),
            2 => Ok(Self::Saturation),
            3 => Ok(Self::AbsoluteColorimetric),
            _ => Err(Error::inconsistent(format!("rendering intent {}", val))),
        }
    }

    pub fn to_u32(&self) -> u32 {
        *self as u32
    }
}
