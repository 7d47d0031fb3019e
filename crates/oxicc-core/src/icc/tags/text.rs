//! Text Tag Types
//!
//! ICC profiles can contain text in several formats:
//! - text: Simple ASCII text
//! - desc: Profile description (v2 format)
//! - mluc: Multi-localized Unicode (v4 format)
//!
//! See ICC.1:2022 Sections 10.24 (text), 10.14 (desc), 10.15 (mluc)

use crate::error::{Error, Result};
use crate::icc::types::{Signature, read_signature, read_u8, read_u16, read_u32, slice_at};

const MLUC_RECORD_SIZE: usize = 12;
const SCRIPTCODE_LEN: usize = 67;

/// One mluc record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedText {
    pub language: [u8; 2],
    pub country: [u8; 2],
    pub text: String,
}

impl LocalizedText {
    /// "en-US" style tag
    pub fn locale(&self) -> String {
        format!(
            "{}-{}",
            String::from_utf8_lossy(&self.language),
            String::from_utf8_lossy(&self.country)
        )
    }
}

/// Text tag data
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextData {
    /// Primary text content (English or default)
    pub text: String,
    pub localized: Vec<LocalizedText>,
}

impl TextData {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            localized: Vec::new(),
        }
    }

    /// Text for a language code such as "en", falling back to nothing
    pub fn get_language(&self, language: &str) -> Option<&str> {
        self.localized
            .iter()
            .find(|l| l.language == language.as_bytes())
            .map(|l| l.text.as_str())
    }
}

/// Decode a `text`, `desc` or `mluc` body
pub fn decode_text(data: &[u8]) -> Result<(TextData, usize)> {
    match read_signature(data, 0)? {
        Signature::TEXT_TYPE => {
            let body = slice_at(data, 8, data.len().saturating_sub(8))?;
            Ok((TextData::new(ascii_until_nul(body)), data.len()))
        }
        Signature::DESC_TYPE => decode_desc(data),
        Signature::MLUC_TYPE => decode_mluc(data),
        other => Err(Error::UnsupportedTagType(other)),
    }
}

fn ascii_until_nul(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take_while(|b| **b != 0)
        .map(|b| *b as char)
        .collect()
}

/// ASCII block, then optional Unicode and ScriptCode blocks. A block that
/// is started must be complete.
fn decode_desc(data: &[u8]) -> Result<(TextData, usize)> {
    let ascii_count = read_u32(data, 8)? as usize;
    let ascii = slice_at(data, 12, ascii_count)?;
    let mut result = TextData::new(ascii_until_nul(ascii));
    let mut pos = 12 + ascii_count;

    if pos < data.len() {
        let language = read_u32(data, pos)?;
        let unicode_count = read_u32(data, pos + 4)? as usize;
        let bytes = unicode_count
            .checked_mul(2)
            .ok_or_else(|| Error::too_short(usize::MAX, data.len()))?;
        let unicode = slice_at(data, pos + 8, bytes)?;
        pos += 8 + bytes;
        if unicode_count > 0 {
            let text = decode_utf16be(unicode);
            let [l0, l1, c0, c1] = language.to_be_bytes();
            if !text.is_empty() {
                result.localized.push(LocalizedText {
                    language: [l0, l1],
                    country: [c0, c1],
                    text,
                });
            }
        }
    }

    if pos < data.len() {
        let _script_code = read_u16(data, pos)?;
        let _count = read_u8(data, pos + 2)?;
        slice_at(data, pos + 3, SCRIPTCODE_LEN)?;
        pos += 3 + SCRIPTCODE_LEN;
    }

    Ok((result, pos))
}

fn decode_mluc(data: &[u8]) -> Result<(TextData, usize)> {
    let record_count = read_u32(data, 8)? as usize;
    let record_size = read_u32(data, 12)? as usize;
    if record_size != MLUC_RECORD_SIZE {
        return Err(Error::inconsistent(format!(
            "mluc record size {}",
            record_size
        )));
    }

    let mut localized = Vec::with_capacity(record_count.min(64));
    let mut end = 16;
    for i in 0..record_count {
        let at = 16 + i * MLUC_RECORD_SIZE;
        let record = slice_at(data, at, MLUC_RECORD_SIZE)?;
        let length = read_u32(record, 4)? as usize;
        let offset = read_u32(record, 8)? as usize;
        let bytes = slice_at(data, offset, length)?;
        end = end.max(at + MLUC_RECORD_SIZE).max(offset + length);

        localized.push(LocalizedText {
            language: [record[0], record[1]],
            country: [record[2], record[3]],
            text: decode_utf16be(bytes),
        });
    }

    let text = localized
        .iter()
        .find(|l| &l.language == b"en" && &l.country == b"US")
        .or_else(|| localized.iter().find(|l| &l.language == b"en"))
        .or_else(|| localized.first())
        .map(|l| l.text.clone())
        .unwrap_or_default();

    Ok((TextData { text, localized }, end))
}

/// UTF-16BE to String, stopping at a NUL. Unpaired surrogates are replaced.
fn decode_utf16be(data: &[u8]) -> String {
    let units: Vec<u16> = data
        .chunks_exact(2)
        .map(|c| u16::from_be_bytes([c[0], c[1]]))
        .take_while(|c| *c != 0)
        .collect();
    String::from_utf16_lossy(&units)
}
