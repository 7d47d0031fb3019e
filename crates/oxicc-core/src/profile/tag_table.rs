//! Tag directory and decode cache
//!
//! The directory maps each signature to a byte range of the profile.
//! Tags are decoded on first request and the result, success or error, is
//! cached under the byte range, so signatures that alias the same bytes
//! (R/G/B TRCs sharing one curve, for instance) decode once.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{Error, Result};
use crate::icc::tags::{TagValue, decode_tag};
use crate::icc::types::{Signature, read_signature, read_u32};
use crate::icc::HEADER_SIZE;

/// Size of one directory entry: signature, offset, length
const ENTRY_SIZE: usize = 12;

/// Location of one tag inside the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagEntry {
    pub offset: u32,
    pub len: u32,
}

/// Directory plus per-range decode cache
#[derive(Debug)]
pub(crate) struct TagTable {
    entries: HashMap<Signature, TagEntry>,
    /// Directory order, for iteration
    order: Vec<Signature>,
    cache: Mutex<HashMap<TagEntry, Result<Arc<TagValue>>>>,
}

impl TagTable {
    /// Read the tag count at offset 128 and the entries that follow
    pub(crate) fn parse(data: &[u8]) -> Result<Self> {
        let count = read_u32(data, HEADER_SIZE)? as usize;
        let table_start = HEADER_SIZE + 4;
        let needed = count
            .checked_mul(ENTRY_SIZE)
            .and_then(|n| n.checked_add(table_start))
            .ok_or_else(|| Error::inconsistent(format!("tag count {} overflows", count)))?;
        if data.len() < needed {
            return Err(Error::too_short(needed, data.len()));
        }

        let mut entries = HashMap::with_capacity(count);
        let mut order = Vec::with_capacity(count);
        for i in 0..count {
            let at = table_start + i * ENTRY_SIZE;
            let signature = read_signature(data, at)?;
            let entry = TagEntry {
                offset: read_u32(data, at + 4)?,
                len: read_u32(data, at + 8)?,
            };
            // Last duplicate wins
            if entries.insert(signature, entry).is_some() {
                tracing::warn!(%signature, "Duplicate tag directory entry, keeping the last");
            } else {
                order.push(signature);
            }
        }
        tracing::trace!(count, unique = order.len(), "Parsed tag directory");

        Ok(Self {
            entries,
            order,
            cache: Mutex::new(HashMap::new()),
        })
    }

    pub(crate) fn contains(&self, signature: Signature) -> bool {
        self.entries.contains_key(&signature)
    }

    pub(crate) fn entry(&self, signature: Signature) -> Option<TagEntry> {
        self.entries.get(&signature).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn signatures(&self) -> impl Iterator<Item = Signature> + '_ {
        self.order.iter().copied()
    }

    /// Decoded value of a tag, computing it at most once per byte range
    ///
    /// The lock is held across the decode so concurrent callers asking
    /// for the same range all see the one cached result.
    pub(crate) fn get(&self, data: &[u8], signature: Signature) -> Result<Arc<TagValue>> {
        let entry = self.entry(signature).ok_or(Error::NotFound(signature))?;

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = cache.get(&entry) {
            tracing::trace!(%signature, "Tag cache hit");
            return cached.clone();
        }

        tracing::trace!(%signature, offset = entry.offset, len = entry.len, "Tag cache miss");
        let result = Self::body(data, entry)
            .and_then(decode_tag)
            .map(|(value, _)| Arc::new(value));
        if let Err(err) = &result {
            tracing::debug!(%signature, %err, "Tag failed to decode");
        }
        cache.insert(entry, result.clone());
        result
    }

    /// Bytes of one tag, checked against the profile length
    fn body(data: &[u8], entry: TagEntry) -> Result<&[u8]> {
        let start = entry.offset as usize;
        let end = start.saturating_add(entry.len as usize);
        data.get(start..end)
            .ok_or_else(|| Error::too_short(end, data.len()))
    }

    #[cfg(test)]
    pub(crate) fn cached_len(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
