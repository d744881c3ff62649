//! Raw-bytes part of an RDAT chunk.
//!
//! Holds opaque byte ranges, in practice only serialised root signatures. Entries are
//! deduplicated by exact content, and the emitted blob is the concatenation of the distinct
//! entries in the order they were first interned.

use crate::{rdat::refs::BytesRef, Error, Result};

/// Opaque byte blob addressed by [`BytesRef`] ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBytes {
    data: Vec<u8>,
    entries: Vec<BytesRef>,
}

impl RawBytes {
    /// Creates an empty blob.
    #[must_use]
    pub fn new() -> Self {
        RawBytes::default()
    }

    /// Replaces the blob contents with an existing raw-bytes part payload.
    pub fn load(&mut self, data: &[u8]) {
        self.data.clear();
        self.data.extend_from_slice(data);
        self.entries.clear();
    }

    /// Returns the bytes covered by `reference`. A null reference is the empty range.
    ///
    /// # Errors
    /// Returns [`crate::Error::DanglingReference`] if the range ends past the blob, or if a null
    /// offset comes with a non-zero size.
    pub fn resolve(&self, reference: BytesRef) -> Result<&[u8]> {
        if reference.is_null() {
            if reference.size != 0 {
                return Err(Error::dangling("raw bytes", reference.offset, self.data.len()));
            }
            return Ok(&[]);
        }

        let start = reference.offset as usize;
        match start.checked_add(reference.size as usize) {
            Some(end) if end <= self.data.len() => Ok(&self.data[start..end]),
            _ => Err(Error::dangling("raw bytes", reference.offset, self.data.len())),
        }
    }

    /// Adds `bytes` to the blob, reusing an earlier identical entry if there is one.
    ///
    /// Empty input yields [`BytesRef::NULL`] without touching the blob.
    pub fn intern(&mut self, bytes: &[u8]) -> BytesRef {
        if bytes.is_empty() {
            return BytesRef::NULL;
        }

        if let Some(existing) = self.entries.iter().find(|entry| {
            let start = entry.offset as usize;
            &self.data[start..start + entry.size as usize] == bytes
        }) {
            return *existing;
        }

        let reference = BytesRef {
            offset: self.data.len() as u32,
            size: bytes.len() as u32,
        };
        self.data.extend_from_slice(bytes);
        self.entries.push(reference);
        reference
    }

    /// The blob bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns `true` if the blob holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
