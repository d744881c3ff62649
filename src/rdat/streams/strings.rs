//! String buffer part of an RDAT chunk.
//!
//! The buffer is a sequence of NUL-terminated UTF-8 strings. A [`StringRef`] is the byte offset
//! of the first character; the buffer always starts with a single NUL, so offset 0 is the empty
//! string.
//!
//! # Examples
//!
//! ```rust
//! use rdatscope::rdat::streams::StringBuffer;
//!
//! let mut strings = StringBuffer::new(true);
//! let main = strings.intern("main");
//! assert_eq!(strings.intern("main"), main);
//! assert_eq!(strings.resolve(main)?, "main");
//! assert_eq!(strings.as_bytes(), b"\0main\0");
//! # Ok::<(), rdatscope::Error>(())
//! ```

use std::ffi::CStr;

use crate::{rdat::refs::StringRef, Error, Result};

/// NUL-terminated string blob, loaded verbatim on decode and built by interning on encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringBuffer {
    data: Vec<u8>,
    dedup: bool,
}

impl Default for StringBuffer {
    fn default() -> Self {
        StringBuffer::new(true)
    }
}

impl StringBuffer {
    /// Creates a buffer holding only the leading empty string.
    ///
    /// With `dedup` set, [`StringBuffer::intern`] returns the offset of an existing identical
    /// entry instead of appending a copy.
    #[must_use]
    pub fn new(dedup: bool) -> Self {
        StringBuffer {
            data: vec![0],
            dedup,
        }
    }

    /// Replaces the buffer contents with an existing string blob.
    pub fn load(&mut self, data: &[u8]) {
        self.data.clear();
        self.data.extend_from_slice(data);
    }

    /// Returns the string starting at `reference`.
    ///
    /// # Errors
    /// Returns [`crate::Error::DanglingReference`] if the offset lies outside the buffer and
    /// [`crate::Error::Malformed`] if no terminator follows it or the bytes are not UTF-8.
    pub fn resolve(&self, reference: StringRef) -> Result<&str> {
        let offset = reference.0 as usize;
        if offset >= self.data.len() {
            // an unloaded buffer still resolves the empty string
            if offset == 0 {
                return Ok("");
            }
            return Err(Error::dangling("string", reference.0, self.data.len()));
        }

        match CStr::from_bytes_until_nul(&self.data[offset..]) {
            Ok(result) => match result.to_str() {
                Ok(result) => Ok(result),
                Err(_) => Err(malformed_error!("Invalid string at offset - {}", offset)),
            },
            Err(_) => Err(malformed_error!(
                "Unterminated string at offset - {}",
                offset
            )),
        }
    }

    /// Adds `text` to the buffer, returning its offset.
    ///
    /// Deduplication only matches whole entries, walking the buffer from the start one
    /// terminator at a time. A string that only occurs as the tail of a longer entry is appended.
    pub fn intern(&mut self, text: &str) -> StringRef {
        if self.dedup {
            let mut offset = 0;
            for entry in self.data.split(|&b| b == 0) {
                if offset >= self.data.len() {
                    break;
                }
                if entry == text.as_bytes() {
                    return StringRef(offset as u32);
                }
                offset += entry.len() + 1;
            }
        }

        let offset = self.data.len() as u32;
        self.data.extend_from_slice(text.as_bytes());
        self.data.push(0);
        StringRef(offset)
    }

    /// The raw buffer bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Size of the buffer in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer holds no bytes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
