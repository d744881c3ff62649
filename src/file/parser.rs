//! Cursor-based byte stream parser for RDAT chunks and DXBC containers.
//!
//! The [`Parser`] keeps a position within a borrowed byte slice and offers bounds-checked,
//! little-endian reads on top of [`crate::file::io`]. It is used to walk the chunk header,
//! the part directory and the part/table headers; record rows themselves are read through
//! [`crate::rdat::RowReadable`].
//!
//! # Usage Examples
//!
//! ```rust,ignore
//! use rdatscope::file::parser::Parser;
//!
//! let data = [0x10, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00];
//! let mut parser = Parser::new(&data);
//!
//! let version = parser.read_le::<u32>()?;
//! let part_count = parser.read_le::<u32>()?;
//! assert_eq!((version, part_count), (0x10, 2));
//! assert!(!parser.has_more_data());
//! # Ok::<(), rdatscope::Error>(())
//! ```

use crate::{
    file::io::{read_le_at, RdatIO},
    Error::OutOfBounds,
    Result,
};

/// A generic binary data parser for reading little-endian structures.
///
/// All operations are bounds-checked; a failed read leaves the position untouched.
pub struct Parser<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new `Parser` from a byte slice, positioned at the first byte.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns the total length of the underlying data.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the underlying data is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check if there is more data available to parse.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Move the current position to the specified index.
    ///
    /// Seeking to exactly the end of the data is allowed.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `pos` is past the end of the data.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(OutOfBounds);
        }

        self.position = pos;
        Ok(())
    }

    /// Move the position forward by the specified number of bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if this would move past the end of the data.
    pub fn advance_by(&mut self, step: usize) -> Result<()> {
        let end = self.calc_end_position(step)?;
        self.position = end;
        Ok(())
    }

    /// Get the current position of the parser within the data.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Get a reference to the complete underlying data.
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Number of bytes left between the current position and the end of the data.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Peek at a value without advancing the position.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if there are not enough bytes left.
    pub fn peek_le<T: RdatIO>(&self) -> Result<T> {
        let mut temp_position = self.position;
        read_le_at::<T>(self.data, &mut temp_position)
    }

    /// Read a value in little-endian byte order and advance past it.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if there are not enough bytes left.
    pub fn read_le<T: RdatIO>(&mut self) -> Result<T> {
        read_le_at::<T>(self.data, &mut self.position)
    }

    /// Read `length` raw bytes and advance past them.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if there are not enough bytes left.
    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        let end = self.calc_end_position(length)?;
        let bytes = &self.data[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    /// Computes `pos() + length`, checking it against the end of the data.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] on overflow or if the end lies past the data.
    pub fn calc_end_position(&self, length: usize) -> Result<usize> {
        match self.position.checked_add(length) {
            Some(end) if end <= self.data.len() => Ok(end),
            _ => Err(OutOfBounds),
        }
    }
}
