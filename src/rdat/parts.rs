//! Part framing for RDAT chunks.
//!
//! A chunk is a small header followed by a directory of self-describing parts:
//!
//! ```text
//! chunk:  version u32 | part_count u32 | part_offsets [u32; part_count] | parts...
//! part:   kind u32    | size u32       | payload [u8; size]
//! table:  count u32   | stride u32     | records [u8; count * stride]   (payload of table parts)
//! ```
//!
//! Part offsets are relative to the start of the chunk. Payload sizes are padded to four bytes,
//! and for table parts the size includes the table header. Empty parts are never written.
//!
//! Reading goes through [`read_directory`], which bounds-checks every part against the chunk
//! and hands out [`Part`] views; record tables are then read through [`RecordTable`]. Writing
//! goes through [`PartWriter`], which collects framed parts and prepends the directory in
//! [`PartWriter::finish`].

use std::marker::PhantomData;

use strum::{EnumCount, EnumIter, IntoEnumIterator};

use crate::{
    file::{
        io::{align_up4, write_le_at},
        parser::Parser,
    },
    rdat::RDAT_VERSION_1_0,
    Error, Result,
};

/// Size of a part header (`kind`, `size`).
pub const PART_HEADER_SIZE: usize = 8;
/// Size of a table header (`count`, `stride`).
pub const TABLE_HEADER_SIZE: usize = 8;

/// Identifies the content of an RDAT part.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, EnumIter, EnumCount)]
pub enum PartKind {
    /// Placeholder kind, never emitted.
    Invalid = 0,
    /// NUL-terminated string blob.
    StringBuffer = 1,
    /// Length-prefixed `u32` array blob.
    IndexArrays = 2,
    /// Table of resource records.
    ResourceTable = 3,
    /// Table of function records.
    FunctionTable = 4,
    /// Opaque byte blob.
    RawBytes = 5,
    /// Table of subobject records.
    SubobjectTable = 6,
}

impl PartKind {
    /// Maps a wire value to a known part kind.
    #[must_use]
    pub fn from_u32(value: u32) -> Option<PartKind> {
        PartKind::iter().find(|kind| *kind as u32 == value)
    }

    /// Returns `true` for the three blob parts resolved before any table is read.
    #[must_use]
    pub fn is_blob(self) -> bool {
        matches!(
            self,
            PartKind::StringBuffer | PartKind::IndexArrays | PartKind::RawBytes
        )
    }
}

impl std::fmt::Display for PartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PartKind::Invalid => "Invalid",
            PartKind::StringBuffer => "StringBuffer",
            PartKind::IndexArrays => "IndexArrays",
            PartKind::ResourceTable => "ResourceTable",
            PartKind::FunctionTable => "FunctionTable",
            PartKind::RawBytes => "RawBytes",
            PartKind::SubobjectTable => "SubobjectTable",
        };
        write!(f, "{name}")
    }
}

/// Trait for fixed-size records read from a table part.
pub trait RowReadable: Sized {
    /// Size of one record on the wire.
    fn row_size() -> u32;

    /// Reads one record at `offset`, advancing it past the fields read.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the record does not fit in `data`.
    fn row_read(data: &[u8], offset: &mut usize) -> Result<Self>;
}

/// Trait for fixed-size records written into a table part.
pub trait RowWritable: RowReadable {
    /// Writes one record at `offset`, advancing it by [`RowReadable::row_size`].
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the record does not fit in `data`.
    fn row_write(&self, data: &mut [u8], offset: &mut usize) -> Result<()>;
}

/// One entry of the part directory.
#[derive(Debug, Clone, Copy)]
pub struct Part<'a> {
    /// Position of the part in the directory
    pub index: u32,
    /// Byte offset of the part header within the chunk
    pub offset: usize,
    /// Raw kind value
    pub raw_kind: u32,
    /// Payload following the part header
    pub data: &'a [u8],
}

impl<'a> Part<'a> {
    /// The kind of this part, if it is one the codec knows.
    #[must_use]
    pub fn kind(&self) -> Option<PartKind> {
        PartKind::from_u32(self.raw_kind)
    }

    /// Reads the table header of a table part.
    ///
    /// # Errors
    /// Returns [`crate::Error::MalformedDirectory`] if the payload cannot hold the header or
    /// the declared records.
    pub fn table_header(&self) -> Result<TableHeader> {
        let mut parser = Parser::new(self.data);
        let (Ok(count), Ok(stride)) = (parser.read_le::<u32>(), parser.read_le::<u32>()) else {
            return Err(Error::directory(format!(
                "part {} is too small for a table header",
                self.index
            )));
        };

        let fits = (count as usize)
            .checked_mul(stride as usize)
            .is_some_and(|size| size <= parser.remaining());
        if !fits {
            return Err(Error::directory(format!(
                "part {} declares {} records of {} bytes in {} bytes",
                self.index,
                count,
                stride,
                parser.remaining()
            )));
        }

        Ok(TableHeader { count, stride })
    }

    /// Interprets this part as a table of `T` records.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnexpectedStride`] if the declared stride is not the size of
    /// `T`, or the errors of [`Part::table_header`].
    pub fn table<T: RowReadable>(&self) -> Result<RecordTable<'a, T>> {
        let header = self.table_header()?;
        if header.stride != T::row_size() {
            return Err(Error::UnexpectedStride {
                part: self.kind().unwrap_or(PartKind::Invalid),
                stride: header.stride,
            });
        }

        Ok(RecordTable {
            data: &self.data[TABLE_HEADER_SIZE..],
            row_count: header.count,
            row_size: header.stride,
            _phantom: PhantomData,
        })
    }
}

/// Header of a table part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableHeader {
    /// Number of records
    pub count: u32,
    /// Distance between consecutive records
    pub stride: u32,
}

/// Reads the chunk header and part directory.
///
/// # Errors
/// - [`crate::Error::MalformedDirectory`] if the header, directory or any part lies outside
///   the chunk
/// - [`crate::Error::UnsupportedVersion`] if the version tag is not [`RDAT_VERSION_1_0`]
pub fn read_directory(chunk: &[u8]) -> Result<Vec<Part<'_>>> {
    let mut parser = Parser::new(chunk);
    let Ok(version) = parser.read_le::<u32>() else {
        return Err(Error::directory("chunk too small for a version tag"));
    };
    if version != RDAT_VERSION_1_0 {
        return Err(Error::UnsupportedVersion(version));
    }

    let Ok(part_count) = parser.read_le::<u32>() else {
        return Err(Error::directory("chunk too small for a part count"));
    };
    if (part_count as usize).saturating_mul(4) > parser.remaining() {
        return Err(Error::directory(format!(
            "{} part offsets do not fit in {} bytes",
            part_count,
            chunk.len()
        )));
    }

    let mut parts = Vec::with_capacity(part_count as usize);
    for index in 0..part_count {
        let offset = parser.read_le::<u32>()? as usize;

        let mut part = Parser::new(chunk);
        if part.seek(offset).is_err() || part.remaining() < PART_HEADER_SIZE {
            return Err(Error::directory(format!(
                "part {} header at {:#x} is outside the chunk",
                index, offset
            )));
        }

        let raw_kind = part.read_le::<u32>()?;
        let size = part.read_le::<u32>()? as usize;
        let Ok(data) = part.read_bytes(size) else {
            return Err(Error::directory(format!(
                "part {} at {:#x} declares {} bytes past the end of the chunk",
                index, offset, size
            )));
        };

        parts.push(Part {
            index,
            offset,
            raw_kind,
            data,
        });
    }

    Ok(parts)
}

/// A read-only view of the records of one table part.
pub struct RecordTable<'a, T> {
    data: &'a [u8],
    row_count: u32,
    row_size: u32,
    _phantom: PhantomData<T>,
}

impl<'a, T: RowReadable> RecordTable<'a, T> {
    /// Number of records.
    #[must_use]
    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Size of one record.
    #[must_use]
    pub fn row_size(&self) -> u32 {
        self.row_size
    }

    /// Reads the record at `index`, counting from zero.
    #[must_use]
    pub fn get(&self, index: u32) -> Option<T> {
        if index >= self.row_count {
            return None;
        }

        T::row_read(self.data, &mut (index as usize * self.row_size as usize)).ok()
    }

    /// Iterates over all records in table order.
    #[must_use]
    pub fn iter(&self) -> TableIterator<'a, T> {
        TableIterator {
            data: self.data,
            row_count: self.row_count,
            row_size: self.row_size,
            current_row: 0,
            _phantom: PhantomData,
        }
    }
}

impl<'a, T: RowReadable> IntoIterator for &RecordTable<'a, T> {
    type Item = T;
    type IntoIter = TableIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the records of a [`RecordTable`].
pub struct TableIterator<'a, T> {
    data: &'a [u8],
    row_count: u32,
    row_size: u32,
    current_row: u32,
    _phantom: PhantomData<T>,
}

impl<T: RowReadable> Iterator for TableIterator<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row >= self.row_count {
            return None;
        }

        let mut offset = self.current_row as usize * self.row_size as usize;
        let row = T::row_read(self.data, &mut offset).ok()?;
        self.current_row += 1;
        Some(row)
    }
}

/// Collects framed parts and produces the finished chunk.
#[derive(Debug, Default)]
pub struct PartWriter {
    parts: Vec<Vec<u8>>,
}

impl PartWriter {
    /// Creates a writer with no parts.
    #[must_use]
    pub fn new() -> Self {
        PartWriter::default()
    }

    /// Frames `payload` as a part of kind `kind`. Nothing is written for an empty payload.
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] if the payload does not fit a `u32` size.
    pub fn write_part(&mut self, kind: PartKind, payload: &[u8]) -> Result<()> {
        if payload.is_empty() {
            return Ok(());
        }

        let aligned_size = align_up4(payload.len());
        let Ok(size) = u32::try_from(aligned_size) else {
            return Err(Error::NotSupported);
        };

        let mut part = vec![0u8; PART_HEADER_SIZE + aligned_size];
        let mut offset = 0;
        write_le_at(&mut part, &mut offset, kind as u32)?;
        write_le_at(&mut part, &mut offset, size)?;
        part[offset..offset + payload.len()].copy_from_slice(payload);

        self.parts.push(part);
        Ok(())
    }

    /// Frames `records` as a table part of kind `kind`. Nothing is written for an empty table.
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] if the table does not fit a `u32` size, or the
    /// errors of [`RowWritable::row_write`].
    pub fn write_table_part<T: RowWritable>(&mut self, kind: PartKind, records: &[T]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let row_size = T::row_size() as usize;
        let stride = align_up4(row_size);
        let records_size = align_up4(records.len() * stride);
        let (Ok(count), Ok(size)) = (
            u32::try_from(records.len()),
            u32::try_from(records_size + TABLE_HEADER_SIZE),
        ) else {
            return Err(Error::NotSupported);
        };

        let mut part = vec![0u8; PART_HEADER_SIZE + TABLE_HEADER_SIZE + records_size];
        let mut offset = 0;
        write_le_at(&mut part, &mut offset, kind as u32)?;
        write_le_at(&mut part, &mut offset, size)?;
        write_le_at(&mut part, &mut offset, count)?;
        write_le_at(&mut part, &mut offset, stride as u32)?;

        for record in records {
            let mut row_offset = offset;
            record.row_write(&mut part, &mut row_offset)?;
            offset += stride;
        }

        self.parts.push(part);
        Ok(())
    }

    /// Number of parts written so far.
    #[must_use]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Prepends the chunk header and part directory and returns the chunk bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] if the chunk does not fit `u32` offsets.
    pub fn finish(self) -> Result<Vec<u8>> {
        let header_size = 4 + 4 + 4 * self.parts.len();
        let total_size = self
            .parts
            .iter()
            .fold(header_size, |acc, part| acc + part.len());
        let (Ok(_), Ok(part_count)) = (u32::try_from(total_size), u32::try_from(self.parts.len()))
        else {
            return Err(Error::NotSupported);
        };

        let mut chunk = vec![0u8; total_size];
        let mut offset = 0;
        write_le_at(&mut chunk, &mut offset, RDAT_VERSION_1_0)?;
        write_le_at(&mut chunk, &mut offset, part_count)?;

        let mut part_offset = header_size;
        for part in &self.parts {
            write_le_at(&mut chunk, &mut offset, part_offset as u32)?;
            chunk[part_offset..part_offset + part.len()].copy_from_slice(part);
            part_offset += part.len();
        }

        Ok(chunk)
    }
}
