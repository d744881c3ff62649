//! Owned `DXBC` shader container.
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! magic "DXBC" | hash [u8; 16] | reserved u32 | total_size u32 | chunk_count u32
//! chunk_offsets [u32; chunk_count]
//! per chunk: fourcc [u8; 4] | size u32 | data [u8; size]
//! ```
//!
//! The container is validated once on construction; every chunk range is known to lie within
//! `total_size` afterwards. Replacing a chunk rebuilds the buffer with fresh offsets and a new
//! `total_size`. The hash is carried over unchanged.

use std::ops::Range;

use crate::{
    container::{ChunkContainer, FourCC},
    file::{io::write_le_at, parser::Parser},
    Error, Result,
};

const DXBC_MAGIC: FourCC = FourCC::new(b"DXBC");
const DXBC_HEADER_LEN: usize = 4 + 16 + 4 + 4 + 4;
const CHUNK_HEADER_LEN: usize = 8;
const MAX_CHUNK_COUNT: u32 = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ChunkEntry {
    fourcc: FourCC,
    data: Range<usize>,
}

/// A validated `DXBC` container over an owned byte buffer.
#[derive(Debug, Clone)]
pub struct DxbcContainer {
    bytes: Vec<u8>,
    chunks: Vec<ChunkEntry>,
}

impl DxbcContainer {
    /// Validates `bytes` as a `DXBC` container and takes ownership of them.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the magic is wrong, the declared size exceeds the
    /// buffer, or any chunk offset or size points outside the container.
    pub fn new(bytes: Vec<u8>) -> Result<Self> {
        let chunks = Self::parse_chunks(&bytes)?;
        Ok(DxbcContainer { bytes, chunks })
    }

    fn parse_chunks(bytes: &[u8]) -> Result<Vec<ChunkEntry>> {
        if bytes.len() < DXBC_HEADER_LEN {
            return Err(malformed_error!(
                "DXBC header needs {} bytes, got {}",
                DXBC_HEADER_LEN,
                bytes.len()
            ));
        }

        let mut parser = Parser::new(bytes);
        let magic = FourCC(parser.read_le::<u32>()?.to_le_bytes());
        if magic != DXBC_MAGIC {
            return Err(malformed_error!("Bad container magic {}", magic));
        }

        parser.advance_by(16 + 4)?;
        let total_size = parser.read_le::<u32>()? as usize;
        let chunk_count = parser.read_le::<u32>()?;

        if chunk_count > MAX_CHUNK_COUNT {
            return Err(malformed_error!(
                "Chunk count {} exceeds {}",
                chunk_count,
                MAX_CHUNK_COUNT
            ));
        }
        if total_size < DXBC_HEADER_LEN || total_size > bytes.len() {
            return Err(malformed_error!(
                "Declared total size {} does not fit buffer of {} bytes",
                total_size,
                bytes.len()
            ));
        }

        let table_end = DXBC_HEADER_LEN + chunk_count as usize * 4;
        if table_end > total_size {
            return Err(malformed_error!(
                "Chunk offset table ends at {} past total size {}",
                table_end,
                total_size
            ));
        }

        let mut parser = Parser::new(&bytes[..total_size]);
        parser.seek(DXBC_HEADER_LEN)?;

        let mut chunks = Vec::with_capacity(chunk_count as usize);
        for index in 0..chunk_count {
            let offset = parser.read_le::<u32>()? as usize;
            if offset < table_end {
                return Err(malformed_error!(
                    "Chunk {} offset {} points into the container header",
                    index,
                    offset
                ));
            }

            let mut chunk = Parser::new(parser.data());
            if chunk.seek(offset).is_err() || chunk.remaining() < CHUNK_HEADER_LEN {
                return Err(malformed_error!(
                    "Chunk {} header at {} is outside the container",
                    index,
                    offset
                ));
            }

            let fourcc = FourCC(chunk.read_le::<u32>()?.to_le_bytes());
            let size = chunk.read_le::<u32>()? as usize;
            let start = chunk.pos();
            if chunk.advance_by(size).is_err() {
                return Err(malformed_error!(
                    "Chunk {} ({}) of {} bytes runs past the container",
                    index,
                    fourcc,
                    size
                ));
            }

            chunks.push(ChunkEntry {
                fourcc,
                data: start..start + size,
            });
        }

        Ok(chunks)
    }

    /// Iterates over all chunks in offset-table order.
    pub fn chunks(&self) -> impl Iterator<Item = (FourCC, &[u8])> {
        self.chunks
            .iter()
            .map(|entry| (entry.fourcc, &self.bytes[entry.data.clone()]))
    }

    /// Number of chunks in the container.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// The 16-byte hash stored in the header.
    #[must_use]
    pub fn hash(&self) -> [u8; 16] {
        let mut hash = [0u8; 16];
        hash.copy_from_slice(&self.bytes[4..20]);
        hash
    }

    /// The container bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the container, returning its bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    fn rebuild(&self, chunks: &[(FourCC, &[u8])]) -> Result<Vec<u8>> {
        let table_end = DXBC_HEADER_LEN + chunks.len() * 4;
        let total_size = chunks
            .iter()
            .fold(table_end, |acc, (_, data)| acc + CHUNK_HEADER_LEN + data.len());
        let Ok(total_size_u32) = u32::try_from(total_size) else {
            return Err(Error::NotSupported);
        };

        let mut out = vec![0u8; total_size];
        // magic, hash and reserved word are carried over
        out[..24].copy_from_slice(&self.bytes[..24]);

        let mut offset = 24;
        write_le_at(&mut out, &mut offset, total_size_u32)?;
        write_le_at(&mut out, &mut offset, chunks.len() as u32)?;

        let mut chunk_offset = table_end;
        for (fourcc, data) in chunks {
            write_le_at(&mut out, &mut offset, chunk_offset as u32)?;

            let mut cursor = chunk_offset;
            write_le_at(&mut out, &mut cursor, fourcc.as_u32())?;
            write_le_at(&mut out, &mut cursor, data.len() as u32)?;
            out[cursor..cursor + data.len()].copy_from_slice(data);

            chunk_offset = cursor + data.len();
        }

        Ok(out)
    }
}

impl ChunkContainer for DxbcContainer {
    fn find_chunk(&self, fourcc: FourCC) -> Option<&[u8]> {
        self.chunks
            .iter()
            .find(|entry| entry.fourcc == fourcc)
            .map(|entry| &self.bytes[entry.data.clone()])
    }

    fn replace_chunk(&mut self, fourcc: FourCC, data: &[u8]) -> Result<()> {
        let mut layout: Vec<(FourCC, &[u8])> = self.chunks().collect();
        match layout.iter_mut().find(|(tag, _)| *tag == fourcc) {
            Some(slot) => slot.1 = data,
            None => layout.push((fourcc, data)),
        }

        let bytes = self.rebuild(&layout)?;
        let chunks = Self::parse_chunks(&bytes)?;

        self.bytes = bytes;
        self.chunks = chunks;
        Ok(())
    }
}
