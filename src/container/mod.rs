//! Access to the shader container that carries the RDAT chunk.
//!
//! The runtime data codec itself only deals with the bytes of a single chunk. Locating that
//! chunk inside a compiled shader, and writing a re-encoded chunk back, is delegated to a
//! [`ChunkContainer`]. The crate ships one implementation, [`DxbcContainer`], for the `DXBC`
//! container format emitted by the shader compiler; hosts with their own container handling can
//! implement the trait directly.
//!
//! # Key Components
//!
//! - [`FourCC`] - 4-byte chunk tag
//! - [`ChunkContainer`] - find / replace chunks by tag
//! - [`DxbcContainer`] - owned, validated `DXBC` container
//! - [`RDAT_FOURCC`] - the tag of the runtime data chunk

mod dxbc;

pub use dxbc::DxbcContainer;

use std::fmt;

use crate::Result;

/// A four-character code identifying a chunk inside a shader container.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    /// Builds a tag from its four ASCII bytes.
    #[must_use]
    pub const fn new(bytes: &[u8; 4]) -> Self {
        FourCC(*bytes)
    }

    /// Reads the tag as the little-endian `u32` stored on disk.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        u32::from_le_bytes(self.0)
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCC({self})")
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02x}")?;
            }
        }
        Ok(())
    }
}

/// Tag of the runtime data chunk.
pub const RDAT_FOURCC: FourCC = FourCC::new(b"RDAT");

/// A shader container holding tagged chunks.
///
/// This is the seam between the RDAT codec and whatever owns the compiled shader bytes.
pub trait ChunkContainer {
    /// Returns the payload of the first chunk tagged `fourcc`, or `None` when absent.
    fn find_chunk(&self, fourcc: FourCC) -> Option<&[u8]>;

    /// Replaces the payload of the chunk tagged `fourcc` with `data`, appending a new chunk
    /// when none exists.
    ///
    /// # Errors
    /// Returns an error if the container cannot represent the resulting layout.
    fn replace_chunk(&mut self, fourcc: FourCC, data: &[u8]) -> Result<()>;
}
