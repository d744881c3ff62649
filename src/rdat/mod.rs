//! The DXIL runtime data (RDAT) chunk.
//!
//! RDAT describes the resources, functions and state-object subobjects of a compiled shader
//! library so a runtime can link and bind it without parsing the DXIL module itself. The chunk
//! is a versioned directory of parts: three blobs (a string buffer, an index-array pool and a
//! raw byte pool) and three record tables that point into them.
//!
//! # Architecture
//!
//! - [`parts`] - chunk header, part directory, record tables and the part writer
//! - [`streams`] - the three blobs and their interning tables
//! - [`records`] - resource, function and subobject records in raw and resolved form
//! - [`decoder`] / [`encoder`] - the two directions of the codec
//!
//! [`RuntimeData`] is the resolved, reference-free view: names are owned strings, resource
//! uses are `(class, id)` pairs and root signatures are owned byte vectors.
//!
//! # Examples
//!
//! ```rust
//! use rdatscope::{Diagnostics, RuntimeData};
//!
//! let rdat = RuntimeData::default();
//! let chunk = rdat.encode()?;
//!
//! let diagnostics = Diagnostics::new();
//! let decoded = RuntimeData::decode(&chunk, &diagnostics)?;
//! assert_eq!(decoded, rdat);
//! # Ok::<(), rdatscope::Error>(())
//! ```

pub mod decoder;
pub mod encoder;
pub mod parts;
pub mod records;
pub mod refs;
pub mod streams;

pub use parts::{PartKind, RowReadable, RowWritable};
pub use records::*;
pub use refs::{BytesRef, IndexArrayRef, StringRef, NULL_REF};

use crate::{
    container::{ChunkContainer, RDAT_FOURCC},
    diagnostics::Diagnostics,
    rdat::{decoder::Decoder, encoder::Encoder},
    Result,
};

/// The only RDAT version tag this crate reads and writes.
pub const RDAT_VERSION_1_0: u32 = 0x10;

/// The decoded content of an RDAT chunk.
///
/// The order of every list is significant: functions refer to resources by position and the
/// encoder interns strings in list order, so keeping the order is what makes re-encoding
/// reproduce compiler output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuntimeData {
    /// Resources, in resource table order
    pub resources: Vec<ResourceInfo>,
    /// Record layout of the function table
    pub function_version: FunctionInfoVersion,
    /// Functions, in function table order
    pub functions: Vec<FunctionInfo>,
    /// Subobjects of known kinds, in subobject table order
    pub subobjects: Vec<SubobjectInfo>,
}

impl RuntimeData {
    /// Decodes an RDAT chunk.
    ///
    /// Parts and subobjects the codec does not understand are skipped and reported as warnings
    /// to `diagnostics`.
    ///
    /// # Errors
    /// Returns an error if the chunk is not version 1.0 RDAT, is structurally damaged, or holds
    /// a reference that does not resolve. See [`Decoder::decode`].
    pub fn decode(chunk: &[u8], diagnostics: &Diagnostics) -> Result<RuntimeData> {
        Decoder::new(chunk, diagnostics).decode()
    }

    /// Encodes this runtime data as an RDAT chunk.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnresolvableResourceReference`] if a function uses a
    /// `(class, id)` pair that no resource declares, and [`crate::Error::NotSupported`] for a
    /// legacy raytracing pipeline config with flags set.
    pub fn encode(&self) -> Result<Vec<u8>> {
        Encoder::new(self).encode()
    }

    /// Locates and decodes the RDAT chunk of `container`.
    ///
    /// Returns `Ok(None)` if the container has no RDAT chunk, or an empty one.
    ///
    /// # Errors
    /// Returns the errors of [`RuntimeData::decode`] for a chunk that is present.
    pub fn from_container<C: ChunkContainer>(
        container: &C,
        diagnostics: &Diagnostics,
    ) -> Result<Option<RuntimeData>> {
        match container.find_chunk(RDAT_FOURCC) {
            Some(chunk) if !chunk.is_empty() => RuntimeData::decode(chunk, diagnostics).map(Some),
            _ => Ok(None),
        }
    }

    /// Encodes this runtime data and stores it as the RDAT chunk of `container`, replacing an
    /// existing one.
    ///
    /// # Errors
    /// Returns the errors of [`RuntimeData::encode`] or of the container.
    pub fn write_to_container<C: ChunkContainer>(&self, container: &mut C) -> Result<()> {
        let chunk = self.encode()?;
        container.replace_chunk(RDAT_FOURCC, &chunk)
    }

    /// Returns `true` if there is nothing to encode.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty() && self.functions.is_empty() && self.subobjects.is_empty()
    }

    /// Finds a function by mangled name.
    #[must_use]
    pub fn function(&self, name: &str) -> Option<&FunctionInfo> {
        self.functions.iter().find(|function| function.name == name)
    }

    /// Finds the resource a function's `(class, id)` binding refers to.
    #[must_use]
    pub fn resource(&self, binding: ResourceBinding) -> Option<&ResourceInfo> {
        self.resources
            .iter()
            .find(|res| {
                res.class.normalized() == binding.class.normalized() && res.linear_id == binding.id
            })
    }
}
