//! Offset references into the shared RDAT blobs.
//!
//! Records never own their strings or arrays. They store a byte offset into the string buffer or
//! the raw-bytes blob, or a word index into the index-array blob, and those are resolved against
//! the owning stream by [`crate::rdat::streams`]. Each reference kind is a distinct newtype so an
//! index-array offset can never be resolved against the string buffer by accident.

/// Sentinel marking an absent reference.
pub const NULL_REF: u32 = 0xFFFF_FFFF;

/// Byte offset into the string buffer.
///
/// Offset 0 always resolves to the empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StringRef(pub u32);

impl StringRef {
    /// The absent string.
    pub const NULL: StringRef = StringRef(NULL_REF);

    /// Returns `true` if this is the null sentinel.
    #[must_use]
    pub fn is_null(self) -> bool {
        self.0 == NULL_REF
    }
}

/// Word index into the index-array blob.
///
/// Points at the length word of a length-prefixed array, not at a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexArrayRef(pub u32);

impl IndexArrayRef {
    /// The null / empty array.
    pub const NULL: IndexArrayRef = IndexArrayRef(NULL_REF);

    /// Returns `true` if this is the null sentinel.
    #[must_use]
    pub fn is_null(self) -> bool {
        self.0 == NULL_REF
    }
}

impl Default for IndexArrayRef {
    fn default() -> Self {
        IndexArrayRef::NULL
    }
}

/// Byte range within the raw-bytes blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BytesRef {
    /// Start of the range, or [`NULL_REF`] for an empty range
    pub offset: u32,
    /// Length of the range in bytes
    pub size: u32,
}

impl BytesRef {
    /// The empty range.
    pub const NULL: BytesRef = BytesRef {
        offset: NULL_REF,
        size: 0,
    };

    /// Returns `true` if this is the null sentinel.
    #[must_use]
    pub fn is_null(self) -> bool {
        self.offset == NULL_REF
    }
}

impl Default for BytesRef {
    fn default() -> Self {
        BytesRef::NULL
    }
}
