//! Index-array part of an RDAT chunk.
//!
//! A flat blob of little-endian `u32` words holding many small integer arrays: resource
//! positions, string offsets of dependencies and exports. An [`IndexArrayRef`] is the *word*
//! position of an array within the blob.
//!
//! How an array is delimited depends on the [`ArrayLayout`] the blob was built with:
//!
//! - [`LengthPrefixed`] stores `[len, e0, e1, ...]` and references point at the length word.
//!   Deduplication requires an exact length match.
//! - [`RunToEnd`] stores bare elements; an array runs from its reference to the end of the blob.
//!   Deduplication accepts any position whose following words start with the requested values.
//!   A reference must name an existing word, so an empty run cannot be addressed.
//!
//! RDAT chunks use [`LengthPrefixed`]. [`RunToEnd`] is only meaningful while a blob is being
//! built, since appending changes the extent of every earlier array.

use std::marker::PhantomData;

use crate::{
    file::io::read_le_at,
    rdat::refs::{IndexArrayRef, NULL_REF},
    Error, Result,
};

/// Addressing strategy for arrays stored in an [`IndexArrays`] blob.
pub trait ArrayLayout {
    /// Returns the elements of the array starting at word `offset`, or `None` if the array
    /// does not fit in `words`.
    fn span(words: &[u32], offset: usize) -> Option<&[u32]>;

    /// Returns the word offset of an existing array that can stand in for `values`.
    fn find(words: &[u32], values: &[u32]) -> Option<usize>;

    /// Appends `values` to `words`, returning the word offset of the new array.
    fn append(words: &mut Vec<u32>, values: &[u32]) -> usize;
}

/// Arrays stored as a length word followed by the elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LengthPrefixed;

impl ArrayLayout for LengthPrefixed {
    fn span(words: &[u32], offset: usize) -> Option<&[u32]> {
        let len = *words.get(offset)? as usize;
        let start = offset + 1;
        words.get(start..start.checked_add(len)?)
    }

    fn find(words: &[u32], values: &[u32]) -> Option<usize> {
        let mut offset = 0;
        while offset < words.len() {
            let elements = Self::span(words, offset)?;
            if elements == values {
                return Some(offset);
            }
            offset += 1 + elements.len();
        }
        None
    }

    fn append(words: &mut Vec<u32>, values: &[u32]) -> usize {
        let offset = words.len();
        words.push(values.len() as u32);
        words.extend_from_slice(values);
        offset
    }
}

/// Arrays stored as bare elements running to the end of the blob.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunToEnd;

impl ArrayLayout for RunToEnd {
    fn span(words: &[u32], offset: usize) -> Option<&[u32]> {
        if offset >= words.len() {
            return None;
        }
        words.get(offset..)
    }

    fn find(words: &[u32], values: &[u32]) -> Option<usize> {
        (0..words.len()).find(|&offset| words[offset..].starts_with(values))
    }

    fn append(words: &mut Vec<u32>, values: &[u32]) -> usize {
        let offset = words.len();
        words.extend_from_slice(values);
        offset
    }
}

/// Blob of `u32` index arrays using layout `L`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexArrays<L: ArrayLayout = LengthPrefixed> {
    words: Vec<u32>,
    dedup: bool,
    _layout: PhantomData<L>,
}

impl<L: ArrayLayout> Default for IndexArrays<L> {
    fn default() -> Self {
        IndexArrays::new(true)
    }
}

impl<L: ArrayLayout> IndexArrays<L> {
    /// Creates an empty blob.
    #[must_use]
    pub fn new(dedup: bool) -> Self {
        IndexArrays {
            words: Vec::new(),
            dedup,
            _layout: PhantomData,
        }
    }

    /// Replaces the blob contents with the words in `data`. Trailing bytes that do not form a
    /// whole word are ignored.
    ///
    /// # Errors
    /// Only fails if the word reader does, which cannot happen for whole words.
    pub fn load(&mut self, data: &[u8]) -> Result<()> {
        self.words.clear();
        self.words.reserve(data.len() / 4);

        let mut offset = 0;
        while offset + 4 <= data.len() {
            self.words.push(read_le_at::<u32>(data, &mut offset)?);
        }
        Ok(())
    }

    /// Returns the array at `reference`.
    ///
    /// # Errors
    /// Returns [`crate::Error::DanglingReference`] if the reference is null or the array does
    /// not fit in the blob.
    pub fn span(&self, reference: IndexArrayRef) -> Result<&[u32]> {
        if reference.0 == NULL_REF {
            return Err(Error::dangling("index array", reference.0, self.words.len()));
        }

        L::span(&self.words, reference.0 as usize)
            .ok_or_else(|| Error::dangling("index array", reference.0, self.words.len()))
    }

    /// Adds `values` to the blob, returning a reference to it.
    ///
    /// An empty `values` with `empty_is_null` set yields [`IndexArrayRef::NULL`] and leaves the
    /// blob untouched.
    pub fn intern(&mut self, values: &[u32], empty_is_null: bool) -> IndexArrayRef {
        if empty_is_null && values.is_empty() {
            return IndexArrayRef::NULL;
        }

        if self.dedup {
            if let Some(offset) = L::find(&self.words, values) {
                return IndexArrayRef(offset as u32);
            }
        }

        IndexArrayRef(L::append(&mut self.words, values) as u32)
    }

    /// The blob as words.
    #[must_use]
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// The blob serialised as little-endian bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    /// Returns `true` if the blob holds no words.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
