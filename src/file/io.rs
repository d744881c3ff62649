//! Low-level little-endian reading and writing utilities for RDAT chunks and their containers.
//!
//! Every integer in a DXBC container and in the RDAT chunk inside it is stored little-endian.
//! This module provides the bounds-checked primitives the rest of the crate is built on:
//!
//! - [`RdatIO`] - Trait mapping a primitive integer to its fixed-size byte representation
//! - [`read_le`] - Read a value from the start of a buffer
//! - [`read_le_at`] - Read a value at an offset and advance the offset
//! - [`write_le_at`] - Write a value at an offset and advance the offset
//! - [`align_up4`] - Round a size up to the 4-byte granularity every RDAT part uses
//!
//! # Usage Examples
//!
//! ```rust,ignore
//! use rdatscope::file::io::{read_le_at, write_le_at};
//!
//! let mut data = [0u8; 6];
//! let mut offset = 0;
//! write_le_at(&mut data, &mut offset, 0x10u32)?;
//! write_le_at(&mut data, &mut offset, 2u16)?;
//! assert_eq!(offset, 6);
//!
//! offset = 0;
//! let version: u32 = read_le_at(&data, &mut offset)?;
//! let count: u16 = read_le_at(&data, &mut offset)?;
//! assert_eq!((version, count), (0x10, 2));
//! # Ok::<(), rdatscope::Error>(())
//! ```
//!
//! # Error Handling
//!
//! All functions return [`crate::Error::OutOfBounds`] if the buffer is too short to complete
//! the operation; no partial value is read or written in that case.

use crate::{Error::OutOfBounds, Result};

/// Trait for implementing type-specific safe binary data reading and writing operations.
///
/// Each implementation defines a `Bytes` associated type holding the fixed-size byte array
/// for that type (e.g. `[u8; 4]` for `u32`).
pub trait RdatIO: Sized {
    /// Associated type representing the byte array type for this numeric type.
    type Bytes: Sized + AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Read T from a byte buffer in little-endian
    fn from_le_bytes(bytes: Self::Bytes) -> Self;

    /// Write T to a byte buffer in little-endian
    fn to_le_bytes(self) -> Self::Bytes;
}

macro_rules! impl_rdat_io {
    ($($ty:ty => $len:expr),* $(,)?) => {
        $(
            impl RdatIO for $ty {
                type Bytes = [u8; $len];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }

                fn to_le_bytes(self) -> Self::Bytes {
                    <$ty>::to_le_bytes(self)
                }
            }
        )*
    };
}

impl_rdat_io!(u8 => 1, u16 => 2, u32 => 4, u64 => 8);

/// Safely reads a value of type `T` in little-endian byte order from the start of a buffer.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the buffer is shorter than `size_of::<T>()`.
pub fn read_le<T: RdatIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Safely reads a value of type `T` in little-endian byte order at `offset`, advancing the
/// offset by the size of `T` on success.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if fewer than `size_of::<T>()` bytes remain.
pub fn read_le_at<T: RdatIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(OutOfBounds);
    };
    if end > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(OutOfBounds);
    };

    *offset = end;

    Ok(T::from_le_bytes(read))
}

/// Safely writes `value` in little-endian byte order at `offset`, advancing the offset by the
/// size of `T` on success.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if fewer than `size_of::<T>()` bytes remain.
pub fn write_le_at<T: RdatIO>(data: &mut [u8], offset: &mut usize, value: T) -> Result<()> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(OutOfBounds);
    };
    if end > data.len() {
        return Err(OutOfBounds);
    }

    let bytes = value.to_le_bytes();
    data[*offset..end].copy_from_slice(bytes.as_ref());
    *offset = end;

    Ok(())
}

/// Rounds `size` up to the next multiple of four.
#[must_use]
pub const fn align_up4(size: usize) -> usize {
    (size + 3) & !3
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_BUFFER: [u8; 8] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

    #[test]
    fn read_le_u8() {
        let result = read_le::<u8>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x01);
    }

    #[test]
    fn read_le_u16() {
        let result = read_le::<u16>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0201);
    }

    #[test]
    fn read_le_u32() {
        let result = read_le::<u32>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0403_0201);
    }

    #[test]
    fn read_le_u64() {
        let result = read_le::<u64>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0807060504030201);
    }

    #[test]
    fn read_le_at_advances() {
        let mut offset = 2;
        let result = read_le_at::<u32>(&TEST_BUFFER, &mut offset).unwrap();
        assert_eq!(result, 0x0605_0403);
        assert_eq!(offset, 6);
    }

    #[test]
    fn read_le_at_out_of_bounds() {
        let mut offset = 6;
        let result = read_le_at::<u32>(&TEST_BUFFER, &mut offset);
        assert!(matches!(result, Err(OutOfBounds)));
        assert_eq!(offset, 6);
    }

    #[test]
    fn read_le_at_offset_overflow() {
        let mut offset = usize::MAX - 1;
        let result = read_le_at::<u32>(&TEST_BUFFER, &mut offset);
        assert!(matches!(result, Err(OutOfBounds)));
    }

    #[test]
    fn write_le_at_sequence() {
        let mut data = [0u8; 8];
        let mut offset = 0;

        write_le_at(&mut data, &mut offset, 0x0201u16).unwrap();
        write_le_at(&mut data, &mut offset, 0x03u8).unwrap();
        write_le_at(&mut data, &mut offset, 0x04u8).unwrap();
        write_le_at(&mut data, &mut offset, 0x0807_0605u32).unwrap();

        assert_eq!(data, TEST_BUFFER);
        assert_eq!(offset, 8);
    }

    #[test]
    fn write_le_at_out_of_bounds() {
        let mut data = [0u8; 3];
        let mut offset = 0;
        assert!(matches!(
            write_le_at(&mut data, &mut offset, 1u32),
            Err(OutOfBounds)
        ));
        assert_eq!(data, [0, 0, 0]);
    }

    #[test]
    fn align_up() {
        assert_eq!(align_up4(0), 0);
        assert_eq!(align_up4(1), 4);
        assert_eq!(align_up4(4), 4);
        assert_eq!(align_up4(13), 16);
    }
}
