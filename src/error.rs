use thiserror::Error;

use crate::rdat::{PartKind, ResourceClass};

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every variant aborts the whole decode or encode call. The codec never hands out partially
/// populated structures, so on error the caller should treat the container's runtime data as
/// unusable. Retrying is pointless: both directions are deterministic.
///
/// Conditions that are *not* errors:
/// - A container without an `RDAT` chunk decodes to `Ok(None)`.
/// - Unknown part kinds and unknown subobject kinds are reported as warnings through
///   [`crate::Diagnostics`] and skipped.
///
/// # Examples
///
/// ```rust,no_run
/// use rdatscope::{Diagnostics, Error, RuntimeData};
///
/// let chunk: Vec<u8> = std::fs::read("shader.rdat")?;
/// match RuntimeData::decode(&chunk, &Diagnostics::new()) {
///     Ok(rdat) => println!("{} functions", rdat.functions.len()),
///     Err(Error::UnsupportedVersion(version)) => eprintln!("unknown RDAT version {version:#x}"),
///     Err(Error::UnexpectedStride { part, stride }) => {
///         eprintln!("{part} has an unknown record stride of {stride}")
///     }
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The chunk starts with a version tag this codec does not understand.
    ///
    /// Only [`crate::rdat::RDAT_VERSION_1_0`] is supported. No partial result is produced.
    #[error("Unsupported RDAT version - {0:#x}")]
    UnsupportedVersion(u32),

    /// The chunk header or part directory points outside the chunk.
    ///
    /// Covers truncated headers, part offsets beyond the end of the chunk, part sizes that
    /// overrun the chunk and table headers whose record count does not fit the part.
    #[error("Malformed part directory - {message}")]
    MalformedDirectory {
        /// Description of the violated bound
        message: String,
    },

    /// A record table declares a stride that matches none of the known record layouts.
    #[error("Unexpected record stride {stride} in {part} part")]
    UnexpectedStride {
        /// The part carrying the table
        part: PartKind,
        /// The declared stride
        stride: u32,
    },

    /// A reference points outside the blob or list it indexes into.
    ///
    /// Raised for string offsets past the string buffer, index arrays running past the
    /// index-array blob, byte ranges past the raw-bytes blob, and resource positions past the
    /// decoded resource list.
    #[error("Dangling {target} reference {value:#x} (bound {bound})")]
    DanglingReference {
        /// What the reference points into
        target: &'static str,
        /// The offending offset or index
        value: u32,
        /// The size of the target at the time of resolution
        bound: usize,
    },

    /// Encode-time: a function lists a `(class, id)` resource pair that no entry of the
    /// resource list carries.
    #[error("Function references unknown resource {class}:{id}")]
    UnresolvableResourceReference {
        /// Resource class of the dangling pair
        class: ResourceClass,
        /// Linear resource id of the dangling pair
        id: u32,
    },

    /// An out of bound access was attempted while reading or writing a buffer.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// The data is damaged and could not be parsed.
    ///
    /// The error includes the source location where the malformation was detected for
    /// debugging purposes.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// The requested operation is not supported for this input.
    #[error("This operation is not supported")]
    NotSupported,
}

impl Error {
    pub(crate) fn directory(message: impl Into<String>) -> Self {
        Error::MalformedDirectory {
            message: message.into(),
        }
    }

    pub(crate) fn dangling(target: &'static str, value: u32, bound: usize) -> Self {
        Error::DanglingReference {
            target,
            value,
            bound,
        }
    }
}
