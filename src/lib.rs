// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]
#![allow(clippy::too_many_arguments)]

//! # rdatscope
//!
//! A cross-platform codec for the runtime data (`RDAT`) chunk of compiled DXIL shader libraries.
//! `rdatscope` decodes the chunk into plain Rust values and re-encodes them into a chunk that is
//! byte-for-byte what the shader compiler would have emitted: same part order, same string and
//! array deduplication, same alignment.
//!
//! ## Features
//!
//! - **Lossless round-trips** - unknown enum values and flag bits are carried through untouched
//! - **Compiler-identical output** - interning order and part order match the reference encoder
//! - **Defensive decoding** - every offset, size and reference is bounds-checked
//! - **Container support** - locate and replace the chunk inside a `DXBC` container
//!
//! ## Quick Start
//!
//! ### Using the Prelude
//!
//! ```rust
//! use rdatscope::prelude::*;
//!
//! let rdat = RuntimeData {
//!     resources: vec![ResourceInfo {
//!         class: ResourceClass::Uav,
//!         kind: ResourceKind::StructuredBuffer,
//!         linear_id: 0,
//!         space: 0,
//!         lower_bound: 0,
//!         upper_bound: 0,
//!         name: "gOutput".to_string(),
//!         flags: ResourceFlags::empty(),
//!     }],
//!     ..Default::default()
//! };
//!
//! let chunk = rdat.encode()?;
//! let diagnostics = Diagnostics::new();
//! assert_eq!(RuntimeData::decode(&chunk, &diagnostics)?, rdat);
//! # Ok::<(), rdatscope::Error>(())
//! ```
//!
//! ### Working with a container
//!
//! ```rust,no_run
//! use rdatscope::prelude::*;
//!
//! let bytes = std::fs::read("shader.cso").map_err(|_| Error::NotSupported)?;
//! let mut container = DxbcContainer::new(bytes)?;
//!
//! let diagnostics = Diagnostics::new();
//! if let Some(mut rdat) = RuntimeData::from_container(&container, &diagnostics)? {
//!     for function in &rdat.functions {
//!         println!("{} ({})", function.unmangled_name, function.shader_kind);
//!     }
//!
//!     rdat.subobjects.clear();
//!     rdat.write_to_container(&mut container)?;
//! }
//!
//! for warning in diagnostics.warnings() {
//!     eprintln!("{warning}");
//! }
//! # Ok::<(), rdatscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`rdat`] - the codec: part framing, blob streams, record types, decoder and encoder
//! - [`container`] - the [`ChunkContainer`] seam and the [`DxbcContainer`] implementation
//! - [`diagnostics`] - non-fatal findings collected during decoding
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, Error>`](Result). A missing chunk is not an error:
//!
//! ```rust,no_run
//! use rdatscope::{Diagnostics, DxbcContainer, Error, RuntimeData};
//!
//! # let container = DxbcContainer::new(Vec::new())?;
//! match RuntimeData::from_container(&container, &Diagnostics::new()) {
//!     Ok(Some(rdat)) => println!("{} functions", rdat.functions.len()),
//!     Ok(None) => println!("no runtime data"),
//!     Err(Error::UnsupportedVersion(version)) => println!("RDAT version {version:#x}"),
//!     Err(e) => println!("damaged chunk: {e}"),
//! }
//! # Ok::<(), rdatscope::Error>(())
//! ```
//!
//! ## Development and Testing
//!
//! ### Fuzzing
//!
//! ```bash
//! cargo +nightly fuzz run rdat --release
//! ```
//!
//! ### Testing
//!
//! ```bash
//! cargo test
//! cargo bench
//! ```

#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use rdatscope::prelude::*;
///
/// let chunk = RuntimeData::default().encode()?;
/// assert_eq!(chunk[0], 0x10);
/// # Ok::<(), rdatscope::Error>(())
/// ```
pub mod prelude;

/// Non-fatal findings reported while decoding
///
/// Decoding does not stop for parts or subobjects it does not understand. Those are skipped and
/// recorded in a [`Diagnostics`] collector handed to the decoder, so callers can tell whether a
/// re-encode will drop anything.
///
/// # Examples
///
/// ```rust
/// use rdatscope::{Diagnostics, RuntimeData};
///
/// let diagnostics = Diagnostics::new();
/// let chunk = RuntimeData::default().encode()?;
/// RuntimeData::decode(&chunk, &diagnostics)?;
/// assert!(!diagnostics.has_any());
/// # Ok::<(), rdatscope::Error>(())
/// ```
pub mod diagnostics;

/// Shader containers carrying the RDAT chunk
pub mod container;

/// The RDAT chunk codec
///
/// # Key Types
///
/// - [`RuntimeData`] - decoded chunk content
/// - [`rdat::decoder::Decoder`] - two-pass decoder
/// - [`rdat::encoder::Encoder`] - phased encoder
/// - [`rdat::parts::PartKind`] - part identifiers
pub mod rdat;

/// `rdatscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `rdatscope` Error type
///
/// The main error type for all operations in this crate.
pub use error::Error;

pub use container::{ChunkContainer, DxbcContainer, FourCC, RDAT_FOURCC};
pub use diagnostics::{Diagnostic, DiagnosticCategory, Diagnostics};
pub use file::parser::Parser;
pub use rdat::{RuntimeData, RDAT_VERSION_1_0};
