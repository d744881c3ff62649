//! The three blob parts shared by all RDAT record tables.
//!
//! Each stream works in two modes: on decode a part payload is adopted with `load` and queried
//! with `resolve` / `span`; on encode the stream starts empty and grows through `intern`, which
//! hands back the reference a record should store.
//!
//! - [`StringBuffer`] - NUL-terminated names
//! - [`IndexArrays`] - `u32` arrays, parameterised by [`ArrayLayout`]
//! - [`RawBytes`] - opaque byte ranges (root signatures)

mod indexarrays;
mod rawbytes;
mod strings;

pub use indexarrays::{ArrayLayout, IndexArrays, LengthPrefixed, RunToEnd};
pub use rawbytes::RawBytes;
pub use strings::StringBuffer;
