//! Byte-level access primitives shared by the container and RDAT layers.
//!
//! # Key Components
//!
//! - [`io`] - [`io::RdatIO`] and the bounds-checked `read_le*` / `write_le_at` helpers
//! - [`parser`] - the cursor-style [`parser::Parser`] used to walk headers and directories
//!
//! Neither module allocates; both operate on caller-supplied slices.

pub mod io;
pub mod parser;
