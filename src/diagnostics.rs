//! Diagnostics collection for runtime data decoding.
//!
//! The RDAT format is versioned by newer compilers adding part kinds and subobject kinds. The
//! decoder prefers forward compatibility over hard failure: anything it does not recognise is
//! reported here as a warning and skipped, and decoding continues. Fatal problems are still
//! returned as [`crate::Error`].
//!
//! # Key Components
//!
//! - [`Diagnostics`] - Thread-safe container for diagnostic entries
//! - [`Diagnostic`] - Individual warning with its location in the chunk
//! - [`DiagnosticCategory`] - Which kind of record or part the warning relates to
//!
//! # Usage Examples
//!
//! ```rust,no_run
//! use rdatscope::{Diagnostics, RuntimeData};
//!
//! let chunk: Vec<u8> = std::fs::read("shader.rdat")?;
//! let diagnostics = Diagnostics::new();
//! let rdat = RuntimeData::decode(&chunk, &diagnostics)?;
//!
//! if diagnostics.has_any() {
//!     // some parts or subobjects were skipped and will not round-trip
//!     for entry in diagnostics.iter() {
//!         println!("{entry}");
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Thread Safety
//!
//! All types in this module are [`Send`] and [`Sync`]. The [`Diagnostics`] container
//! uses `boxcar::Vec` internally, which provides lock-free concurrent append operations, so a
//! single collector can be shared by decode calls running on independent inputs.

use std::fmt::{self, Write};

/// Category indicating the source of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    /// Unknown part kinds in the part directory.
    Part,

    /// Function records, e.g. unexpected extra-info references.
    Function,

    /// Subobject records, e.g. unknown subobject kinds or legacy flags.
    Subobject,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Part => write!(f, "Part"),
            DiagnosticCategory::Function => write!(f, "Function"),
            DiagnosticCategory::Subobject => write!(f, "Subobject"),
        }
    }
}

/// A single warning with context information.
///
/// Every entry describes data the decoder skipped or could not represent, so the chunk it came
/// from will not re-encode byte-for-byte.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Category indicating the source of this diagnostic.
    pub category: DiagnosticCategory,

    /// Human-readable description of the issue.
    pub message: String,

    /// Optional byte offset within the chunk where the issue was found.
    pub offset: Option<u64>,

    /// Optional index of the part (in directory order) the issue belongs to.
    pub part: Option<u32>,

    /// Optional index of the record within its table.
    pub record: Option<u32>,
}

impl Diagnostic {
    /// Creates a new diagnostic entry.
    ///
    /// # Arguments
    ///
    /// * `category` - Category of the diagnostic source
    /// * `message` - Human-readable description
    pub fn new(category: DiagnosticCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            offset: None,
            part: None,
            record: None,
        }
    }

    /// Adds chunk offset information to the diagnostic.
    #[must_use]
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Adds the directory index of the part the diagnostic belongs to.
    #[must_use]
    pub fn with_part(mut self, part: u32) -> Self {
        self.part = Some(part);
        self
    }

    /// Adds the index of the record within its table.
    #[must_use]
    pub fn with_record(mut self, record: u32) -> Self {
        self.record = Some(record);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[WARN] {}: {}", self.category, self.message)?;

        if let Some(offset) = self.offset {
            write!(f, " (offset: 0x{:08x})", offset)?;
        }

        if let Some(part) = self.part {
            write!(f, " (part: {})", part)?;
        }

        if let Some(record) = self.record {
            write!(f, " (record: {})", record)?;
        }

        Ok(())
    }
}

/// Thread-safe container for collecting diagnostic entries.
///
/// Uses `boxcar::Vec` internally for lock-free concurrent append operations.
#[derive(Debug)]
pub struct Diagnostics {
    entries: boxcar::Vec<Diagnostic>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics {
    /// Creates a new empty diagnostics container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: boxcar::Vec::new(),
        }
    }

    /// Adds a diagnostic entry.
    pub fn push(&self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Returns true if any diagnostics have been collected.
    pub fn has_any(&self) -> bool {
        self.entries.count() > 0
    }

    /// Returns the number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.entries.count()
    }

    /// Returns an iterator over all diagnostics.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().map(|(_, d)| d)
    }

    /// Returns all warnings as a vector.
    pub fn warnings(&self) -> Vec<&Diagnostic> {
        self.iter().collect()
    }

    /// Returns diagnostics filtered by category.
    pub fn by_category(&self, category: DiagnosticCategory) -> Vec<&Diagnostic> {
        self.iter().filter(|d| d.category == category).collect()
    }

    /// Formats a summary of all diagnostics for display.
    pub fn summary(&self) -> String {
        let mut output = String::new();

        let _ = writeln!(output, "Diagnostics: {} warning(s)", self.warning_count());
        for diag in self.iter() {
            let _ = writeln!(output, "  {diag}");
        }

        output
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}
