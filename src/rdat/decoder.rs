//! Two-pass RDAT chunk decoder.
//!
//! Tables may reference blobs whose parts appear later in the directory, so decoding walks the
//! directory twice:
//!
//! 1. Load the string buffer, index arrays and raw bytes.
//! 2. Decode the record tables in directory order, resolving references against the blobs.
//!
//! Resource positions in function records are resolved against the resources decoded so far,
//! so a function table that precedes the resource table fails with a dangling reference.
//!
//! Unknown parts and unknown subobject kinds are reported to the [`Diagnostics`] collector and
//! skipped. Everything else that does not fit is an error and no partial result is returned.

use crate::{
    diagnostics::{Diagnostic, DiagnosticCategory, Diagnostics},
    rdat::{
        parts::{read_directory, Part, PartKind, RowReadable},
        records::{
            FunctionInfo2Raw, FunctionInfoRaw, FunctionInfoVersion, ResourceInfoRaw,
            SubobjectInfoRaw, SubobjectKind,
        },
        streams::{IndexArrays, RawBytes, StringBuffer},
        RuntimeData,
    },
    Error, Result,
};

/// Decodes one RDAT chunk into a [`RuntimeData`].
pub struct Decoder<'a> {
    chunk: &'a [u8],
    diagnostics: &'a Diagnostics,
    strings: StringBuffer,
    arrays: IndexArrays,
    raw_bytes: RawBytes,
    rdat: RuntimeData,
}

impl<'a> Decoder<'a> {
    /// Creates a decoder for `chunk`, reporting warnings to `diagnostics`.
    pub fn new(chunk: &'a [u8], diagnostics: &'a Diagnostics) -> Self {
        Decoder {
            chunk,
            diagnostics,
            strings: StringBuffer::new(true),
            arrays: IndexArrays::new(true),
            raw_bytes: RawBytes::new(),
            rdat: RuntimeData::default(),
        }
    }

    /// Runs both passes.
    ///
    /// # Errors
    /// - [`crate::Error::UnsupportedVersion`] for an unknown version tag
    /// - [`crate::Error::MalformedDirectory`] if a part lies outside the chunk
    /// - [`crate::Error::UnexpectedStride`] if a table has an unknown record size
    /// - [`crate::Error::DanglingReference`] if a reference does not resolve
    pub fn decode(mut self) -> Result<RuntimeData> {
        let parts = read_directory(self.chunk)?;

        for part in &parts {
            match part.kind() {
                Some(PartKind::StringBuffer) => self.strings.load(part.data),
                Some(PartKind::IndexArrays) => self.arrays.load(part.data)?,
                Some(PartKind::RawBytes) => self.raw_bytes.load(part.data),
                _ => {}
            }
        }

        for part in &parts {
            match part.kind() {
                Some(kind) if kind.is_blob() => {}
                Some(PartKind::ResourceTable) => self.decode_resources(part)?,
                Some(PartKind::FunctionTable) => self.decode_functions(part)?,
                Some(PartKind::SubobjectTable) => self.decode_subobjects(part)?,
                _ => self.diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCategory::Part,
                        format!(
                            "Unhandled RDAT part {:#x}, will not round-trip",
                            part.raw_kind
                        ),
                    )
                    .with_offset(part.offset as u64)
                    .with_part(part.index),
                ),
            }
        }

        Ok(self.rdat)
    }

    fn decode_resources(&mut self, part: &Part<'_>) -> Result<()> {
        let table = part.table::<ResourceInfoRaw>()?;

        self.rdat.resources.reserve(table.row_count() as usize);
        for row in table.iter() {
            let resource = row.to_owned(&self.strings)?;
            self.rdat.resources.push(resource);
        }
        Ok(())
    }

    fn decode_functions(&mut self, part: &Part<'_>) -> Result<()> {
        let header = part.table_header()?;

        if header.stride == FunctionInfoRaw::row_size() {
            self.rdat.function_version = FunctionInfoVersion::Version1;

            let table = part.table::<FunctionInfoRaw>()?;
            self.rdat.functions.reserve(table.row_count() as usize);
            for row in table.iter() {
                let function = row.to_owned(&self.strings, &self.arrays, &self.rdat.resources)?;
                self.rdat.functions.push(function);
            }
        } else if header.stride == FunctionInfo2Raw::row_size() {
            self.rdat.function_version = FunctionInfoVersion::Version2;

            let table = part.table::<FunctionInfo2Raw>()?;
            self.rdat.functions.reserve(table.row_count() as usize);
            for (index, row) in table.iter().enumerate() {
                if !row.extra_info.is_null() {
                    self.diagnostics.push(
                        Diagnostic::new(
                                DiagnosticCategory::Function,
                            format!(
                                "Ignoring extra info reference {:#x}, will not round-trip",
                                row.extra_info.0
                            ),
                        )
                        .with_part(part.index)
                        .with_record(index as u32),
                    );
                }

                let function = row.to_owned(&self.strings, &self.arrays, &self.rdat.resources)?;
                self.rdat.functions.push(function);
            }
        } else {
            return Err(Error::UnexpectedStride {
                part: PartKind::FunctionTable,
                stride: header.stride,
            });
        }

        Ok(())
    }

    fn decode_subobjects(&mut self, part: &Part<'_>) -> Result<()> {
        let table = part.table::<SubobjectInfoRaw>()?;

        self.rdat.subobjects.reserve(table.row_count() as usize);
        for (index, row) in table.iter().enumerate() {
            let Some(kind) = SubobjectKind::from_u32(row.kind) else {
                self.diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCategory::Subobject,
                        format!("Unhandled subobject kind {}", row.kind),
                    )
                    .with_part(part.index)
                    .with_record(index as u32),
                );
                continue;
            };

            if kind == SubobjectKind::RaytracingPipelineConfig && row.payload[1] != 0 {
                self.diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCategory::Subobject,
                        format!(
                            "Legacy raytracing pipeline config carries flags {:#x}",
                            row.payload[1]
                        ),
                    )
                    .with_part(part.index)
                    .with_record(index as u32),
                );
            }

            let subobject = row.to_owned(kind, &self.strings, &self.arrays, &self.raw_bytes)?;
            self.rdat.subobjects.push(subobject);
        }
        Ok(())
    }
}
