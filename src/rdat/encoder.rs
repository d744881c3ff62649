//! Phased RDAT chunk encoder.
//!
//! The string buffer and index arrays are deduplicated by content, so the offset every string
//! and array ends up at depends on the order they are first interned. Compiler output is matched
//! byte for byte by interning in exactly this order:
//!
//! 1. resource names, in resource order
//! 2. the dependency names of *every* function
//! 3. per function: name, unmangled name, resource positions, dependency offsets
//! 4. per subobject: name, then its payload references in field order
//!
//! Phase 2 must complete before phase 3 starts; merging them moves dependency names behind the
//! first function's own name.
//!
//! Parts are then emitted in the fixed order string buffer, resources, functions, index arrays,
//! raw bytes, subobjects, skipping empty ones.

use crate::{
    rdat::{
        parts::{PartKind, PartWriter},
        records::{
            FunctionInfo2Raw, FunctionInfoRaw, FunctionInfoVersion, ResourceInfoRaw,
            SubobjectInfoRaw,
        },
        streams::{IndexArrays, RawBytes, StringBuffer},
        RuntimeData,
    },
    Result,
};

enum FunctionTable {
    Version1(Vec<FunctionInfoRaw>),
    Version2(Vec<FunctionInfo2Raw>),
}

/// Encodes a [`RuntimeData`] into RDAT chunk bytes.
pub struct Encoder<'a> {
    rdat: &'a RuntimeData,
    strings: StringBuffer,
    arrays: IndexArrays,
    raw_bytes: RawBytes,
}

impl<'a> Encoder<'a> {
    /// Creates an encoder with empty, deduplicating streams.
    pub fn new(rdat: &'a RuntimeData) -> Self {
        Encoder {
            rdat,
            strings: StringBuffer::new(true),
            arrays: IndexArrays::new(true),
            raw_bytes: RawBytes::new(),
        }
    }

    /// Runs all phases and returns the chunk.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnresolvableResourceReference`] if a function uses a resource
    /// that is not in the resource list, and [`crate::Error::NotSupported`] if a legacy pipeline
    /// config carries flags.
    pub fn encode(mut self) -> Result<Vec<u8>> {
        let resources = self.build_resources();
        self.intern_dependencies();
        let functions = self.build_functions()?;
        let subobjects = self.build_subobjects()?;

        let mut writer = PartWriter::new();
        writer.write_part(PartKind::StringBuffer, self.strings.as_bytes())?;
        writer.write_table_part(PartKind::ResourceTable, &resources)?;
        match &functions {
            FunctionTable::Version1(records) => {
                writer.write_table_part(PartKind::FunctionTable, records)?;
            }
            FunctionTable::Version2(records) => {
                writer.write_table_part(PartKind::FunctionTable, records)?;
            }
        }
        writer.write_part(PartKind::IndexArrays, &self.arrays.to_bytes())?;
        writer.write_part(PartKind::RawBytes, self.raw_bytes.as_bytes())?;
        writer.write_table_part(PartKind::SubobjectTable, &subobjects)?;

        writer.finish()
    }

    fn build_resources(&mut self) -> Vec<ResourceInfoRaw> {
        self.rdat
            .resources
            .iter()
            .map(|info| ResourceInfoRaw::from_owned(info, &mut self.strings))
            .collect()
    }

    fn intern_dependencies(&mut self) {
        for function in &self.rdat.functions {
            for dependency in &function.dependencies {
                self.strings.intern(dependency);
            }
        }
    }

    fn build_functions(&mut self) -> Result<FunctionTable> {
        let resources = &self.rdat.resources;
        let functions = &self.rdat.functions;

        Ok(match self.rdat.function_version {
            FunctionInfoVersion::Version1 => FunctionTable::Version1(
                functions
                    .iter()
                    .map(|info| {
                        FunctionInfoRaw::from_owned(
                            info,
                            resources,
                            &mut self.strings,
                            &mut self.arrays,
                        )
                    })
                    .collect::<Result<_>>()?,
            ),
            FunctionInfoVersion::Version2 => FunctionTable::Version2(
                functions
                    .iter()
                    .map(|info| {
                        FunctionInfo2Raw::from_owned(
                            info,
                            resources,
                            &mut self.strings,
                            &mut self.arrays,
                        )
                    })
                    .collect::<Result<_>>()?,
            ),
        })
    }

    fn build_subobjects(&mut self) -> Result<Vec<SubobjectInfoRaw>> {
        self.rdat
            .subobjects
            .iter()
            .map(|info| {
                SubobjectInfoRaw::from_owned(
                    info,
                    &mut self.strings,
                    &mut self.arrays,
                    &mut self.raw_bytes,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        rdat::{parts::read_directory, records::FunctionInfo},
        test::{function, resource},
        Error,
    };

    #[test]
    fn empty_runtime_data() {
        let chunk = Encoder::new(&RuntimeData::default()).encode().unwrap();
        // only the string buffer holding the leading empty string is emitted
        assert_eq!(
            chunk,
            vec![0x10, 0, 0, 0, 1, 0, 0, 0, 12, 0, 0, 0, 1, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn part_order() {
        let rdat = crate::test::sample_runtime_data();
        let chunk = Encoder::new(&rdat).encode().unwrap();

        let kinds: Vec<Option<PartKind>> = read_directory(&chunk)
            .unwrap()
            .iter()
            .map(|part| part.kind())
            .collect();
        assert_eq!(
            kinds,
            vec![
                Some(PartKind::StringBuffer),
                Some(PartKind::ResourceTable),
                Some(PartKind::FunctionTable),
                Some(PartKind::IndexArrays),
                Some(PartKind::RawBytes),
                Some(PartKind::SubobjectTable),
            ]
        );
    }

    #[test]
    fn dependencies_interned_before_names() {
        let rdat = RuntimeData {
            functions: vec![function("A", &["B"]), function("C", &[])],
            ..Default::default()
        };

        let mut encoder = Encoder::new(&rdat);
        encoder.build_resources();
        encoder.intern_dependencies();
        encoder.build_functions().unwrap();

        assert_eq!(encoder.strings.as_bytes(), b"\0B\0A\0C\0");
    }

    #[test]
    fn dependency_placement_ignores_function_order() {
        let forward = RuntimeData {
            functions: vec![function("A", &["B"]), function("C", &[])],
            ..Default::default()
        };
        let reversed = RuntimeData {
            functions: vec![function("C", &[]), function("A", &["B"])],
            ..Default::default()
        };

        for rdat in [&forward, &reversed] {
            let mut encoder = Encoder::new(rdat);
            encoder.build_resources();
            encoder.intern_dependencies();
            encoder.build_functions().unwrap();
            assert_eq!(&encoder.strings.as_bytes()[..3], b"\0B\0");
        }
    }

    #[test]
    fn unresolvable_resource_aborts() {
        let mut user = function("main", &[]);
        user.resources.push(crate::rdat::records::ResourceBinding {
            class: crate::rdat::records::ResourceClass::Uav,
            id: 7,
        });
        let rdat = RuntimeData {
            resources: vec![resource("gTex", crate::rdat::records::ResourceClass::Srv, 0)],
            functions: vec![user],
            ..Default::default()
        };

        assert!(matches!(
            Encoder::new(&rdat).encode(),
            Err(Error::UnresolvableResourceReference { id: 7, .. })
        ));
    }

    #[test]
    fn version_selects_stride() {
        let mut rdat = RuntimeData {
            functions: vec![FunctionInfo::default()],
            ..Default::default()
        };

        for (version, stride) in [
            (FunctionInfoVersion::Version1, 44),
            (FunctionInfoVersion::Version2, 52),
        ] {
            rdat.function_version = version;
            let chunk = Encoder::new(&rdat).encode().unwrap();
            let parts = read_directory(&chunk).unwrap();
            let table = parts
                .iter()
                .find(|part| part.kind() == Some(PartKind::FunctionTable))
                .unwrap();
            assert_eq!(table.table_header().unwrap().stride, stride);
        }
    }
}
