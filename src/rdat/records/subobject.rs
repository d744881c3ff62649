//! Subobject records: named pipeline state units of a raytracing state object.
//!
//! On the wire every subobject is 24 bytes: a kind, a name and a 16-byte union whose meaning
//! depends on the kind. Unused union words are zero. The owned form is the tagged
//! [`SubobjectData`] enum, one variant per kind.
//!
//! Kinds this crate does not know cannot be represented and are skipped by the decoder with a
//! warning.

use bitflags::bitflags;
use strum::{EnumCount, EnumIter, IntoEnumIterator};

use crate::{
    file::io::{read_le_at, write_le_at},
    rdat::{
        parts::{RowReadable, RowWritable},
        refs::{BytesRef, IndexArrayRef, StringRef},
        streams::{IndexArrays, RawBytes, StringBuffer},
    },
    Error, Result,
};

/// Subobject kind as stored on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, EnumIter, EnumCount)]
pub enum SubobjectKind {
    /// State object configuration flags
    StateObjectConfig = 0,
    /// Global root signature
    GlobalRootSignature = 1,
    /// Local root signature
    LocalRootSignature = 2,
    /// Association of a subobject with exports
    SubobjectToExportsAssociation = 8,
    /// Raytracing shader configuration
    RaytracingShaderConfig = 9,
    /// Raytracing pipeline configuration, legacy shape without flags
    RaytracingPipelineConfig = 10,
    /// Hit group
    HitGroup = 11,
    /// Raytracing pipeline configuration with flags
    RaytracingPipelineConfig1 = 12,
}

impl SubobjectKind {
    /// Maps a wire value to a known subobject kind.
    #[must_use]
    pub fn from_u32(value: u32) -> Option<SubobjectKind> {
        SubobjectKind::iter().find(|kind| *kind as u32 == value)
    }
}

wire_enum! {
    /// Geometry a hit group applies to.
    pub enum HitGroupType {
        /// Triangle geometry
        Triangle = 0,
        /// Procedural primitives with an intersection shader
        ProceduralPrimitive = 1,
    }
}

bitflags! {
    #[derive(PartialEq, Eq, Debug, Clone, Copy, Hash, Default)]
    /// Flags of a state object configuration subobject
    pub struct StateObjectFlags : u32 {
        /// Local functions may depend on external definitions
        const ALLOW_LOCAL_DEPENDENCIES_ON_EXTERNAL_DEFINITIONS = 0x1;
        /// External functions may depend on local definitions
        const ALLOW_EXTERNAL_DEPENDENCIES_ON_LOCAL_DEFINITIONS = 0x2;
        /// The state object may be extended with additions
        const ALLOW_STATE_OBJECT_ADDITIONS = 0x4;
    }
}

bitflags! {
    #[derive(PartialEq, Eq, Debug, Clone, Copy, Hash, Default)]
    /// Flags of a raytracing pipeline configuration subobject
    pub struct RaytracingPipelineFlags : u32 {
        /// Skip triangle geometry
        const SKIP_TRIANGLES = 0x100;
        /// Skip procedural primitives
        const SKIP_PROCEDURAL_PRIMITIVES = 0x200;
    }
}

/// Payload of [`SubobjectKind::StateObjectConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateObjectConfig {
    /// Configuration flags
    pub flags: StateObjectFlags,
}

/// Payload of the global and local root signature kinds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RootSignature {
    /// Serialised root signature
    pub data: Vec<u8>,
}

/// Payload of [`SubobjectKind::SubobjectToExportsAssociation`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExportsAssociation {
    /// Name of the associated subobject
    pub subobject: String,
    /// Exports the subobject applies to
    pub exports: Vec<String>,
}

/// Payload of [`SubobjectKind::RaytracingShaderConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RaytracingShaderConfig {
    /// Maximum ray payload size
    pub max_payload_size_in_bytes: u32,
    /// Maximum hit attribute size
    pub max_attribute_size_in_bytes: u32,
}

/// Payload of both raytracing pipeline configuration kinds.
///
/// The legacy kind has no flags. Its flag word is dropped on decode and must be empty on encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RaytracingPipelineConfig {
    /// Maximum recursion depth of `TraceRay`
    pub max_trace_recursion_depth: u32,
    /// Pipeline flags
    pub flags: RaytracingPipelineFlags,
}

/// Payload of [`SubobjectKind::HitGroup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitGroup {
    /// Geometry type
    pub kind: HitGroupType,
    /// Any-hit shader export, empty if unused
    pub any_hit: String,
    /// Closest-hit shader export, empty if unused
    pub closest_hit: String,
    /// Intersection shader export, empty if unused
    pub intersection: String,
}

/// Kind-specific content of a subobject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubobjectData {
    /// State object configuration
    StateObjectConfig(StateObjectConfig),
    /// Global root signature
    GlobalRootSignature(RootSignature),
    /// Local root signature
    LocalRootSignature(RootSignature),
    /// Subobject to exports association
    SubobjectToExportsAssociation(ExportsAssociation),
    /// Raytracing shader configuration
    RaytracingShaderConfig(RaytracingShaderConfig),
    /// Legacy raytracing pipeline configuration
    RaytracingPipelineConfig(RaytracingPipelineConfig),
    /// Raytracing pipeline configuration with flags
    RaytracingPipelineConfig1(RaytracingPipelineConfig),
    /// Hit group
    HitGroup(HitGroup),
}

impl SubobjectData {
    /// The wire kind of this payload.
    #[must_use]
    pub fn kind(&self) -> SubobjectKind {
        match self {
            SubobjectData::StateObjectConfig(_) => SubobjectKind::StateObjectConfig,
            SubobjectData::GlobalRootSignature(_) => SubobjectKind::GlobalRootSignature,
            SubobjectData::LocalRootSignature(_) => SubobjectKind::LocalRootSignature,
            SubobjectData::SubobjectToExportsAssociation(_) => {
                SubobjectKind::SubobjectToExportsAssociation
            }
            SubobjectData::RaytracingShaderConfig(_) => SubobjectKind::RaytracingShaderConfig,
            SubobjectData::RaytracingPipelineConfig(_) => SubobjectKind::RaytracingPipelineConfig,
            SubobjectData::RaytracingPipelineConfig1(_) => {
                SubobjectKind::RaytracingPipelineConfig1
            }
            SubobjectData::HitGroup(_) => SubobjectKind::HitGroup,
        }
    }
}

/// A subobject record with every reference resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubobjectInfo {
    /// Subobject name
    pub name: String,
    /// Kind-specific payload
    pub data: SubobjectData,
}

impl SubobjectInfo {
    /// The wire kind of this subobject.
    #[must_use]
    pub fn kind(&self) -> SubobjectKind {
        self.data.kind()
    }
}

/// On-wire subobject record, 24 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubobjectInfoRaw {
    /// [`SubobjectKind`] value
    pub kind: u32,
    /// Subobject name
    pub name: StringRef,
    /// The kind-dependent union as four words
    pub payload: [u32; 4],
}

impl SubobjectInfoRaw {
    /// Builds the wire record for `info`, interning the name first and then the payload
    /// references in field order.
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] for a legacy pipeline config with non-empty flags.
    pub fn from_owned(
        info: &SubobjectInfo,
        strings: &mut StringBuffer,
        arrays: &mut IndexArrays,
        raw_bytes: &mut RawBytes,
    ) -> Result<Self> {
        let name = strings.intern(&info.name);

        let payload = match &info.data {
            SubobjectData::StateObjectConfig(config) => [config.flags.bits(), 0, 0, 0],
            SubobjectData::GlobalRootSignature(rs) | SubobjectData::LocalRootSignature(rs) => {
                let data = raw_bytes.intern(&rs.data);
                [data.offset, data.size, 0, 0]
            }
            SubobjectData::SubobjectToExportsAssociation(assoc) => {
                let subobject = strings.intern(&assoc.subobject);
                let exports: Vec<u32> = assoc
                    .exports
                    .iter()
                    .map(|export| strings.intern(export).0)
                    .collect();
                let exports = arrays.intern(&exports, false);
                [subobject.0, exports.0, 0, 0]
            }
            SubobjectData::RaytracingShaderConfig(config) => [
                config.max_payload_size_in_bytes,
                config.max_attribute_size_in_bytes,
                0,
                0,
            ],
            SubobjectData::RaytracingPipelineConfig(config) => {
                if !config.flags.is_empty() {
                    return Err(Error::NotSupported);
                }
                [config.max_trace_recursion_depth, 0, 0, 0]
            }
            SubobjectData::RaytracingPipelineConfig1(config) => {
                [config.max_trace_recursion_depth, config.flags.bits(), 0, 0]
            }
            SubobjectData::HitGroup(group) => {
                let any_hit = strings.intern(&group.any_hit);
                let closest_hit = strings.intern(&group.closest_hit);
                let intersection = strings.intern(&group.intersection);
                [
                    u32::from(group.kind),
                    any_hit.0,
                    closest_hit.0,
                    intersection.0,
                ]
            }
        };

        Ok(SubobjectInfoRaw {
            kind: info.kind() as u32,
            name,
            payload,
        })
    }

    /// Resolves this record as a subobject of kind `kind`.
    ///
    /// # Errors
    /// Returns [`crate::Error::DanglingReference`] if any reference points outside its stream.
    pub fn to_owned(
        &self,
        kind: SubobjectKind,
        strings: &StringBuffer,
        arrays: &IndexArrays,
        raw_bytes: &RawBytes,
    ) -> Result<SubobjectInfo> {
        let [p0, p1, p2, p3] = self.payload;

        let root_signature = || -> Result<RootSignature> {
            let data = raw_bytes.resolve(BytesRef {
                offset: p0,
                size: p1,
            })?;
            Ok(RootSignature {
                data: data.to_vec(),
            })
        };
        let pipeline_config = RaytracingPipelineConfig {
            max_trace_recursion_depth: p0,
            flags: RaytracingPipelineFlags::from_bits_retain(p1),
        };

        let data = match kind {
            SubobjectKind::StateObjectConfig => {
                SubobjectData::StateObjectConfig(StateObjectConfig {
                    flags: StateObjectFlags::from_bits_retain(p0),
                })
            }
            SubobjectKind::GlobalRootSignature => {
                SubobjectData::GlobalRootSignature(root_signature()?)
            }
            SubobjectKind::LocalRootSignature => {
                SubobjectData::LocalRootSignature(root_signature()?)
            }
            SubobjectKind::SubobjectToExportsAssociation => {
                let mut exports = Vec::new();
                let exports_ref = IndexArrayRef(p1);
                if !exports_ref.is_null() {
                    for &offset in arrays.span(exports_ref)? {
                        exports.push(strings.resolve(StringRef(offset))?.to_string());
                    }
                }

                SubobjectData::SubobjectToExportsAssociation(ExportsAssociation {
                    subobject: strings.resolve(StringRef(p0))?.to_string(),
                    exports,
                })
            }
            SubobjectKind::RaytracingShaderConfig => {
                SubobjectData::RaytracingShaderConfig(RaytracingShaderConfig {
                    max_payload_size_in_bytes: p0,
                    max_attribute_size_in_bytes: p1,
                })
            }
            SubobjectKind::RaytracingPipelineConfig => {
                SubobjectData::RaytracingPipelineConfig(RaytracingPipelineConfig {
                    flags: RaytracingPipelineFlags::empty(),
                    ..pipeline_config
                })
            }
            SubobjectKind::RaytracingPipelineConfig1 => {
                SubobjectData::RaytracingPipelineConfig1(pipeline_config)
            }
            SubobjectKind::HitGroup => SubobjectData::HitGroup(HitGroup {
                kind: HitGroupType::from(p0),
                any_hit: strings.resolve(StringRef(p1))?.to_string(),
                closest_hit: strings.resolve(StringRef(p2))?.to_string(),
                intersection: strings.resolve(StringRef(p3))?.to_string(),
            }),
        };

        Ok(SubobjectInfo {
            name: strings.resolve(self.name)?.to_string(),
            data,
        })
    }
}

impl RowReadable for SubobjectInfoRaw {
    fn row_size() -> u32 {
        24
    }

    fn row_read(data: &[u8], offset: &mut usize) -> Result<Self> {
        Ok(SubobjectInfoRaw {
            kind: read_le_at::<u32>(data, offset)?,
            name: StringRef(read_le_at::<u32>(data, offset)?),
            payload: [
                read_le_at::<u32>(data, offset)?,
                read_le_at::<u32>(data, offset)?,
                read_le_at::<u32>(data, offset)?,
                read_le_at::<u32>(data, offset)?,
            ],
        })
    }
}

impl RowWritable for SubobjectInfoRaw {
    fn row_write(&self, data: &mut [u8], offset: &mut usize) -> Result<()> {
        write_le_at(data, offset, self.kind)?;
        write_le_at(data, offset, self.name.0)?;
        for word in self.payload {
            write_le_at(data, offset, word)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Streams {
        strings: StringBuffer,
        arrays: IndexArrays,
        raw_bytes: RawBytes,
    }

    impl Streams {
        fn new() -> Self {
            Streams {
                strings: StringBuffer::new(true),
                arrays: IndexArrays::new(true),
                raw_bytes: RawBytes::new(),
            }
        }

        fn encode(&mut self, info: &SubobjectInfo) -> SubobjectInfoRaw {
            self.try_encode(info).unwrap()
        }

        fn try_encode(&mut self, info: &SubobjectInfo) -> Result<SubobjectInfoRaw> {
            SubobjectInfoRaw::from_owned(
                info,
                &mut self.strings,
                &mut self.arrays,
                &mut self.raw_bytes,
            )
        }

        fn decode(&self, raw: &SubobjectInfoRaw) -> Result<SubobjectInfo> {
            let kind = SubobjectKind::from_u32(raw.kind).unwrap();
            raw.to_owned(kind, &self.strings, &self.arrays, &self.raw_bytes)
        }
    }

    #[test]
    fn kind_values() {
        assert_eq!(SubobjectKind::COUNT, 8);
        assert_eq!(
            SubobjectKind::from_u32(8),
            Some(SubobjectKind::SubobjectToExportsAssociation)
        );
        assert_eq!(SubobjectKind::from_u32(3), None);
        assert_eq!(SubobjectKind::from_u32(13), None);
    }

    #[test]
    fn crafted_hit_group() {
        #[rustfmt::skip]
        let data = vec![
            0x0B, 0x00, 0x00, 0x00, // kind
            0x01, 0x00, 0x00, 0x00, // name
            0x01, 0x00, 0x00, 0x00, // type
            0x00, 0x00, 0x00, 0x00, // any hit
            0x04, 0x00, 0x00, 0x00, // closest hit
            0x0C, 0x00, 0x00, 0x00, // intersection
        ];

        let mut offset = 0;
        let raw = SubobjectInfoRaw::row_read(&data, &mut offset).unwrap();
        assert_eq!(offset, 24);

        let mut streams = Streams::new();
        streams.strings.load(b"\0HG\0Closest\0Isect\0");
        let info = streams.decode(&raw).unwrap();

        assert_eq!(info.name, "HG");
        assert_eq!(
            info.data,
            SubobjectData::HitGroup(HitGroup {
                kind: HitGroupType::ProceduralPrimitive,
                any_hit: String::new(),
                closest_hit: "Closest".to_string(),
                intersection: "Isect".to_string(),
            })
        );
    }

    #[test]
    fn association_interning_order() {
        let info = SubobjectInfo {
            name: "assoc".to_string(),
            data: SubobjectData::SubobjectToExportsAssociation(ExportsAssociation {
                subobject: "rs".to_string(),
                exports: vec!["a".to_string(), "b".to_string()],
            }),
        };

        let mut streams = Streams::new();
        let raw = streams.encode(&info);

        assert_eq!(streams.strings.as_bytes(), b"\0assoc\0rs\0a\0b\0");
        assert_eq!(raw.name, StringRef(1));
        assert_eq!(raw.payload, [7, 0, 0, 0]);
        assert_eq!(streams.arrays.words(), &[2, 10, 12]);
        assert_eq!(streams.decode(&raw).unwrap(), info);
    }

    #[test]
    fn empty_exports_are_not_null() {
        let info = SubobjectInfo {
            name: "assoc".to_string(),
            data: SubobjectData::SubobjectToExportsAssociation(ExportsAssociation {
                subobject: "rs".to_string(),
                exports: Vec::new(),
            }),
        };

        let mut streams = Streams::new();
        let raw = streams.encode(&info);
        assert_eq!(raw.payload[1], 0);
        assert_eq!(streams.arrays.words(), &[0]);
        assert_eq!(streams.decode(&raw).unwrap(), info);
    }

    #[test]
    fn root_signatures_share_bytes() {
        let global = SubobjectInfo {
            name: "grs".to_string(),
            data: SubobjectData::GlobalRootSignature(RootSignature {
                data: vec![1, 2, 3, 4, 5],
            }),
        };
        let local = SubobjectInfo {
            name: "lrs".to_string(),
            data: SubobjectData::LocalRootSignature(RootSignature {
                data: vec![1, 2, 3, 4, 5],
            }),
        };

        let mut streams = Streams::new();
        let global_raw = streams.encode(&global);
        let local_raw = streams.encode(&local);

        assert_eq!(global_raw.kind, 1);
        assert_eq!(local_raw.kind, 2);
        assert_eq!(global_raw.payload, [0, 5, 0, 0]);
        assert_eq!(local_raw.payload, global_raw.payload);
        assert_eq!(streams.raw_bytes.as_bytes().len(), 5);
        assert_eq!(streams.decode(&local_raw).unwrap(), local);
    }

    #[test]
    fn empty_root_signature_is_null() {
        let info = SubobjectInfo {
            name: "rs".to_string(),
            data: SubobjectData::GlobalRootSignature(RootSignature::default()),
        };

        let mut streams = Streams::new();
        let raw = streams.encode(&info);
        assert_eq!(raw.payload, [0xFFFF_FFFF, 0, 0, 0]);
        assert_eq!(streams.decode(&raw).unwrap(), info);
    }

    #[test]
    fn pipeline_configs() {
        let config = RaytracingPipelineConfig {
            max_trace_recursion_depth: 2,
            flags: RaytracingPipelineFlags::SKIP_TRIANGLES,
        };
        let info = SubobjectInfo {
            name: "pipe".to_string(),
            data: SubobjectData::RaytracingPipelineConfig1(config),
        };

        let mut streams = Streams::new();
        let raw = streams.encode(&info);
        assert_eq!(raw.kind, 12);
        assert_eq!(raw.payload, [2, 0x100, 0, 0]);
        assert_eq!(streams.decode(&raw).unwrap(), info);
    }

    #[test]
    fn legacy_pipeline_config_has_no_flags() {
        let mut streams = Streams::new();

        let plain = SubobjectInfo {
            name: "pipe".to_string(),
            data: SubobjectData::RaytracingPipelineConfig(RaytracingPipelineConfig {
                max_trace_recursion_depth: 1,
                flags: RaytracingPipelineFlags::empty(),
            }),
        };
        let raw = streams.encode(&plain);
        assert_eq!(raw.kind, 10);
        assert_eq!(raw.payload, [1, 0, 0, 0]);

        let flagged = SubobjectInfo {
            name: "pipe".to_string(),
            data: SubobjectData::RaytracingPipelineConfig(RaytracingPipelineConfig {
                max_trace_recursion_depth: 1,
                flags: RaytracingPipelineFlags::SKIP_TRIANGLES,
            }),
        };
        assert!(matches!(
            streams.try_encode(&flagged),
            Err(Error::NotSupported)
        ));

        // stored flags are dropped
        let stored = SubobjectInfoRaw {
            payload: [1, 0x100, 0, 0],
            ..raw
        };
        assert_eq!(streams.decode(&stored).unwrap(), plain);
    }

    #[test]
    fn dangling_export_array() {
        let raw = SubobjectInfoRaw {
            kind: SubobjectKind::SubobjectToExportsAssociation as u32,
            name: StringRef(0),
            payload: [0, 4, 0, 0],
        };

        let streams = Streams::new();
        assert!(matches!(
            streams.decode(&raw),
            Err(Error::DanglingReference { .. })
        ));
    }
}
