//! Builders and sample data shared by the unit tests.

use crate::rdat::{
    records::{
        ExportsAssociation, FunctionInfo, HitGroup, HitGroupType, RaytracingPipelineConfig,
        RaytracingPipelineFlags, RaytracingShaderConfig, ResourceBinding, ResourceClass,
        ResourceFlags, ResourceInfo, ResourceKind, RootSignature, ShaderBehaviourFlags,
        ShaderFeatureFlags, ShaderKind, ShaderStageMask, StateObjectConfig, StateObjectFlags,
        SubobjectData, SubobjectInfo,
    },
    parts::PartKind,
    RuntimeData, RDAT_VERSION_1_0,
};

/// Assembles an RDAT chunk from hand-written parts, without any of the encoder's rules.
///
/// Parts are emitted in the order they are added. Payloads are padded to four bytes.
#[derive(Default)]
pub struct ChunkBuilder {
    parts: Vec<(u32, Vec<u8>)>,
}

impl ChunkBuilder {
    pub fn new() -> Self {
        ChunkBuilder::default()
    }

    pub fn part(self, kind: PartKind, payload: &[u8]) -> Self {
        self.raw_part(kind as u32, payload)
    }

    pub fn raw_part(mut self, kind: u32, payload: &[u8]) -> Self {
        let mut payload = payload.to_vec();
        payload.resize(payload.len().div_ceil(4) * 4, 0);
        self.parts.push((kind, payload));
        self
    }

    /// Adds a table part; each row is given as `u32` words and zero-padded to `stride`.
    pub fn table(self, kind: PartKind, stride: u32, rows: &[&[u32]]) -> Self {
        let mut payload = Vec::new();
        payload.extend_from_slice(&(rows.len() as u32).to_le_bytes());
        payload.extend_from_slice(&stride.to_le_bytes());
        for row in rows {
            let mut bytes: Vec<u8> = row.iter().flat_map(|word| word.to_le_bytes()).collect();
            bytes.resize(stride as usize, 0);
            payload.extend_from_slice(&bytes);
        }
        self.part(kind, &payload)
    }

    pub fn build(self) -> Vec<u8> {
        let mut chunk = Vec::new();
        chunk.extend_from_slice(&RDAT_VERSION_1_0.to_le_bytes());
        chunk.extend_from_slice(&(self.parts.len() as u32).to_le_bytes());

        let mut offset = 8 + 4 * self.parts.len();
        for (_, payload) in &self.parts {
            chunk.extend_from_slice(&(offset as u32).to_le_bytes());
            offset += 8 + payload.len();
        }

        for (kind, payload) in &self.parts {
            chunk.extend_from_slice(&kind.to_le_bytes());
            chunk.extend_from_slice(&(payload.len() as u32).to_le_bytes());
            chunk.extend_from_slice(payload);
        }

        chunk
    }
}

/// Builds a `DXBC` container holding `chunks` in order, with a fixed dummy hash.
pub fn build_dxbc(chunks: &[([u8; 4], &[u8])]) -> Vec<u8> {
    let table_end = 32 + 4 * chunks.len();
    let total_size = chunks
        .iter()
        .fold(table_end, |acc, (_, data)| acc + 8 + data.len());

    let mut bytes = Vec::with_capacity(total_size);
    bytes.extend_from_slice(b"DXBC");
    bytes.extend_from_slice(&[0x5A; 16]);
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(&(total_size as u32).to_le_bytes());
    bytes.extend_from_slice(&(chunks.len() as u32).to_le_bytes());

    let mut offset = table_end;
    for (_, data) in chunks {
        bytes.extend_from_slice(&(offset as u32).to_le_bytes());
        offset += 8 + data.len();
    }
    for (fourcc, data) in chunks {
        bytes.extend_from_slice(fourcc);
        bytes.extend_from_slice(&(data.len() as u32).to_le_bytes());
        bytes.extend_from_slice(data);
    }

    bytes
}

pub fn resource(name: &str, class: ResourceClass, linear_id: u32) -> ResourceInfo {
    let kind = match class {
        ResourceClass::Uav => ResourceKind::StructuredBuffer,
        ResourceClass::CBuffer => ResourceKind::CBuffer,
        ResourceClass::Sampler => ResourceKind::Sampler,
        _ => ResourceKind::Texture2D,
    };

    ResourceInfo {
        class,
        kind,
        linear_id,
        space: 0,
        lower_bound: linear_id,
        upper_bound: linear_id,
        name: name.to_string(),
        flags: ResourceFlags::empty(),
    }
}

/// A library function named `name` calling `dependencies`; the unmangled name equals `name`.
pub fn function(name: &str, dependencies: &[&str]) -> FunctionInfo {
    FunctionInfo {
        name: name.to_string(),
        unmangled_name: name.to_string(),
        dependencies: dependencies.iter().map(|dep| dep.to_string()).collect(),
        ..Default::default()
    }
}

/// A raytracing library touching every part kind the encoder emits.
pub fn sample_runtime_data() -> RuntimeData {
    let mut output = resource("gOutput", ResourceClass::Uav, 0);
    output.flags = ResourceFlags::GLOBALLY_COHERENT;

    let main = FunctionInfo {
        name: "\x01?main@@YAXXZ".to_string(),
        unmangled_name: "main".to_string(),
        resources: vec![
            ResourceBinding {
                class: ResourceClass::Uav,
                id: 0,
            },
            ResourceBinding {
                class: ResourceClass::Srv,
                id: 0,
            },
        ],
        dependencies: vec!["\x01?trace@@YAXXZ".to_string()],
        shader_kind: ShaderKind::RayGeneration,
        feature_flags: ShaderFeatureFlags::from_bits_retain(0x1_0000_0001),
        shader_stage_mask: ShaderStageMask::from_bits_retain(1 << 7),
        min_shader_model: 0x63,
        min_kind: u32::from(ShaderKind::RayGeneration) as u16,
        min_wave_lane_count: 4,
        max_wave_lane_count: 64,
        behaviour_flags: ShaderBehaviourFlags::from_bits_retain(1),
        ..Default::default()
    };

    let hit = FunctionInfo {
        name: "\x01?hit@@YAXUPayload@@UAttribs@@@Z".to_string(),
        unmangled_name: "hit".to_string(),
        resources: vec![ResourceBinding {
            class: ResourceClass::Srv,
            id: 0,
        }],
        shader_kind: ShaderKind::ClosestHit,
        payload_size_in_bytes: 16,
        attribute_size_in_bytes: 8,
        min_shader_model: 0x63,
        min_kind: u32::from(ShaderKind::ClosestHit) as u16,
        ..Default::default()
    };

    let trace = function("\x01?trace@@YAXXZ", &[]);

    RuntimeData {
        resources: vec![output, resource("gScene", ResourceClass::Srv, 0)],
        function_version: Default::default(),
        functions: vec![main, hit, trace],
        subobjects: vec![
            SubobjectInfo {
                name: "config".to_string(),
                data: SubobjectData::StateObjectConfig(StateObjectConfig {
                    flags: StateObjectFlags::from_bits_retain(1),
                }),
            },
            SubobjectInfo {
                name: "grs".to_string(),
                data: SubobjectData::GlobalRootSignature(RootSignature {
                    data: vec![2, 0, 0, 0, 1, 0, 0, 0],
                }),
            },
            SubobjectInfo {
                name: "shader_config".to_string(),
                data: SubobjectData::RaytracingShaderConfig(RaytracingShaderConfig {
                    max_payload_size_in_bytes: 16,
                    max_attribute_size_in_bytes: 8,
                }),
            },
            SubobjectInfo {
                name: "pipeline_config".to_string(),
                data: SubobjectData::RaytracingPipelineConfig1(RaytracingPipelineConfig {
                    max_trace_recursion_depth: 2,
                    flags: RaytracingPipelineFlags::from_bits_retain(0x100),
                }),
            },
            SubobjectInfo {
                name: "hit_group".to_string(),
                data: SubobjectData::HitGroup(HitGroup {
                    kind: HitGroupType::Triangle,
                    any_hit: String::new(),
                    closest_hit: "\x01?hit@@YAXUPayload@@UAttribs@@@Z".to_string(),
                    intersection: String::new(),
                }),
            },
            SubobjectInfo {
                name: "association".to_string(),
                data: SubobjectData::SubobjectToExportsAssociation(ExportsAssociation {
                    subobject: "shader_config".to_string(),
                    exports: vec!["hit_group".to_string(), "main".to_string()],
                }),
            },
        ],
    }
}
