#![allow(dead_code)]

use rdatscope::prelude::*;

/// Assembles an RDAT chunk from `(kind, payload)` pairs, padding each payload to four bytes.
pub fn raw_chunk(version: u32, parts: &[(u32, &[u8])]) -> Vec<u8> {
    let mut chunk = Vec::new();
    chunk.extend_from_slice(&version.to_le_bytes());
    chunk.extend_from_slice(&(parts.len() as u32).to_le_bytes());

    let padded: Vec<Vec<u8>> = parts
        .iter()
        .map(|(_, payload)| {
            let mut payload = payload.to_vec();
            payload.resize(payload.len().div_ceil(4) * 4, 0);
            payload
        })
        .collect();

    let mut offset = 8 + 4 * parts.len();
    for payload in &padded {
        chunk.extend_from_slice(&(offset as u32).to_le_bytes());
        offset += 8 + payload.len();
    }
    for ((kind, _), payload) in parts.iter().zip(&padded) {
        chunk.extend_from_slice(&kind.to_le_bytes());
        chunk.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        chunk.extend_from_slice(payload);
    }

    chunk
}

/// Builds a table part payload from rows of `u32` words.
pub fn table(stride: u32, rows: &[&[u32]]) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(&(rows.len() as u32).to_le_bytes());
    payload.extend_from_slice(&stride.to_le_bytes());
    for row in rows {
        let mut bytes: Vec<u8> = row.iter().flat_map(|word| word.to_le_bytes()).collect();
        bytes.resize(stride as usize, 0);
        payload.extend_from_slice(&bytes);
    }
    payload
}

/// Builds a `DXBC` container holding `chunks` in order.
pub fn dxbc(chunks: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
    let table_end = 32 + 4 * chunks.len();
    let total_size = chunks
        .iter()
        .fold(table_end, |acc, (_, data)| acc + 8 + data.len());

    let mut bytes = Vec::with_capacity(total_size);
    bytes.extend_from_slice(b"DXBC");
    bytes.extend_from_slice(&[0xC3; 16]);
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(&(total_size as u32).to_le_bytes());
    bytes.extend_from_slice(&(chunks.len() as u32).to_le_bytes());

    let mut offset = table_end;
    for (_, data) in chunks {
        bytes.extend_from_slice(&(offset as u32).to_le_bytes());
        offset += 8 + data.len();
    }
    for (fourcc, data) in chunks {
        bytes.extend_from_slice(*fourcc);
        bytes.extend_from_slice(&(data.len() as u32).to_le_bytes());
        bytes.extend_from_slice(data);
    }

    bytes
}

pub fn uav(name: &str, linear_id: u32) -> ResourceInfo {
    ResourceInfo {
        class: ResourceClass::Uav,
        kind: ResourceKind::RawBuffer,
        linear_id,
        space: 0,
        lower_bound: linear_id,
        upper_bound: linear_id,
        name: name.to_string(),
        flags: ResourceFlags::empty(),
    }
}

pub fn srv(name: &str, linear_id: u32) -> ResourceInfo {
    ResourceInfo {
        class: ResourceClass::Srv,
        kind: ResourceKind::Texture2D,
        ..uav(name, linear_id)
    }
}

pub fn function(name: &str, dependencies: &[&str]) -> FunctionInfo {
    FunctionInfo {
        name: name.to_string(),
        unmangled_name: name.to_string(),
        dependencies: dependencies.iter().map(|dep| dep.to_string()).collect(),
        ..Default::default()
    }
}

pub fn binding(class: ResourceClass, id: u32) -> ResourceBinding {
    ResourceBinding { class, id }
}

/// A small raytracing library using every record kind.
pub fn library() -> RuntimeData {
    let raygen = FunctionInfo {
        name: "\x01?RayGen@@YAXXZ".to_string(),
        unmangled_name: "RayGen".to_string(),
        resources: vec![
            binding(ResourceClass::Uav, 0),
            binding(ResourceClass::Srv, 0),
        ],
        dependencies: vec!["\x01?Shade@@YAXXZ".to_string()],
        shader_kind: ShaderKind::RayGeneration,
        feature_flags: ShaderFeatureFlags::from_bits_retain(0x0000_0040_0000_0010),
        shader_stage_mask: ShaderStageMask::from_bits_retain(0x80),
        min_shader_model: 0x63,
        min_kind: 7,
        min_wave_lane_count: 32,
        max_wave_lane_count: 32,
        ..Default::default()
    };

    let miss = FunctionInfo {
        name: "\x01?Miss@@YAXUPayload@@@Z".to_string(),
        unmangled_name: "Miss".to_string(),
        shader_kind: ShaderKind::Miss,
        payload_size_in_bytes: 16,
        min_shader_model: 0x63,
        min_kind: 11,
        ..Default::default()
    };

    let shade = FunctionInfo {
        resources: vec![binding(ResourceClass::Srv, 0)],
        ..function("\x01?Shade@@YAXXZ", &[])
    };

    RuntimeData {
        resources: vec![uav("Output", 0), srv("Scene", 0)],
        function_version: FunctionInfoVersion::Version2,
        functions: vec![raygen, miss, shade],
        subobjects: vec![
            SubobjectInfo {
                name: "GlobalRS".to_string(),
                data: SubobjectData::GlobalRootSignature(RootSignature {
                    data: vec![2, 0, 0, 0, 1, 0, 0, 0, 24, 0, 0, 0],
                }),
            },
            SubobjectInfo {
                name: "LocalRS".to_string(),
                data: SubobjectData::LocalRootSignature(RootSignature {
                    data: vec![2, 0, 0, 0, 0, 0, 0, 0],
                }),
            },
            SubobjectInfo {
                name: "ShaderConfig".to_string(),
                data: SubobjectData::RaytracingShaderConfig(RaytracingShaderConfig {
                    max_payload_size_in_bytes: 16,
                    max_attribute_size_in_bytes: 8,
                }),
            },
            SubobjectInfo {
                name: "PipelineConfig".to_string(),
                data: SubobjectData::RaytracingPipelineConfig(RaytracingPipelineConfig {
                    max_trace_recursion_depth: 1,
                    flags: RaytracingPipelineFlags::empty(),
                }),
            },
            SubobjectInfo {
                name: "HitGroup".to_string(),
                data: SubobjectData::HitGroup(HitGroup {
                    kind: HitGroupType::ProceduralPrimitive,
                    any_hit: String::new(),
                    closest_hit: "\x01?Shade@@YAXXZ".to_string(),
                    intersection: "Intersect".to_string(),
                }),
            },
            SubobjectInfo {
                name: "ConfigAssociation".to_string(),
                data: SubobjectData::SubobjectToExportsAssociation(ExportsAssociation {
                    subobject: "ShaderConfig".to_string(),
                    exports: vec!["RayGen".to_string(), "Miss".to_string()],
                }),
            },
            SubobjectInfo {
                name: "StateConfig".to_string(),
                data: SubobjectData::StateObjectConfig(StateObjectConfig {
                    flags: StateObjectFlags::ALLOW_STATE_OBJECT_ADDITIONS,
                }),
            },
        ],
    }
}
