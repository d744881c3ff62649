//! Function records: one per exported library function.
//!
//! The function table comes in two layouts which share their first 44 bytes. Nothing in the
//! chunk tags the layout; it is recognised purely by the table stride:
//!
//! | Layout | Stride | Adds |
//! |--------|--------|------|
//! | [`FunctionInfoRaw`] | 44 | |
//! | [`FunctionInfo2Raw`] | 52 | wave lane counts, behaviour flags, extra-info reference |
//!
//! Both decode into the same [`FunctionInfo`]; the layout is remembered once per table as a
//! [`FunctionInfoVersion`] on [`crate::RuntimeData`].

use bitflags::bitflags;

use crate::{
    file::io::{read_le_at, write_le_at},
    rdat::{
        parts::{RowReadable, RowWritable},
        records::{ResourceClass, ResourceInfo},
        refs::{IndexArrayRef, StringRef},
        streams::{IndexArrays, StringBuffer},
    },
    Error, Result,
};

wire_enum! {
    /// The pipeline stage a function is compiled for.
    pub enum ShaderKind {
        /// Pixel shader
        Pixel = 0,
        /// Vertex shader
        Vertex = 1,
        /// Geometry shader
        Geometry = 2,
        /// Hull shader
        Hull = 3,
        /// Domain shader
        Domain = 4,
        /// Compute shader
        Compute = 5,
        /// Library function without a fixed stage
        Library = 6,
        /// Ray generation shader
        RayGeneration = 7,
        /// Intersection shader
        Intersection = 8,
        /// Any-hit shader
        AnyHit = 9,
        /// Closest-hit shader
        ClosestHit = 10,
        /// Miss shader
        Miss = 11,
        /// Callable shader
        Callable = 12,
        /// Mesh shader
        Mesh = 13,
        /// Amplification shader
        Amplification = 14,
        /// Work graph node
        Node = 15,
    }
}

bitflags! {
    #[derive(PartialEq, Eq, Debug, Clone, Copy, Hash, Default)]
    /// Optional hardware features a function requires. Stored on the wire as two `u32` halves.
    pub struct ShaderFeatureFlags : u64 {
        /// Double precision floating point
        const DOUBLES = 0x0000_0001;
        /// Raw and structured buffers on downlevel compute hardware
        const COMPUTE_SHADERS_PLUS_RAW_AND_STRUCTURED_BUFFERS = 0x0000_0002;
        /// UAVs at every shader stage
        const UAVS_AT_EVERY_STAGE = 0x0000_0004;
        /// More than 8 UAVs
        const UAVS_64 = 0x0000_0008;
        /// Minimum precision types
        const MINIMUM_PRECISION = 0x0000_0010;
        /// Double precision extensions from D3D11.1
        const DOUBLE_EXTENSIONS_11_1 = 0x0000_0020;
        /// Shader extensions from D3D11.1
        const SHADER_EXTENSIONS_11_1 = 0x0000_0040;
        /// Comparison filtering on feature level 9
        const LEVEL9_COMPARISON_FILTERING = 0x0000_0080;
        /// Tiled resources
        const TILED_RESOURCES = 0x0000_0100;
        /// Stencil reference output
        const STENCIL_REF = 0x0000_0200;
        /// Inner coverage input
        const INNER_COVERAGE = 0x0000_0400;
        /// Additional typed UAV load formats
        const TYPED_UAV_LOAD_ADDITIONAL_FORMATS = 0x0000_0800;
        /// Rasterizer ordered views
        const ROVS = 0x0000_1000;
        /// Viewport / render target array index from any stage feeding the rasterizer
        const VIEWPORT_AND_RT_ARRAY_INDEX = 0x0000_2000;
        /// Wave intrinsics
        const WAVE_OPS = 0x0000_4000;
        /// 64-bit integer operations
        const INT64_OPS = 0x0000_8000;
        /// View instancing
        const VIEW_ID = 0x0001_0000;
        /// Barycentrics
        const BARYCENTRICS = 0x0002_0000;
        /// Native 16-bit types
        const NATIVE_LOW_PRECISION = 0x0004_0000;
        /// Variable rate shading
        const SHADING_RATE = 0x0008_0000;
        /// Raytracing tier 1.1
        const RAYTRACING_TIER_1_1 = 0x0010_0000;
        /// Sampler feedback
        const SAMPLER_FEEDBACK = 0x0020_0000;
        /// 64-bit atomics on typed resources
        const ATOMIC_INT64_ON_TYPED_RESOURCE = 0x0040_0000;
        /// 64-bit atomics on group shared memory
        const ATOMIC_INT64_ON_GROUP_SHARED = 0x0080_0000;
        /// Derivatives in mesh and amplification shaders
        const DERIVATIVES_IN_MESH_AND_AMP_SHADERS = 0x0100_0000;
        /// Resource descriptor heap indexing
        const RESOURCE_DESCRIPTOR_HEAP_INDEXING = 0x0200_0000;
        /// Sampler descriptor heap indexing
        const SAMPLER_DESCRIPTOR_HEAP_INDEXING = 0x0400_0000;
        /// 64-bit atomics on heap resources
        const ATOMIC_INT64_ON_HEAP_RESOURCE = 0x1000_0000;
        /// Advanced texture operations
        const ADVANCED_TEXTURE_OPS = 0x2000_0000;
        /// Writeable MSAA textures
        const WRITEABLE_MSAA_TEXTURES = 0x4000_0000;
    }
}

bitflags! {
    #[derive(PartialEq, Eq, Debug, Clone, Copy, Hash, Default)]
    /// Stages a function may be used with, one bit per [`ShaderKind`] value.
    pub struct ShaderStageMask : u32 {
        /// Pixel
        const PIXEL = 1 << 0;
        /// Vertex
        const VERTEX = 1 << 1;
        /// Geometry
        const GEOMETRY = 1 << 2;
        /// Hull
        const HULL = 1 << 3;
        /// Domain
        const DOMAIN = 1 << 4;
        /// Compute
        const COMPUTE = 1 << 5;
        /// Library
        const LIBRARY = 1 << 6;
        /// Ray generation
        const RAY_GENERATION = 1 << 7;
        /// Intersection
        const INTERSECTION = 1 << 8;
        /// Any hit
        const ANY_HIT = 1 << 9;
        /// Closest hit
        const CLOSEST_HIT = 1 << 10;
        /// Miss
        const MISS = 1 << 11;
        /// Callable
        const CALLABLE = 1 << 12;
        /// Mesh
        const MESH = 1 << 13;
        /// Amplification
        const AMPLIFICATION = 1 << 14;
        /// Node
        const NODE = 1 << 15;
    }
}

bitflags! {
    #[derive(PartialEq, Eq, Debug, Clone, Copy, Hash, Default)]
    /// Behaviour flags of version 2 function records.
    pub struct ShaderBehaviourFlags : u16 {
        /// Writes `SV_Position`
        const OUTPUT_POSITION_PRESENT = 1 << 0;
        /// Writes depth
        const DEPTH_OUTPUT = 1 << 1;
        /// Runs at sample frequency
        const SAMPLE_FREQUENCY = 1 << 2;
        /// Reads `SV_ViewID`
        const USES_VIEW_ID = 1 << 3;
    }
}

/// Which function record layout a table uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FunctionInfoVersion {
    /// 44-byte records
    Version1,
    /// 52-byte records
    #[default]
    Version2,
}

/// A `(class, linear id)` pair naming a resource a function uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceBinding {
    /// Resource class
    pub class: ResourceClass,
    /// Linear id within the class
    pub id: u32,
}

impl ResourceBinding {
    fn position_in(&self, resources: &[ResourceInfo]) -> Result<u32> {
        resources
            .iter()
            .position(|res| {
                res.class.normalized() == self.class.normalized() && res.linear_id == self.id
            })
            .map(|pos| pos as u32)
            .ok_or(Error::UnresolvableResourceReference {
                class: self.class,
                id: self.id,
            })
    }
}

/// A function record with every reference resolved.
///
/// The wave lane counts and behaviour flags only exist in version 2 records; they decode as
/// zero from version 1 tables and are not written to them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FunctionInfo {
    /// Mangled name
    pub name: String,
    /// Unmangled name
    pub unmangled_name: String,
    /// Resources the function uses
    pub resources: Vec<ResourceBinding>,
    /// Mangled names of functions this one calls
    pub dependencies: Vec<String>,
    /// Stage the function was compiled for
    pub shader_kind: ShaderKind,
    /// Ray payload size
    pub payload_size_in_bytes: u32,
    /// Hit attribute size
    pub attribute_size_in_bytes: u32,
    /// Required features
    pub feature_flags: ShaderFeatureFlags,
    /// Compatible stages
    pub shader_stage_mask: ShaderStageMask,
    /// Minimum shader model, `major << 4 | minor`
    pub min_shader_model: u16,
    /// Mirrors `shader_kind` in compiler output
    pub min_kind: u16,
    /// Minimum wave lane count (version 2)
    pub min_wave_lane_count: u8,
    /// Maximum wave lane count (version 2)
    pub max_wave_lane_count: u8,
    /// Behaviour flags (version 2)
    pub behaviour_flags: ShaderBehaviourFlags,
}

impl Default for ShaderKind {
    fn default() -> Self {
        ShaderKind::Library
    }
}

/// On-wire version 1 function record, 44 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionInfoRaw {
    /// Mangled name
    pub name: StringRef,
    /// Unmangled name
    pub unmangled_name: StringRef,
    /// Resource table positions, null when empty
    pub resources: IndexArrayRef,
    /// String offsets of dependency names, null when empty
    pub dependencies: IndexArrayRef,
    /// [`ShaderKind`] in the low byte
    pub shader_kind: u32,
    /// Ray payload size
    pub payload_size_in_bytes: u32,
    /// Hit attribute size
    pub attribute_size_in_bytes: u32,
    /// Low half of [`ShaderFeatureFlags`]
    pub feature_flags_lo: u32,
    /// High half of [`ShaderFeatureFlags`]
    pub feature_flags_hi: u32,
    /// [`ShaderStageMask`] bits
    pub shader_stage_mask: u32,
    /// Minimum shader model
    pub min_shader_model: u16,
    /// Minimum kind
    pub min_kind: u16,
}

impl FunctionInfoRaw {
    /// Builds the wire record for `info`.
    ///
    /// The dependency names must already be in `strings`; the encoder interns them for every
    /// function before building any record.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnresolvableResourceReference`] if a resource binding matches
    /// no entry of `resources`.
    pub fn from_owned(
        info: &FunctionInfo,
        resources: &[ResourceInfo],
        strings: &mut StringBuffer,
        arrays: &mut IndexArrays,
    ) -> Result<Self> {
        let resource_positions = info
            .resources
            .iter()
            .map(|binding| binding.position_in(resources))
            .collect::<Result<Vec<u32>>>()?;

        let dependency_offsets: Vec<u32> = info
            .dependencies
            .iter()
            .map(|dep| strings.intern(dep).0)
            .collect();

        let name = strings.intern(&info.name);
        let unmangled_name = strings.intern(&info.unmangled_name);
        let resources = arrays.intern(&resource_positions, true);
        let dependencies = arrays.intern(&dependency_offsets, true);

        let features = info.feature_flags.bits();
        Ok(FunctionInfoRaw {
            name,
            unmangled_name,
            resources,
            dependencies,
            shader_kind: u32::from(info.shader_kind),
            payload_size_in_bytes: info.payload_size_in_bytes,
            attribute_size_in_bytes: info.attribute_size_in_bytes,
            feature_flags_lo: (features & 0xFFFF_FFFF) as u32,
            feature_flags_hi: (features >> 32) as u32,
            shader_stage_mask: info.shader_stage_mask.bits(),
            min_shader_model: info.min_shader_model,
            min_kind: info.min_kind,
        })
    }

    /// Resolves this record.
    ///
    /// Resource positions index into `resources`, which must already hold the decoded
    /// resource table.
    ///
    /// # Errors
    /// Returns [`crate::Error::DanglingReference`] if any reference points outside its stream
    /// or a resource position is past the end of `resources`.
    pub fn to_owned(
        &self,
        strings: &StringBuffer,
        arrays: &IndexArrays,
        resources: &[ResourceInfo],
    ) -> Result<FunctionInfo> {
        let mut bindings = Vec::new();
        if !self.resources.is_null() {
            for &position in arrays.span(self.resources)? {
                let Some(resource) = resources.get(position as usize) else {
                    return Err(Error::dangling("resource", position, resources.len()));
                };
                bindings.push(ResourceBinding {
                    class: resource.class,
                    id: resource.linear_id,
                });
            }
        }

        let mut dependencies = Vec::new();
        if !self.dependencies.is_null() {
            for &offset in arrays.span(self.dependencies)? {
                dependencies.push(strings.resolve(StringRef(offset))?.to_string());
            }
        }

        Ok(FunctionInfo {
            name: strings.resolve(self.name)?.to_string(),
            unmangled_name: strings.resolve(self.unmangled_name)?.to_string(),
            resources: bindings,
            dependencies,
            shader_kind: ShaderKind::from(self.shader_kind & 0xFF),
            payload_size_in_bytes: self.payload_size_in_bytes,
            attribute_size_in_bytes: self.attribute_size_in_bytes,
            feature_flags: ShaderFeatureFlags::from_bits_retain(
                u64::from(self.feature_flags_lo) | u64::from(self.feature_flags_hi) << 32,
            ),
            shader_stage_mask: ShaderStageMask::from_bits_retain(self.shader_stage_mask),
            min_shader_model: self.min_shader_model,
            min_kind: self.min_kind,
            min_wave_lane_count: 0,
            max_wave_lane_count: 0,
            behaviour_flags: ShaderBehaviourFlags::empty(),
        })
    }
}

impl RowReadable for FunctionInfoRaw {
    fn row_size() -> u32 {
        44
    }

    fn row_read(data: &[u8], offset: &mut usize) -> Result<Self> {
        Ok(FunctionInfoRaw {
            name: StringRef(read_le_at::<u32>(data, offset)?),
            unmangled_name: StringRef(read_le_at::<u32>(data, offset)?),
            resources: IndexArrayRef(read_le_at::<u32>(data, offset)?),
            dependencies: IndexArrayRef(read_le_at::<u32>(data, offset)?),
            shader_kind: read_le_at::<u32>(data, offset)?,
            payload_size_in_bytes: read_le_at::<u32>(data, offset)?,
            attribute_size_in_bytes: read_le_at::<u32>(data, offset)?,
            feature_flags_lo: read_le_at::<u32>(data, offset)?,
            feature_flags_hi: read_le_at::<u32>(data, offset)?,
            shader_stage_mask: read_le_at::<u32>(data, offset)?,
            min_shader_model: read_le_at::<u16>(data, offset)?,
            min_kind: read_le_at::<u16>(data, offset)?,
        })
    }
}

impl RowWritable for FunctionInfoRaw {
    fn row_write(&self, data: &mut [u8], offset: &mut usize) -> Result<()> {
        write_le_at(data, offset, self.name.0)?;
        write_le_at(data, offset, self.unmangled_name.0)?;
        write_le_at(data, offset, self.resources.0)?;
        write_le_at(data, offset, self.dependencies.0)?;
        write_le_at(data, offset, self.shader_kind)?;
        write_le_at(data, offset, self.payload_size_in_bytes)?;
        write_le_at(data, offset, self.attribute_size_in_bytes)?;
        write_le_at(data, offset, self.feature_flags_lo)?;
        write_le_at(data, offset, self.feature_flags_hi)?;
        write_le_at(data, offset, self.shader_stage_mask)?;
        write_le_at(data, offset, self.min_shader_model)?;
        write_le_at(data, offset, self.min_kind)?;
        Ok(())
    }
}

/// On-wire version 2 function record, 52 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionInfo2Raw {
    /// The leading version 1 fields
    pub info: FunctionInfoRaw,
    /// Minimum wave lane count
    pub min_wave_lane_count: u8,
    /// Maximum wave lane count
    pub max_wave_lane_count: u8,
    /// [`ShaderBehaviourFlags`] bits
    pub behaviour_flags: u16,
    /// Stage-specific extra data; compilers currently always write null
    pub extra_info: IndexArrayRef,
}

impl FunctionInfo2Raw {
    /// Builds the wire record for `info`. The extra-info reference is always null.
    ///
    /// # Errors
    /// See [`FunctionInfoRaw::from_owned`].
    pub fn from_owned(
        info: &FunctionInfo,
        resources: &[ResourceInfo],
        strings: &mut StringBuffer,
        arrays: &mut IndexArrays,
    ) -> Result<Self> {
        Ok(FunctionInfo2Raw {
            info: FunctionInfoRaw::from_owned(info, resources, strings, arrays)?,
            min_wave_lane_count: info.min_wave_lane_count,
            max_wave_lane_count: info.max_wave_lane_count,
            behaviour_flags: info.behaviour_flags.bits(),
            extra_info: IndexArrayRef::NULL,
        })
    }

    /// Resolves this record. The extra-info reference is not followed.
    ///
    /// # Errors
    /// See [`FunctionInfoRaw::to_owned`].
    pub fn to_owned(
        &self,
        strings: &StringBuffer,
        arrays: &IndexArrays,
        resources: &[ResourceInfo],
    ) -> Result<FunctionInfo> {
        let mut function = self.info.to_owned(strings, arrays, resources)?;
        function.min_wave_lane_count = self.min_wave_lane_count;
        function.max_wave_lane_count = self.max_wave_lane_count;
        function.behaviour_flags = ShaderBehaviourFlags::from_bits_retain(self.behaviour_flags);
        Ok(function)
    }
}

impl RowReadable for FunctionInfo2Raw {
    fn row_size() -> u32 {
        52
    }

    fn row_read(data: &[u8], offset: &mut usize) -> Result<Self> {
        Ok(FunctionInfo2Raw {
            info: FunctionInfoRaw::row_read(data, offset)?,
            min_wave_lane_count: read_le_at::<u8>(data, offset)?,
            max_wave_lane_count: read_le_at::<u8>(data, offset)?,
            behaviour_flags: read_le_at::<u16>(data, offset)?,
            extra_info: IndexArrayRef(read_le_at::<u32>(data, offset)?),
        })
    }
}

impl RowWritable for FunctionInfo2Raw {
    fn row_write(&self, data: &mut [u8], offset: &mut usize) -> Result<()> {
        self.info.row_write(data, offset)?;
        write_le_at(data, offset, self.min_wave_lane_count)?;
        write_le_at(data, offset, self.max_wave_lane_count)?;
        write_le_at(data, offset, self.behaviour_flags)?;
        write_le_at(data, offset, self.extra_info.0)?;
        Ok(())
    }
}
