//! Resource records: the SRVs, UAVs, constant buffers and samplers a library binds globally.
//!
//! Function records refer to resources by their *position* in the resource table, so the
//! order of [`crate::RuntimeData::resources`] is significant and preserved by both directions
//! of the codec.

use bitflags::bitflags;

use crate::{
    file::io::{read_le_at, write_le_at},
    rdat::{
        parts::{RowReadable, RowWritable},
        refs::StringRef,
        streams::StringBuffer,
    },
    Result,
};

wire_enum! {
    /// The binding namespace of a resource.
    pub enum ResourceClass {
        /// Shader resource view
        Srv = 0,
        /// Unordered access view
        Uav = 1,
        /// Constant buffer
        CBuffer = 2,
        /// Sampler
        Sampler = 3,
    }
}

wire_enum! {
    /// The shape of a resource.
    pub enum ResourceKind {
        /// Invalid / unset
        Invalid = 0,
        /// `Texture1D`
        Texture1D = 1,
        /// `Texture2D`
        Texture2D = 2,
        /// Multisampled `Texture2D`
        Texture2DMS = 3,
        /// `Texture3D`
        Texture3D = 4,
        /// `TextureCube`
        TextureCube = 5,
        /// `Texture1DArray`
        Texture1DArray = 6,
        /// `Texture2DArray`
        Texture2DArray = 7,
        /// Multisampled `Texture2DArray`
        Texture2DMSArray = 8,
        /// `TextureCubeArray`
        TextureCubeArray = 9,
        /// Typed buffer
        TypedBuffer = 10,
        /// Raw (byte address) buffer
        RawBuffer = 11,
        /// Structured buffer
        StructuredBuffer = 12,
        /// Constant buffer
        CBuffer = 13,
        /// Sampler
        Sampler = 14,
        /// Texture buffer
        TBuffer = 15,
        /// Raytracing acceleration structure
        RTAccelerationStructure = 16,
        /// Sampler feedback `Texture2D`
        FeedbackTexture2D = 17,
        /// Sampler feedback `Texture2DArray`
        FeedbackTexture2DArray = 18,
    }
}

bitflags! {
    #[derive(PartialEq, Eq, Debug, Clone, Copy, Hash, Default)]
    /// Per-resource flags
    pub struct ResourceFlags : u32 {
        /// UAV declared `globallycoherent`
        const GLOBALLY_COHERENT = 0x0001;
        /// UAV has a hidden counter
        const HAS_COUNTER = 0x0002;
        /// Rasterizer ordered view
        const ROV = 0x0004;
        /// Resource is indexed dynamically
        const DYNAMIC_INDEXING = 0x0008;
        /// Resource is used with 64-bit atomics
        const ATOMICS_64 = 0x0010;
    }
}

/// A resource record with its name resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceInfo {
    /// Binding namespace
    pub class: ResourceClass,
    /// Resource shape
    pub kind: ResourceKind,
    /// Linear id within `class`; functions reference resources by `(class, linear_id)`
    pub linear_id: u32,
    /// Register space
    pub space: u32,
    /// First register
    pub lower_bound: u32,
    /// Last register
    pub upper_bound: u32,
    /// Declared name
    pub name: String,
    /// Resource flags
    pub flags: ResourceFlags,
}

/// On-wire resource record, 32 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceInfoRaw {
    /// [`ResourceClass`] value
    pub class: u32,
    /// [`ResourceKind`] value
    pub kind: u32,
    /// Linear id
    pub linear_id: u32,
    /// Register space
    pub space: u32,
    /// First register
    pub lower_bound: u32,
    /// Last register
    pub upper_bound: u32,
    /// Offset of the name in the string buffer
    pub name: StringRef,
    /// [`ResourceFlags`] bits
    pub flags: u32,
}

impl ResourceInfoRaw {
    /// Builds the wire record for `info`, interning its name into `strings`.
    pub fn from_owned(info: &ResourceInfo, strings: &mut StringBuffer) -> Self {
        ResourceInfoRaw {
            class: info.class.into(),
            kind: info.kind.into(),
            linear_id: info.linear_id,
            space: info.space,
            lower_bound: info.lower_bound,
            upper_bound: info.upper_bound,
            name: strings.intern(&info.name),
            flags: info.flags.bits(),
        }
    }

    /// Resolves this record against the string buffer.
    ///
    /// # Errors
    /// Returns an error if the name reference does not resolve.
    pub fn to_owned(&self, strings: &StringBuffer) -> Result<ResourceInfo> {
        Ok(ResourceInfo {
            class: ResourceClass::from(self.class),
            kind: ResourceKind::from(self.kind),
            linear_id: self.linear_id,
            space: self.space,
            lower_bound: self.lower_bound,
            upper_bound: self.upper_bound,
            name: strings.resolve(self.name)?.to_string(),
            flags: ResourceFlags::from_bits_retain(self.flags),
        })
    }
}

impl RowReadable for ResourceInfoRaw {
    fn row_size() -> u32 {
        32
    }

    fn row_read(data: &[u8], offset: &mut usize) -> Result<Self> {
        Ok(ResourceInfoRaw {
            class: read_le_at::<u32>(data, offset)?,
            kind: read_le_at::<u32>(data, offset)?,
            linear_id: read_le_at::<u32>(data, offset)?,
            space: read_le_at::<u32>(data, offset)?,
            lower_bound: read_le_at::<u32>(data, offset)?,
            upper_bound: read_le_at::<u32>(data, offset)?,
            name: StringRef(read_le_at::<u32>(data, offset)?),
            flags: read_le_at::<u32>(data, offset)?,
        })
    }
}

impl RowWritable for ResourceInfoRaw {
    fn row_write(&self, data: &mut [u8], offset: &mut usize) -> Result<()> {
        write_le_at(data, offset, self.class)?;
        write_le_at(data, offset, self.kind)?;
        write_le_at(data, offset, self.linear_id)?;
        write_le_at(data, offset, self.space)?;
        write_le_at(data, offset, self.lower_bound)?;
        write_le_at(data, offset, self.upper_bound)?;
        write_le_at(data, offset, self.name.0)?;
        write_le_at(data, offset, self.flags)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted_short() {
        #[rustfmt::skip]
        let data = vec![
            0x01, 0x00, 0x00, 0x00, // class
            0x0C, 0x00, 0x00, 0x00, // kind
            0x02, 0x00, 0x00, 0x00, // linear_id
            0x03, 0x00, 0x00, 0x00, // space
            0x04, 0x00, 0x00, 0x00, // lower_bound
            0x04, 0x00, 0x00, 0x00, // upper_bound
            0x01, 0x00, 0x00, 0x00, // name
            0x03, 0x00, 0x00, 0x00, // flags
        ];

        let mut offset = 0;
        let row = ResourceInfoRaw::row_read(&data, &mut offset).unwrap();
        assert_eq!(offset, 32);

        let mut strings = StringBuffer::new(true);
        strings.load(b"\0gOutput\0");
        let info = row.to_owned(&strings).unwrap();

        assert_eq!(info.class, ResourceClass::Uav);
        assert_eq!(info.kind, ResourceKind::StructuredBuffer);
        assert_eq!(info.linear_id, 2);
        assert_eq!(info.space, 3);
        assert_eq!(info.lower_bound, 4);
        assert_eq!(info.upper_bound, 4);
        assert_eq!(info.name, "gOutput");
        assert_eq!(
            info.flags,
            ResourceFlags::GLOBALLY_COHERENT | ResourceFlags::HAS_COUNTER
        );

        let mut written = vec![0u8; 32];
        let mut offset = 0;
        row.row_write(&mut written, &mut offset).unwrap();
        assert_eq!(written, data);
    }

    #[test]
    fn unknown_values_survive() {
        let raw = ResourceInfoRaw {
            class: 7,
            kind: 0x40,
            linear_id: 0,
            space: 0,
            lower_bound: 0,
            upper_bound: u32::MAX,
            name: StringRef(0),
            flags: 0x8000_0000,
        };

        let strings = StringBuffer::new(true);
        let info = raw.to_owned(&strings).unwrap();
        assert_eq!(info.class, ResourceClass::Unknown(7));
        assert_eq!(info.kind, ResourceKind::Unknown(0x40));
        assert_eq!(info.name, "");

        let mut strings = StringBuffer::new(true);
        assert_eq!(ResourceInfoRaw::from_owned(&info, &mut strings), raw);
    }

    #[test]
    fn class_display() {
        assert_eq!(ResourceClass::CBuffer.to_string(), "CBuffer");
        assert_eq!(ResourceClass::Unknown(9).to_string(), "Unknown(0x9)");
        assert_eq!(u32::from(ResourceClass::Sampler), 3);
    }

    #[test]
    fn known_value_in_unknown_normalizes() {
        assert_ne!(ResourceClass::Unknown(1), ResourceClass::Uav);
        assert_eq!(ResourceClass::Unknown(1).normalized(), ResourceClass::Uav);
        assert_eq!(ResourceClass::Unknown(9).normalized(), ResourceClass::Unknown(9));
        assert_eq!(ResourceKind::Unknown(2).normalized(), ResourceKind::Texture2D);
        assert_eq!(ResourceClass::from(u32::from(ResourceClass::Unknown(1))), ResourceClass::Uav);
    }
}
