//! # rdatscope Prelude
//!
//! Commonly used types for decoding, inspecting and re-encoding runtime data.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all rdatscope operations
pub use crate::Error;

/// The result type used throughout rdatscope
pub use crate::Result;

/// Collector for non-fatal findings
pub use crate::diagnostics::{Diagnostic, DiagnosticCategory, Diagnostics};

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Decoded RDAT chunk content
pub use crate::rdat::{RuntimeData, RDAT_VERSION_1_0};

/// Shader containers
pub use crate::container::{ChunkContainer, DxbcContainer, FourCC, RDAT_FOURCC};

// ================================================================================================
// Records
// ================================================================================================

/// Resource records
pub use crate::rdat::records::{ResourceClass, ResourceFlags, ResourceInfo, ResourceKind};

/// Function records
pub use crate::rdat::records::{
    FunctionInfo, FunctionInfoVersion, ResourceBinding, ShaderBehaviourFlags, ShaderFeatureFlags,
    ShaderKind, ShaderStageMask,
};

/// Subobject records
pub use crate::rdat::records::{
    ExportsAssociation, HitGroup, HitGroupType, RaytracingPipelineConfig,
    RaytracingPipelineFlags, RaytracingShaderConfig, RootSignature, StateObjectConfig,
    StateObjectFlags, SubobjectData, SubobjectInfo, SubobjectKind,
};

// ================================================================================================
// Low-level access
// ================================================================================================

/// Part framing
pub use crate::rdat::parts::{PartKind, PartWriter, RowReadable, RowWritable};

/// Blob streams
pub use crate::rdat::streams::{IndexArrays, RawBytes, StringBuffer};

/// Stream references
pub use crate::rdat::refs::{BytesRef, IndexArrayRef, StringRef};

/// Byte cursor
pub use crate::Parser;
