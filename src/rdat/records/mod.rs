//! Record types stored in the RDAT tables.
//!
//! Every record exists in two forms, following the raw / owned split used throughout the crate:
//!
//! - The `*Raw` form mirrors the on-wire layout one field per word, with strings and arrays held
//!   as references into the shared streams. It implements [`crate::rdat::RowReadable`] and
//!   [`crate::rdat::RowWritable`].
//! - The owned form has every reference resolved into a `String`, `Vec` or enum value and is what
//!   [`crate::RuntimeData`] exposes.
//!
//! Enumerations that come straight from the compiler keep values they do not know as
//! `Unknown(u32)`, so a decode / encode round trip never loses information. An `Unknown` built
//! by hand around a known value decodes as the named variant; `normalized` folds it early.

/// Declares a `u32`-backed wire enum with an `Unknown(u32)` fallback, plus the conversions
/// to and from `u32` and a `Display` impl printing the variant name.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $value:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )+
            /// A value not known to this crate, kept verbatim.
            ///
            /// Holding a known value here is not stable: it compares unequal to the named
            /// variant and comes back as that variant after a round trip.
            Unknown(u32),
        }

        impl $name {
            /// Returns the named variant if this is an `Unknown` holding a known value.
            #[must_use]
            pub fn normalized(self) -> Self {
                Self::from(u32::from(self))
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                match value {
                    $($value => $name::$variant,)+
                    other => $name::Unknown(other),
                }
            }
        }

        impl From<$name> for u32 {
            fn from(value: $name) -> u32 {
                match value {
                    $($name::$variant => $value,)+
                    $name::Unknown(other) => other,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $($name::$variant => write!(f, stringify!($variant)),)+
                    $name::Unknown(other) => write!(f, "Unknown({:#x})", other),
                }
            }
        }
    };
}

mod function;
mod resource;
mod subobject;

pub use function::{
    FunctionInfo, FunctionInfo2Raw, FunctionInfoRaw, FunctionInfoVersion, ResourceBinding,
    ShaderBehaviourFlags, ShaderFeatureFlags, ShaderKind, ShaderStageMask,
};
pub use resource::{ResourceClass, ResourceFlags, ResourceInfo, ResourceInfoRaw, ResourceKind};
pub use subobject::{
    ExportsAssociation, HitGroup, HitGroupType, RaytracingPipelineConfig,
    RaytracingPipelineFlags, RaytracingShaderConfig, RootSignature, StateObjectConfig,
    StateObjectFlags, SubobjectData, SubobjectInfo, SubobjectInfoRaw, SubobjectKind,
};
