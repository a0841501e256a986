use zerocopy::little_endian::{F32, U16};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use super::TagDefinition;
use crate::group::TagGroup;
use crate::layout::TagReference;

/// `shader` base struct, shared by every shader group.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct Shader {
    _pad0: [u8; 0x24],
    /// Runtime shader type; must agree with the tag's concrete group
    pub shader_type: U16,
    _pad1: [u8; 2],
}

impl TagDefinition for Shader {
    const GROUP: TagGroup = TagGroup::Shader;
}

impl Shader {
    /// Shader type value for a concrete shader group.
    pub const fn type_for(group: TagGroup) -> Option<u16> {
        Some(match group {
            TagGroup::ShaderEnvironment => 3,
            TagGroup::ShaderModel => 4,
            TagGroup::ShaderTransparentGeneric => 5,
            TagGroup::ShaderTransparentChicago => 6,
            TagGroup::ShaderTransparentChicagoExtended => 7,
            TagGroup::ShaderTransparentWater => 8,
            TagGroup::ShaderTransparentGlass => 9,
            TagGroup::ShaderTransparentMeter => 10,
            TagGroup::ShaderTransparentPlasma => 11,
            _ => return None,
        })
    }
}

/// `shader_model` base struct.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct ShaderModel {
    _pad0: [u8; 0x184],
    /// No longer used; the compilers copy it without swapping
    pub reflection_bump_map_scale: F32,
    /// No longer used; the compilers copy it without swapping
    pub reflection_bump_map: TagReference,
    _pad1: [u8; 32],
}

impl TagDefinition for ShaderModel {
    const GROUP: TagGroup = TagGroup::ShaderModel;
}

const _: () = assert!(std::mem::size_of::<Shader>() == 40);
const _: () = assert!(std::mem::size_of::<ShaderModel>() == 440);
