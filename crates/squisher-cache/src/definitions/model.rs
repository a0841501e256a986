use zerocopy::little_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use super::TagDefinition;
use crate::group::TagGroup;
use crate::layout::Reflexive;

/// Rasterizer vertex types used by the repairs.
pub mod vertex_type {
    pub const ENVIRONMENT_UNCOMPRESSED: u16 = 0;
    pub const ENVIRONMENT_LIGHTMAP_UNCOMPRESSED: u16 = 2;
}

#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct VertexBuffer {
    pub vertex_type: U16,
    _pad: [u8; 2],
    pub count: U32,
    pub offset: U32,
    /// Runtime pointer left over from the build
    pub base_address: U32,
    pub hardware_format: U32,
}

/// `gbxmodel` base struct.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct Gbxmodel {
    _pad0: [u8; 0xD0],
    pub geometries: Reflexive,
    _pad1: [u8; 12],
}

impl TagDefinition for Gbxmodel {
    const GROUP: TagGroup = TagGroup::Gbxmodel;
}

#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct ModelGeometry {
    _pad0: [u8; 0x24],
    pub parts: Reflexive,
}

#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct GbxmodelPart {
    _pad0: [u8; 0x54],
    pub vertex_buffer: VertexBuffer,
    _pad1: [u8; 28],
}

const _: () = assert!(std::mem::size_of::<VertexBuffer>() == 20);
const _: () = assert!(std::mem::size_of::<Gbxmodel>() == 232);
const _: () = assert!(std::mem::size_of::<ModelGeometry>() == 48);
const _: () = assert!(std::mem::size_of::<GbxmodelPart>() == 132);
