use zerocopy::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use super::model::VertexBuffer;
use super::TagDefinition;
use crate::group::TagGroup;
use crate::layout::Reflexive;

/// Header at the start of each cached BSP blob.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct BspHeader {
    /// Address of the `scenario_structure_bsp` struct in the BSP's address space
    pub structure_bsp: U32,
    pub vertex_buffer_count: U32,
    pub vertex_buffers: U32,
    pub lightmap_vertex_buffer_count: U32,
    pub lightmap_vertex_buffers: U32,
    /// `sbsp`
    pub signature: U32,
}

impl BspHeader {
    pub const SIZE: usize = 24;

    /// `sbsp` as stored.
    pub const SIGNATURE: u32 = 0x7362_7370;
}

/// `scenario_structure_bsp` base struct.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct StructureBsp {
    _pad0: [u8; 0x104],
    pub lightmaps: Reflexive,
    _pad1: [u8; 376],
}

impl TagDefinition for StructureBsp {
    const GROUP: TagGroup = TagGroup::ScenarioStructureBsp;
}

#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct StructureLightmap {
    _pad0: [u8; 0x14],
    pub materials: Reflexive,
}

#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct StructureMaterial {
    _pad0: [u8; 0xB0],
    pub vertices: VertexBuffer,
    pub lightmap_vertices: VertexBuffer,
    _pad1: [u8; 40],
}

const _: () = assert!(std::mem::size_of::<BspHeader>() == BspHeader::SIZE);
const _: () = assert!(std::mem::size_of::<StructureBsp>() == 648);
const _: () = assert!(std::mem::size_of::<StructureLightmap>() == 32);
const _: () = assert!(std::mem::size_of::<StructureMaterial>() == 256);
