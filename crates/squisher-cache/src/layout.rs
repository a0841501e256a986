//! Fixed binary layouts shared by every tag.
//!
//! All structures are little-endian on disk and use zerocopy's byte-order
//! aware integer types, so they can be viewed in place over unaligned
//! tag data regardless of host endianness.

use zerocopy::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::group::TagGroup;
use crate::id::TagId;

/// Header at the start of the tag data region.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct TagDataHeader {
    /// Virtual address of the tag array
    pub tag_array_address: U32,
    /// ID of the scenario tag
    pub scenario_tag: U32,
    /// Checksum of the tag data (not verified by the game)
    pub tag_data_checksum: U32,
    /// Number of tags in the tag array
    pub tag_count: U32,
    /// Number of model vertex buffers
    pub vertex_buffer_count: U32,
    /// File offset of model data
    pub model_data_offset: U32,
    /// Number of model index buffers
    pub index_buffer_count: U32,
    /// Offset of the index buffers from the start of model data
    pub index_buffer_offset: U32,
    /// Size of model data
    pub model_data_size: U32,
    /// `tags`
    pub signature: U32,
}

impl TagDataHeader {
    pub const SIZE: usize = 40;

    /// Offset of `tag_data_checksum` within the header.
    pub const CHECKSUM_OFFSET: usize = 8;

    /// `tags` as stored.
    pub const SIGNATURE: u32 = 0x7461_6773;

    pub fn scenario_tag(&self) -> TagId {
        TagId::from_raw(self.scenario_tag.get())
    }
}

/// One entry of the tag array.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct TagRecord {
    pub primary_group: U32,
    pub secondary_group: U32,
    pub tertiary_group: U32,
    pub tag_id: U32,
    pub path_address: U32,
    /// Virtual address of the tag's base struct, or a resource index when external
    pub data_address: U32,
    pub external: U32,
    pub padding: U32,
}

impl TagRecord {
    pub const SIZE: usize = 32;

    pub fn tag_id(&self) -> TagId {
        TagId::from_raw(self.tag_id.get())
    }

    pub fn groups(&self) -> [u32; 3] {
        [
            self.primary_group.get(),
            self.secondary_group.get(),
            self.tertiary_group.get(),
        ]
    }

    pub fn primary(&self) -> Option<TagGroup> {
        TagGroup::from_fourcc(self.primary_group.get())
    }

    /// Whether the tag can be viewed as `group`.
    pub fn is_a(&self, group: TagGroup) -> bool {
        self.groups().contains(&group.fourcc())
    }

    pub fn is_external(&self) -> bool {
        self.external.get() != 0
    }
}

/// Variable-length array descriptor embedded in tag structs.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct Reflexive {
    pub count: U32,
    pub address: U32,
    /// Runtime definition pointer, unused in cache files
    pub definition: U32,
}

impl Reflexive {
    pub fn count(&self) -> u32 {
        self.count.get()
    }

    pub fn is_empty(&self) -> bool {
        self.count.get() == 0
    }
}

/// Reference from one tag to another.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct TagReference {
    pub group: U32,
    pub path_address: U32,
    pub path_length: U32,
    pub tag_id: U32,
}

impl TagReference {
    /// An empty reference of `group`.
    pub fn null(group: TagGroup) -> Self {
        Self {
            group: U32::new(group.fourcc()),
            path_address: U32::new(0),
            path_length: U32::new(0),
            tag_id: U32::new(TagId::NULL.raw()),
        }
    }

    pub fn tag_id(&self) -> TagId {
        TagId::from_raw(self.tag_id.get())
    }

    pub fn is_null(&self) -> bool {
        self.tag_id().is_null()
    }
}

/// Descriptor of an opaque data blob inside a tag.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct TagDataBlob {
    pub size: U32,
    pub flags: U32,
    pub file_offset: U32,
    pub address: U32,
    pub definition: U32,
}

const _: () = assert!(std::mem::size_of::<TagDataHeader>() == TagDataHeader::SIZE);
const _: () = assert!(std::mem::size_of::<TagRecord>() == TagRecord::SIZE);
const _: () = assert!(std::mem::size_of::<Reflexive>() == 12);
const _: () = assert!(std::mem::size_of::<TagReference>() == 16);
const _: () = assert!(std::mem::size_of::<TagDataBlob>() == 20);
