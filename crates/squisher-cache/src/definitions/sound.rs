use zerocopy::little_endian::{F32, U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use super::TagDefinition;
use crate::group::TagGroup;

/// `sound` base struct. Always present in the map, even for external sounds.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct Sound {
    pub flags: U32,
    pub sound_class: U16,
    pub sample_rate: U16,
    pub minimum_distance: F32,
    pub maximum_distance: F32,
    _pad0: [u8; 148],
}

impl TagDefinition for Sound {
    const GROUP: TagGroup = TagGroup::Sound;
}
