use zerocopy::little_endian::{F32, U16};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use super::TagDefinition;
use crate::group::TagGroup;
use crate::layout::TagReference;

/// `decal` base struct.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct Decal {
    pub flags: U16,
    _pad0: [u8; 0xD6],
    /// Bitmap the decal draws
    pub map: TagReference,
    _pad1: [u8; 20],
    pub runtime_maximum_sprite_extent: F32,
    _pad2: [u8; 12],
}

impl TagDefinition for Decal {
    const GROUP: TagGroup = TagGroup::Decal;
}

impl Decal {
    /// Without this flag the game ignores the computed extent.
    pub const FLAG_SPRITE_SCALE_BUG_FIX: u16 = 1 << 10;

    /// Extent the stock compiler writes for every decal.
    pub const DEFAULT_SPRITE_EXTENT: f32 = 16.0;

    pub fn has_sprite_scale_fix(&self) -> bool {
        self.flags.get() & Self::FLAG_SPRITE_SCALE_BUG_FIX != 0
    }
}

const _: () = assert!(std::mem::size_of::<Decal>() == 268);
