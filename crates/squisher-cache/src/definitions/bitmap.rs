use zerocopy::little_endian::{F32, I16, U16};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use super::TagDefinition;
use crate::group::TagGroup;
use crate::layout::Reflexive;

/// `bitmap` base struct.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct Bitmap {
    pub bitmap_type: U16,
    _pad0: [u8; 0x52],
    pub sequences: Reflexive,
    pub bitmaps: Reflexive,
}

impl TagDefinition for Bitmap {
    const GROUP: TagGroup = TagGroup::Bitmap;
}

impl Bitmap {
    pub const TYPE_SPRITES: u16 = 3;
}

#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct BitmapSequence {
    _pad0: [u8; 0x34],
    pub sprites: Reflexive,
}

#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct BitmapSprite {
    pub bitmap_index: I16,
    _pad0: [u8; 6],
    pub left: F32,
    pub right: F32,
    pub top: F32,
    pub bottom: F32,
    pub registration_x: F32,
    pub registration_y: F32,
}

#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct BitmapData {
    _pad0: [u8; 4],
    pub width: I16,
    pub height: I16,
    _pad1: [u8; 6],
    pub flags: U16,
    _pad2: [u8; 32],
}

impl BitmapData {
    /// Pixels live in the bitmap resource map.
    pub const FLAG_EXTERNAL: u16 = 1 << 8;

    pub fn is_external(&self) -> bool {
        self.flags.get() & Self::FLAG_EXTERNAL != 0
    }
}

const _: () = assert!(std::mem::size_of::<Bitmap>() == 108);
const _: () = assert!(std::mem::size_of::<BitmapSequence>() == 64);
const _: () = assert!(std::mem::size_of::<BitmapSprite>() == 32);
const _: () = assert!(std::mem::size_of::<BitmapData>() == 48);
