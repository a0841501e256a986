use zerocopy::little_endian::I16;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use super::TagDefinition;
use crate::group::TagGroup;
use crate::layout::TagDataBlob;

/// `meter` base struct.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct Meter {
    _pad0: [u8; 0x94],
    pub runtime_width: I16,
    pub runtime_height: I16,
    /// Run-length rows of 4-byte pixels: mask, padding, level
    pub encoded_stencil: TagDataBlob,
}

impl TagDefinition for Meter {
    const GROUP: TagGroup = TagGroup::Meter;
}

impl Meter {
    /// Row header: origin x, origin y, pixel count.
    pub const ROW_HEADER_SIZE: usize = 6;
    pub const PIXEL_SIZE: usize = 4;
    /// Offset of the padding byte inside a pixel.
    pub const PIXEL_PAD_OFFSET: usize = 1;
}
