use zerocopy::little_endian::F32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use super::TagDefinition;
use crate::group::TagGroup;

/// `lens_flare` base struct.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct LensFlare {
    _pad0: [u8; 0x84],
    /// Stored in radians by the game
    pub corona_rotation_function_scale: F32,
    _pad1: [u8; 104],
}

impl TagDefinition for LensFlare {
    const GROUP: TagGroup = TagGroup::LensFlare;
}
