use zerocopy::little_endian::U16;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use super::TagDefinition;
use crate::group::TagGroup;

/// `unit` base struct (object block followed by the unit block).
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct Unit {
    _pad0: [u8; 0x29C],
    pub metagame_type: U16,
    pub metagame_class: U16,
    _pad1: [u8; 80],
}

impl TagDefinition for Unit {
    const GROUP: TagGroup = TagGroup::Unit;
}

impl Unit {
    /// Largest valid metagame type (brute through the last hero type).
    pub const MAX_METAGAME_TYPE: u16 = 43;

    /// Largest valid metagame class.
    pub const MAX_METAGAME_CLASS: u16 = 7;
}

/// `actor_variant` base struct.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct ActorVariant {
    _pad0: [u8; 0x34],
    /// Same range as [`Unit::metagame_type`]
    pub metagame_type: U16,
    /// Same range as [`Unit::metagame_class`]
    pub metagame_class: U16,
    _pad1: [u8; 512],
}

impl TagDefinition for ActorVariant {
    const GROUP: TagGroup = TagGroup::ActorVariant;
}
