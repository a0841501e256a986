use zerocopy::little_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use super::TagDefinition;
use crate::group::TagGroup;
use crate::layout::{Reflexive, TagReference};

/// `scenario` base struct.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct Scenario {
    _pad0: [u8; 0x124],
    /// Xbox-only block; never valid in PC maps
    pub scavenger_hunt_objects: Reflexive,
    _pad1: [u8; 0x338],
    pub ai_conversations: Reflexive,
    _pad2: [u8; 0x130],
    pub structure_bsps: Reflexive,
}

impl TagDefinition for Scenario {
    const GROUP: TagGroup = TagGroup::Scenario;
}

/// Entry of the scenario's structure BSP list.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct BspReference {
    /// File offset of the BSP blob
    pub file_offset: U32,
    /// Size of the BSP blob
    pub file_size: U32,
    /// Address the BSP blob is laid out for
    pub address: U32,
    _unused: U32,
    pub structure_bsp: TagReference,
}

#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct AiConversation {
    _pad0: [u8; 0x50],
    pub participants: Reflexive,
    pub lines: Reflexive,
    _pad1: [u8; 12],
}

#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct ConversationParticipant {
    _pad0: [u8; 0x18],
    pub variant_numbers: [U16; 6],
    _pad1: [u8; 48],
}

#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct ConversationLine {
    _flags: [u8; 2],
    pub participant: U16,
    _pad0: [u8; 24],
    pub variants: [TagReference; 6],
}

const _: () = assert!(std::mem::size_of::<Scenario>() == 1456);
const _: () = assert!(std::mem::size_of::<BspReference>() == 32);
const _: () = assert!(std::mem::size_of::<AiConversation>() == 116);
const _: () = assert!(std::mem::size_of::<ConversationParticipant>() == 84);
const _: () = assert!(std::mem::size_of::<ConversationLine>() == 124);
