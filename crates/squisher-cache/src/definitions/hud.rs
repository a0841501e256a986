use zerocopy::little_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use super::{TagBlock, TagDefinition};
use crate::group::TagGroup;
use crate::layout::Reflexive;

/// Largest valid HUD child anchor (from parent through right center).
pub const MAX_CHILD_ANCHOR: u16 = 9;

/// Largest valid HUD canvas size (480p, 960p).
pub const MAX_CANVAS_SIZE: u16 = 1;

/// `weapon_hud_interface` base struct.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct WeaponHudInterface {
    _pad0: [u8; 0x3C],
    pub anchor: U16,
    pub canvas_size: U16,
    _pad1: [u8; 0x20],
    pub statics: Reflexive,
    pub meters: Reflexive,
    pub numbers: Reflexive,
    pub crosshairs: Reflexive,
    pub overlays: Reflexive,
    /// One bit per crosshair type present in `crosshairs`
    pub crosshair_types: U32,
    _pad2: [u8; 220],
}

impl TagDefinition for WeaponHudInterface {
    const GROUP: TagGroup = TagGroup::WeaponHudInterface;
}

impl WeaponHudInterface {
    /// `crosshair_types` bit for zoom overlays.
    pub const CROSSHAIR_TYPE_ZOOM: u32 = 1 << 1;
}

/// A weapon HUD element, all of which open with the same header.
pub trait HudElement: TagBlock {
    fn child_anchor_mut(&mut self) -> &mut U16;
}

macro_rules! hud_element {
    ($(#[$meta:meta])* $name:ident, $size:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
        #[repr(C)]
        pub struct $name {
            _pad0: [u8; 6],
            pub child_anchor: U16,
            _pad1: [u8; $size - 8],
        }

        impl HudElement for $name {
            fn child_anchor_mut(&mut self) -> &mut U16 {
                &mut self.child_anchor
            }
        }

        const _: () = assert!(std::mem::size_of::<$name>() == $size);
    };
}

hud_element!(WeaponHudStatic, 180);
hud_element!(WeaponHudMeter, 180);
hud_element!(WeaponHudNumber, 160);
hud_element!(WeaponHudOverlays, 104);

#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct WeaponHudCrosshairs {
    _pad0: [u8; 0x34],
    pub items: Reflexive,
    _pad1: [u8; 40],
}

#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct CrosshairItem {
    _pad0: [u8; 0x48],
    pub flags: U32,
    _pad1: [u8; 32],
}

impl CrosshairItem {
    pub const FLAG_NOT_ON_DEFAULT_ZOOM: u32 = 1 << 2;
    pub const FLAG_ONE_ZOOM_LEVEL: u32 = 1 << 5;
    pub const FLAG_ONLY_ON_DEFAULT_ZOOM: u32 = 1 << 6;

    /// Whether the item's visibility depends on the zoom level.
    pub fn is_zoom_dependent(&self) -> bool {
        self.flags.get()
            & (Self::FLAG_NOT_ON_DEFAULT_ZOOM | Self::FLAG_ONE_ZOOM_LEVEL | Self::FLAG_ONLY_ON_DEFAULT_ZOOM)
            != 0
    }
}

/// `hud_globals` base struct.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct HudGlobals {
    /// Messaging absolute placement anchor
    pub anchor: U16,
    pub canvas_size: U16,
    _pad0: [u8; 1100],
}

impl TagDefinition for HudGlobals {
    const GROUP: TagGroup = TagGroup::HudGlobals;
}

/// `grenade_hud_interface` base struct.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct GrenadeHudInterface {
    pub anchor: U16,
    pub canvas_size: U16,
    _pad0: [u8; 500],
}

impl TagDefinition for GrenadeHudInterface {
    const GROUP: TagGroup = TagGroup::GrenadeHudInterface;
}

/// `unit_hud_interface` base struct.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct UnitHudInterface {
    pub anchor: U16,
    pub canvas_size: U16,
    _pad0: [u8; 0x37C],
    /// Absolute placement of the auxiliary panel
    pub auxiliary_anchor: U16,
    pub auxiliary_canvas_size: U16,
    _pad1: [u8; 488],
}

impl TagDefinition for UnitHudInterface {
    const GROUP: TagGroup = TagGroup::UnitHudInterface;
}

const _: () = assert!(std::mem::size_of::<WeaponHudInterface>() == 380);
const _: () = assert!(std::mem::size_of::<WeaponHudCrosshairs>() == 104);
const _: () = assert!(std::mem::size_of::<CrosshairItem>() == 108);
const _: () = assert!(std::mem::size_of::<HudGlobals>() == 1104);
const _: () = assert!(std::mem::size_of::<GrenadeHudInterface>() == 504);
const _: () = assert!(std::mem::size_of::<UnitHudInterface>() == 1388);
