//! Tag struct layouts.
//!
//! Only the fields something in this workspace reads or repairs are named;
//! everything else is kept as opaque padding so each struct still spans the
//! group's full base struct size.

mod bitmap;
mod bsp;
mod decal;
mod hud;
mod lens_flare;
mod meter;
mod model;
mod scenario;
mod shader;
mod sound;
mod unit;

pub use bitmap::{Bitmap, BitmapData, BitmapSequence, BitmapSprite};
pub use bsp::{BspHeader, StructureBsp, StructureLightmap, StructureMaterial};
pub use decal::Decal;
pub use hud::{
    CrosshairItem, GrenadeHudInterface, HudElement, HudGlobals, UnitHudInterface, WeaponHudCrosshairs,
    WeaponHudInterface, WeaponHudMeter, WeaponHudNumber, WeaponHudOverlays, WeaponHudStatic, MAX_CANVAS_SIZE,
    MAX_CHILD_ANCHOR,
};
pub use lens_flare::LensFlare;
pub use meter::Meter;
pub use model::{vertex_type, Gbxmodel, GbxmodelPart, ModelGeometry, VertexBuffer};
pub use scenario::{AiConversation, BspReference, ConversationLine, ConversationParticipant, Scenario};
pub use shader::{Shader, ShaderModel};
pub use sound::Sound;
pub use unit::{ActorVariant, Unit};

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::group::TagGroup;

/// Any fixed-size block that can be viewed in place over tag data.
pub trait TagBlock: FromBytes + IntoBytes + KnownLayout + Immutable + Unaligned {}

impl<T: FromBytes + IntoBytes + KnownLayout + Immutable + Unaligned> TagBlock for T {}

/// The base struct of a tag group.
pub trait TagDefinition: TagBlock {
    const GROUP: TagGroup;
}
