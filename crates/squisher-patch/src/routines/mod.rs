//! Defect Patch Routines.
//!
//! Each routine repairs one known defect of the stock map compilers and
//! reports whether it changed anything. Values are only written when they
//! differ from what is already there.

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

pub use bitmap::remap_external_bitmaps;
pub use bsp::fix_cached_bsps;
pub use decal::fix_decal;
pub use hud::{fix_grenade_hud_interface, fix_hud_globals, fix_unit_hud_interface, fix_weapon_hud_interface};
pub use lens_flare::fix_lens_flare;
pub use meter::fix_meter;
pub use model::fix_gbxmodel;
pub use scenario::fix_scenario;
pub use shader::{fix_shader, fix_shader_model};
pub use sound::fix_sound;
pub use unit::{fix_actor_variant, fix_unit};

use squisher_cache::{CacheFile, TagId};
use zerocopy::little_endian::{F32, U16};

use crate::Error;

/// Bring an enum field back into `0..=max`.
///
/// Out-of-range values are usually the right value in the wrong byte order,
/// so the swapped value is kept when it is valid; anything else becomes
/// `default`.
pub(crate) fn make_enum16_valid(field: &mut U16, max: u16, default: u16) -> bool {
    let value = field.get();
    if value <= max {
        return false;
    }
    let swapped = value.swap_bytes();
    field.set(if swapped <= max { swapped } else { default });
    true
}

/// Write `value` if it differs.
pub(crate) fn set_u16(field: &mut U16, value: u16) -> bool {
    if field.get() == value {
        return false;
    }
    field.set(value);
    true
}

/// Write `value` if its bits differ.
pub(crate) fn set_f32(field: &mut F32, value: f32) -> bool {
    if field.get().to_bits() == value.to_bits() {
        return false;
    }
    field.set(value);
    true
}

pub(crate) fn invalid_tag(cache: &CacheFile, tag_id: TagId) -> Error {
    Error::InvalidTagData {
        tag: cache.get_extension_or_placeholder(tag_id).into_owned(),
    }
}

pub(crate) fn out_of_bounds(cache: &CacheFile, tag_id: TagId, element: String) -> Error {
    Error::OutOfBounds {
        element,
        tag: cache.get_extension_or_placeholder(tag_id).into_owned(),
    }
}
