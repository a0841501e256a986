//! The patch pipeline.

use tracing::debug;

use squisher_cache::{Build, CacheFile, TagGroup, TagId, TagRecord};

use crate::options::PatchOptions;
use crate::routines;
use crate::Result;

/// What [`process`] did to a cache file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing needed repairing; the buffer is untouched.
    NoChanges,
    /// `changes` routines modified the buffer and the checksum was updated.
    Patched { changes: usize },
}

/// Run every repair over `cache`.
///
/// On error the buffer may be partially modified and must not be saved.
pub fn process(cache: &mut CacheFile, options: &PatchOptions) -> Result<Outcome> {
    match cache.build() {
        Some(Build::Squished) => return Err(squisher_cache::Error::AlreadyProcessed.into()),
        Some(_) => {}
        None => {
            let build_number = String::from_utf8_lossy(cache.build_number()?).into_owned();
            return Err(squisher_cache::Error::UntrackedBuild(build_number).into());
        }
    }

    if !options.relaxed {
        cache.audit()?;
    }

    let mut changes = usize::from(routines::fix_cached_bsps(cache)?);

    let records: Vec<(TagId, TagRecord)> = cache.iter_records().collect();

    // Decals read the external flag of their bitmap, so remapping goes first
    if let Some(resources) = options.bitmap_resources.as_deref() {
        if cache.tags_can_be_indexed() {
            for (tag_id, record) in &records {
                if record.primary() == Some(TagGroup::Bitmap) && !record.is_external() {
                    changes += usize::from(routines::remap_external_bitmaps(cache, *tag_id, resources)?);
                }
            }
        }
    }

    for (tag_id, record) in records {
        changes += fix_tag(cache, tag_id, &record)?;
    }

    if changes == 0 {
        debug!("no changes necessary");
        return Ok(Outcome::NoChanges);
    }

    if options.preserve_checksum {
        cache.preserve_checksum()?;
    } else {
        cache.update_checksum()?;
    }
    if options.stamp_build {
        cache.set_build(Build::Squished)?;
    }

    debug!(changes, "patched cache file");
    Ok(Outcome::Patched { changes })
}

/// Run the routines that apply to one tag, returning how many changed it.
fn fix_tag(cache: &mut CacheFile, tag_id: TagId, record: &TagRecord) -> Result<usize> {
    let primary = record.primary();
    let mut changes = 0;

    // External sounds keep their base parameters inline
    if primary == Some(TagGroup::Sound) {
        changes += usize::from(routines::fix_sound(cache, tag_id)?);
    }
    if record.is_external() {
        return Ok(changes);
    }

    if record.is_a(TagGroup::Shader) {
        changes += usize::from(routines::fix_shader(cache, tag_id)?);
    }
    if record.is_a(TagGroup::Unit) {
        changes += usize::from(routines::fix_unit(cache, tag_id)?);
    }

    let changed = match primary {
        Some(TagGroup::Scenario) => routines::fix_scenario(cache, tag_id)?,
        Some(TagGroup::ActorVariant) => routines::fix_actor_variant(cache, tag_id)?,
        Some(TagGroup::Decal) => routines::fix_decal(cache, tag_id)?,
        Some(TagGroup::LensFlare) => routines::fix_lens_flare(cache, tag_id)?,
        Some(TagGroup::ShaderModel) => routines::fix_shader_model(cache, tag_id)?,
        Some(TagGroup::WeaponHudInterface) => routines::fix_weapon_hud_interface(cache, tag_id)?,
        Some(TagGroup::GrenadeHudInterface) => routines::fix_grenade_hud_interface(cache, tag_id)?,
        Some(TagGroup::UnitHudInterface) => routines::fix_unit_hud_interface(cache, tag_id)?,
        Some(TagGroup::HudGlobals) => routines::fix_hud_globals(cache, tag_id)?,
        Some(TagGroup::Gbxmodel) => routines::fix_gbxmodel(cache, tag_id)?,
        Some(TagGroup::Meter) => routines::fix_meter(cache, tag_id)?,
        _ => false,
    };

    Ok(changes + usize::from(changed))
}
