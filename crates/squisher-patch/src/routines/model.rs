use squisher_cache::definitions::{Gbxmodel, GbxmodelPart, ModelGeometry};
use squisher_cache::{CacheFile, TagId};

use super::{invalid_tag, out_of_bounds};
use crate::Result;

/// Zero the stale vertex buffer pointers the compiler leaves in model parts.
pub fn fix_gbxmodel(cache: &mut CacheFile, tag_id: TagId) -> Result<bool> {
    let geometries = cache
        .tag::<Gbxmodel>(tag_id)
        .ok_or_else(|| invalid_tag(cache, tag_id))?
        .geometries;
    let space = cache.tag_space();
    let mut changed = false;

    for g in 0..geometries.count() {
        let parts = cache
            .element::<ModelGeometry>(&space, &geometries, g)
            .ok_or_else(|| out_of_bounds(cache, tag_id, format!("geometry {g}")))?
            .parts;

        for p in 0..parts.count() {
            let Some(part) = cache.element_mut::<GbxmodelPart>(&space, &parts, p) else {
                return Err(out_of_bounds(
                    cache,
                    tag_id,
                    format!("geometry part {p} of geometry {g}"),
                ));
            };
            let base_address = &mut part.vertex_buffer.base_address;
            if base_address.get() != 0 {
                base_address.set(0);
                changed = true;
            }
        }
    }

    Ok(changed)
}
