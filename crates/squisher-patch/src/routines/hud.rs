use squisher_cache::definitions::{
    CrosshairItem, GrenadeHudInterface, HudElement, HudGlobals, UnitHudInterface, WeaponHudCrosshairs,
    WeaponHudInterface, WeaponHudMeter, WeaponHudNumber, WeaponHudOverlays, WeaponHudStatic, MAX_CANVAS_SIZE,
    MAX_CHILD_ANCHOR,
};
use squisher_cache::{CacheFile, Reflexive, TagId};

use super::{invalid_tag, make_enum16_valid, out_of_bounds};
use crate::Result;

fn fix_child_anchors<T: HudElement>(
    cache: &mut CacheFile,
    tag_id: TagId,
    elements: &Reflexive,
    kind: &str,
) -> Result<bool> {
    let space = cache.tag_space();
    let mut changed = false;
    for index in 0..elements.count() {
        let Some(element) = cache.element_mut::<T>(&space, elements, index) else {
            return Err(out_of_bounds(cache, tag_id, format!("{kind} element {index}")));
        };
        changed |= make_enum16_valid(element.child_anchor_mut(), MAX_CHILD_ANCHOR, 0);
    }
    Ok(changed)
}

/// Repair element anchors and the zoom crosshair flag.
pub fn fix_weapon_hud_interface(cache: &mut CacheFile, tag_id: TagId) -> Result<bool> {
    let Some(hud) = cache.tag_mut::<WeaponHudInterface>(tag_id) else {
        return Err(invalid_tag(cache, tag_id));
    };
    let mut changed = make_enum16_valid(&mut hud.canvas_size, MAX_CANVAS_SIZE, 0);
    let hud = *hud;

    changed |= fix_child_anchors::<WeaponHudStatic>(cache, tag_id, &hud.statics, "static")?;
    changed |= fix_child_anchors::<WeaponHudMeter>(cache, tag_id, &hud.meters, "meter")?;
    changed |= fix_child_anchors::<WeaponHudNumber>(cache, tag_id, &hud.numbers, "number")?;
    changed |= fix_child_anchors::<WeaponHudOverlays>(cache, tag_id, &hud.overlays, "overlays")?;

    let crosshair_types = hud.crosshair_types.get();
    if hud.crosshairs.is_empty() || crosshair_types & WeaponHudInterface::CROSSHAIR_TYPE_ZOOM != 0 {
        return Ok(changed);
    }

    // Zoom-dependent overlays only show up if the zoom crosshair type is set
    let space = cache.tag_space();
    for c in 0..hud.crosshairs.count() {
        let items = cache
            .element::<WeaponHudCrosshairs>(&space, &hud.crosshairs, c)
            .ok_or_else(|| out_of_bounds(cache, tag_id, format!("crosshairs element {c}")))?
            .items;

        for o in 0..items.count() {
            let item = cache
                .element::<CrosshairItem>(&space, &items, o)
                .ok_or_else(|| {
                    out_of_bounds(
                        cache,
                        tag_id,
                        format!("crosshair overlay {o} in crosshairs element {c}"),
                    )
                })?;
            if item.is_zoom_dependent() {
                if let Some(hud) = cache.tag_mut::<WeaponHudInterface>(tag_id) {
                    hud.crosshair_types
                        .set(crosshair_types | WeaponHudInterface::CROSSHAIR_TYPE_ZOOM);
                }
                return Ok(true);
            }
        }
    }

    Ok(changed)
}

/// Repair the messaging canvas size.
pub fn fix_hud_globals(cache: &mut CacheFile, tag_id: TagId) -> Result<bool> {
    let Some(globals) = cache.tag_mut::<HudGlobals>(tag_id) else {
        return Err(invalid_tag(cache, tag_id));
    };
    Ok(make_enum16_valid(&mut globals.canvas_size, MAX_CANVAS_SIZE, 0))
}

/// Repair the absolute placement canvas size.
pub fn fix_grenade_hud_interface(cache: &mut CacheFile, tag_id: TagId) -> Result<bool> {
    let Some(hud) = cache.tag_mut::<GrenadeHudInterface>(tag_id) else {
        return Err(invalid_tag(cache, tag_id));
    };
    Ok(make_enum16_valid(&mut hud.canvas_size, MAX_CANVAS_SIZE, 0))
}

/// Repair the canvas sizes of the interface and its auxiliary panel.
pub fn fix_unit_hud_interface(cache: &mut CacheFile, tag_id: TagId) -> Result<bool> {
    let Some(hud) = cache.tag_mut::<UnitHudInterface>(tag_id) else {
        return Err(invalid_tag(cache, tag_id));
    };
    let canvas = make_enum16_valid(&mut hud.canvas_size, MAX_CANVAS_SIZE, 0);
    let auxiliary = make_enum16_valid(&mut hud.auxiliary_canvas_size, MAX_CANVAS_SIZE, 0);
    Ok(canvas || auxiliary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use squisher_cache::builder::CacheFileBuilder;
    use squisher_cache::{TagGroup, TAG_DATA_BASE_ADDRESS};
    use zerocopy::{FromZeros, IntoBytes};

    fn crosshairs(builder: &mut CacheFileBuilder, flags: &[u32]) -> Reflexive {
        let mut items = Vec::new();
        for &flag in flags {
            let mut item = CrosshairItem::new_zeroed();
            item.flags.set(flag);
            items.extend_from_slice(item.as_bytes());
        }
        let items = builder.reflexive(flags.len() as u32, &items);

        let mut element = WeaponHudCrosshairs::new_zeroed();
        element.items = items;
        builder.reflexive(1, element.as_bytes())
    }

    fn weapon_hud(edit: impl FnOnce(&mut CacheFileBuilder, &mut WeaponHudInterface)) -> (CacheFile, TagId) {
        let mut builder = CacheFileBuilder::new();
        builder.add_scenario("levels\\test\\test");
        let mut payload = WeaponHudInterface::new_zeroed();
        edit(&mut builder, &mut payload);
        let tag_id = builder.add_tag(TagGroup::WeaponHudInterface, "ui\\hud\\rifle", payload.as_bytes());
        (CacheFile::load(builder.build()).unwrap(), tag_id)
    }

    #[test]
    fn test_zoom_flag_set() {
        let (mut cache, tag_id) = weapon_hud(|builder, hud| {
            hud.crosshairs = crosshairs(builder, &[0, CrosshairItem::FLAG_ONE_ZOOM_LEVEL]);
        });
        assert!(fix_weapon_hud_interface(&mut cache, tag_id).unwrap());
        let hud = cache.tag::<WeaponHudInterface>(tag_id).unwrap();
        assert_eq!(hud.crosshair_types.get(), WeaponHudInterface::CROSSHAIR_TYPE_ZOOM);
        assert!(!fix_weapon_hud_interface(&mut cache, tag_id).unwrap());
    }

    #[test]
    fn test_zoom_flag_not_needed() {
        let (mut cache, tag_id) = weapon_hud(|builder, hud| {
            hud.crosshairs = crosshairs(builder, &[1, 2]);
        });
        assert!(!fix_weapon_hud_interface(&mut cache, tag_id).unwrap());
        let hud = cache.tag::<WeaponHudInterface>(tag_id).unwrap();
        assert_eq!(hud.crosshair_types.get(), 0);
    }

    #[test]
    fn test_child_anchors_and_canvas() {
        let (mut cache, tag_id) = weapon_hud(|builder, hud| {
            let mut element = WeaponHudMeter::new_zeroed();
            element.child_anchor.set(0x0300);
            hud.meters = builder.reflexive(1, element.as_bytes());
            hud.canvas_size.set(7);
        });
        assert!(fix_weapon_hud_interface(&mut cache, tag_id).unwrap());

        let space = cache.tag_space();
        let hud = *cache.tag::<WeaponHudInterface>(tag_id).unwrap();
        assert_eq!(hud.canvas_size.get(), 0);
        let meter = cache.element::<WeaponHudMeter>(&space, &hud.meters, 0).unwrap();
        assert_eq!(meter.child_anchor.get(), 3);
    }

    #[test]
    fn test_element_out_of_bounds() {
        let (mut cache, tag_id) = weapon_hud(|_, _| {});
        let end = TAG_DATA_BASE_ADDRESS + cache.tag_space().len() as u32;
        let hud = cache.tag_mut::<WeaponHudInterface>(tag_id).unwrap();
        hud.numbers.count.set(2);
        hud.numbers.address.set(end - 100);

        let error = fix_weapon_hud_interface(&mut cache, tag_id).unwrap_err();
        assert_eq!(
            error.to_string(),
            "number element 0 in \"ui\\hud\\rifle.weapon_hud_interface\" is out of bounds"
        );
    }

    #[test]
    fn test_hud_globals_canvas() {
        let mut payload = HudGlobals::new_zeroed();
        payload.canvas_size.set(0x0100);
        let mut builder = CacheFileBuilder::new();
        builder.add_scenario("levels\\test\\test");
        let tag_id = builder.add_tag(TagGroup::HudGlobals, "ui\\hud\\default", payload.as_bytes());
        let mut cache = CacheFile::load(builder.build()).unwrap();

        assert!(fix_hud_globals(&mut cache, tag_id).unwrap());
        assert_eq!(cache.tag::<HudGlobals>(tag_id).unwrap().canvas_size.get(), 1);
        assert!(!fix_hud_globals(&mut cache, tag_id).unwrap());
    }

    #[test]
    fn test_grenade_hud_canvas() {
        let mut payload = GrenadeHudInterface::new_zeroed();
        payload.canvas_size.set(0x0100);
        let mut builder = CacheFileBuilder::new();
        builder.add_scenario("levels\\test\\test");
        let tag_id = builder.add_tag(TagGroup::GrenadeHudInterface, "ui\\hud\\frag", payload.as_bytes());
        let mut cache = CacheFile::load(builder.build()).unwrap();

        assert!(fix_grenade_hud_interface(&mut cache, tag_id).unwrap());
        assert_eq!(cache.tag::<GrenadeHudInterface>(tag_id).unwrap().canvas_size.get(), 1);
        assert!(!fix_grenade_hud_interface(&mut cache, tag_id).unwrap());
    }

    #[test]
    fn test_unit_hud_canvases() {
        let mut payload = UnitHudInterface::new_zeroed();
        payload.canvas_size.set(1);
        payload.auxiliary_canvas_size.set(0x4242);
        let mut builder = CacheFileBuilder::new();
        builder.add_scenario("levels\\test\\test");
        let tag_id = builder.add_tag(TagGroup::UnitHudInterface, "ui\\hud\\cyborg", payload.as_bytes());
        let mut cache = CacheFile::load(builder.build()).unwrap();

        assert!(fix_unit_hud_interface(&mut cache, tag_id).unwrap());
        let hud = cache.tag::<UnitHudInterface>(tag_id).unwrap();
        assert_eq!(hud.canvas_size.get(), 1);
        assert_eq!(hud.auxiliary_canvas_size.get(), 0);
        assert!(!fix_unit_hud_interface(&mut cache, tag_id).unwrap());
    }
}
