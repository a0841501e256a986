use squisher_cache::definitions::{Bitmap, BitmapData, BitmapSequence, BitmapSprite, Decal};
use squisher_cache::{CacheFile, TagId};

use super::{invalid_tag, out_of_bounds, set_f32};
use crate::{Error, Result};

/// Sprite extents of the decal bitmaps in the stock bitmaps.map. Their sprite
/// data never reaches the map, so the extent cannot be computed from it.
const RESOURCE_MAP_DECAL_EXTENTS: [(&[u8], f32); 38] = [
    (b"effects\\decals\\bullet holes\\bitmaps\\dirt pistol", 0.0),
    (b"effects\\decals\\bullet holes\\bitmaps\\stone", 33.0),
    (b"effects\\decals\\bullet holes\\bitmaps\\snow", 0.0),
    (b"effects\\decals\\bullet holes\\bitmaps\\metal", 23.0),
    (b"effects\\decals\\blood splats\\bitmaps\\blood splat", 40.0),
    (b"effects\\decals\\bullet holes\\bitmaps\\unbreakable glass", 34.0),
    (b"effects\\decals\\blood splats\\bitmaps\\blood splat grunt", 38.0),
    (b"effects\\decals\\blood splats\\bitmaps\\blood splat hunter glow", 34.0),
    (b"effects\\decals\\blood splats\\bitmaps\\blood splat hunter", 34.0),
    (b"effects\\decals\\blood splats\\bitmaps\\blood splat elite", 36.0),
    (b"effects\\decals\\bullet holes\\bitmaps\\ice", 64.0),
    (b"effects\\decals\\bullet holes\\bitmaps\\plasma burn", 9.0),
    (b"effects\\decals\\bullet holes\\bitmaps\\plasma burn inner glow", 13.0),
    (b"effects\\decals\\bullet holes\\bitmaps\\plasma burn outer glow", 34.0),
    (b"effects\\decals\\blood splats\\bitmaps\\blood splat engineer", 38.0),
    (b"effects\\decals\\bullet holes\\bitmaps\\plasma burn large", 10.0),
    (b"effects\\decals\\bullet holes\\bitmaps\\plasma green inner glow", 13.0),
    (b"levels\\b30\\decals-environment\\bitmaps\\decal fore symb red", 0.0),
    (b"levels\\b30\\decals-environment\\bitmaps\\decal fore symb blue", 0.0),
    (b"levels\\test\\sidewinder\\decals-environment\\bitmaps\\fore_stripe_plate_red", 0.0),
    (b"levels\\test\\sidewinder\\decals-environment\\bitmaps\\fore_stripe_plate_blue", 0.0),
    (b"effects\\decals\\bullet holes\\bitmaps\\impact flame thrower char", 0.0),
    (b"effects\\decals\\vehicle marks\\bitmaps\\snow treadmarks", 0.0),
    (b"levels\\b30\\decals-environment\\bitmaps\\decal fore symb blue b", 0.0),
    (b"levels\\b30\\decals-environment\\bitmaps\\decal fore symb red b", 0.0),
    (b"levels\\test\\boardingaction\\decals-environment\\bitmaps\\1_blue", 0.0),
    (b"levels\\test\\boardingaction\\decals-environment\\bitmaps\\2_red", 0.0),
    (b"levels\\test\\boardingaction\\decals-environment\\bitmaps\\5_red", 0.0),
    (b"levels\\test\\boardingaction\\decals-environment\\bitmaps\\1_red", 0.0),
    (b"levels\\test\\boardingaction\\decals-environment\\bitmaps\\2_blue", 0.0),
    (b"levels\\test\\boardingaction\\decals-environment\\bitmaps\\3_blue", 0.0),
    (b"levels\\test\\boardingaction\\decals-environment\\bitmaps\\3_red", 0.0),
    (b"levels\\test\\boardingaction\\decals-environment\\bitmaps\\4_blue", 0.0),
    (b"levels\\test\\boardingaction\\decals-environment\\bitmaps\\4_red", 0.0),
    (b"levels\\test\\boardingaction\\decals-environment\\bitmaps\\5_blue", 0.0),
    (b"levels\\a10\\decals-environment\\bitmaps\\decal danger biohazard", 0.0),
    (b"levels\\a10\\decals-environment\\bitmaps\\decal danger electric", 0.0),
    (b"effects\\decals\\blood splats\\bitmaps\\glowingdrip splat", 34.0),
];

fn resource_map_extent(bitmap_path: &[u8]) -> Option<f32> {
    RESOURCE_MAP_DECAL_EXTENTS
        .iter()
        .find(|(path, _)| *path == bitmap_path)
        .map(|&(_, extent)| extent)
}

/// Largest distance from a sprite's registration point to its edges, in
/// pixels, over every sprite of a sprite bitmap. Other bitmap types have no
/// extent.
fn maximum_sprite_extent(cache: &CacheFile, bitmap_id: TagId) -> Result<f32> {
    let bitmap = *cache
        .tag::<Bitmap>(bitmap_id)
        .ok_or_else(|| invalid_tag(cache, bitmap_id))?;
    if bitmap.bitmap_type.get() != Bitmap::TYPE_SPRITES {
        return Ok(0.0);
    }

    let space = cache.tag_space();
    let mut extent = 0.0f32;
    for s in 0..bitmap.sequences.count() {
        let sprites = cache
            .element::<BitmapSequence>(&space, &bitmap.sequences, s)
            .ok_or_else(|| out_of_bounds(cache, bitmap_id, format!("bitmap sequence {s}")))?
            .sprites;

        for i in 0..sprites.count() {
            let sprite = *cache
                .element::<BitmapSprite>(&space, &sprites, i)
                .ok_or_else(|| out_of_bounds(cache, bitmap_id, format!("bitmap sprite {i} of sequence {s}")))?;
            let index = sprite.bitmap_index.get();
            let data = u32::try_from(index)
                .ok()
                .and_then(|index| cache.element::<BitmapData>(&space, &bitmap.bitmaps, index))
                .ok_or_else(|| out_of_bounds(cache, bitmap_id, format!("bitmap data {index}")))?;

            let width = f32::from(data.width.get());
            let height = f32::from(data.height.get());
            let x = sprite.registration_x.get();
            let y = sprite.registration_y.get();
            extent = extent
                .max(x * width)
                .max(y * height)
                .max((sprite.right.get() - sprite.left.get() - x) * width)
                .max((sprite.bottom.get() - sprite.top.get() - y) * height);
        }
    }
    Ok(extent)
}

/// Recompute the maximum sprite extent the stock compiler always leaves at
/// its default.
pub fn fix_decal(cache: &mut CacheFile, tag_id: TagId) -> Result<bool> {
    let decal = *cache.tag::<Decal>(tag_id).ok_or_else(|| invalid_tag(cache, tag_id))?;
    let map = decal.map.tag_id();

    let extent = if !decal.has_sprite_scale_fix() || map.is_null() {
        Decal::DEFAULT_SPRITE_EXTENT
    } else if !cache.tag_id_is_valid(map) {
        return Err(Error::InvalidDecalBitmap {
            decal: cache.get_extension_or_placeholder(tag_id).into_owned(),
        });
    } else if cache.tag_is_external(map) {
        let path = cache.get_tag_path(map).unwrap_or_default();
        resource_map_extent(path).ok_or_else(|| Error::UnknownDecalBitmap {
            decal: cache.get_extension_or_placeholder(tag_id).into_owned(),
            bitmap: cache.get_extension_or_placeholder(map).into_owned(),
        })?
    } else {
        maximum_sprite_extent(cache, map)?
    };

    let Some(decal) = cache.tag_mut::<Decal>(tag_id) else {
        return Err(invalid_tag(cache, tag_id));
    };
    Ok(set_f32(&mut decal.runtime_maximum_sprite_extent, extent))
}
