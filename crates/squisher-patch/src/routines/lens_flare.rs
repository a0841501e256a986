use std::f32::consts::TAU;

use squisher_cache::definitions::LensFlare;
use squisher_cache::{CacheFile, TagId};

use super::invalid_tag;
use crate::Result;

/// Fix the rotation function scale left at 360 radians instead of a full turn.
pub fn fix_lens_flare(cache: &mut CacheFile, tag_id: TagId) -> Result<bool> {
    let Some(lens_flare) = cache.tag_mut::<LensFlare>(tag_id) else {
        return Err(invalid_tag(cache, tag_id));
    };

    let scale = &mut lens_flare.corona_rotation_function_scale;
    if scale.get() != 360.0 {
        return Ok(false);
    }
    scale.set(TAU);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use squisher_cache::builder::CacheFileBuilder;
    use squisher_cache::TagGroup;
    use zerocopy::{FromZeros, IntoBytes};

    fn lens_flare(scale: f32) -> (CacheFile, TagId) {
        let mut payload = LensFlare::new_zeroed();
        payload.corona_rotation_function_scale.set(scale);
        let mut builder = CacheFileBuilder::new();
        builder.add_scenario("levels\\test\\test");
        let tag_id = builder.add_tag(TagGroup::LensFlare, "effects\\flare", payload.as_bytes());
        (CacheFile::load(builder.build()).unwrap(), tag_id)
    }

    #[test]
    fn test_degrees_become_radians() {
        let (mut cache, tag_id) = lens_flare(360.0);
        assert!(fix_lens_flare(&mut cache, tag_id).unwrap());
        let scale = cache.tag::<LensFlare>(tag_id).unwrap().corona_rotation_function_scale.get();
        assert_eq!(scale, TAU);
        assert!(!fix_lens_flare(&mut cache, tag_id).unwrap());
    }

    #[test]
    fn test_other_scales_untouched() {
        let (mut cache, tag_id) = lens_flare(1.0);
        assert!(!fix_lens_flare(&mut cache, tag_id).unwrap());
    }
}
