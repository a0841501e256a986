use squisher_cache::definitions::{ActorVariant, Unit};
use squisher_cache::{CacheFile, TagId};

use super::{invalid_tag, make_enum16_valid};
use crate::Result;

/// Repair the metagame type and class enums.
pub fn fix_unit(cache: &mut CacheFile, tag_id: TagId) -> Result<bool> {
    let Some(unit) = cache.tag_mut::<Unit>(tag_id) else {
        return Err(invalid_tag(cache, tag_id));
    };

    let type_changed = make_enum16_valid(&mut unit.metagame_type, Unit::MAX_METAGAME_TYPE, 0);
    let class_changed = make_enum16_valid(&mut unit.metagame_class, Unit::MAX_METAGAME_CLASS, 0);
    Ok(type_changed || class_changed)
}

/// Repair the metagame enums actor variants share with units.
pub fn fix_actor_variant(cache: &mut CacheFile, tag_id: TagId) -> Result<bool> {
    let Some(variant) = cache.tag_mut::<ActorVariant>(tag_id) else {
        return Err(invalid_tag(cache, tag_id));
    };

    let type_changed = make_enum16_valid(&mut variant.metagame_type, Unit::MAX_METAGAME_TYPE, 0);
    let class_changed = make_enum16_valid(&mut variant.metagame_class, Unit::MAX_METAGAME_CLASS, 0);
    Ok(type_changed || class_changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use squisher_cache::builder::CacheFileBuilder;
    use squisher_cache::TagGroup;
    use zerocopy::{FromZeros, IntoBytes};

    #[test]
    fn test_metagame_enums() {
        let mut payload = Unit::new_zeroed();
        payload.metagame_type.set(0x2B00);
        payload.metagame_class.set(0x0900);

        let mut builder = CacheFileBuilder::new();
        builder.add_scenario("levels\\test\\test");
        let groups = [TagGroup::Biped.fourcc(), TagGroup::Unit.fourcc(), TagGroup::Object.fourcc()];
        let tag_id = builder.add_tag_groups(groups, "characters\\elite", payload.as_bytes());
        let mut cache = CacheFile::load(builder.build()).unwrap();

        assert!(fix_unit(&mut cache, tag_id).unwrap());
        let unit = cache.tag::<Unit>(tag_id).unwrap();
        assert_eq!(unit.metagame_type.get(), 43);
        assert_eq!(unit.metagame_class.get(), 0);
        assert!(!fix_unit(&mut cache, tag_id).unwrap());
    }

    #[test]
    fn test_actor_variant_metagame_enums() {
        let mut payload = ActorVariant::new_zeroed();
        payload.metagame_type.set(0x0500);
        payload.metagame_class.set(3);

        let mut builder = CacheFileBuilder::new();
        builder.add_scenario("levels\\test\\test");
        let tag_id = builder.add_tag(TagGroup::ActorVariant, "characters\\elite\\major", payload.as_bytes());
        let mut cache = CacheFile::load(builder.build()).unwrap();

        assert!(fix_actor_variant(&mut cache, tag_id).unwrap());
        let variant = cache.tag::<ActorVariant>(tag_id).unwrap();
        assert_eq!(variant.metagame_type.get(), 5);
        assert_eq!(variant.metagame_class.get(), 3);
        assert!(!fix_actor_variant(&mut cache, tag_id).unwrap());
    }
}
