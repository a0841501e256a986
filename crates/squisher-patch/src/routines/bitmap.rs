use tracing::info;

use squisher_cache::definitions::{Bitmap, BitmapData};
use squisher_cache::{CacheFile, TagId};

use super::{invalid_tag, out_of_bounds};
use crate::{Error, Result};

/// Resource index of `path` in the stock bitmap resource list.
fn resource_index(resources: &[Vec<u8>], path: &[u8]) -> Option<u32> {
    let index = resources.iter().position(|resource| resource.as_slice() == path)?;
    u32::try_from(index).ok()?.checked_mul(2)?.checked_add(1)
}

/// Point bitmaps whose pixels were read straight out of `bitmaps.map` at
/// their resource entry instead.
pub fn remap_external_bitmaps(cache: &mut CacheFile, tag_id: TagId, resources: &[Vec<u8>]) -> Result<bool> {
    let bitmaps = cache
        .tag::<Bitmap>(tag_id)
        .ok_or_else(|| invalid_tag(cache, tag_id))?
        .bitmaps;
    let space = cache.tag_space();

    let mut has_external_pixels = false;
    for index in 0..bitmaps.count() {
        let data = cache
            .element::<BitmapData>(&space, &bitmaps, index)
            .ok_or_else(|| out_of_bounds(cache, tag_id, format!("bitmap data {index}")))?;
        if data.is_external() {
            has_external_pixels = true;
            break;
        }
    }
    if !has_external_pixels {
        return Ok(false);
    }

    let path = cache.get_tag_path(tag_id).unwrap_or_default();
    let display_path = String::from_utf8_lossy(path).into_owned();
    let resource_index =
        resource_index(resources, path).ok_or_else(|| Error::BitmapNotInResources { path: display_path.clone() })?;

    let Some(record) = cache.record_mut(tag_id) else {
        return Err(invalid_tag(cache, tag_id));
    };
    if record.external.get() == 1 && record.data_address.get() == resource_index {
        return Ok(false);
    }
    record.external.set(1);
    record.data_address.set(resource_index);

    info!("bitmap \"{display_path}\" had external pixels and was remapped to use bitmaps.map resource index {resource_index}");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use squisher_cache::builder::CacheFileBuilder;
    use squisher_cache::TagGroup;
    use zerocopy::little_endian::U16;
    use zerocopy::{FromZeros, IntoBytes};

    fn resources() -> Vec<Vec<u8>> {
        vec![
            b"ui\\shell\\bitmaps\\cursor".to_vec(),
            b"ui\\shell\\bitmaps\\background".to_vec(),
            b"ui\\shell\\bitmaps\\caf\xE9".to_vec(),
        ]
    }

    fn bitmap_file(path: &[u8], flags: &[u16]) -> (CacheFile, TagId) {
        let mut builder = CacheFileBuilder::new();
        builder.add_scenario("levels\\test\\test");

        let mut elements = Vec::new();
        for &value in flags {
            let mut data = BitmapData::new_zeroed();
            data.flags = U16::new(value);
            elements.extend_from_slice(data.as_bytes());
        }
        let mut bitmap = Bitmap::new_zeroed();
        bitmap.bitmaps = builder.reflexive(flags.len() as u32, &elements);
        let tag_id = builder.add_tag(TagGroup::Bitmap, path, bitmap.as_bytes());
        (CacheFile::load(builder.build()).unwrap(), tag_id)
    }

    #[test]
    fn test_resource_index() {
        assert_eq!(resource_index(&resources(), b"ui\\shell\\bitmaps\\cursor"), Some(1));
        assert_eq!(resource_index(&resources(), b"ui\\shell\\bitmaps\\background"), Some(3));
        assert_eq!(resource_index(&resources(), b"ui\\shell\\bitmaps\\other"), None);
    }

    #[test]
    fn test_external_pixels_remapped() {
        let flags = [0, BitmapData::FLAG_EXTERNAL];
        let (mut cache, tag_id) = bitmap_file(b"ui\\shell\\bitmaps\\background", &flags);

        assert!(remap_external_bitmaps(&mut cache, tag_id, &resources()).unwrap());
        let record = cache.record(tag_id).unwrap();
        assert_eq!(record.external.get(), 1);
        assert_eq!(record.data_address.get(), 3);
        assert!(cache.tag_is_external(tag_id));

        assert!(!remap_external_bitmaps(&mut cache, tag_id, &resources()).unwrap());
    }

    #[test]
    fn test_internal_pixels_untouched() {
        let (mut cache, tag_id) = bitmap_file(b"ui\\shell\\bitmaps\\cursor", &[0, 0]);
        assert!(!remap_external_bitmaps(&mut cache, tag_id, &resources()).unwrap());
        assert!(!cache.tag_is_external(tag_id));
    }

    #[test]
    fn test_unknown_bitmap_fails() {
        let (mut cache, tag_id) = bitmap_file(b"ui\\custom\\logo", &[BitmapData::FLAG_EXTERNAL]);
        let error = remap_external_bitmaps(&mut cache, tag_id, &resources()).unwrap_err();
        assert!(matches!(error, Error::BitmapNotInResources { ref path } if path == "ui\\custom\\logo"));
        assert!(error.to_string().contains("the map should be rebuilt"));
    }

    #[test]
    fn test_code_page_path_remapped() {
        let (mut cache, tag_id) = bitmap_file(b"ui\\shell\\bitmaps\\caf\xE9", &[BitmapData::FLAG_EXTERNAL]);
        assert!(remap_external_bitmaps(&mut cache, tag_id, &resources()).unwrap());
        assert_eq!(cache.record(tag_id).unwrap().data_address.get(), 5);

        let (mut cache, tag_id) = bitmap_file(b"ui\\custom\\caf\xE9", &[BitmapData::FLAG_EXTERNAL]);
        let error = remap_external_bitmaps(&mut cache, tag_id, &resources()).unwrap_err();
        assert!(matches!(error, Error::BitmapNotInResources { ref path } if path == "ui\\custom\\caf\u{FFFD}"));
    }
}
