//! Tag Directory.
//!
//! Lookups from tag IDs to tag records, paths and base structs, plus
//! reflexive element access. Every dereference goes through an
//! [`AddressSpace`], so a corrupt record can only ever produce `None`.

use std::borrow::Cow;
use std::ops::Range;

use tracing::warn;
use zerocopy::FromBytes;

use squisher_common::cstr;

use crate::address::AddressSpace;
use crate::definitions::{TagBlock, TagDefinition};
use crate::file::CacheFile;
use crate::group::{fourcc_to_extension, TagGroup};
use crate::id::TagId;
use crate::layout::{Reflexive, TagDataBlob, TagRecord};

/// Longest tag path, including its terminator.
pub const MAX_TAG_PATH_LENGTH: usize = 260;

/// Stand-in for paths and extensions that cannot be resolved.
pub const INVALID_PLACEHOLDER: &str = "<invalid>";

impl CacheFile {
    pub fn tag_count(&self) -> u32 {
        (self.tag_array.len() / TagRecord::SIZE) as u32
    }

    fn record_range(&self, index: u16) -> Option<Range<usize>> {
        let start = self.tag_array.start + usize::from(index) * TagRecord::SIZE;
        let end = start + TagRecord::SIZE;
        (end <= self.tag_array.end).then_some(start..end)
    }

    /// The record at array position `index`.
    pub fn record_at(&self, index: u16) -> Option<TagRecord> {
        let range = self.record_range(index)?;
        TagRecord::read_from_bytes(self.bytes(range)).ok()
    }

    /// Every record with its embedded ID, in array order.
    pub fn iter_records(&self) -> impl Iterator<Item = (TagId, TagRecord)> + '_ {
        (0..self.tag_count())
            .filter_map(|index| self.record_at(index as u16))
            .map(|record| (record.tag_id(), record))
    }

    /// Whether `tag_id` is non-null and inside the tag array.
    pub fn tag_id_is_valid(&self, tag_id: TagId) -> bool {
        !tag_id.is_null() && u32::from(tag_id.index()) < self.tag_count()
    }

    /// The record `tag_id` indexes.
    pub fn record(&self, tag_id: TagId) -> Option<TagRecord> {
        if tag_id.is_null() {
            return None;
        }
        if !self.tag_id_is_valid(tag_id) {
            warn!(
                "requested tag ID {tag_id} is out of bounds (tag count {})",
                self.tag_count()
            );
            return None;
        }
        self.record_at(tag_id.index())
    }

    /// In-place access to the record `tag_id` indexes.
    pub fn record_mut(&mut self, tag_id: TagId) -> Option<&mut TagRecord> {
        if !self.tag_id_is_valid(tag_id) {
            return None;
        }
        let range = self.record_range(tag_id.index())?;
        TagRecord::mut_from_bytes(self.bytes_mut(range)).ok()
    }

    pub fn tag_is_external(&self, tag_id: TagId) -> bool {
        self.record(tag_id).is_some_and(|record| record.is_external())
    }

    /// Path of the tag `tag_id` indexes.
    ///
    /// Paths are scanned for their terminator up to the end of the tag data
    /// or [`MAX_TAG_PATH_LENGTH`], whichever comes first. An unterminated
    /// path at the very end of the tag data reads as no path.
    ///
    /// Paths are bytes in whatever code page the map was built with, so they
    /// are compared as bytes and only decoded for messages.
    pub fn get_tag_path(&self, tag_id: TagId) -> Option<&[u8]> {
        let record = self.record(tag_id)?;
        self.record_path(&record)
    }

    pub(crate) fn record_path(&self, record: &TagRecord) -> Option<&[u8]> {
        let start = self.tag_space.resolve(record.path_address.get(), 1).ok()?.start;
        let remaining = self.bytes(start..self.tag_space.range().end);
        cstr::terminated(remaining, MAX_TAG_PATH_LENGTH)
    }

    /// `path.extension` of the tag, for diagnostics.
    pub fn get_extension_or_placeholder(&self, tag_id: TagId) -> Cow<'_, str> {
        match self.get_tag_path(tag_id) {
            Some(path) => Cow::Owned(format!(
                "{}.{}",
                String::from_utf8_lossy(path),
                self.get_tag_extension(tag_id)
            )),
            None => Cow::Borrowed(INVALID_PLACEHOLDER),
        }
    }

    /// Extension of the tag's primary group, for diagnostics.
    pub fn get_tag_extension(&self, tag_id: TagId) -> Cow<'static, str> {
        match self.record(tag_id) {
            Some(record) => fourcc_to_extension(record.primary_group.get()),
            None => Cow::Borrowed(INVALID_PLACEHOLDER),
        }
    }

    /// File range of the tag's base struct, viewed as `group`.
    ///
    /// Fails when the record is external (sound excepted, as its base
    /// struct always stays in the map), when the record's own ID disagrees
    /// with its position, or when `group` is none of the record's groups.
    pub fn tag_range(&self, tag_id: TagId, group: TagGroup) -> Option<Range<usize>> {
        let record = self.record(tag_id)?;

        if record.is_external() && group != TagGroup::Sound {
            warn!("requested tag ID {tag_id} is external and not loaded");
            return None;
        }
        if record.tag_id() != tag_id {
            warn!(
                "requested tag ID {tag_id} did not match tag array ID {}",
                record.tag_id()
            );
            return None;
        }
        if !record.is_a(group) {
            warn!(
                "requested tag group \"{group}\" is not a valid match for tag array group \"{}\"",
                fourcc_to_extension(record.primary_group.get())
            );
            return None;
        }

        let Some(size) = group.base_struct_size() else {
            warn!("tag group \"{group}\" has no known base struct");
            return None;
        };
        match self.tag_space.resolve(record.data_address.get(), size as u64) {
            Ok(range) => Some(range),
            Err(error) => {
                warn!("tag data for {tag_id} is out of bounds: {error}");
                None
            }
        }
    }

    /// The tag's base struct bytes, viewed as `group`.
    pub fn get_tag(&mut self, tag_id: TagId, group: TagGroup) -> Option<&mut [u8]> {
        let range = self.tag_range(tag_id, group)?;
        Some(self.bytes_mut(range))
    }

    /// The tag's base struct.
    pub fn tag<T: TagDefinition>(&self, tag_id: TagId) -> Option<&T> {
        let range = self.tag_range(tag_id, T::GROUP)?;
        T::ref_from_bytes(self.bytes(range)).ok()
    }

    pub fn tag_mut<T: TagDefinition>(&mut self, tag_id: TagId) -> Option<&mut T> {
        let range = self.tag_range(tag_id, T::GROUP)?;
        T::mut_from_bytes(self.bytes_mut(range)).ok()
    }

    /// File range of element `index` of `reflexive`, resolved in `space`.
    pub fn element_range(
        &self,
        space: &AddressSpace,
        reflexive: &Reflexive,
        index: u32,
        element_size: usize,
    ) -> Option<Range<usize>> {
        if index >= reflexive.count() {
            return None;
        }
        space
            .resolve_element(reflexive.address.get(), index, element_size)
            .ok()
    }

    /// Element `index` of a tag data reflexive as raw bytes.
    pub fn get_reflexive_element(
        &mut self,
        reflexive: &Reflexive,
        index: u32,
        element_size: usize,
    ) -> Option<&mut [u8]> {
        let space = self.tag_space;
        let range = self.element_range(&space, reflexive, index, element_size)?;
        Some(self.bytes_mut(range))
    }

    pub fn element<T: TagBlock>(&self, space: &AddressSpace, reflexive: &Reflexive, index: u32) -> Option<&T> {
        let range = self.element_range(space, reflexive, index, std::mem::size_of::<T>())?;
        T::ref_from_bytes(self.bytes(range)).ok()
    }

    pub fn element_mut<T: TagBlock>(
        &mut self,
        space: &AddressSpace,
        reflexive: &Reflexive,
        index: u32,
    ) -> Option<&mut T> {
        let range = self.element_range(space, reflexive, index, std::mem::size_of::<T>())?;
        T::mut_from_bytes(self.bytes_mut(range)).ok()
    }

    /// A block at `address` in `space`.
    pub fn block<T: TagBlock>(&self, space: &AddressSpace, address: u32) -> Option<&T> {
        let range = space.resolve(address, std::mem::size_of::<T>() as u64).ok()?;
        T::ref_from_bytes(self.bytes(range)).ok()
    }

    pub fn block_mut<T: TagBlock>(&mut self, space: &AddressSpace, address: u32) -> Option<&mut T> {
        let range = space.resolve(address, std::mem::size_of::<T>() as u64).ok()?;
        T::mut_from_bytes(self.bytes_mut(range)).ok()
    }

    /// Contents of a tag data blob. Empty blobs resolve to `None`.
    pub fn get_tag_data_blob(&mut self, blob: &TagDataBlob) -> Option<&mut [u8]> {
        let range = self
            .tag_space
            .resolve(blob.address.get(), u64::from(blob.size.get()))
            .ok()?;
        Some(self.bytes_mut(range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::CacheFileBuilder;
    use crate::definitions::{Shader, Sound};
    use crate::group::GROUP_NONE;
    use proptest::prelude::*;
    use zerocopy::{FromZeros, IntoBytes};

    fn shader_file() -> (CacheFile, TagId) {
        let mut builder = CacheFileBuilder::new();
        builder.add_scenario("levels\\test\\test");
        let shader = builder.add_tag_groups(
            [
                TagGroup::ShaderEnvironment.fourcc(),
                TagGroup::Shader.fourcc(),
                GROUP_NONE,
            ],
            "levels\\test\\shaders\\floor",
            Shader::new_zeroed().as_bytes(),
        );
        (CacheFile::load(builder.build()).unwrap(), shader)
    }

    #[test]
    fn test_tag_path() {
        let (cache, shader) = shader_file();
        assert_eq!(cache.get_tag_path(shader), Some(&b"levels\\test\\shaders\\floor"[..]));
        assert_eq!(cache.get_tag_path(TagId::NULL), None);
        assert_eq!(cache.get_tag_path(TagId::new(0xE174, 40)), None);
        assert_eq!(
            cache.get_extension_or_placeholder(TagId::new(0xE174, 40)),
            INVALID_PLACEHOLDER
        );
        assert_eq!(cache.get_tag_extension(shader), "shader_environment");
        assert_eq!(
            cache.get_extension_or_placeholder(shader),
            "levels\\test\\shaders\\floor.shader_environment"
        );
        assert_eq!(cache.iter_records().count(), 2);
    }

    #[test]
    fn test_code_page_path() {
        let mut builder = CacheFileBuilder::new();
        builder.add_scenario("levels\\test\\test");
        let tag = builder.add_tag(TagGroup::Sound, b"sound\\caf\xE9", Sound::new_zeroed().as_bytes());

        let cache = CacheFile::load(builder.build()).unwrap();
        assert_eq!(cache.get_tag_path(tag), Some(&b"sound\\caf\xE9"[..]));
        assert_eq!(cache.get_extension_or_placeholder(tag), "sound\\caf\u{FFFD}.sound");
    }

    #[test]
    fn test_unterminated_path_at_end_of_tag_data() {
        let mut builder = CacheFileBuilder::new();
        builder.add_scenario("levels\\test\\test");
        let tag = builder.add_tag(TagGroup::Sound, "sound\\x", Sound::new_zeroed().as_bytes());
        builder.tail_path(tag, b"unterminated");

        let cache = CacheFile::load(builder.build()).unwrap();
        assert_eq!(cache.get_tag_path(tag), None);
        assert_eq!(cache.get_extension_or_placeholder(tag), INVALID_PLACEHOLDER);
    }

    #[test]
    fn test_get_tag_matches_any_group() {
        let (mut cache, shader) = shader_file();
        assert!(cache.tag::<Shader>(shader).is_some());
        assert!(cache.get_tag(shader, TagGroup::ShaderEnvironment).is_none(), "no known base size");
        assert!(cache.get_tag(shader, TagGroup::Sound).is_none());
        assert!(cache.tag_mut::<Shader>(shader).is_some());
    }

    #[test]
    fn test_get_tag_rejects_external() {
        let mut builder = CacheFileBuilder::new();
        builder.add_scenario("levels\\test\\test");
        let shader = builder.add_tag(TagGroup::Shader, "a", Shader::new_zeroed().as_bytes());
        let sound = builder.add_tag(TagGroup::Sound, "b", Sound::new_zeroed().as_bytes());
        builder.record_mut(shader).external.set(1);
        builder.record_mut(sound).external.set(1);

        let cache = CacheFile::load(builder.build()).unwrap();
        assert!(cache.tag_is_external(shader));
        assert!(cache.tag::<Shader>(shader).is_none());
        assert!(cache.tag::<Sound>(sound).is_some());
    }

    #[test]
    fn test_get_tag_rejects_mismatched_id() {
        let mut builder = CacheFileBuilder::new();
        builder.add_scenario("levels\\test\\test");
        let shader = builder.add_tag(TagGroup::Shader, "a", Shader::new_zeroed().as_bytes());
        builder.record_mut(shader).tag_id.set(TagId::new(0x1234, shader.index()).raw());

        let cache = CacheFile::load(builder.build()).unwrap();
        assert!(cache.tag::<Shader>(shader).is_none());
        assert!(cache.tag::<Shader>(TagId::new(0x1234, shader.index())).is_some());
    }

    #[test]
    fn test_get_tag_rejects_out_of_bounds_payload() {
        let mut builder = CacheFileBuilder::new();
        builder.add_scenario("levels\\test\\test");
        let shader = builder.add_tag(TagGroup::Shader, "a", Shader::new_zeroed().as_bytes());
        builder.record_mut(shader).data_address.set(0x7FFF_FFFF);

        let cache = CacheFile::load(builder.build()).unwrap();
        assert!(cache.tag::<Shader>(shader).is_none());
    }

    #[test]
    fn test_record_mut() {
        let (mut cache, shader) = shader_file();
        cache.record_mut(shader).unwrap().external.set(1);
        assert!(cache.tag_is_external(shader));
        assert!(cache.record_mut(TagId::NULL).is_none());
    }

    #[test]
    fn test_reflexive_elements() {
        let mut builder = CacheFileBuilder::new();
        builder.add_scenario("levels\\test\\test");
        let reflexive = builder.reflexive(3, &[1, 2, 3, 4, 5, 6]);
        let mut cache = CacheFile::load(builder.build()).unwrap();

        assert_eq!(cache.get_reflexive_element(&reflexive, 0, 2).unwrap(), &[1, 2]);
        assert_eq!(cache.get_reflexive_element(&reflexive, 2, 2).unwrap(), &[5, 6]);
        assert!(cache.get_reflexive_element(&reflexive, 3, 2).is_none());
    }

    #[test]
    fn test_tag_data_blob() {
        let mut builder = CacheFileBuilder::new();
        builder.add_scenario("levels\\test\\test");
        let address = builder.alloc(&[9, 8, 7]);
        let mut cache = CacheFile::load(builder.build()).unwrap();

        let mut blob = TagDataBlob::new_zeroed();
        assert!(cache.get_tag_data_blob(&blob).is_none());
        blob.size.set(3);
        blob.address.set(address);
        assert_eq!(cache.get_tag_data_blob(&blob).unwrap(), &[9, 8, 7]);
    }

    proptest! {
        #[test]
        fn prop_reflexive_bound(count in 0u32..8, index in 0u32..16, element_size in 1usize..64) {
            let mut builder = CacheFileBuilder::new();
            builder.add_scenario("levels\\test\\test");
            let address = builder.alloc(&[0u8; 128]);
            let cache = CacheFile::load(builder.build()).unwrap();

            let mut reflexive = Reflexive::new_zeroed();
            reflexive.count.set(count);
            reflexive.address.set(address);

            let space = cache.tag_space();
            let resolved = cache.element_range(&space, &reflexive, index, element_size);
            if index >= count {
                prop_assert!(resolved.is_none());
            } else {
                let direct = space.resolve_element(address, index, element_size).ok();
                prop_assert_eq!(resolved, direct);
            }
        }
    }
}
