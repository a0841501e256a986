//! Container Loader.

use std::fs;
use std::ops::Range;
use std::path::Path;

use tracing::debug;
use zerocopy::{FromBytes, IntoBytes};

use crate::address::AddressSpace;
use crate::header::{CacheHeader, CacheVersion, ScenarioType, HEADER_SIZE, MAXIMUM_FILE_SIZE, MINIMUM_FILE_SIZE};
use crate::id::TagId;
use crate::layout::{TagDataHeader, TagRecord};
use crate::{Build, Error, Result};

/// Largest tag count the tag ID index can address.
pub const MAX_TAG_COUNT: u32 = u16::MAX as u32;

/// File name suffixes of the shared resource maps, which are not cache files.
const RESOURCE_MAP_SUFFIXES: [&str; 3] = ["loc.map", "sounds.map", "bitmaps.map"];

/// A fully loaded and validated cache file.
///
/// The buffer is owned here and every other view of the file (tag records,
/// tag structs, BSP blobs) is a range into it. A `CacheFile` only exists once
/// every load-time check has passed.
#[derive(Debug, Clone)]
pub struct CacheFile {
    data: Vec<u8>,
    header: CacheHeader,
    tag_data_header: TagDataHeader,
    pub(crate) tag_space: AddressSpace,
    pub(crate) tag_array: Range<usize>,
    build: Option<Build>,
}

impl CacheFile {
    /// Read and validate a cache file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        Self::load(data)
    }

    /// Validate a cache file held in memory.
    pub fn load(data: Vec<u8>) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::Empty);
        }
        if data.len() < MINIMUM_FILE_SIZE {
            return Err(Error::FileTooSmall(data.len()));
        }
        if data.len() > MAXIMUM_FILE_SIZE {
            return Err(Error::FileTooLarge(data.len()));
        }

        let (header, _) =
            CacheHeader::read_from_prefix(&data).map_err(|_| Error::FileTooSmall(data.len()))?;
        header.validate()?;

        let tag_space = locate_tag_data(&header, data.len())?;
        let (tag_data_header, _) = TagDataHeader::read_from_prefix(&data[tag_space.range()])
            .map_err(|_| Error::TagDataTooSmall(header.tag_data_size.get()))?;

        let tag_count = tag_data_header.tag_count.get();
        if tag_count > MAX_TAG_COUNT {
            return Err(Error::TooManyTags(tag_count));
        }

        let tag_array = tag_space
            .resolve(
                tag_data_header.tag_array_address.get(),
                u64::from(tag_count) * TagRecord::SIZE as u64,
            )
            .map_err(Error::TagArrayOutOfBounds)?;

        let build_number = header.build_number()?;
        let build = Build::classify(build_number);
        debug!(
            build = %String::from_utf8_lossy(build_number),
            tags = tag_count,
            "loaded cache file"
        );

        Ok(Self {
            data,
            header,
            tag_data_header,
            tag_space,
            tag_array,
            build,
        })
    }

    /// Write the whole buffer back to disk.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, &self.data)?;
        Ok(())
    }

    /// The whole file.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn header(&self) -> &CacheHeader {
        &self.header
    }

    /// Tag data header as it was when the file was loaded.
    pub fn tag_data_header(&self) -> &TagDataHeader {
        &self.tag_data_header
    }

    pub fn name(&self) -> Result<&[u8]> {
        self.header.name()
    }

    /// The known build this file was produced by, or `None` if untracked.
    pub fn build(&self) -> Option<Build> {
        self.build
    }

    pub fn build_number(&self) -> Result<&[u8]> {
        self.header.build_number()
    }

    pub fn scenario_tag(&self) -> TagId {
        self.tag_data_header.scenario_tag()
    }

    /// Address space of the tag data region.
    pub fn tag_space(&self) -> AddressSpace {
        self.tag_space
    }

    /// Whether tags may point into the shared resource maps by index.
    ///
    /// Only multiplayer Custom Edition maps qualify; other map types can keep
    /// stale tag data pointers alive across checkpoints.
    pub fn tags_can_be_indexed(&self) -> bool {
        self.header.version() == CacheVersion::CustomEdition
            && self.header.scenario_type() == ScenarioType::Multiplayer
    }

    pub fn set_checksum(&mut self, checksum: u32) {
        self.header.checksum.set(checksum);
        self.sync_header();
    }

    /// Rewrite the build number field.
    pub fn set_build(&mut self, build: Build) -> Result<()> {
        self.header.set_build_number(build.as_str())?;
        self.build = Some(build);
        self.sync_header();
        Ok(())
    }

    pub(crate) fn bytes(&self, range: Range<usize>) -> &[u8] {
        &self.data[range]
    }

    pub(crate) fn bytes_mut(&mut self, range: Range<usize>) -> &mut [u8] {
        &mut self.data[range]
    }

    fn sync_header(&mut self) {
        self.data[..HEADER_SIZE].copy_from_slice(self.header.as_bytes());
    }
}

/// Place the tag data region inside a file of `file_len` bytes.
fn locate_tag_data(header: &CacheHeader, file_len: usize) -> Result<AddressSpace> {
    let offset = header.tag_data_offset.get();
    let size = header.tag_data_size.get();

    if offset as usize > MAXIMUM_FILE_SIZE {
        return Err(Error::TagDataOffsetTooLarge(offset));
    }
    if size as usize > MAXIMUM_FILE_SIZE {
        return Err(Error::TagDataSizeTooLarge(size));
    }
    if offset as usize > file_len {
        return Err(Error::TagDataOffsetOutOfBounds {
            offset,
            len: file_len,
        });
    }
    if u64::from(offset) + u64::from(size) > file_len as u64 {
        return Err(Error::TagDataSizeOutOfBounds {
            offset,
            size,
            len: file_len,
        });
    }
    if (size as usize) < TagDataHeader::SIZE {
        return Err(Error::TagDataTooSmall(size));
    }

    Ok(AddressSpace::tag_data(offset as usize, size as usize))
}

/// Whether `path` names one of the shared resource maps.
pub fn is_resource_map_path<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref().to_string_lossy();
    RESOURCE_MAP_SUFFIXES.iter().any(|suffix| path.ends_with(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::CacheFileBuilder;
    use crate::AddressError;

    fn sample() -> Vec<u8> {
        let mut builder = CacheFileBuilder::new();
        builder.add_scenario("levels\\test\\test");
        builder.build()
    }

    fn patch_header(bytes: &mut [u8], f: impl FnOnce(&mut CacheHeader)) {
        let (header, _) = CacheHeader::mut_from_prefix(bytes).unwrap();
        f(header);
    }

    #[test]
    fn test_load_valid() {
        let cache = CacheFile::load(sample()).unwrap();
        assert_eq!(cache.build(), Some(Build::CustomEdition));
        assert_eq!(cache.tag_count(), 1);
        assert!(cache.tags_can_be_indexed());
        assert_eq!(cache.name().unwrap(), b"test");
    }

    #[test]
    fn test_load_rejects_small_files() {
        assert!(matches!(CacheFile::load(Vec::new()), Err(Error::Empty)));
        assert!(matches!(
            CacheFile::load(vec![0; 4095]),
            Err(Error::FileTooSmall(4095))
        ));
    }

    #[test]
    fn test_load_rejects_bad_signature() {
        let mut bytes = sample();
        bytes[0] ^= 0xFF;
        assert!(matches!(
            CacheFile::load(bytes),
            Err(Error::InvalidHeaderSignature { .. })
        ));

        let mut bytes = sample();
        bytes[0x7FC] ^= 0xFF;
        assert!(matches!(
            CacheFile::load(bytes),
            Err(Error::InvalidFooterSignature { .. })
        ));
    }

    #[test]
    fn test_load_rejects_demo_version() {
        let mut bytes = sample();
        patch_header(&mut bytes, |h| h.version.set(6));
        assert!(matches!(
            CacheFile::load(bytes),
            Err(Error::UnsupportedVersion(CacheVersion::Demo))
        ));
    }

    #[test]
    fn test_load_tag_data_checks_in_order() {
        let mut bytes = sample();
        patch_header(&mut bytes, |h| h.tag_data_offset.set(0x8000_0000));
        assert!(matches!(CacheFile::load(bytes), Err(Error::TagDataOffsetTooLarge(_))));

        let mut bytes = sample();
        patch_header(&mut bytes, |h| h.tag_data_size.set(0x8000_0000));
        assert!(matches!(CacheFile::load(bytes), Err(Error::TagDataSizeTooLarge(_))));

        let mut bytes = sample();
        let len = bytes.len() as u32;
        patch_header(&mut bytes, |h| h.tag_data_offset.set(len + 1));
        assert!(matches!(
            CacheFile::load(bytes),
            Err(Error::TagDataOffsetOutOfBounds { .. })
        ));

        let mut bytes = sample();
        let len = bytes.len() as u32;
        patch_header(&mut bytes, |h| h.tag_data_size.set(len));
        assert!(matches!(
            CacheFile::load(bytes),
            Err(Error::TagDataSizeOutOfBounds { .. })
        ));

        let mut bytes = sample();
        patch_header(&mut bytes, |h| h.tag_data_size.set(39));
        assert!(matches!(CacheFile::load(bytes), Err(Error::TagDataTooSmall(39))));
    }

    #[test]
    fn test_load_rejects_too_many_tags() {
        let mut bytes = sample();
        let offset = HEADER_SIZE;
        let (tag_data, _) = TagDataHeader::mut_from_prefix(&mut bytes[offset..]).unwrap();
        tag_data.tag_count.set(65536);
        assert!(matches!(CacheFile::load(bytes), Err(Error::TooManyTags(65536))));
    }

    #[test]
    fn test_load_rejects_tag_array_outside_tag_data() {
        let mut bytes = sample();
        let (tag_data, _) = TagDataHeader::mut_from_prefix(&mut bytes[HEADER_SIZE..]).unwrap();
        tag_data.tag_array_address.set(0x1000);
        assert!(matches!(
            CacheFile::load(bytes),
            Err(Error::TagArrayOutOfBounds(AddressError::Underflow { .. }))
        ));
    }

    #[test]
    fn test_load_rejects_empty_tag_array() {
        let mut bytes = sample();
        let (tag_data, _) = TagDataHeader::mut_from_prefix(&mut bytes[HEADER_SIZE..]).unwrap();
        tag_data.tag_count.set(0);
        assert!(matches!(
            CacheFile::load(bytes),
            Err(Error::TagArrayOutOfBounds(AddressError::ZeroLength))
        ));
    }

    #[test]
    fn test_load_accepts_code_page_name() {
        let mut builder = CacheFileBuilder::new();
        builder.name(b"caf\xE9");
        builder.add_scenario("levels\\test\\test");
        let cache = CacheFile::load(builder.build()).unwrap();
        assert_eq!(cache.name().unwrap(), b"caf\xE9");
        assert_eq!(cache.build(), Some(Build::CustomEdition));
    }

    #[test]
    fn test_untracked_build_still_loads() {
        let mut builder = CacheFileBuilder::new();
        builder.build_number("01.00.00.0001");
        builder.add_scenario("levels\\test\\test");
        let cache = CacheFile::load(builder.build()).unwrap();
        assert_eq!(cache.build(), None);
        assert_eq!(cache.build_number().unwrap(), b"01.00.00.0001");
    }

    #[test]
    fn test_indexing_requires_multiplayer_custom_edition() {
        let mut builder = CacheFileBuilder::new();
        builder.scenario_type(0);
        builder.add_scenario("levels\\a10\\a10");
        assert!(!CacheFile::load(builder.build()).unwrap().tags_can_be_indexed());

        let mut builder = CacheFileBuilder::new();
        builder.version(7);
        builder.add_scenario("levels\\test\\test");
        assert!(!CacheFile::load(builder.build()).unwrap().tags_can_be_indexed());
    }

    #[test]
    fn test_header_edits_reach_the_buffer() {
        let mut cache = CacheFile::load(sample()).unwrap();
        cache.set_checksum(0x1234_5678);
        cache.set_build(Build::Squished).unwrap();
        let bytes = cache.into_bytes();
        assert_eq!(&bytes[0x64..0x68], &0x1234_5678u32.to_le_bytes());
        assert_eq!(&bytes[0x40..0x4E], b"01.00.00.0000\0");

        let reloaded = CacheFile::load(bytes).unwrap();
        assert_eq!(reloaded.build(), Some(Build::Squished));
    }

    #[test]
    fn test_open_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.map");
        std::fs::write(&path, sample()).unwrap();

        let mut cache = CacheFile::open(&path).unwrap();
        cache.set_checksum(7);
        cache.save(&path).unwrap();
        assert_eq!(CacheFile::open(&path).unwrap().header().checksum.get(), 7);
        assert!(matches!(
            CacheFile::open(dir.path().join("missing.map")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_resource_map_paths() {
        assert!(is_resource_map_path("maps/bitmaps.map"));
        assert!(is_resource_map_path("maps/sounds.map"));
        assert!(is_resource_map_path("maps/loc.map"));
        assert!(!is_resource_map_path("maps/bloodgulch.map"));
    }
}
