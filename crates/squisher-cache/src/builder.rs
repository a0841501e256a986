//! Synthetic cache files for tests.
//!
//! Lays out a minimal but fully valid container:
//!
//! ```text
//! 0x000  header
//! 0x800  tag data: tag data header, allocations, BSP reference list,
//!        tag array, trailing path (if any)
//!        model data
//!        BSP blobs, in reference order
//!        zero padding up to the minimum file size
//! ```

use byteorder::{LittleEndian, WriteBytesExt};
use zerocopy::{FromBytes, FromZeros, IntoBytes};

use crate::address::TAG_DATA_BASE_ADDRESS;
use crate::definitions::{BspHeader, BspReference, Scenario, TagBlock};
use crate::group::{TagGroup, GROUP_NONE};
use crate::header::{CacheHeader, HEADER_SIZE, MINIMUM_FILE_SIZE};
use crate::id::TagId;
use crate::layout::{Reflexive, TagDataHeader, TagRecord};

const FIRST_SALT: u16 = 0xE174;

/// Offset of the first allocation from the start of tag data.
const ARENA_START: usize = TagDataHeader::SIZE;

/// Assembles a cache file in memory.
#[derive(Debug, Clone)]
pub struct CacheFileBuilder {
    version: u32,
    build_number: String,
    scenario_type: u16,
    name: Vec<u8>,
    arena: Vec<u8>,
    records: Vec<TagRecord>,
    scenario: Option<(TagId, usize)>,
    bsp_references: Vec<BspReference>,
    bsp_blobs: Vec<Vec<u8>>,
    model_data: Vec<u8>,
    tail_path: Option<(TagId, Vec<u8>)>,
}

impl Default for CacheFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheFileBuilder {
    /// A multiplayer Custom Edition map built by the stock 609 tool.
    pub fn new() -> Self {
        Self {
            version: 609,
            build_number: "01.00.00.0609".to_owned(),
            scenario_type: 1,
            name: b"test".to_vec(),
            arena: Vec::new(),
            records: Vec::new(),
            scenario: None,
            bsp_references: Vec::new(),
            bsp_blobs: Vec::new(),
            model_data: Vec::new(),
            tail_path: None,
        }
    }

    pub fn version(&mut self, version: u32) -> &mut Self {
        self.version = version;
        self
    }

    pub fn build_number(&mut self, build_number: &str) -> &mut Self {
        self.build_number = build_number.to_owned();
        self
    }

    /// Raw scenario name bytes, not necessarily UTF-8.
    pub fn name(&mut self, name: &[u8]) -> &mut Self {
        self.name = name.to_vec();
        self
    }

    pub fn scenario_type(&mut self, scenario_type: u16) -> &mut Self {
        self.scenario_type = scenario_type;
        self
    }

    /// Copy `bytes` into tag data and return their address.
    pub fn alloc(&mut self, bytes: &[u8]) -> u32 {
        while self.arena.len() % 4 != 0 {
            self.arena.push(0);
        }
        let address = Self::arena_address(self.arena.len());
        self.arena.extend_from_slice(bytes);
        address
    }

    /// A reflexive of `count` elements whose contents are `bytes`.
    pub fn reflexive(&mut self, count: u32, bytes: &[u8]) -> Reflexive {
        let mut reflexive = Reflexive::new_zeroed();
        reflexive.count.set(count);
        reflexive.address.set(self.alloc(bytes));
        reflexive
    }

    fn arena_address(offset: usize) -> u32 {
        TAG_DATA_BASE_ADDRESS + (ARENA_START + offset) as u32
    }

    fn push_record(&mut self, groups: [u32; 3], path: &[u8], data_address: u32) -> TagId {
        let index = self.records.len() as u16;
        let tag_id = TagId::new(FIRST_SALT.wrapping_add(index), index);

        let mut path_bytes = path.to_vec();
        path_bytes.push(0);
        let path_address = self.alloc(&path_bytes);

        let mut record = TagRecord::new_zeroed();
        record.primary_group.set(groups[0]);
        record.secondary_group.set(groups[1]);
        record.tertiary_group.set(groups[2]);
        record.tag_id.set(tag_id.raw());
        record.path_address.set(path_address);
        record.data_address.set(data_address);
        self.records.push(record);
        tag_id
    }

    /// Add a tag with a single group. Paths are raw bytes, as in real maps.
    pub fn add_tag(&mut self, group: TagGroup, path: impl AsRef<[u8]>, payload: &[u8]) -> TagId {
        self.add_tag_groups([group.fourcc(), GROUP_NONE, GROUP_NONE], path, payload)
    }

    /// Add a tag with explicit primary, secondary and tertiary groups.
    pub fn add_tag_groups(&mut self, groups: [u32; 3], path: impl AsRef<[u8]>, payload: &[u8]) -> TagId {
        let data_address = self.alloc(payload);
        self.push_record(groups, path.as_ref(), data_address)
    }

    /// Add the scenario tag. Its BSP list is filled in by [`CacheFileBuilder::build`].
    pub fn add_scenario(&mut self, path: &str) -> TagId {
        let payload = Scenario::new_zeroed();
        let tag_id = self.add_tag(TagGroup::Scenario, path, payload.as_bytes());
        let offset = self.payload_offset(tag_id).unwrap_or_default();
        self.scenario = Some((tag_id, offset));
        tag_id
    }

    pub fn scenario_tag(&self) -> TagId {
        self.scenario.map_or(TagId::NULL, |(tag_id, _)| tag_id)
    }

    /// Add a BSP tag and its cached blob.
    ///
    /// The blob gets a valid BSP header, followed by `contents`, which are
    /// therefore laid out from `base_address + 24`.
    pub fn add_bsp(&mut self, path: &str, base_address: u32, contents: &[u8]) -> TagId {
        let structure_bsp = base_address + BspHeader::SIZE as u32;
        let fourcc = TagGroup::ScenarioStructureBsp.fourcc();
        let tag_id = self.push_record([fourcc, GROUP_NONE, GROUP_NONE], path.as_bytes(), structure_bsp);

        let mut blob = Vec::with_capacity(BspHeader::SIZE + contents.len());
        for field in [structure_bsp, 0, 0, 0, 0, BspHeader::SIGNATURE] {
            // Writes into a Vec cannot fail
            let _ = blob.write_u32::<LittleEndian>(field);
        }
        blob.extend_from_slice(contents);

        let mut reference = BspReference::new_zeroed();
        reference.file_size.set(blob.len() as u32);
        reference.address.set(base_address);
        reference.structure_bsp.group.set(fourcc);
        reference.structure_bsp.path_address.set(self.records[usize::from(tag_id.index())].path_address.get());
        reference.structure_bsp.path_length.set(path.len() as u32);
        reference.structure_bsp.tag_id.set(tag_id.raw());

        self.bsp_references.push(reference);
        self.bsp_blobs.push(blob);
        tag_id
    }

    pub fn bsp_reference_mut(&mut self, index: usize) -> &mut BspReference {
        &mut self.bsp_references[index]
    }

    pub fn model_data(&mut self, bytes: &[u8]) -> &mut Self {
        self.model_data = bytes.to_vec();
        self
    }

    pub fn record_mut(&mut self, tag_id: TagId) -> &mut TagRecord {
        &mut self.records[usize::from(tag_id.index())]
    }

    /// Point the tag's path at unterminated `bytes` placed at the very end of tag data.
    pub fn tail_path(&mut self, tag_id: TagId, bytes: &[u8]) -> &mut Self {
        self.tail_path = Some((tag_id, bytes.to_vec()));
        self
    }

    fn payload_offset(&self, tag_id: TagId) -> Option<usize> {
        let record = self.records.get(usize::from(tag_id.index()))?;
        let address = record.data_address.get().checked_sub(TAG_DATA_BASE_ADDRESS)? as usize;
        address.checked_sub(ARENA_START)
    }

    /// The tag's payload as allocated, for editing before the file is built.
    pub fn payload_mut<T: TagBlock>(&mut self, tag_id: TagId) -> Option<&mut T> {
        let start = self.payload_offset(tag_id)?;
        let end = start.checked_add(std::mem::size_of::<T>())?;
        T::mut_from_bytes(self.arena.get_mut(start..end)?).ok()
    }

    /// Raw tag data bytes at `address`, for editing allocations in place.
    pub fn arena_mut(&mut self, address: u32, len: usize) -> Option<&mut [u8]> {
        let start = (address.checked_sub(TAG_DATA_BASE_ADDRESS)? as usize).checked_sub(ARENA_START)?;
        self.arena.get_mut(start..start.checked_add(len)?)
    }

    /// Lay the file out.
    pub fn build(&self) -> Vec<u8> {
        let mut tag_data = vec![0u8; ARENA_START];
        tag_data.extend_from_slice(&self.arena);
        align(&mut tag_data);

        let bsp_list_offset = tag_data.len();
        tag_data.resize(bsp_list_offset + self.bsp_references.len() * 32, 0);

        let tag_array_offset = tag_data.len();
        let tail_offset = tag_array_offset + self.records.len() * TagRecord::SIZE;
        for (index, record) in self.records.iter().enumerate() {
            let mut record = *record;
            if let Some((tag_id, _)) = &self.tail_path {
                if usize::from(tag_id.index()) == index {
                    record.path_address.set(TAG_DATA_BASE_ADDRESS + tail_offset as u32);
                }
            }
            tag_data.extend_from_slice(record.as_bytes());
        }
        if let Some((_, bytes)) = &self.tail_path {
            tag_data.extend_from_slice(bytes);
        }

        let model_offset = HEADER_SIZE + tag_data.len();
        let mut blob_offset = model_offset + self.model_data.len();
        for (index, (reference, blob)) in self.bsp_references.iter().zip(&self.bsp_blobs).enumerate() {
            let mut reference = *reference;
            reference.file_offset.set(blob_offset as u32);
            blob_offset += blob.len();
            let start = bsp_list_offset + index * 32;
            tag_data[start..start + 32].copy_from_slice(reference.as_bytes());
        }

        if let Some((_, offset)) = self.scenario {
            let start = ARENA_START + offset;
            if let Ok(scenario) = Scenario::mut_from_bytes(&mut tag_data[start..start + 1456]) {
                scenario.structure_bsps.count.set(self.bsp_references.len() as u32);
                scenario
                    .structure_bsps
                    .address
                    .set(TAG_DATA_BASE_ADDRESS + bsp_list_offset as u32);
            }
        }

        if let Ok((header, _)) = TagDataHeader::mut_from_prefix(&mut tag_data) {
            header.tag_array_address.set(TAG_DATA_BASE_ADDRESS + tag_array_offset as u32);
            header.scenario_tag.set(self.scenario_tag().raw());
            header.tag_count.set(self.records.len() as u32);
            header.model_data_offset.set(model_offset as u32);
            header.model_data_size.set(self.model_data.len() as u32);
            header.signature.set(TagDataHeader::SIGNATURE);
        }

        let mut header = CacheHeader::new_zeroed();
        header.header_signature.set(CacheHeader::HEADER_SIGNATURE);
        header.footer_signature.set(CacheHeader::FOOTER_SIGNATURE);
        header.version.set(self.version);
        header.tag_data_offset.set(HEADER_SIZE as u32);
        header.tag_data_size.set(tag_data.len() as u32);
        header.scenario_type.set(self.scenario_type);
        write_fixed(&mut header.name, &self.name);
        write_fixed(&mut header.build_number, self.build_number.as_bytes());

        let mut file = Vec::with_capacity(blob_offset.max(MINIMUM_FILE_SIZE));
        file.extend_from_slice(header.as_bytes());
        file.extend_from_slice(&tag_data);
        file.extend_from_slice(&self.model_data);
        for blob in &self.bsp_blobs {
            file.extend_from_slice(blob);
        }
        if file.len() < MINIMUM_FILE_SIZE {
            file.resize(MINIMUM_FILE_SIZE, 0);
        }

        let file_size = file.len() as u32;
        file[8..12].copy_from_slice(&file_size.to_le_bytes());
        file
    }
}

fn align(bytes: &mut Vec<u8>) {
    while bytes.len() % 4 != 0 {
        bytes.push(0);
    }
}

/// Copy as much of `value` as fits, keeping the last byte NUL.
fn write_fixed(field: &mut [u8; 32], value: &[u8]) {
    let len = value.len().min(field.len() - 1);
    field[..len].copy_from_slice(&value[..len]);
}
