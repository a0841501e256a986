//! Cached structure BSPs.
//!
//! Each BSP named by the scenario lives outside the tag data in its own
//! blob, laid out for its own base address.

use zerocopy::FromBytes;

use crate::address::{AddressSpace, TAG_DATA_BASE_ADDRESS};
use crate::definitions::{BspHeader, BspReference, Scenario};
use crate::file::CacheFile;
use crate::{Error, Result};

/// A validated BSP blob and the address space it is laid out in.
#[derive(Debug, Clone, Copy)]
pub struct CachedBsp {
    /// Position in the scenario's BSP list
    pub index: usize,
    pub reference: BspReference,
    pub space: AddressSpace,
    pub header: BspHeader,
}

impl CachedBsp {
    /// Address of the `scenario_structure_bsp` struct inside [`CachedBsp::space`].
    pub fn structure_bsp_address(&self) -> u32 {
        self.header.structure_bsp.get()
    }
}

impl CacheFile {
    /// The scenario's BSP list, in declaration order.
    pub fn bsp_references(&self) -> Result<Vec<BspReference>> {
        let scenario = self
            .tag::<Scenario>(self.scenario_tag())
            .ok_or(Error::ScenarioUnresolvable)?;
        let list = scenario.structure_bsps;
        let space = self.tag_space;

        (0..list.count())
            .map(|index| {
                self.element::<BspReference>(&space, &list, index)
                    .copied()
                    .ok_or(Error::BspReferenceOutOfBounds(index as usize))
            })
            .collect()
    }

    /// Validate the blob `reference` describes and build its address space.
    pub fn cached_bsp(&self, index: usize, reference: &BspReference) -> Result<CachedBsp> {
        let offset = reference.file_offset.get();
        let size = reference.file_size.get();
        let address = reference.address.get();

        if (size as usize) < BspHeader::SIZE {
            return Err(Error::BspTooSmall { index, size });
        }
        if u64::from(offset) + u64::from(size) > self.len() as u64 {
            return Err(Error::BspOutOfBounds { index, offset, size });
        }
        if address < TAG_DATA_BASE_ADDRESS {
            return Err(Error::BspAddressTooLow { index, address });
        }

        let space = AddressSpace::cached(address, offset as usize, size as usize);
        let (header, _) = BspHeader::read_from_prefix(self.bytes(space.range()))
            .map_err(|_| Error::BspTooSmall { index, size })?;
        let signature = header.signature.get();
        if signature != BspHeader::SIGNATURE {
            return Err(Error::InvalidBspHeader { index, signature });
        }

        Ok(CachedBsp {
            index,
            reference: *reference,
            space,
            header,
        })
    }

    /// Every BSP blob, validated.
    pub fn cached_bsps(&self) -> Result<Vec<CachedBsp>> {
        self.bsp_references()?
            .iter()
            .enumerate()
            .map(|(index, reference)| self.cached_bsp(index, reference))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::CacheFileBuilder;
    use zerocopy::IntoBytes;

    fn two_bsp_file() -> CacheFileBuilder {
        let mut builder = CacheFileBuilder::new();
        builder.add_scenario("levels\\test\\test");
        builder.add_bsp("levels\\test\\a", 0x4200_0000, &[0xAA; 64]);
        builder.add_bsp("levels\\test\\b", 0x4300_0000, &[0xBB; 64]);
        builder
    }

    #[test]
    fn test_bsp_references_in_order() {
        let cache = CacheFile::load(two_bsp_file().build()).unwrap();
        let references = cache.bsp_references().unwrap();
        assert_eq!(references.len(), 2);
        assert_eq!(references[0].address.get(), 0x4200_0000);
        assert_eq!(references[1].address.get(), 0x4300_0000);

        let bsps = cache.cached_bsps().unwrap();
        assert_eq!(bsps[1].index, 1);
        assert_eq!(bsps[1].structure_bsp_address(), 0x4300_0000 + BspHeader::SIZE as u32);
        assert_eq!(bsps[0].space.len(), references[0].file_size.get() as usize);
    }

    fn with_reference(edit: impl FnOnce(&mut BspReference)) -> Result<CachedBsp> {
        let cache = CacheFile::load(two_bsp_file().build()).unwrap();
        let mut reference = cache.bsp_references().unwrap()[0];
        edit(&mut reference);
        cache.cached_bsp(0, &reference)
    }

    #[test]
    fn test_cached_bsp_rejects_small_blob() {
        assert!(matches!(
            with_reference(|r| r.file_size.set(23)),
            Err(Error::BspTooSmall { index: 0, size: 23 })
        ));
    }

    #[test]
    fn test_cached_bsp_rejects_out_of_bounds() {
        assert!(matches!(
            with_reference(|r| r.file_offset.set(u32::MAX - 8)),
            Err(Error::BspOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_cached_bsp_rejects_low_address() {
        assert!(matches!(
            with_reference(|r| r.address.set(0x1000)),
            Err(Error::BspAddressTooLow { address: 0x1000, .. })
        ));
    }

    #[test]
    fn test_cached_bsp_rejects_bad_signature() {
        let cache = CacheFile::load(two_bsp_file().build()).unwrap();
        let reference = cache.bsp_references().unwrap()[1];
        let mut bytes = cache.into_bytes();
        let signature_offset = reference.file_offset.get() as usize + 20;
        bytes[signature_offset..signature_offset + 4].copy_from_slice(0u32.as_bytes());

        let cache = CacheFile::load(bytes).unwrap();
        assert!(matches!(
            cache.cached_bsps(),
            Err(Error::InvalidBspHeader { index: 1, signature: 0 })
        ));
    }

    #[test]
    fn test_bsp_references_need_scenario() {
        let mut builder = CacheFileBuilder::new();
        let scenario = builder.add_scenario("levels\\test\\test");
        builder.record_mut(scenario).data_address.set(0);
        let cache = CacheFile::load(builder.build()).unwrap();
        assert!(matches!(cache.bsp_references(), Err(Error::ScenarioUnresolvable)));
    }
}
