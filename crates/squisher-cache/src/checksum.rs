//! Checksum Recomputation.

use std::ops::Range;

use tracing::debug;

use squisher_common::crc::{self, HaloCrc};

use crate::file::CacheFile;
use crate::layout::TagDataHeader;
use crate::{Error, Result};

impl CacheFile {
    /// File ranges the checksum covers, in accumulation order: every BSP
    /// blob in scenario order, then the model data, then the whole tag data.
    pub fn checksum_ranges(&self) -> Result<Vec<Range<usize>>> {
        let len = self.len() as u64;
        let mut ranges = Vec::new();

        for (index, reference) in self.bsp_references()?.iter().enumerate() {
            let offset = reference.file_offset.get();
            let size = reference.file_size.get();
            let end = u64::from(offset) + u64::from(size);
            if end > len {
                return Err(Error::BspOutOfBounds { index, offset, size });
            }
            ranges.push(offset as usize..end as usize);
        }

        let offset = self.tag_data_header().model_data_offset.get();
        let size = self.tag_data_header().model_data_size.get();
        let end = u64::from(offset) + u64::from(size);
        if end > len {
            return Err(Error::ModelDataOutOfBounds { offset, size });
        }
        ranges.push(offset as usize..end as usize);

        ranges.push(self.tag_space().range());
        Ok(ranges)
    }

    /// Recompute the checksum over the current buffer.
    pub fn compute_checksum(&self) -> Result<u32> {
        let mut crc = HaloCrc::new();
        for range in self.checksum_ranges()? {
            crc.update(self.bytes(range));
        }
        Ok(crc.value())
    }

    /// Recompute the checksum and store it in the header.
    pub fn update_checksum(&mut self) -> Result<u32> {
        let checksum = self.compute_checksum()?;
        debug!("checksum updated to {checksum:#010x}");
        self.set_checksum(checksum);
        Ok(checksum)
    }

    /// Rewrite the tag data header's checksum field so the recomputed
    /// checksum matches the one stored in the header.
    pub fn preserve_checksum(&mut self) -> Result<()> {
        let target = self.header().checksum.get();
        let ranges = self.checksum_ranges()?;

        let mut crc = HaloCrc::new();
        if let Some((_, leading)) = ranges.split_last() {
            for range in leading {
                crc.update(self.bytes(range.clone()));
            }
        }

        let tag_data = self.tag_space().range();
        crc::steer(
            self.bytes_mut(tag_data),
            TagDataHeader::CHECKSUM_OFFSET,
            crc.value(),
            target,
        )?;

        let actual = self.compute_checksum()?;
        if actual != target {
            return Err(Error::ChecksumNotPreserved {
                expected: target,
                actual,
            });
        }
        debug!("checksum preserved at {target:#010x}");
        Ok(())
    }
}
