//! Address Resolver.
//!
//! Cache files store 32-bit virtual addresses that only make sense relative
//! to the base address their data was laid out for. An [`AddressSpace`]
//! pairs that base with the window of the file it maps onto, and
//! [`AddressSpace::resolve`] is the only place a stored address becomes a
//! file offset.

use std::ops::Range;

use crate::AddressError;

/// Address the tag data region is laid out for.
pub const TAG_DATA_BASE_ADDRESS: u32 = 0x4044_0000;

/// A relocatable window of the cache file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressSpace {
    base: u32,
    start: usize,
    len: usize,
}

impl AddressSpace {
    /// The tag data region: `len` bytes at file offset `start`.
    pub const fn tag_data(start: usize, len: usize) -> Self {
        Self::cached(TAG_DATA_BASE_ADDRESS, start, len)
    }

    /// A space whose address `base` maps to file offset `start`.
    pub const fn cached(base: u32, start: usize, len: usize) -> Self {
        Self { base, start, len }
    }

    pub const fn base(&self) -> u32 {
        self.base
    }

    /// File offset of the first byte of the space.
    pub const fn start(&self) -> usize {
        self.start
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// File range covered by the whole space.
    pub const fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }

    /// Map `needed` bytes at `address` to a file range.
    ///
    /// All arithmetic is done in 64 bits, so neither a huge `needed` nor an
    /// address near `u32::MAX` can wrap into a valid-looking range.
    pub fn resolve(&self, address: u32, needed: u64) -> Result<Range<usize>, AddressError> {
        if needed == 0 {
            return Err(AddressError::ZeroLength);
        }
        if address < self.base {
            return Err(AddressError::Underflow {
                address,
                base: self.base,
            });
        }

        let offset = u64::from(address - self.base);
        let bound = self.len as u64;
        if offset > bound {
            return Err(AddressError::StartOutOfBounds {
                address,
                offset,
                bound,
            });
        }
        match offset.checked_add(needed) {
            Some(end) if end <= bound => {}
            _ => {
                return Err(AddressError::EndOutOfBounds {
                    address,
                    needed,
                    bound,
                })
            }
        }

        let start = self.start + offset as usize;
        Ok(start..start + needed as usize)
    }

    /// Map element `index` of an array of `element_size` byte elements at `address`.
    pub fn resolve_element(
        &self,
        address: u32,
        index: u32,
        element_size: usize,
    ) -> Result<Range<usize>, AddressError> {
        let element_size = element_size as u64;
        let element_address = u64::from(address) + u64::from(index) * element_size;
        let element_address = u32::try_from(element_address).map_err(|_| AddressError::EndOutOfBounds {
            address,
            needed: (u64::from(index) + 1) * element_size,
            bound: self.len as u64,
        })?;
        self.resolve(element_address, element_size)
    }
}
