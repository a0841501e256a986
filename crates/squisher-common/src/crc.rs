//! Halo cache file CRC-32.
//!
//! Cache files are checksummed with the reflected CRC-32 polynomial
//! (`0xEDB88320`), seeded with `0xFFFFFFFF` and stored *without* the final
//! inversion. The raw register is what ends up in the header, so this module
//! only ever exposes raw register values.
//!
//! `crc32fast` keeps its state pre-inverted, which means the raw register is
//! simply the bitwise NOT of whatever it would report as a finished CRC.

use crc32fast::Hasher;

use crate::{Error, Result};

/// Register value at the start of every checksum pass.
pub const CRC_SEED: u32 = 0xFFFF_FFFF;

const POLYNOMIAL: u32 = 0xEDB8_8320;

const TABLE: [u32; 256] = build_table();

/// Index into [`TABLE`] for each possible top byte of an entry.
const TOP_BYTE_INDEX: [u8; 256] = build_top_byte_index();

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;
        while k < 8 {
            c = if c & 1 != 0 { POLYNOMIAL ^ (c >> 1) } else { c >> 1 };
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
}

const fn build_top_byte_index() -> [u8; 256] {
    let mut index = [0u8; 256];
    let mut n = 0;
    while n < 256 {
        index[(TABLE[n] >> 24) as usize] = n as u8;
        n += 1;
    }
    index
}

/// Incremental Halo CRC-32 accumulator.
///
/// Ranges may be fed in any number of calls; the register carries over
/// between them, so the order of calls changes the result.
#[derive(Debug, Clone)]
pub struct HaloCrc {
    hasher: Hasher,
}

impl HaloCrc {
    /// Start a new pass from [`CRC_SEED`].
    pub fn new() -> Self {
        Self::resume(CRC_SEED)
    }

    /// Continue a pass from a raw register value.
    pub fn resume(register: u32) -> Self {
        Self {
            hasher: Hasher::new_with_initial(!register),
        }
    }

    /// Feed a byte range into the register.
    #[inline]
    pub fn update(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Current raw register value.
    pub fn value(&self) -> u32 {
        !self.hasher.clone().finalize()
    }
}

impl Default for HaloCrc {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the raw register over `bytes` starting from `register`.
pub fn checksum_from(register: u32, bytes: &[u8]) -> u32 {
    let mut crc = HaloCrc::resume(register);
    crc.update(bytes);
    crc.value()
}

/// Walk the register backwards over `bytes`.
///
/// Returns the register that, after consuming `bytes`, ends at `register`.
pub fn unwind(mut register: u32, bytes: &[u8]) -> u32 {
    for &byte in bytes.iter().rev() {
        let index = TOP_BYTE_INDEX[(register >> 24) as usize];
        register = ((register ^ TABLE[index as usize]) << 8) | u32::from(index ^ byte);
    }
    register
}

/// Compute the four bytes that move the register from `from` to `to`.
pub fn forge(from: u32, to: u32) -> [u8; 4] {
    let mut indices = [0u8; 4];
    let mut register = to;
    for slot in indices.iter_mut().rev() {
        let index = TOP_BYTE_INDEX[(register >> 24) as usize];
        *slot = index;
        register = (register ^ TABLE[index as usize]) << 8;
    }

    let mut bytes = [0u8; 4];
    let mut register = from;
    for (byte, &index) in bytes.iter_mut().zip(indices.iter()) {
        *byte = (register as u8) ^ index;
        register = TABLE[index as usize] ^ (register >> 8);
    }
    bytes
}

/// Overwrite `data[window..window + 4]` so that running the register from
/// `start` over all of `data` ends at `target`.
pub fn steer(data: &mut [u8], window: usize, start: u32, target: u32) -> Result<()> {
    let end = window
        .checked_add(4)
        .filter(|&end| end <= data.len())
        .ok_or(Error::WindowOutOfBounds {
            offset: window,
            len: data.len(),
        })?;

    let before = checksum_from(start, &data[..window]);
    let after = unwind(target, &data[end..]);
    data[window..end].copy_from_slice(&forge(before, after));
    Ok(())
}
