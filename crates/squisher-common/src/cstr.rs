//! NUL-terminated string helpers.

use memchr::memchr;

use crate::{Error, Result};

/// Bytes before the first NUL within the first `limit` bytes of `bytes`.
///
/// Returns `None` when no terminator appears inside the limit.
#[inline]
pub fn terminated(bytes: &[u8], limit: usize) -> Option<&[u8]> {
    let window = &bytes[..bytes.len().min(limit)];
    memchr(0, window).map(|end| &window[..end])
}

/// Read a fixed-width, NUL-padded header field.
///
/// The final byte must be NUL, as cache file readers copy these fields
/// without a length. The contents are returned as stored; no text encoding
/// is implied.
pub fn fixed_field<'a>(bytes: &'a [u8], field: &'static str) -> Result<&'a [u8]> {
    if bytes.last() != Some(&0) {
        return Err(Error::UnterminatedField { field });
    }
    let end = memchr(0, bytes).unwrap_or(bytes.len());
    Ok(&bytes[..end])
}

/// Overwrite a fixed-width field with `value`, NUL-padding the rest.
pub fn write_fixed_field(bytes: &mut [u8], value: &str) -> Result<()> {
    if value.len() >= bytes.len() || value.as_bytes().contains(&0) {
        return Err(Error::FieldTooLong {
            value: value.to_string(),
            capacity: bytes.len(),
        });
    }
    bytes.fill(0);
    bytes[..value.len()].copy_from_slice(value.as_bytes());
    Ok(())
}
