use byteorder::{ByteOrder, LittleEndian};

use squisher_cache::definitions::Meter;
use squisher_cache::{CacheFile, TagId};

use super::{invalid_tag, out_of_bounds};
use crate::{Error, Result};

/// Where a stencil walk stopped.
#[derive(Debug, PartialEq, Eq)]
enum StencilFault {
    RowHeader(usize),
    Origin(usize),
    Pixels(usize),
}

impl StencilFault {
    fn into_error(self, tag: String) -> Error {
        match self {
            StencilFault::RowHeader(row) => Error::StencilRowOutOfBounds { row, tag },
            StencilFault::Origin(row) => Error::StencilRowOutsideMeter { row, tag },
            StencilFault::Pixels(row) => Error::StencilPixelsOutOfBounds { row, tag },
        }
    }
}

/// Zero the padding byte of every encoded pixel.
fn zero_stencil_padding(stencil: &mut [u8], width: i32, height: i32) -> std::result::Result<bool, StencilFault> {
    let mut changed = false;
    let mut offset = 0;
    let mut row = 0;

    while offset < stencil.len() {
        let pixels_start = offset + Meter::ROW_HEADER_SIZE;
        let Some(header) = stencil.get(offset..pixels_start) else {
            return Err(StencilFault::RowHeader(row));
        };
        let x = i32::from(LittleEndian::read_i16(&header[0..2]));
        let y = i32::from(LittleEndian::read_i16(&header[2..4]));
        let count = usize::from(LittleEndian::read_u16(&header[4..6]));

        if x + count as i32 > width || y > height {
            return Err(StencilFault::Origin(row));
        }

        let pixels_end = pixels_start + count * Meter::PIXEL_SIZE;
        let Some(pixels) = stencil.get_mut(pixels_start..pixels_end) else {
            return Err(StencilFault::Pixels(row));
        };
        for pixel in pixels.chunks_exact_mut(Meter::PIXEL_SIZE) {
            let pad = &mut pixel[Meter::PIXEL_PAD_OFFSET];
            if *pad != 0 {
                *pad = 0;
                changed = true;
            }
        }

        offset = pixels_end;
        row += 1;
    }

    Ok(changed)
}

/// Zero the uninitialized padding in the encoded stencil so rebuilt maps
/// are reproducible.
pub fn fix_meter(cache: &mut CacheFile, tag_id: TagId) -> Result<bool> {
    let meter = *cache
        .tag::<Meter>(tag_id)
        .ok_or_else(|| invalid_tag(cache, tag_id))?;

    // Extracted and rebuilt meters have no stencil at all
    if meter.encoded_stencil.size.get() == 0 {
        return Ok(false);
    }

    let width = i32::from(meter.runtime_width.get());
    let height = i32::from(meter.runtime_height.get());
    let Some(stencil) = cache.get_tag_data_blob(&meter.encoded_stencil) else {
        return Err(out_of_bounds(cache, tag_id, "encoded stencil data".to_owned()));
    };

    match zero_stencil_padding(stencil, width, height) {
        Ok(changed) => Ok(changed),
        Err(fault) => Err(fault.into_error(cache.get_extension_or_placeholder(tag_id).into_owned())),
    }
}
