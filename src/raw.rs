//! Region operations on bare pixel buffers.
//!
//! These work on any row-major buffer without row padding; the bytes per
//! pixel are worked out from the buffer length and the image dimensions.
//! Colors are given as one byte per channel. At bit depths above 8 each byte
//! fills every byte of its sample, so `v` becomes `[v, v]` at 16 bits.
//!
//! Every function checks the buffer geometry before it touches anything, and
//! gives a [`ValidationError`] instead of writing out of bounds.

use alloc::vec::Vec;

use crate::error::ValidationError;

/// A rectangle of a raw buffer, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RawArea {
  pub x: u32,
  pub y: u32,
  pub width: u32,
  pub height: u32,
}
impl RawArea {
  #[inline]
  #[must_use]
  pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
    Self { x, y, width, height }
  }

  /// The whole of a `width` x `height` image.
  #[inline]
  #[must_use]
  pub const fn full(width: u32, height: u32) -> Self {
    Self { x: 0, y: 0, width, height }
  }

  fn check_inside(self, width: u32, height: u32) -> Result<(), ValidationError> {
    let fits =
      |start: u32, len: u32, bound: u32| u64::from(start) + u64::from(len) <= u64::from(bound);
    if fits(self.x, self.width, width) && fits(self.y, self.height, height) {
      Ok(())
    } else {
      Err(ValidationError::OutOfBounds {
        x: i64::from(self.x),
        y: i64::from(self.y),
        width: i64::from(self.width),
        height: i64::from(self.height),
        bounds_width: width,
        bounds_height: height,
      })
    }
  }
}

/// Bytes per pixel of a `len` byte buffer holding `width` x `height` pixels.
fn bytes_per_pixel(len: usize, width: u32, height: u32) -> Result<usize, ValidationError> {
  let pixel_count = (width as usize).saturating_mul(height as usize);
  if pixel_count == 0 {
    return Err(ValidationError::DimensionsTooSmall {
      width: i64::from(width),
      height: i64::from(height),
    });
  }
  if len % pixel_count != 0 || len == 0 {
    return Err(ValidationError::BufferSizeMismatch { len, expected: pixel_count });
  }
  Ok(len / pixel_count)
}

/// Expands a color of one byte per channel into the bytes of one pixel.
fn pixel_bytes(color: &[u8], bit_depth: u8, bpp: usize) -> Result<Vec<u8>, ValidationError> {
  let bytes_per_sample = (usize::from(bit_depth) + 7) / 8;
  if bytes_per_sample == 0 || color.len() * bytes_per_sample != bpp {
    let channels = color.len();
    return Err(ValidationError::ColorLengthMismatch { channels, bytes_per_pixel: bpp });
  }
  Ok(color.iter().flat_map(|&v| core::iter::repeat(v).take(bytes_per_sample)).collect())
}

/// Writes `color` into every pixel of `area`.
pub fn fill_region_raw(
  buffer: &mut [u8], width: u32, height: u32, area: RawArea, color: &[u8], bit_depth: u8,
) -> Result<(), ValidationError> {
  let bpp = bytes_per_pixel(buffer.len(), width, height)?;
  let pixel = pixel_bytes(color, bit_depth, bpp)?;
  area.check_inside(width, height)?;
  let stride = width as usize * bpp;
  let start = area.x as usize * bpp;
  let end = start + area.width as usize * bpp;
  for row in buffer.chunks_exact_mut(stride).skip(area.y as usize).take(area.height as usize) {
    for dest in row[start..end].chunks_exact_mut(bpp) {
      dest.copy_from_slice(&pixel);
    }
  }
  Ok(())
}

/// Copies `area` of `source` into `dest`, with the top left of the area
/// landing on `(dest_x, dest_y)`.
///
/// Both buffers must have the same bytes per pixel.
#[allow(clippy::too_many_arguments)]
pub fn copy_region_raw(
  source: &[u8], dest: &mut [u8], source_width: u32, source_height: u32, dest_width: u32,
  dest_height: u32, area: RawArea, dest_x: u32, dest_y: u32,
) -> Result<(), ValidationError> {
  let bpp = bytes_per_pixel(source.len(), source_width, source_height)?;
  let dest_bpp = bytes_per_pixel(dest.len(), dest_width, dest_height)?;
  if bpp != dest_bpp {
    return Err(ValidationError::BufferSizeMismatch {
      len: dest.len(),
      expected: dest_width as usize * dest_height as usize * bpp,
    });
  }
  area.check_inside(source_width, source_height)?;
  RawArea { x: dest_x, y: dest_y, ..area }.check_inside(dest_width, dest_height)?;

  let source_stride = source_width as usize * bpp;
  let dest_stride = dest_width as usize * bpp;
  let bytes = area.width as usize * bpp;
  let source_rows = source.chunks_exact(source_stride).skip(area.y as usize);
  let dest_rows = dest.chunks_exact_mut(dest_stride).skip(dest_y as usize);
  for (source_row, dest_row) in source_rows.zip(dest_rows).take(area.height as usize) {
    let from = area.x as usize * bpp;
    let to = dest_x as usize * bpp;
    dest_row[to..to + bytes].copy_from_slice(&source_row[from..from + bytes]);
  }
  Ok(())
}

/// Builds a new `new_width` x `new_height` buffer filled with `fill_color`,
/// then places the `clip` area of the old buffer at `(offset_x, offset_y)`.
///
/// Any part of the clip that would fall past the right or bottom edge of the
/// new buffer is left out.
#[allow(clippy::too_many_arguments)]
pub fn resize_canvas_raw(
  buffer: &[u8], old_width: u32, old_height: u32, new_width: u32, new_height: u32, offset_x: u32,
  offset_y: u32, clip: RawArea, fill_color: &[u8], bit_depth: u8,
) -> Result<Vec<u8>, ValidationError> {
  let bpp = bytes_per_pixel(buffer.len(), old_width, old_height)?;
  let pixel = pixel_bytes(fill_color, bit_depth, bpp)?;
  if new_width == 0 || new_height == 0 {
    return Err(ValidationError::DimensionsTooSmall {
      width: i64::from(new_width),
      height: i64::from(new_height),
    });
  }
  clip.check_inside(old_width, old_height)?;
  RawArea::new(offset_x, offset_y, 0, 0).check_inside(new_width, new_height)?;

  let too_large = ValidationError::DimensionsTooLarge { width: new_width, height: new_height };
  let len = (new_width as usize)
    .checked_mul(new_height as usize)
    .and_then(|n| n.checked_mul(bpp))
    .ok_or_else(|| too_large.clone())?;
  let mut out: Vec<u8> = Vec::new();
  out.try_reserve(len).map_err(|_| too_large)?;
  while out.len() < len {
    out.extend_from_slice(&pixel);
  }

  let placed = RawArea {
    x: offset_x,
    y: offset_y,
    width: clip.width.min(new_width - offset_x),
    height: clip.height.min(new_height - offset_y),
  };
  if placed.width > 0 && placed.height > 0 {
    copy_region_raw(
      buffer,
      &mut out,
      old_width,
      old_height,
      new_width,
      new_height,
      RawArea { width: placed.width, height: placed.height, ..clip },
      placed.x,
      placed.y,
    )?;
  }
  Ok(out)
}
