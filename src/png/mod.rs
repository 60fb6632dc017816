//! The PNG codec: chunk parsing, decompression, unfiltering, and writing.
//!
//! The general format of a PNG is that the information is stored in "chunks".
//! There's four "critical" chunk types:
//! * **Header** (`IHDR`) - The image's dimensions, pixel format, and if the
//!   image is interlaced or not.
//! * **Palette** (`PLTE`) - If an image uses indexed color it will have a
//!   palette of what index values map to what `RGB8` values.
//! * **Image Data** (`IDAT`) - One or more chunks of compressed data. All of
//!   the compressed data forms a single zlib data stream.
//! * **End** (`IEND`) - The last chunk.
//!
//! Between the header and the image data there are also zero or more
//! "ancillary" chunks. This module reads the background color (`bKGD`), gamma
//! (`gAMA`), physical resolution (`pHYs`), page offset (`oFFs`) and time
//! (`tIME`) chunks, and skips all others.
//!
//! Decoding goes: iterate the raw chunks, decompress the `IDAT` stream into a
//! buffer of exactly the size the header calls for, then unfilter the lines in
//! place while sending each pixel out to its final position (which also takes
//! care of Adam7 de-interlacing).
//!
//! Quoting [section 13.2 of the PNG
//! spec](https://www.w3.org/TR/2003/REC-PNG-20031110/#13Decoders.Errors):
//!
//! > Errors that have little or no effect on the processing of the image may be
//! > ignored, while those that affect critical data shall be dealt with in a
//! > manner appropriate to the application.
//!
//! So a damaged ancillary chunk is skipped with a warning, but a damaged
//! critical chunk stops the decode.

use alloc::{format, vec::Vec};
use core::fmt::{Debug, Write};

use miniz_oxide::inflate::{decompress_slice_iter_to_slice, TINFLStatus};

use crate::{
  color::{Color, ColorFormat, Palette},
  error::{DecodeError, EncodeError},
  pixel_formats::RGB8,
};

use crc32::*;

mod chunks;
pub use chunks::*;

mod crc32;

mod interlace;
pub use interlace::*;

mod raw_chunk;
pub use raw_chunk::*;

mod unfilter;
pub use unfilter::*;

mod write;
pub use write::*;

#[cfg(test)]
mod tests;

/// The eight bytes every PNG starts with.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Checks if the bytes start with the PNG signature.
///
/// This doesn't look at anything past the signature.
#[inline]
#[must_use]
pub fn is_png_signature(bytes: &[u8]) -> bool {
  bytes.starts_with(&PNG_SIGNATURE)
}

/// How the image data of a PNG was stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InterlaceMode {
  /// Lines in order, top to bottom.
  #[default]
  None,
  /// The seven pass Adam7 method.
  Adam7,
  /// Anything else.
  Unknown,
}
impl From<bool> for InterlaceMode {
  #[inline]
  fn from(is_interlaced: bool) -> Self {
    if is_interlaced {
      Self::Adam7
    } else {
      Self::None
    }
  }
}

/// Everything [`decode_image`] gets out of a PNG.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPng {
  pub width: u32,
  pub height: u32,
  pub bit_depth: u8,
  pub color_format: ColorFormat,
  pub channels: usize,
  pub interlace_mode: InterlaceMode,
  /// Bytes per line of `pixels`.
  pub row_stride: usize,
  /// Page offset in pixels, 0 unless the `oFFs` unit is pixels.
  pub offset_x: i32,
  pub offset_y: i32,
  /// 0 unless the `pHYs` unit is meters.
  pub pixels_per_meter_x: u32,
  pub pixels_per_meter_y: u32,
  /// Row-major pixel data, see [`unfilter_decompressed_data`] for the per
  /// pixel layout.
  pub pixels: Vec<u8>,
  /// Present for indexed images only.
  pub palette: Option<Palette>,
  pub background_color: Option<Color>,
  pub gamma: Option<f32>,
  pub time: Option<PngTime>,
}

#[derive(Default)]
struct Ancillary {
  background: Option<bKGD>,
  gamma: Option<u32>,
  physical: Option<pHYs>,
  offset: Option<oFFs>,
  time: Option<PngTime>,
}

/// Decodes full PNG bytes into an owned, unpacked pixel buffer.
///
/// * Bit depths 1, 2, and 4 use one byte per pixel, holding the sample value.
/// * Bit depth 8 uses one byte per channel.
/// * Bit depth 16 uses two big-endian bytes per channel.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedPng, DecodeError> {
  if !is_png_signature(bytes) {
    return Err(DecodeError::InvalidSignature);
  }

  let mut ihdr: Option<IHDR> = None;
  let mut plte: Option<&[RGB8]> = None;
  let mut idat: Vec<&[u8]> = Vec::new();
  let mut extra = Ancillary::default();
  for raw in PngRawChunkIter::new(bytes) {
    if !raw.crc_is_correct() {
      if raw.type_.is_critical() {
        return Err(DecodeError::CrcMismatch(format!("{:?}", raw.type_)));
      }
      log::warn!("skipping {:?} chunk with a bad CRC", raw.type_);
      continue;
    }
    match PngChunk::try_from(raw) {
      Ok(PngChunk::IHDR(h)) => {
        if ihdr.is_some() {
          log::warn!("skipping a second IHDR chunk");
        } else {
          ihdr = Some(h);
        }
      }
      Ok(PngChunk::PLTE(entries)) => plte = Some(entries),
      Ok(PngChunk::IDAT(data)) => idat.push(data),
      Ok(PngChunk::IEND) => break,
      Ok(PngChunk::bKGD(b)) => extra.background = Some(b),
      Ok(PngChunk::gAMA(g)) => extra.gamma = Some(g),
      Ok(PngChunk::pHYs(p)) => extra.physical = Some(p),
      Ok(PngChunk::oFFs(o)) => extra.offset = Some(o),
      Ok(PngChunk::tIME(t)) => extra.time = Some(t),
      Err(raw) => match raw.type_ {
        PngRawChunkType::IHDR => return Err(DecodeError::IllegalHeader),
        PngRawChunkType::PLTE => return Err(DecodeError::IllegalPalette),
        PngRawChunkType::bKGD
        | PngRawChunkType::gAMA
        | PngRawChunkType::pHYs
        | PngRawChunkType::oFFs
        | PngRawChunkType::tIME => log::warn!("skipping malformed chunk {raw:?}"),
        _ => log::trace!("skipping chunk {raw:?}"),
      },
    }
  }

  let ihdr = ihdr.ok_or(DecodeError::MissingHeader)?;
  if ihdr.width == 0 || ihdr.height == 0 {
    return Err(DecodeError::WidthOrHeightZero);
  }
  if ihdr.width > i32::MAX as u32 || ihdr.height > i32::MAX as u32 {
    return Err(DecodeError::DimensionsTooLarge);
  }
  let palette = match (ihdr.color_type, plte) {
    (PngColorType::Index, None) => return Err(DecodeError::MissingPalette),
    (PngColorType::Index, Some(entries)) => {
      let max = 1_usize << ihdr.bit_depth;
      if entries.len() > max {
        log::warn!("palette has {} entries, only {max} are usable", entries.len());
      }
      Some(Palette::from(&entries[..entries.len().min(max)]))
    }
    _ => None,
  };
  if idat.is_empty() {
    return Err(DecodeError::MissingImageData);
  }

  let bpp = ihdr.unpacked_bytes_per_pixel();
  let row_stride = (ihdr.width as usize).checked_mul(bpp).ok_or(DecodeError::DimensionsTooLarge)?;
  let pixel_len =
    row_stride.checked_mul(ihdr.height as usize).ok_or(DecodeError::DimensionsTooLarge)?;
  let zlib_len = ihdr.zlib_decompression_requirement().ok_or(DecodeError::DimensionsTooLarge)?;

  let mut zlib_buffer: Vec<u8> = Vec::new();
  zlib_buffer.try_reserve(zlib_len).map_err(|_| DecodeError::DimensionsTooLarge)?;
  zlib_buffer.resize(zlib_len, 0);
  match decompress_slice_iter_to_slice(&mut zlib_buffer, idat.iter().copied(), true, true) {
    Ok(count) if count < zlib_len => {
      log::debug!("inflated {count} bytes, expected {zlib_len}");
      return Err(DecodeError::Truncated);
    }
    Ok(_) => (),
    // every scanline is present, only the end of the stream wasn't reached.
    Err(TINFLStatus::HasMoreOutput) => log::warn!("image data continues past the last scanline"),
    Err(TINFLStatus::FailedCannotMakeProgress) => return Err(DecodeError::Truncated),
    Err(status) => {
      log::debug!("inflate failed: {status:?}");
      return Err(DecodeError::Zlib);
    }
  }

  let mut pixels: Vec<u8> = Vec::new();
  pixels.try_reserve(pixel_len).map_err(|_| DecodeError::DimensionsTooLarge)?;
  pixels.resize(pixel_len, 0);
  unfilter_decompressed_data(ihdr, &mut zlib_buffer, |x, y, data| {
    let i = x as usize * bpp + y as usize * row_stride;
    if let Some(dest) = pixels.get_mut(i..i + data.len()) {
      dest.copy_from_slice(data);
    }
  })?;

  let color_format = ColorFormat::from(ihdr.color_type);
  let (pixels_per_meter_x, pixels_per_meter_y) = match extra.physical {
    Some(pHYs { ppu_x, ppu_y, is_meters: true }) => (ppu_x, ppu_y),
    _ => (0, 0),
  };
  let (offset_x, offset_y) = match extra.offset {
    Some(oFFs { x, y, is_pixels: true }) => (x, y),
    _ => (0, 0),
  };
  let decoded = DecodedPng {
    width: ihdr.width,
    height: ihdr.height,
    bit_depth: ihdr.bit_depth,
    color_format,
    channels: ihdr.color_type.channel_count(),
    interlace_mode: InterlaceMode::from(ihdr.is_interlaced),
    row_stride,
    offset_x,
    offset_y,
    pixels_per_meter_x,
    pixels_per_meter_y,
    pixels,
    palette,
    background_color: extra
      .background
      .and_then(|b| b.to_color(ihdr.color_type, ihdr.bit_depth)),
    gamma: extra.gamma.map(|g| g as f32 / 100_000.0),
    time: extra.time,
  };
  log::debug!(
    "decoded {}x{} {:?} at {} bits, {} IDAT chunks, {} pixel bytes",
    decoded.width,
    decoded.height,
    decoded.color_format,
    decoded.bit_depth,
    idat.len(),
    decoded.pixels.len()
  );
  Ok(decoded)
}
