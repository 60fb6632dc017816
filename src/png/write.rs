use super::*;

use miniz_oxide::deflate::compress_to_vec_zlib;

/// Everything needed to write a PNG, other than the pixels.
///
/// Build one with [`PngWriteInfo::new`] and then fill in any optional chunks.
#[derive(Debug, Clone, PartialEq)]
pub struct PngWriteInfo<'a> {
  /// The image header.
  pub header: IHDR,
  /// Palette entries, required for indexed images and ignored for the gray
  /// types.
  pub palette: Option<&'a [RGB8]>,
  /// `bKGD` chunk.
  pub background: Option<bKGD>,
  /// `gAMA` chunk, gamma times 100,000.
  pub gamma: Option<u32>,
  /// `pHYs` chunk.
  pub physical: Option<pHYs>,
  /// `oFFs` chunk.
  pub offset: Option<oFFs>,
  /// `tIME` chunk.
  pub time: Option<PngTime>,
  /// zlib level, 0 (store) to 10.
  pub compression_level: u8,
  /// The compressed stream is split into `IDAT` chunks of at most this many
  /// bytes.
  pub max_idat_len: usize,
}
impl<'a> PngWriteInfo<'a> {
  /// Info with no optional chunks and the best compression level.
  #[inline]
  #[must_use]
  pub const fn new(header: IHDR) -> Self {
    Self {
      header,
      palette: None,
      background: None,
      gamma: None,
      physical: None,
      offset: None,
      time: None,
      compression_level: 9,
      max_idat_len: 1 << 15,
    }
  }
}

pub(super) fn write_chunk(out: &mut Vec<u8>, type_: PngRawChunkType, data: &[u8]) {
  // chunk lengths are always far below u32::MAX here
  out.extend_from_slice(&(data.len() as u32).to_be_bytes());
  out.extend_from_slice(&type_.0);
  out.extend_from_slice(data);
  let mut crc = PngCrc::new();
  crc.update(&type_.0);
  crc.update(data);
  out.extend_from_slice(&crc.finish().to_be_bytes());
}

/// Writes one reduced line into `line` (without a filter byte), packing
/// sub-byte samples most significant bit first.
fn pack_line(
  header: &IHDR, pixels: &[u8], image_level: usize, reduced_y: u32, reduced_width: u32,
  line: &mut Vec<u8>,
) {
  line.clear();
  let bpp = header.unpacked_bytes_per_pixel();
  let full_width = header.width as usize;
  let pixel_at = |reduced_x: u32| {
    let (x, y) = interlaced_pos_to_full_pos(image_level, reduced_x, reduced_y);
    let i = (x as usize + y as usize * full_width) * bpp;
    &pixels[i..i + bpp]
  };
  match header.bit_depth {
    1 | 2 | 4 => {
      let depth = u32::from(header.bit_depth);
      let per_byte = 8 / depth;
      let mask = ((1_u32 << depth) - 1) as u8;
      let mut reduced_x = 0;
      while reduced_x < reduced_width {
        let mut byte = 0_u8;
        for plus_x in 0..per_byte {
          if reduced_x + plus_x < reduced_width {
            let shift = 8 - depth * (plus_x + 1);
            byte |= (pixel_at(reduced_x + plus_x)[0] & mask) << shift;
          }
        }
        line.push(byte);
        reduced_x += per_byte;
      }
    }
    _ => {
      for reduced_x in 0..reduced_width {
        line.extend_from_slice(pixel_at(reduced_x));
      }
    }
  }
}

/// Applies filter type `filter` to `line`, appending the filter byte and the
/// result to `out`.
pub(super) fn filter_line(filter: u8, fcs: usize, line: &[u8], prev: &[u8], out: &mut Vec<u8>) {
  out.push(filter);
  for i in 0..line.len() {
    let a = if i >= fcs { line[i - fcs] } else { 0 };
    let b = prev[i];
    let c = if i >= fcs { prev[i - fcs] } else { 0 };
    let predicted = match filter {
      0 => 0,
      1 => a,
      2 => b,
      3 => ((u32::from(a) + u32::from(b)) / 2) as u8,
      _ => paeth_predict(a, b, c),
    };
    out.push(line[i].wrapping_sub(predicted));
  }
}

/// Sum of the residuals read as signed bytes, lower is usually smaller after
/// compression.
fn filter_cost(filtered: &[u8]) -> u64 {
  filtered[1..].iter().map(|&b| u64::from((b as i8).unsigned_abs())).sum()
}

/// Produces the filtered (uncompressed) image data for the header.
fn filter_image(header: &IHDR, pixels: &[u8]) -> Vec<u8> {
  let fcs = header.filter_chunk_size();
  // Indexed and packed data rarely gains from filtering.
  let adaptive = header.color_type != PngColorType::Index && header.bit_depth >= 8;
  let dims = reduced_image_dimensions(header.width, header.height);
  let levels = if header.is_interlaced { 1..8 } else { 0..1 };

  let mut out = Vec::with_capacity(header.zlib_decompression_requirement().unwrap_or(0));
  let mut line = Vec::new();
  let mut prev = Vec::new();
  let mut best = Vec::new();
  let mut candidate = Vec::new();
  for image_level in levels {
    let (reduced_width, reduced_height) = dims[image_level];
    if reduced_width == 0 || reduced_height == 0 {
      continue;
    }
    prev.clear();
    for reduced_y in 0..reduced_height {
      pack_line(header, pixels, image_level, reduced_y, reduced_width, &mut line);
      prev.resize(line.len(), 0);
      best.clear();
      filter_line(0, fcs, &line, &prev, &mut best);
      if adaptive {
        let mut best_cost = filter_cost(&best);
        for filter in 1..=4 {
          candidate.clear();
          filter_line(filter, fcs, &line, &prev, &mut candidate);
          let cost = filter_cost(&candidate);
          if cost < best_cost {
            best_cost = cost;
            core::mem::swap(&mut best, &mut candidate);
          }
        }
      }
      log::trace!("level {image_level} line {reduced_y}: filter {}", best[0]);
      out.extend_from_slice(&best);
      core::mem::swap(&mut prev, &mut line);
    }
  }
  out
}

/// Encodes pixels in the unpacked buffer layout as a full PNG file.
///
/// The pixel layout is the one [`decode_image`] produces: one byte per sample
/// for depths of 8 or less (sub-byte samples in the low bits), two big-endian
/// bytes per sample at 16-bit depth.
///
/// ## Failure
/// * [`EncodeError::IllegalHeader`] if the dimensions are 0 or the bit depth
///   isn't allowed for the color type.
/// * [`EncodeError::IllegalPalette`] for an indexed image without 1 to 256
///   palette entries.
/// * [`EncodeError::BufferLengthMismatch`] if `pixels` isn't exactly the size
///   the header needs.
pub fn encode_raw(info: &PngWriteInfo<'_>, pixels: &[u8]) -> Result<Vec<u8>, EncodeError> {
  let header = info.header;
  if header.width == 0
    || header.height == 0
    || header.width > i32::MAX as u32
    || header.height > i32::MAX as u32
    || !header.color_type.allows_bit_depth(header.bit_depth)
  {
    return Err(EncodeError::IllegalHeader);
  }
  let palette = match (header.color_type, info.palette) {
    (PngColorType::Index, Some(p)) if !p.is_empty() && p.len() <= 256 => Some(p),
    (PngColorType::Index, _) => return Err(EncodeError::IllegalPalette),
    (PngColorType::RGB | PngColorType::RGBA, Some(p)) if p.len() > 256 => {
      return Err(EncodeError::IllegalPalette)
    }
    (PngColorType::RGB | PngColorType::RGBA, p) => p,
    _ => None,
  };
  let expected = (header.width as usize)
    .checked_mul(header.height as usize)
    .and_then(|n| n.checked_mul(header.unpacked_bytes_per_pixel()))
    .ok_or(EncodeError::IllegalHeader)?;
  if pixels.len() != expected {
    return Err(EncodeError::BufferLengthMismatch { len: pixels.len(), expected });
  }

  let filtered = filter_image(&header, pixels);
  let compressed = compress_to_vec_zlib(&filtered, info.compression_level);

  let mut out = Vec::with_capacity(compressed.len() + 256);
  out.extend_from_slice(&PNG_SIGNATURE);
  write_chunk(&mut out, PngRawChunkType::IHDR, &header.to_bytes());
  if let Some(gamma) = info.gamma {
    write_chunk(&mut out, PngRawChunkType::gAMA, &gamma.to_be_bytes());
  }
  if let Some(entries) = palette {
    write_chunk(&mut out, PngRawChunkType::PLTE, bytemuck::cast_slice(entries));
  }
  if let Some(background) = info.background {
    write_chunk(&mut out, PngRawChunkType::bKGD, &background.to_bytes());
  }
  if let Some(physical) = info.physical {
    write_chunk(&mut out, PngRawChunkType::pHYs, &physical.to_bytes());
  }
  if let Some(offset) = info.offset {
    write_chunk(&mut out, PngRawChunkType::oFFs, &offset.to_bytes());
  }
  if let Some(time) = info.time {
    write_chunk(&mut out, PngRawChunkType::tIME, &time.to_bytes());
  }
  for idat in compressed.chunks(info.max_idat_len.max(1)) {
    write_chunk(&mut out, PngRawChunkType::IDAT, idat);
  }
  write_chunk(&mut out, PngRawChunkType::IEND, &[]);

  log::debug!(
    "encoded {}x{} {:?} at {} bits: {} pixel bytes into {} bytes",
    header.width,
    header.height,
    header.color_type,
    header.bit_depth,
    pixels.len(),
    out.len()
  );
  Ok(out)
}

/// Encodes 8-bit RGB or RGBA pixels as a PNG.
///
/// This is the plain form used for raw buffers, with no ancillary chunks.
pub fn encode_image(
  pixels: &[u8], width: u32, height: u32, has_alpha: bool, compression_level: u8,
) -> Result<Vec<u8>, EncodeError> {
  let header = IHDR {
    width,
    height,
    bit_depth: 8,
    color_type: if has_alpha { PngColorType::RGBA } else { PngColorType::RGB },
    is_interlaced: false,
  };
  let mut info = PngWriteInfo::new(header);
  info.compression_level = compression_level;
  encode_raw(&info, pixels)
}
