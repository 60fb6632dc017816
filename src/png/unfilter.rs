use super::*;

/// Sends one unfiltered chunk of a line out to the `op`.
///
/// Sub-byte depths unpack each byte into several pixels, with the value in the
/// low bits. The padding bits at the end of a line are never sent.
fn send_out_pixel<F: FnMut(u32, u32, &[u8])>(
  bit_depth: u8, image_level: usize, reduced_width: u32, reduced_x: u32, reduced_y: u32,
  data: &[u8], op: &mut F,
) {
  match bit_depth {
    1 | 2 | 4 => {
      let depth = u32::from(bit_depth);
      let per_byte = 8 / depth;
      let mask = ((1_u32 << depth) - 1) as u8;
      for plus_x in 0..per_byte {
        let r_x = reduced_x * per_byte + plus_x;
        if r_x >= reduced_width {
          break;
        }
        let down_shift = 8 - depth * (plus_x + 1);
        let (image_x, image_y) = interlaced_pos_to_full_pos(image_level, r_x, reduced_y);
        op(image_x, image_y, &[(data[0] >> down_shift) & mask]);
      }
    }
    _ => {
      let (image_x, image_y) = interlaced_pos_to_full_pos(image_level, reduced_x, reduced_y);
      op(image_x, image_y, data);
    }
  }
}

pub(crate) const fn paeth_predict(a: u8, b: u8, c: u8) -> u8 {
  let a_ = a as i32;
  let b_ = b as i32;
  let c_ = c as i32;
  let p: i32 = a_ + b_ - c_;
  let pa = (p - a_).abs();
  let pb = (p - b_).abs();
  let pc = (p - c_).abs();
  // The order of these tests must not change.
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}

/// Reverses the filter of one line in place.
///
/// `prev` is the previous line of the same reduced image, without its filter
/// byte, or `None` for the first line.
fn unfilter_line(
  filter: u8, fcs: usize, line: &mut [u8], prev: Option<&[u8]>,
) -> Result<(), DecodeError> {
  let up = |i: usize| prev.map_or(0, |p| p[i]);
  match filter {
    0 => (),
    1 => {
      for i in fcs..line.len() {
        line[i] = line[i].wrapping_add(line[i - fcs]);
      }
    }
    2 => {
      if prev.is_some() {
        for i in 0..line.len() {
          line[i] = line[i].wrapping_add(up(i));
        }
      }
    }
    3 => {
      for i in 0..line.len() {
        let a = if i >= fcs { u32::from(line[i - fcs]) } else { 0 };
        let b = u32::from(up(i));
        line[i] = line[i].wrapping_add(((a + b) / 2) as u8);
      }
    }
    4 => {
      for i in 0..line.len() {
        let (a, c) = if i >= fcs { (line[i - fcs], up(i - fcs)) } else { (0, 0) };
        line[i] = line[i].wrapping_add(paeth_predict(a, up(i), c));
      }
    }
    other => return Err(DecodeError::IllegalFilterType(other)),
  }
  Ok(())
}

/// Given the `header`, `decompressed` buffer, and a per-pixel `op`, unfilters
/// the data and passes each pixel output to the `op` as the unfiltering occurs.
///
/// Each call to the `op` gets `|x, y, data|` as arguments, where `x` and `y`
/// are the position of the pixel within the full image, and `data` is the
/// unfiltered pixel bytes at that location. Bit-packed pixel data is unpacked
/// and the callback is called once per pixel, with the value in the lowest
/// bits of a single byte.
///
/// The data is unfiltered in place and each filter byte is reset to "no
/// filter", so running this twice over the same buffer gives the same pixels.
///
/// ## Failure
/// * A buffer larger than needed is fine, the extra bytes are ignored.
/// * A buffer that's too small gives [`DecodeError::Truncated`], possibly after
///   some of the pixels have already been sent out.
/// * A filter type above 4 gives [`DecodeError::IllegalFilterType`].
pub fn unfilter_decompressed_data<F>(
  header: IHDR, mut decompressed: &mut [u8], mut op: F,
) -> Result<(), DecodeError>
where
  F: FnMut(u32, u32, &[u8]),
{
  if header.width == 0 || header.height == 0 {
    return Err(DecodeError::WidthOrHeightZero);
  }

  let fcs = header.filter_chunk_size();
  let levels = if header.is_interlaced { 1..8 } else { 0..1 };
  let dims = reduced_image_dimensions(header.width, header.height);

  for image_level in levels {
    let (reduced_width, reduced_height) = dims[image_level];
    if reduced_width == 0 || reduced_height == 0 {
      // the passes of a small interlaced image can be empty.
      continue;
    }

    let bytes_per_filterline =
      header.bytes_per_filterline(reduced_width).ok_or(DecodeError::DimensionsTooLarge)?;
    let bytes_used_this_image = bytes_per_filterline
      .checked_mul(reduced_height as usize)
      .ok_or(DecodeError::DimensionsTooLarge)?;
    if decompressed.len() < bytes_used_this_image {
      return Err(DecodeError::Truncated);
    }
    let (these_bytes, more_bytes) =
      core::mem::take(&mut decompressed).split_at_mut(bytes_used_this_image);
    decompressed = more_bytes;

    let mut prev: Option<&[u8]> = None;
    for (reduced_y, line) in these_bytes.chunks_exact_mut(bytes_per_filterline).enumerate() {
      let (f, pixels) = line.split_at_mut(1);
      unfilter_line(f[0], fcs, pixels, prev)?;
      f[0] = 0;
      for (reduced_x, pixel) in pixels.chunks_exact(fcs).enumerate() {
        send_out_pixel(
          header.bit_depth,
          image_level,
          reduced_width,
          reduced_x as u32,
          reduced_y as u32,
          pixel,
          &mut op,
        );
      }
      prev = Some(&*pixels);
    }
  }

  Ok(())
}
