#![allow(non_camel_case_types)]

use super::*;

/// The types of color that PNG supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PngColorType {
  /// Greyscale
  Y = 0,
  /// Red, Green, Blue
  RGB = 2,
  /// Index into a palette.
  ///
  /// The palette will have RGB8 data.
  Index = 3,
  /// Greyscale + Alpha
  YA = 4,
  /// Red, Green, Blue, Alpha
  RGBA = 6,
}
impl PngColorType {
  /// The number of channels in this type of color.
  #[inline]
  #[must_use]
  pub const fn channel_count(self) -> usize {
    match self {
      Self::Y => 1,
      Self::RGB => 3,
      Self::Index => 1,
      Self::YA => 2,
      Self::RGBA => 4,
    }
  }

  /// If PNG allows this color type at the given bit depth.
  #[inline]
  #[must_use]
  pub const fn allows_bit_depth(self, bit_depth: u8) -> bool {
    match self {
      Self::Y => matches!(bit_depth, 1 | 2 | 4 | 8 | 16),
      Self::Index => matches!(bit_depth, 1 | 2 | 4 | 8),
      Self::RGB | Self::YA | Self::RGBA => matches!(bit_depth, 8 | 16),
    }
  }
}
impl TryFrom<u8> for PngColorType {
  type Error = ();
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => PngColorType::Y,
      2 => PngColorType::RGB,
      3 => PngColorType::Index,
      4 => PngColorType::YA,
      6 => PngColorType::RGBA,
      _ => return Err(()),
    })
  }
}
impl TryFrom<ColorFormat> for PngColorType {
  type Error = ();
  #[inline]
  fn try_from(format: ColorFormat) -> Result<Self, Self::Error> {
    format.png_color_type().ok_or(()).and_then(PngColorType::try_from)
  }
}
impl From<PngColorType> for ColorFormat {
  #[inline]
  fn from(color_type: PngColorType) -> Self {
    ColorFormat::from_png_color_type(color_type as u8)
  }
}

/// Image Header
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IHDR {
  /// width in pixels
  pub width: u32,
  /// height in pixels
  pub height: u32,
  /// bits per channel
  pub bit_depth: u8,
  /// pixel color type
  pub color_type: PngColorType,
  /// if the image data is stored interlaced (Adam7).
  pub is_interlaced: bool,
}
impl IHDR {
  /// Bits used by a single pixel, before any unpacking.
  #[inline]
  #[must_use]
  pub const fn bits_per_pixel(&self) -> usize {
    (self.bit_depth as usize) * self.color_type.channel_count()
  }

  /// Bytes per pixel in the decoded (unpacked) buffer layout.
  #[inline]
  #[must_use]
  pub const fn unpacked_bytes_per_pixel(&self) -> usize {
    self.color_type.channel_count() * ((self.bit_depth as usize + 7) / 8)
  }

  /// Filtering works on whole pixels when they're one byte or more, and on
  /// single bytes otherwise.
  #[inline]
  #[must_use]
  pub(crate) const fn filter_chunk_size(&self) -> usize {
    let bytes = self.bits_per_pixel() / 8;
    if bytes == 0 {
      1
    } else {
      bytes
    }
  }

  /// Each line is a filter byte followed by the packed pixel data, rounded up
  /// to a whole byte.
  #[inline]
  #[must_use]
  pub(crate) fn bytes_per_filterline(&self, width: u32) -> Option<usize> {
    let bits_per_line = self.bits_per_pixel().checked_mul(width as usize)?;
    Some(bits_per_line / 8 + usize::from(bits_per_line % 8 != 0) + 1)
  }

  /// Gets the buffer size required to perform Zlib decompression.
  ///
  /// Gives `None` if the size doesn't fit in a `usize`.
  #[must_use]
  pub fn zlib_decompression_requirement(&self) -> Option<usize> {
    let levels = if self.is_interlaced { 1..8 } else { 0..1 };
    let dims = reduced_image_dimensions(self.width, self.height);
    let mut total = 0_usize;
    for (w, h) in levels.map(|level| dims[level]) {
      if w == 0 || h == 0 {
        continue;
      }
      total = total.checked_add(self.bytes_per_filterline(w)?.checked_mul(h as usize)?)?;
    }
    Some(total)
  }

  /// The 13 data bytes of this header's chunk.
  #[inline]
  #[must_use]
  pub fn to_bytes(&self) -> [u8; 13] {
    let [w0, w1, w2, w3] = self.width.to_be_bytes();
    let [h0, h1, h2, h3] = self.height.to_be_bytes();
    let interlace = u8::from(self.is_interlaced);
    [w0, w1, w2, w3, h0, h1, h2, h3, self.bit_depth, self.color_type as u8, 0, 0, interlace]
  }
}
impl TryFrom<&[u8]> for IHDR {
  type Error = ();
  fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
    match value {
      [w0, w1, w2, w3, h0, h1, h2, h3, bit_depth, color_type, 0, 0, interlace_method] => {
        let color_type = PngColorType::try_from(*color_type)?;
        if !color_type.allows_bit_depth(*bit_depth) {
          return Err(());
        }
        Ok(Self {
          width: u32::from_be_bytes([*w0, *w1, *w2, *w3]),
          height: u32::from_be_bytes([*h0, *h1, *h2, *h3]),
          bit_depth: *bit_depth,
          color_type,
          is_interlaced: match interlace_method {
            0 => false,
            1 => true,
            _ => return Err(()),
          },
        })
      }
      _ => Err(()),
    }
  }
}

/// Background color.
///
/// RGB and Greyscale colors are always given as `u16` values. The actual color
/// selected should stay within the bit depth range of the rest of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
#[allow(missing_docs)]
pub enum bKGD {
  Y { y: u16 },
  RGB { r: u16, g: u16, b: u16 },
  Index { i: u8 },
}
impl TryFrom<&[u8]> for bKGD {
  type Error = ();
  #[inline]
  fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
    Ok(match slice {
      [y0, y1] => bKGD::Y { y: u16::from_be_bytes([*y0, *y1]) },
      [r0, r1, g0, g1, b0, b1] => bKGD::RGB {
        r: u16::from_be_bytes([*r0, *r1]),
        g: u16::from_be_bytes([*g0, *g1]),
        b: u16::from_be_bytes([*b0, *b1]),
      },
      [i] => bKGD::Index { i: *i },
      _ => return Err(()),
    })
  }
}
impl bKGD {
  /// Converts the background into a color of the image's own format.
  ///
  /// 16-bit samples keep their high byte. Images with alpha get a background
  /// without alpha, since `bKGD` has none.
  #[must_use]
  pub fn to_color(self, color_type: PngColorType, bit_depth: u8) -> Option<Color> {
    let narrow = |v: u16| if bit_depth == 16 { (v >> 8) as u8 } else { v as u8 };
    Some(match (self, color_type) {
      (bKGD::Y { y }, PngColorType::Y | PngColorType::YA) => Color::gray_scale(narrow(y)),
      (bKGD::RGB { r, g, b }, PngColorType::RGB | PngColorType::RGBA) => {
        Color::rgb(narrow(r), narrow(g), narrow(b))
      }
      (bKGD::Index { i }, PngColorType::Index) => Color::palette(i),
      _ => return None,
    })
  }

  /// Converts a color back into a background, for writing.
  ///
  /// Alpha, if any, is dropped. 8-bit samples are widened for 16-bit images.
  #[must_use]
  pub fn from_color(color: Color, bit_depth: u8) -> Self {
    let widen = |v: u8| if bit_depth == 16 { u16::from(v) * 257 } else { u16::from(v) };
    match color {
      Color::GrayScale { gray } | Color::GrayScaleAlpha { gray, .. } => bKGD::Y { y: widen(gray) },
      Color::Rgb { r, g, b } | Color::Rgba { r, g, b, .. } => {
        bKGD::RGB { r: widen(r), g: widen(g), b: widen(b) }
      }
      Color::Palette { index } => bKGD::Index { i: index },
    }
  }

  pub(crate) fn to_bytes(self) -> Vec<u8> {
    match self {
      bKGD::Y { y } => y.to_be_bytes().to_vec(),
      bKGD::RGB { r, g, b } => {
        [r.to_be_bytes(), g.to_be_bytes(), b.to_be_bytes()].concat()
      }
      bKGD::Index { i } => alloc::vec![i],
    }
  }
}

/// Physical pixel dimensions
///
/// When `is_meters` is set then `x` and `y` are in pixels per meter.
/// Otherwise they have no unit and define an aspect ratio only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(nonstandard_style)]
pub struct pHYs {
  pub ppu_x: u32,
  pub ppu_y: u32,
  pub is_meters: bool,
}
impl pHYs {
  pub(crate) fn to_bytes(self) -> [u8; 9] {
    let [x0, x1, x2, x3] = self.ppu_x.to_be_bytes();
    let [y0, y1, y2, y3] = self.ppu_y.to_be_bytes();
    [x0, x1, x2, x3, y0, y1, y2, y3, u8::from(self.is_meters)]
  }
}

/// Image offset, the position of the image on a larger page.
///
/// When `is_pixels` is unset the offsets are in micrometers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(nonstandard_style)]
pub struct oFFs {
  pub x: i32,
  pub y: i32,
  pub is_pixels: bool,
}
impl oFFs {
  pub(crate) fn to_bytes(self) -> [u8; 9] {
    let [x0, x1, x2, x3] = self.x.to_be_bytes();
    let [y0, y1, y2, y3] = self.y.to_be_bytes();
    [x0, x1, x2, x3, y0, y1, y2, y3, u8::from(!self.is_pixels)]
  }
}

/// Image last-modification time, UTC.
///
/// This is the data of a `tIME` chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PngTime {
  /// 4-digit year.
  pub year: u16,
  /// 1-12
  pub month: u8,
  /// 1-31
  pub day: u8,
  /// 0-23
  pub hour: u8,
  /// 0-59
  pub minute: u8,
  /// 0-60 (60 for leap seconds)
  pub second: u8,
}
impl PngTime {
  pub(crate) fn to_bytes(self) -> [u8; 7] {
    let [y0, y1] = self.year.to_be_bytes();
    [y0, y1, self.month, self.day, self.hour, self.minute, self.second]
  }
}

/// A parsed PNG chunk
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(nonstandard_style)]
pub enum PngChunk<'b> {
  /// Image Header
  IHDR(IHDR),
  /// Palette
  PLTE(&'b [RGB8]),
  /// Image Data
  IDAT(&'b [u8]),
  /// Image End
  IEND,
  /// Background color
  bKGD(bKGD),
  /// Gamma value times 100,000.
  gAMA(u32),
  /// Physical pixel dimensions
  pHYs(pHYs),
  /// Image offset
  oFFs(oFFs),
  /// Last modification time
  tIME(PngTime),
}
impl<'b> TryFrom<PngRawChunk<'b>> for PngChunk<'b> {
  type Error = PngRawChunk<'b>;
  fn try_from(raw: PngRawChunk<'b>) -> Result<Self, Self::Error> {
    let data = raw.data;
    Ok(match raw.type_ {
      PngRawChunkType::IHDR => {
        // this can fail, so use `return` to avoid the outer Ok()
        return IHDR::try_from(data).map(PngChunk::IHDR).map_err(|_| raw);
      }
      PngRawChunkType::PLTE => match bytemuck::try_cast_slice::<u8, RGB8>(data) {
        Ok(entries) if !entries.is_empty() && entries.len() <= 256 => PngChunk::PLTE(entries),
        _ => return Err(raw),
      },
      PngRawChunkType::IDAT => PngChunk::IDAT(data),
      PngRawChunkType::IEND => PngChunk::IEND,
      PngRawChunkType::bKGD => {
        return bKGD::try_from(data).map(PngChunk::bKGD).map_err(|_| raw);
      }
      PngRawChunkType::gAMA => match *data {
        [g0, g1, g2, g3] => PngChunk::gAMA(u32::from_be_bytes([g0, g1, g2, g3])),
        _ => return Err(raw),
      },
      PngRawChunkType::pHYs => match *data {
        [x0, x1, x2, x3, y0, y1, y2, y3, unit @ (0 | 1)] => PngChunk::pHYs(pHYs {
          ppu_x: u32::from_be_bytes([x0, x1, x2, x3]),
          ppu_y: u32::from_be_bytes([y0, y1, y2, y3]),
          is_meters: unit == 1,
        }),
        _ => return Err(raw),
      },
      PngRawChunkType::oFFs => match *data {
        [x0, x1, x2, x3, y0, y1, y2, y3, unit @ (0 | 1)] => PngChunk::oFFs(oFFs {
          x: i32::from_be_bytes([x0, x1, x2, x3]),
          y: i32::from_be_bytes([y0, y1, y2, y3]),
          is_pixels: unit == 0,
        }),
        _ => return Err(raw),
      },
      PngRawChunkType::tIME => match *data {
        [y0, y1, month, day, hour, minute, second] => PngChunk::tIME(PngTime {
          year: u16::from_be_bytes([y0, y1]),
          month,
          day,
          hour,
          minute,
          second,
        }),
        _ => return Err(raw),
      },
      _ => return Err(raw),
    })
  }
}
