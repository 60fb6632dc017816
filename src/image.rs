//! The owned pixel image.

use alloc::vec::Vec;
use std::path::Path;

use crate::{
  codec::write_encoded,
  color::{convert_to_rgba, Color, ColorFormat, Palette},
  error::{EncodeError, PngError, Result, ValidationError},
  pixel_formats::RGBA8,
  png::{self, bKGD, oFFs, pHYs, DecodedPng, InterlaceMode, PngColorType, PngTime, IHDR},
  point::Point,
};

/// A decoded PNG: header data plus an owned, row-major pixel buffer.
///
/// The buffer always holds exactly `width * height * bytes_per_pixel` bytes.
/// Samples of 8 bits or less use one byte each (sub-byte samples are
/// unpacked), 16-bit samples use two big-endian bytes.
///
/// All fields are filled in when the image is built, there's no lazy state.
#[derive(Debug, Clone, PartialEq)]
pub struct PngImage {
  pub(crate) width: u32,
  pub(crate) height: u32,
  pub(crate) bit_depth: u8,
  pub(crate) color_format: ColorFormat,
  pub(crate) channels: usize,
  pub(crate) interlace_mode: InterlaceMode,
  pub(crate) offset_x: i32,
  pub(crate) offset_y: i32,
  pub(crate) pixels_per_meter_x: u32,
  pub(crate) pixels_per_meter_y: u32,
  pub(crate) gamma: Option<f32>,
  pub(crate) time: Option<PngTime>,
  pub(crate) background_color: Option<Color>,
  pub(crate) palette: Option<Palette>,
  pub(crate) data: Vec<u8>,
}

impl From<DecodedPng> for PngImage {
  fn from(decoded: DecodedPng) -> Self {
    Self {
      width: decoded.width,
      height: decoded.height,
      bit_depth: decoded.bit_depth,
      color_format: decoded.color_format,
      channels: decoded.channels,
      interlace_mode: decoded.interlace_mode,
      offset_x: decoded.offset_x,
      offset_y: decoded.offset_y,
      pixels_per_meter_x: decoded.pixels_per_meter_x,
      pixels_per_meter_y: decoded.pixels_per_meter_y,
      gamma: decoded.gamma,
      time: decoded.time,
      background_color: decoded.background_color,
      palette: decoded.palette,
      data: decoded.pixels,
    }
  }
}

impl PngImage {
  /// Decodes PNG bytes.
  ///
  /// Either the whole image is decoded or an error is returned, there's no
  /// partial result.
  pub fn decode(bytes: &[u8]) -> Result<Self> {
    Ok(Self::from(png::decode_image(bytes)?))
  }

  /// Builds an image around existing pixel data.
  ///
  /// The data must use the layout described on [`PngImage`], and a palette is
  /// required for (and only kept for) [`ColorFormat::Palette`].
  pub fn from_raw_parts(
    width: u32, height: u32, bit_depth: u8, color_format: ColorFormat, palette: Option<Palette>,
    data: Vec<u8>,
  ) -> Result<Self> {
    if width == 0 || height == 0 {
      return Err(
        ValidationError::DimensionsTooSmall { width: width.into(), height: height.into() }.into(),
      );
    }
    if !color_format.allows_bit_depth(bit_depth) {
      return Err(ValidationError::IllegalBitDepth { bit_depth, color_format }.into());
    }
    let palette = match (color_format, palette) {
      (ColorFormat::Palette, None) => return Err(ValidationError::MissingPalette.into()),
      (ColorFormat::Palette, palette) => palette,
      _ => None,
    };
    let (Some(channels), Some(bpp)) =
      (color_format.channel_count(), color_format.bytes_per_pixel(bit_depth))
    else {
      return Err(ValidationError::UnknownColorFormat.into());
    };
    let expected = width as usize * height as usize * bpp;
    if data.len() != expected {
      return Err(ValidationError::BufferSizeMismatch { len: data.len(), expected }.into());
    }
    Ok(Self {
      width,
      height,
      bit_depth,
      color_format,
      channels,
      interlace_mode: InterlaceMode::None,
      offset_x: 0,
      offset_y: 0,
      pixels_per_meter_x: 0,
      pixels_per_meter_y: 0,
      gamma: None,
      time: None,
      background_color: None,
      palette,
      data,
    })
  }

  #[inline]
  #[must_use]
  pub const fn width(&self) -> u32 {
    self.width
  }
  #[inline]
  #[must_use]
  pub const fn height(&self) -> u32 {
    self.height
  }
  /// Bits per channel: 1, 2, 4, 8, or 16.
  #[inline]
  #[must_use]
  pub const fn bit_depth(&self) -> u8 {
    self.bit_depth
  }
  #[inline]
  #[must_use]
  pub const fn color_format(&self) -> ColorFormat {
    self.color_format
  }
  #[inline]
  #[must_use]
  pub const fn channels(&self) -> usize {
    self.channels
  }
  /// How the source data was interlaced. The buffer itself is never
  /// interlaced.
  #[inline]
  #[must_use]
  pub const fn interlace_mode(&self) -> InterlaceMode {
    self.interlace_mode
  }
  /// Bytes per line of [`data`](Self::data).
  #[inline]
  #[must_use]
  pub fn row_stride(&self) -> usize {
    self.width as usize * self.bytes_per_pixel().unwrap_or(0)
  }
  /// Page offset from the `oFFs` chunk. This has nothing to do with
  /// addressing pixels.
  #[inline]
  #[must_use]
  pub const fn offset_x(&self) -> i32 {
    self.offset_x
  }
  #[inline]
  #[must_use]
  pub const fn offset_y(&self) -> i32 {
    self.offset_y
  }
  /// Physical resolution, 0 when unknown.
  #[inline]
  #[must_use]
  pub const fn pixels_per_meter_x(&self) -> u32 {
    self.pixels_per_meter_x
  }
  #[inline]
  #[must_use]
  pub const fn pixels_per_meter_y(&self) -> u32 {
    self.pixels_per_meter_y
  }
  #[inline]
  #[must_use]
  pub const fn gamma(&self) -> Option<f32> {
    self.gamma
  }
  /// Last modification time.
  #[inline]
  #[must_use]
  pub const fn time(&self) -> Option<PngTime> {
    self.time
  }
  /// The background color, in the image's own format minus any alpha.
  #[inline]
  #[must_use]
  pub const fn background_color(&self) -> Option<Color> {
    self.background_color
  }
  /// The palette, for [`ColorFormat::Palette`] images.
  #[inline]
  #[must_use]
  pub const fn palette(&self) -> Option<&Palette> {
    self.palette.as_ref()
  }
  /// The pixel bytes.
  #[inline]
  #[must_use]
  pub fn data(&self) -> &[u8] {
    &self.data
  }
  /// Takes the pixel bytes out of the image.
  #[inline]
  #[must_use]
  pub fn into_data(self) -> Vec<u8> {
    self.data
  }
  /// If the image has an alpha channel.
  #[inline]
  #[must_use]
  pub const fn alpha(&self) -> bool {
    self.color_format.has_alpha()
  }

  /// Bytes used by one pixel, `None` for [`ColorFormat::Unknown`].
  #[inline]
  #[must_use]
  pub const fn bytes_per_pixel(&self) -> Option<usize> {
    self.color_format.bytes_per_pixel(self.bit_depth)
  }

  /// Index of the first byte of the pixel at `(x, y)`.
  ///
  /// Gives `None` for [`ColorFormat::Unknown`] or when the index would be
  /// negative. The position is not checked against the image bounds.
  #[must_use]
  pub fn to_index(&self, x: i32, y: i32) -> Option<usize> {
    let bpp = self.bytes_per_pixel()? as i64;
    usize::try_from((i64::from(x) + i64::from(y) * i64::from(self.width)) * bpp).ok()
  }

  /// The position of the pixel that holds byte `index`.
  #[must_use]
  pub fn to_xy(&self, index: usize) -> Option<Point> {
    let pixel = index / self.bytes_per_pixel()?;
    let width = self.width as usize;
    Some(Point::new((pixel % width) as i32, (pixel / width) as i32))
  }

  /// If `(x, y)` is inside the image.
  #[inline]
  #[must_use]
  pub fn contains(&self, x: i32, y: i32) -> bool {
    x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
  }

  /// The color of one pixel.
  ///
  /// 16-bit samples give their high byte. Gives `Ok(None)` for
  /// [`ColorFormat::Unknown`].
  ///
  /// ## Failure
  /// * [`PngError::Index`] if `(x, y)` is outside the image.
  pub fn at(&self, x: i32, y: i32) -> Result<Option<Color>> {
    let out_of_bounds = || PngError::Index { x, y, width: self.width, height: self.height };
    if !self.contains(x, y) {
      return Err(out_of_bounds());
    }
    let (Some(bpp), Some(index)) = (self.bytes_per_pixel(), self.to_index(x, y)) else {
      return Ok(None);
    };
    let pixel = self.data.get(index..index + bpp).ok_or_else(out_of_bounds)?;
    let bytes_per_sample = bpp / self.channels;
    let mut samples = [0_u8; 4];
    for (sample, byte) in samples.iter_mut().zip(pixel.iter().step_by(bytes_per_sample)) {
      *sample = *byte;
    }
    Ok(Color::from_channels(self.color_format, &samples[..self.channels]))
  }

  /// The color of one pixel, as RGBA.
  ///
  /// Gives `Ok(None)` when [`at`](Self::at) does, or for a palette index that
  /// isn't in the palette.
  pub fn rgba_at(&self, x: i32, y: i32) -> Result<Option<RGBA8>> {
    Ok(self.at(x, y)?.and_then(|color| convert_to_rgba(color, self.palette.as_ref())))
  }

  /// Encodes the image as PNG bytes, at its own bit depth.
  ///
  /// Background, gamma, physical resolution, page offset, and time are
  /// written along with the pixels.
  ///
  /// ## Failure
  /// * [`EncodeError::UnsupportedColorType`] unless the image is
  ///   [`ColorFormat::Rgb`] or [`ColorFormat::Rgba`].
  pub fn encode(&self) -> Result<Vec<u8>> {
    let color_type = match self.color_format {
      ColorFormat::Rgb => PngColorType::RGB,
      ColorFormat::Rgba => PngColorType::RGBA,
      other => return Err(EncodeError::UnsupportedColorType(other).into()),
    };
    let header = IHDR {
      width: self.width,
      height: self.height,
      bit_depth: self.bit_depth,
      color_type,
      is_interlaced: false,
    };
    let mut info = png::PngWriteInfo::new(header);
    info.background = self.background_color.map(|c| bKGD::from_color(c, self.bit_depth));
    info.gamma = self.gamma.map(|g| (g * 100_000.0).round() as u32);
    if self.pixels_per_meter_x != 0 || self.pixels_per_meter_y != 0 {
      info.physical = Some(pHYs {
        ppu_x: self.pixels_per_meter_x,
        ppu_y: self.pixels_per_meter_y,
        is_meters: true,
      });
    }
    if self.offset_x != 0 || self.offset_y != 0 {
      info.offset = Some(oFFs { x: self.offset_x, y: self.offset_y, is_pixels: true });
    }
    info.time = self.time;
    Ok(png::encode_raw(&info, &self.data)?)
  }

  /// Encodes the image and writes it to a file, blocking until done.
  pub fn write_file(&self, path: impl AsRef<Path>) -> Result<()> {
    write_encoded(path, self.encode())
  }

  /// Encodes the image and writes it to a file on a new thread.
  ///
  /// The callback gets the outcome exactly once, on the spawned thread.
  pub fn write_file_with<P, F>(&self, path: P, callback: F) -> std::thread::JoinHandle<()>
  where
    P: AsRef<Path> + Send + 'static,
    F: FnOnce(Result<()>) + Send + 'static,
  {
    let encoded = self.encode();
    std::thread::spawn(move || callback(write_encoded(path, encoded)))
  }

  /// Encodes the image and writes it to a file on tokio's blocking pool.
  #[cfg(feature = "tokio")]
  #[cfg_attr(docs_rs, doc(cfg(feature = "tokio")))]
  pub async fn write_file_async<P>(&self, path: P) -> Result<()>
  where
    P: AsRef<Path> + Send + 'static,
  {
    let encoded = self.encode();
    crate::codec::run_blocking(move || write_encoded(path, encoded)).await
  }
}
