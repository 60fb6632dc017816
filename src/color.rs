//! The five PNG color formats and the colors that go with them.
//!
//! A [`Color`] always carries the channels of one specific [`ColorFormat`].
//! To compare colors of different formats, convert them to canonical
//! [`RGBA8`] with [`convert_to_rgba`].

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::pixel_formats::{RGB8, RGBA8};

/// The color format of an image, as declared by its PNG header.
///
/// This describes how the pixels of an image are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColorFormat {
  /// PNG color type 0.
  GrayScale,
  /// PNG color type 4.
  GrayScaleAlpha,
  /// PNG color type 2.
  Rgb,
  /// PNG color type 6.
  Rgba,
  /// PNG color type 3.
  Palette,
  /// Anything else.
  Unknown,
}
impl ColorFormat {
  /// Maps a PNG color type byte to a format.
  #[inline]
  #[must_use]
  pub const fn from_png_color_type(color_type: u8) -> Self {
    match color_type {
      0 => Self::GrayScale,
      2 => Self::Rgb,
      3 => Self::Palette,
      4 => Self::GrayScaleAlpha,
      6 => Self::Rgba,
      _ => Self::Unknown,
    }
  }

  /// The PNG color type byte of this format.
  #[inline]
  #[must_use]
  pub const fn png_color_type(self) -> Option<u8> {
    match self {
      Self::GrayScale => Some(0),
      Self::Rgb => Some(2),
      Self::Palette => Some(3),
      Self::GrayScaleAlpha => Some(4),
      Self::Rgba => Some(6),
      Self::Unknown => None,
    }
  }

  /// The number of channels in this format.
  #[inline]
  #[must_use]
  pub const fn channel_count(self) -> Option<usize> {
    match self {
      Self::GrayScale | Self::Palette => Some(1),
      Self::GrayScaleAlpha => Some(2),
      Self::Rgb => Some(3),
      Self::Rgba => Some(4),
      Self::Unknown => None,
    }
  }

  /// Bytes used by one pixel in a decoded buffer.
  ///
  /// Depths below 8 still use a whole byte per channel, 16-bit channels use
  /// two bytes.
  #[inline]
  #[must_use]
  pub const fn bytes_per_pixel(self, bit_depth: u8) -> Option<usize> {
    match self.channel_count() {
      Some(channels) => Some(channels * ((bit_depth as usize + 7) / 8)),
      None => None,
    }
  }

  /// If the format has an alpha channel.
  #[inline]
  #[must_use]
  pub const fn has_alpha(self) -> bool {
    matches!(self, Self::GrayScaleAlpha | Self::Rgba)
  }

  /// If PNG allows this format to use the given bit depth.
  #[inline]
  #[must_use]
  pub const fn allows_bit_depth(self, bit_depth: u8) -> bool {
    match self {
      Self::GrayScale => matches!(bit_depth, 1 | 2 | 4 | 8 | 16),
      Self::Palette => matches!(bit_depth, 1 | 2 | 4 | 8),
      Self::GrayScaleAlpha | Self::Rgb | Self::Rgba => matches!(bit_depth, 8 | 16),
      Self::Unknown => false,
    }
  }

  /// The predicate that accepts colors of this format, or `None` for
  /// [`ColorFormat::Unknown`].
  #[must_use]
  pub fn checker(self) -> Option<fn(&Color) -> bool> {
    match self {
      Self::GrayScale => Some(is_color_gray_scale),
      Self::GrayScaleAlpha => Some(is_color_gray_scale_alpha),
      Self::Rgb => Some(is_color_rgb),
      Self::Rgba => Some(is_color_rgba),
      Self::Palette => Some(is_color_palette),
      Self::Unknown => None,
    }
  }

  /// The color used to pad an image when no fill color is given.
  ///
  /// White for gray and RGB, fully transparent black for the alpha formats,
  /// and the first palette entry for palette images.
  #[must_use]
  pub const fn default_background_color(self) -> Option<Color> {
    match self {
      Self::GrayScale => Some(Color::GrayScale { gray: 255 }),
      Self::GrayScaleAlpha => Some(Color::GrayScaleAlpha { gray: 0, alpha: 0 }),
      Self::Rgb => Some(Color::Rgb { r: 255, g: 255, b: 255 }),
      Self::Rgba => Some(Color::Rgba { r: 0, g: 0, b: 0, a: 0 }),
      Self::Palette => Some(Color::Palette { index: 0 }),
      Self::Unknown => None,
    }
  }
}

/// Free function form of [`ColorFormat::checker`].
#[inline]
#[must_use]
pub fn color_format_to_checker(format: ColorFormat) -> Option<fn(&Color) -> bool> {
  format.checker()
}

/// Free function form of [`ColorFormat::default_background_color`].
#[inline]
#[must_use]
pub const fn default_background_color(format: ColorFormat) -> Option<Color> {
  format.default_background_color()
}

/// A single color, in one of the PNG color formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Color {
  GrayScale { gray: u8 },
  GrayScaleAlpha { gray: u8, alpha: u8 },
  Rgb { r: u8, g: u8, b: u8 },
  Rgba { r: u8, g: u8, b: u8, a: u8 },
  Palette { index: u8 },
}
impl Color {
  #[inline]
  #[must_use]
  pub const fn gray_scale(gray: u8) -> Self {
    Self::GrayScale { gray }
  }
  #[inline]
  #[must_use]
  pub const fn gray_scale_alpha(gray: u8, alpha: u8) -> Self {
    Self::GrayScaleAlpha { gray, alpha }
  }
  #[inline]
  #[must_use]
  pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
    Self::Rgb { r, g, b }
  }
  #[inline]
  #[must_use]
  pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
    Self::Rgba { r, g, b, a }
  }
  #[inline]
  #[must_use]
  pub const fn palette(index: u8) -> Self {
    Self::Palette { index }
  }

  /// The format this color belongs to.
  #[inline]
  #[must_use]
  pub const fn format(self) -> ColorFormat {
    match self {
      Self::GrayScale { .. } => ColorFormat::GrayScale,
      Self::GrayScaleAlpha { .. } => ColorFormat::GrayScaleAlpha,
      Self::Rgb { .. } => ColorFormat::Rgb,
      Self::Rgba { .. } => ColorFormat::Rgba,
      Self::Palette { .. } => ColorFormat::Palette,
    }
  }

  /// Builds a color of the given format from its channels, in PNG channel
  /// order.
  ///
  /// Fails if the channel count doesn't match the format.
  #[must_use]
  pub const fn from_channels(format: ColorFormat, channels: &[u8]) -> Option<Self> {
    Some(match (format, channels) {
      (ColorFormat::GrayScale, [gray]) => Self::GrayScale { gray: *gray },
      (ColorFormat::GrayScaleAlpha, [gray, alpha]) => {
        Self::GrayScaleAlpha { gray: *gray, alpha: *alpha }
      }
      (ColorFormat::Rgb, [r, g, b]) => Self::Rgb { r: *r, g: *g, b: *b },
      (ColorFormat::Rgba, [r, g, b, a]) => Self::Rgba { r: *r, g: *g, b: *b, a: *a },
      (ColorFormat::Palette, [index]) => Self::Palette { index: *index },
      _ => return None,
    })
  }

  /// The channels in PNG order, and how many of the array are used.
  #[inline]
  #[must_use]
  pub(crate) const fn channel_array(self) -> ([u8; 4], usize) {
    match self {
      Self::GrayScale { gray } => ([gray, 0, 0, 0], 1),
      Self::GrayScaleAlpha { gray, alpha } => ([gray, alpha, 0, 0], 2),
      Self::Rgb { r, g, b } => ([r, g, b, 0], 3),
      Self::Rgba { r, g, b, a } => ([r, g, b, a], 4),
      Self::Palette { index } => ([index, 0, 0, 0], 1),
    }
  }

  /// The channels in PNG order.
  #[must_use]
  pub fn to_vec(self) -> Vec<u8> {
    let (array, count) = self.channel_array();
    array[..count].to_vec()
  }
}

/// Checks for a [`Color::GrayScale`].
#[inline]
#[must_use]
pub fn is_color_gray_scale(color: &Color) -> bool {
  matches!(color, Color::GrayScale { .. })
}
/// Checks for a [`Color::GrayScaleAlpha`].
#[inline]
#[must_use]
pub fn is_color_gray_scale_alpha(color: &Color) -> bool {
  matches!(color, Color::GrayScaleAlpha { .. })
}
/// Checks for a [`Color::Rgb`].
#[inline]
#[must_use]
pub fn is_color_rgb(color: &Color) -> bool {
  matches!(color, Color::Rgb { .. })
}
/// Checks for a [`Color::Rgba`].
#[inline]
#[must_use]
pub fn is_color_rgba(color: &Color) -> bool {
  matches!(color, Color::Rgba { .. })
}
/// Checks for a [`Color::Palette`].
#[inline]
#[must_use]
pub fn is_color_palette(color: &Color) -> bool {
  matches!(color, Color::Palette { .. })
}

/// Maps palette indexes to RGB colors.
///
/// Indexes don't have to be contiguous. A palette decoded from a PNG uses
/// `0..len`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Palette {
  entries: BTreeMap<u8, RGB8>,
}
impl Palette {
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self { entries: BTreeMap::new() }
  }
  #[inline]
  #[must_use]
  pub fn get(&self, index: u8) -> Option<RGB8> {
    self.entries.get(&index).copied()
  }
  #[inline]
  pub fn insert(&mut self, index: u8, color: RGB8) -> Option<RGB8> {
    self.entries.insert(index, color)
  }
  #[inline]
  #[must_use]
  pub fn contains(&self, index: u8) -> bool {
    self.entries.contains_key(&index)
  }
  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.entries.len()
  }
  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
  /// Entries in index order.
  #[inline]
  pub fn iter(&self) -> impl Iterator<Item = (u8, RGB8)> + '_ {
    self.entries.iter().map(|(i, c)| (*i, *c))
  }

  /// The palette as a dense `PLTE` table.
  ///
  /// Gaps before the highest index are filled with black.
  #[must_use]
  pub fn to_dense(&self) -> Vec<RGB8> {
    let len = self.entries.keys().next_back().map_or(0, |max| usize::from(*max) + 1);
    let mut out = alloc::vec![RGB8::default(); len];
    for (i, c) in self.iter() {
      out[usize::from(i)] = c;
    }
    out
  }
}
impl From<&[RGB8]> for Palette {
  /// Only the first 256 entries can be indexed, others are dropped.
  #[inline]
  fn from(entries: &[RGB8]) -> Self {
    Self { entries: (0..=u8::MAX).zip(entries.iter().copied()).collect() }
  }
}
impl FromIterator<(u8, RGB8)> for Palette {
  #[inline]
  fn from_iter<T: IntoIterator<Item = (u8, RGB8)>>(iter: T) -> Self {
    Self { entries: iter.into_iter().collect() }
  }
}

/// Converts any color to canonical RGBA.
///
/// * Gray is copied into all three color channels.
/// * Formats without alpha become fully opaque (alpha 255).
/// * Palette colors are looked up in `palette`, giving `None` when there's no
///   palette or the index isn't in it.
#[must_use]
pub fn convert_to_rgba(color: Color, palette: Option<&Palette>) -> Option<RGBA8> {
  Some(match color {
    Color::GrayScale { gray } => RGBA8::new(gray, gray, gray, 255),
    Color::GrayScaleAlpha { gray, alpha } => RGBA8::new(gray, gray, gray, alpha),
    Color::Rgb { r, g, b } => RGBA8::new(r, g, b, 255),
    Color::Rgba { r, g, b, a } => RGBA8::new(r, g, b, a),
    Color::Palette { index } => RGBA8::from(palette?.get(index)?),
  })
}
