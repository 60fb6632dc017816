//! Module for the fixed pixel layouts used by palettes and conversions.
//!
//! Image data itself is kept as plain bytes (see
//! [`PngImage`](crate::PngImage)), because its layout depends on the color
//! format and bit depth only known at runtime. These types are for the places
//! where the layout is fixed:
//! * Palette entries are always `RGB8`.
//! * Canonical color conversion always produces `RGBA8`.
//!
//! ### Between Gray and RGB
//! When going from grayscale to RGB one just simply copies the gray value to
//! each of the RGB channels. Colors without an alpha channel become fully
//! opaque (alpha 255).

use bytemuck::{Pod, Zeroable};

/// An RGB value, 8-bits per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct RGB8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
}
impl RGB8 {
  #[inline]
  #[must_use]
  pub const fn new(r: u8, g: u8, b: u8) -> Self {
    Self { r, g, b }
  }
}

/// An 8-bits per channel RGBA pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct RGBA8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}
impl RGBA8 {
  #[inline]
  #[must_use]
  pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
    Self { r, g, b, a }
  }

  /// The channels as an array, in `[r, g, b, a]` order.
  #[inline]
  #[must_use]
  pub const fn to_array(self) -> [u8; 4] {
    [self.r, self.g, self.b, self.a]
  }
}
impl From<RGB8> for RGBA8 {
  #[inline]
  fn from(RGB8 { r, g, b }: RGB8) -> Self {
    Self { r, g, b, a: 255 }
  }
}
