//! Decode and encode entry points, in blocking, callback, and async forms.
//!
//! Each group shares one blocking core. The callback forms run the core on a
//! new thread and hand the outcome to the callback there, exactly once. The
//! async forms (feature `tokio`) run the core on tokio's blocking pool.

use alloc::vec::Vec;
use std::{path::Path, thread::JoinHandle};

use log::debug;

use crate::{
  error::{EncodeError, Result, ValidationError},
  image::PngImage,
  png,
};

/// Options for [`encode`].
///
/// At least one dimension is needed. If only one is given the other is
/// worked out from the buffer length, which needs `alpha` to be set. With
/// both dimensions and no `alpha`, a buffer of 3 bytes per pixel is RGB and
/// one of 4 bytes per pixel is RGBA.
///
/// ```
/// # use pngimage::EncodeOptions;
/// let opts = EncodeOptions::new().width(16).height(8).alpha(false);
/// assert_eq!(opts.compression_level, 9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EncodeOptions {
  pub width: Option<u32>,
  pub height: Option<u32>,
  pub alpha: Option<bool>,
  /// zlib level, 0 to 10.
  pub compression_level: u8,
}
impl Default for EncodeOptions {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}
impl EncodeOptions {
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self { width: None, height: None, alpha: None, compression_level: 9 }
  }
  #[inline]
  #[must_use]
  pub const fn width(self, width: u32) -> Self {
    Self { width: Some(width), ..self }
  }
  #[inline]
  #[must_use]
  pub const fn height(self, height: u32) -> Self {
    Self { height: Some(height), ..self }
  }
  #[inline]
  #[must_use]
  pub const fn alpha(self, alpha: bool) -> Self {
    Self { alpha: Some(alpha), ..self }
  }
  #[inline]
  #[must_use]
  pub const fn compression_level(self, compression_level: u8) -> Self {
    Self { compression_level, ..self }
  }

  /// Works out `(width, height, has_alpha)` for a buffer of `len` bytes.
  fn resolve(&self, len: usize) -> Result<(u32, u32, bool)> {
    if self.width == Some(0) || self.height == Some(0) {
      return Err(
        ValidationError::DimensionsTooSmall {
          width: self.width.unwrap_or(0).into(),
          height: self.height.unwrap_or(0).into(),
        }
        .into(),
      );
    }
    let layout_error = |width: u32, height: u32| EncodeError::UnsupportedColorLayout {
      len,
      width,
      height,
    };
    match (self.width, self.height, self.alpha) {
      (None, None, _) => Err(ValidationError::MissingDimensions.into()),
      (Some(width), Some(height), alpha) => {
        let pixel_count = width as usize * height as usize;
        let has_alpha = match (len.checked_div(pixel_count), len % pixel_count, alpha) {
          (Some(3), 0, None | Some(false)) => false,
          (Some(4), 0, None | Some(true)) => true,
          _ => return Err(layout_error(width, height).into()),
        };
        Ok((width, height, has_alpha))
      }
      (_, _, None) => Err(ValidationError::MissingAlpha.into()),
      (Some(known), None, Some(has_alpha)) | (None, Some(known), Some(has_alpha)) => {
        let row_bytes = known as usize * if has_alpha { 4 } else { 3 };
        let other = len / row_bytes;
        if len % row_bytes != 0 || other == 0 {
          return Err(ValidationError::NonIntegerDimension { len, row_bytes }.into());
        }
        let other = u32::try_from(other)
          .map_err(|_| ValidationError::NonIntegerDimension { len, row_bytes })?;
        Ok(match self.width {
          Some(_) => (known, other, has_alpha),
          None => (other, known, has_alpha),
        })
      }
    }
  }
}

/// Checks if the bytes start with the PNG signature.
#[inline]
#[must_use]
pub fn is_png(bytes: &[u8]) -> bool {
  png::is_png_signature(bytes)
}

/// Decodes PNG bytes into an image.
#[inline]
pub fn decode(bytes: &[u8]) -> Result<PngImage> {
  PngImage::decode(bytes)
}

/// Reads and decodes a PNG file, blocking until done.
pub fn decode_file(path: impl AsRef<Path>) -> Result<PngImage> {
  let bytes = std::fs::read(path)?;
  decode(&bytes)
}

/// Reads and decodes a PNG file on a new thread.
pub fn decode_file_with<P, F>(path: P, callback: F) -> JoinHandle<()>
where
  P: AsRef<Path> + Send + 'static,
  F: FnOnce(Result<PngImage>) + Send + 'static,
{
  std::thread::spawn(move || callback(decode_file(path)))
}

/// Reads and decodes a PNG file on tokio's blocking pool.
#[cfg(feature = "tokio")]
#[cfg_attr(docs_rs, doc(cfg(feature = "tokio")))]
pub async fn decode_file_async<P>(path: P) -> Result<PngImage>
where
  P: AsRef<Path> + Send + 'static,
{
  run_blocking(move || decode_file(path)).await
}

/// Encodes raw 8-bit RGB or RGBA pixels as a PNG.
///
/// ## Failure
/// * A [`ValidationError`] if the options don't describe a usable size.
/// * [`EncodeError::UnsupportedColorLayout`] if the buffer isn't 3 or 4 bytes
///   per pixel for the given dimensions.
pub fn encode(buffer: &[u8], options: &EncodeOptions) -> Result<Vec<u8>> {
  let (width, height, has_alpha) = options.resolve(buffer.len())?;
  debug!("encoding {width}x{height} raw pixels, alpha: {has_alpha}");
  Ok(png::encode_image(buffer, width, height, has_alpha, options.compression_level)?)
}

/// Encodes raw pixels and writes them to a file, blocking until done.
pub fn encode_file(path: impl AsRef<Path>, buffer: &[u8], options: &EncodeOptions) -> Result<()> {
  write_encoded(path, encode(buffer, options))
}

/// Encodes raw pixels and writes them to a file on a new thread.
pub fn encode_file_with<P, F>(
  path: P, buffer: Vec<u8>, options: EncodeOptions, callback: F,
) -> JoinHandle<()>
where
  P: AsRef<Path> + Send + 'static,
  F: FnOnce(Result<()>) + Send + 'static,
{
  std::thread::spawn(move || callback(encode_file(path, &buffer, &options)))
}

/// Encodes raw pixels and writes them to a file on tokio's blocking pool.
#[cfg(feature = "tokio")]
#[cfg_attr(docs_rs, doc(cfg(feature = "tokio")))]
pub async fn encode_file_async<P>(path: P, buffer: Vec<u8>, options: EncodeOptions) -> Result<()>
where
  P: AsRef<Path> + Send + 'static,
{
  run_blocking(move || encode_file(path, &buffer, &options)).await
}

/// Writes already encoded bytes, passing an encode error straight through.
pub(crate) fn write_encoded(path: impl AsRef<Path>, encoded: Result<Vec<u8>>) -> Result<()> {
  let bytes = encoded?;
  std::fs::write(path.as_ref(), &bytes)?;
  debug!("wrote {} bytes to {}", bytes.len(), path.as_ref().display());
  Ok(())
}

/// Runs a blocking core on tokio's blocking pool.
///
/// A task that panicked or was cancelled turns into an I/O error.
#[cfg(feature = "tokio")]
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T>
where
  T: Send + 'static,
  F: FnOnce() -> Result<T> + Send + 'static,
{
  tokio::task::spawn_blocking(f)
    .await
    .map_err(|e| crate::PngError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?
}
