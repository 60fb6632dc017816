use alloc::string::String;

use thiserror::Error;

use crate::color::ColorFormat;

/// Shorthand for results of this crate.
pub type Result<T, E = PngError> = core::result::Result<T, E>;

/// An error from the `pngimage` crate.
///
/// Every variant is reported before anything is mutated: a failed operation
/// leaves the image exactly as it was.
#[derive(Debug, Error)]
pub enum PngError {
  /// The arguments given to an operation were not acceptable.
  #[error("invalid argument: {0}")]
  Validation(#[from] ValidationError),

  /// The bytes could not be decoded as a PNG.
  #[error("error decoding PNG: {0}")]
  Decode(#[from] DecodeError),

  /// The pixel data could not be encoded as a PNG.
  #[error("error encoding PNG: {0}")]
  Encode(#[from] EncodeError),

  /// Reading or writing a file failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// A pixel position outside of the image was accessed.
  #[error("pixel ({x}, {y}) is outside of the {width}x{height} image")]
  Index { x: i32, y: i32, width: u32, height: u32 },
}

/// Caller supplied arguments that break a documented precondition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  /// A color doesn't have the layout of the image's color format.
  #[error("expected a {expected:?} color, got a {found:?} color")]
  ColorFormatMismatch { expected: ColorFormat, found: ColorFormat },

  /// Two images don't share a color format.
  #[error("can't combine a {source_format:?} image with a {dest_format:?} image")]
  ImageFormatMismatch { source_format: ColorFormat, dest_format: ColorFormat },

  /// Two images don't share a bit depth.
  #[error("can't combine a {source_depth}-bit image with a {dest_depth}-bit image")]
  BitDepthMismatch { source_depth: u8, dest_depth: u8 },

  /// The operation has no meaning for an image of unknown color format.
  #[error("the color format is unknown")]
  UnknownColorFormat,

  /// The bit depth is not legal for the color format.
  #[error("a bit depth of {bit_depth} is not allowed for {color_format:?}")]
  IllegalBitDepth { bit_depth: u8, color_format: ColorFormat },

  /// A palette image was built without a palette.
  #[error("palette images need a palette")]
  MissingPalette,

  /// A rectangle has a width or height below 1.
  #[error("the rectangle {width}x{height} must be at least 1x1")]
  EmptyRect { width: i32, height: i32 },

  /// A rectangle or offset starts at a negative position.
  #[error("the position ({x}, {y}) must not be negative")]
  NegativePosition { x: i32, y: i32 },

  /// New image dimensions below 1x1.
  #[error("the dimensions {width}x{height} must be at least 1x1")]
  DimensionsTooSmall { width: i64, height: i64 },

  /// New image dimensions whose pixel buffer can't be allocated.
  #[error("a {width}x{height} image is too large to allocate")]
  DimensionsTooLarge { width: u32, height: u32 },

  /// A color sample is larger than the image's bit depth can hold.
  #[error("the sample value {value} doesn't fit in {bit_depth} bits")]
  SampleOutOfRange { value: u8, bit_depth: u8 },

  /// A region doesn't fit into the image it refers to.
  #[error(
    "the area at ({x}, {y}) sized {width}x{height} exceeds the {bounds_width}x{bounds_height} image"
  )]
  OutOfBounds { x: i64, y: i64, width: i64, height: i64, bounds_width: u32, bounds_height: u32 },

  /// Neither the width nor the height of a raw buffer was specified.
  #[error("either width or height need to be specified")]
  MissingDimensions,

  /// Alpha can't be inferred when only one dimension is given.
  #[error("alpha needs to be specified when only one dimension is given")]
  MissingAlpha,

  /// A dimension derived from the buffer length isn't a positive integer.
  #[error("a buffer of {len} bytes doesn't divide into rows of {row_bytes} bytes")]
  NonIntegerDimension { len: usize, row_bytes: usize },

  /// A buffer doesn't match the dimensions it's used with.
  #[error("a buffer of {len} bytes doesn't match the {expected} bytes the dimensions need")]
  BufferSizeMismatch { len: usize, expected: usize },

  /// The number of color bytes doesn't match the pixel layout.
  #[error("a color with {channels} channels doesn't fit {bytes_per_pixel} bytes per pixel")]
  ColorLengthMismatch { channels: usize, bytes_per_pixel: usize },
}

/// The bytes given could not be parsed as a PNG.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
  /// The first eight bytes are not the PNG signature.
  #[error("invalid PNG signature")]
  InvalidSignature,
  /// There's no `IHDR` chunk.
  #[error("no IHDR chunk")]
  MissingHeader,
  /// The `IHDR` chunk is malformed or has an illegal combination of values.
  #[error("illegal IHDR chunk")]
  IllegalHeader,
  /// The declared width and/or height of this image is 0.
  #[error("the image width or height is 0")]
  WidthOrHeightZero,
  /// The decoded pixels wouldn't fit in memory.
  #[error("the image dimensions are too large")]
  DimensionsTooLarge,
  /// An indexed color image without a `PLTE` chunk.
  #[error("indexed color image without a palette")]
  MissingPalette,
  /// The `PLTE` chunk is malformed.
  #[error("illegal PLTE chunk")]
  IllegalPalette,
  /// There's no `IDAT` chunk.
  #[error("no IDAT chunks")]
  MissingImageData,
  /// A critical chunk's declared CRC doesn't match its content.
  #[error("CRC mismatch in a {0} chunk")]
  CrcMismatch(String),
  /// The zlib stream in the `IDAT` chunks is corrupt.
  #[error("corrupt zlib data")]
  Zlib,
  /// The zlib stream ended before all scanlines were present.
  #[error("the image data is truncated")]
  Truncated,
  /// A scanline declares a filter type above 4.
  #[error("illegal filter type {0}")]
  IllegalFilterType(u8),
}

/// Pixel data could not be serialized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
  /// Only 3 (RGB) or 4 (RGBA) bytes per pixel can be encoded from a raw
  /// buffer.
  #[error("unsupported color layout, {len} bytes for {width}x{height} pixels")]
  UnsupportedColorLayout { len: usize, width: u32, height: u32 },
  /// Images of this color type can't be written by `PngImage::encode`.
  #[error("unsupported color type for encoding: {0:?}")]
  UnsupportedColorType(ColorFormat),
  /// The buffer length doesn't match the header.
  #[error("a buffer of {len} bytes doesn't match the {expected} bytes of the header")]
  BufferLengthMismatch { len: usize, expected: usize },
  /// The header has an illegal value.
  #[error("illegal header for encoding")]
  IllegalHeader,
  /// A palette image needs 1 to 256 palette entries.
  #[error("palette images need 1 to 256 palette entries")]
  IllegalPalette,
}
