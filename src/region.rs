//! Region operations: fill, set, copy, canvas resize, and crop.
//!
//! Each operation checks all of its arguments before touching the pixel
//! buffer, so an error always leaves the image as it was.

use log::debug;

use crate::{
  color::{Color, ColorFormat},
  error::{Result, ValidationError},
  image::PngImage,
  point::Point,
  raw::{copy_region_raw, fill_region_raw, resize_canvas_raw, RawArea},
  rect::Rect,
};

/// Arguments of [`PngImage::resize_canvas`]. Every part is optional.
///
/// ```
/// # use pngimage::{Color, Point, Rect, ResizeCanvasOptions};
/// let opts = ResizeCanvasOptions::new()
///   .dimensions(Point::new(18, 18))
///   .offset(Point::new(10, 10))
///   .clip(Rect::new(0, 0, 6, 6))
///   .fill_color(Color::rgb(0, 0, 128));
/// assert_eq!(opts.offset, Some(Point::new(10, 10)));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ResizeCanvasOptions {
  /// Size of the new canvas. Defaults to the size of the clip.
  pub dimensions: Option<Point>,
  /// Where the clipped area goes on the new canvas. Defaults to `(0, 0)`.
  pub offset: Option<Point>,
  /// The part of the current image to keep. Defaults to all of it.
  pub clip: Option<Rect>,
  /// Color of the new canvas outside the clipped area. Defaults to
  /// [`ColorFormat::default_background_color`].
  pub fill_color: Option<Color>,
}
impl ResizeCanvasOptions {
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self { dimensions: None, offset: None, clip: None, fill_color: None }
  }
  #[inline]
  #[must_use]
  pub const fn dimensions(self, dimensions: Point) -> Self {
    Self { dimensions: Some(dimensions), ..self }
  }
  #[inline]
  #[must_use]
  pub const fn offset(self, offset: Point) -> Self {
    Self { offset: Some(offset), ..self }
  }
  #[inline]
  #[must_use]
  pub const fn clip(self, clip: Rect) -> Self {
    Self { clip: Some(clip), ..self }
  }
  #[inline]
  #[must_use]
  pub const fn fill_color(self, fill_color: Color) -> Self {
    Self { fill_color: Some(fill_color), ..self }
  }
}

impl PngImage {
  fn check_color(&self, color: Color) -> core::result::Result<(), ValidationError> {
    let checker = self.color_format.checker().ok_or(ValidationError::UnknownColorFormat)?;
    if checker(&color) {
      self.check_sample_range(color)
    } else {
      Err(ValidationError::ColorFormatMismatch {
        expected: self.color_format,
        found: color.format(),
      })
    }
  }

  /// Sub-byte samples are stored unpacked, one raw value per byte.
  fn check_sample_range(&self, color: Color) -> core::result::Result<(), ValidationError> {
    if self.bit_depth >= 8 {
      return Ok(());
    }
    let max = (1_u8 << self.bit_depth) - 1;
    match color.to_vec().into_iter().find(|&v| v > max) {
      Some(value) => Err(ValidationError::SampleOutOfRange { value, bit_depth: self.bit_depth }),
      None => Ok(()),
    }
  }

  /// The format's background color, with white gray scaled down to the
  /// largest sample of a sub-byte depth.
  fn default_fill_color(&self) -> Option<Color> {
    match self.color_format.default_background_color()? {
      Color::GrayScale { .. } if self.bit_depth < 8 => {
        Some(Color::GrayScale { gray: (1_u8 << self.bit_depth) - 1 })
      }
      color => Some(color),
    }
  }

  fn full_rect(&self) -> Rect {
    Rect::new(0, 0, self.width as i32, self.height as i32)
  }

  /// Writes `color` into every pixel of `area`, or of the whole image when
  /// `area` is `None`.
  ///
  /// ## Failure
  /// * The color isn't of the image's color format, or has a sample above
  ///   what a 1, 2, or 4 bit depth can hold.
  /// * The area is smaller than 1x1, starts at a negative position, or doesn't
  ///   fit inside the image.
  pub fn fill(&mut self, color: Color, area: Option<Rect>) -> Result<()> {
    self.check_color(color)?;
    let area = area.unwrap_or_else(|| self.full_rect());
    area.validate()?;
    area.check_fits(Point::ZERO, self.width, self.height)?;
    debug!("fill {area:?} with {color:?}");
    fill_region_raw(
      &mut self.data,
      self.width,
      self.height,
      raw_area(area),
      &color.to_vec(),
      self.bit_depth,
    )?;
    Ok(())
  }

  /// Sets a single pixel.
  #[inline]
  pub fn set(&mut self, color: Color, point: Point) -> Result<()> {
    self.fill(color, Some(Rect::new(point.x, point.y, 1, 1)))
  }

  /// Copies `source_rect` of `source` (all of it by default) into this image,
  /// with its top left corner at `dest_offset` (`(0, 0)` by default).
  ///
  /// Both images must have the same color format and bit depth. The source is
  /// only read, the bytes are always copied.
  pub fn copy_from(
    &mut self, source: &PngImage, dest_offset: Option<Point>, source_rect: Option<Rect>,
  ) -> Result<()> {
    let source_rect = source_rect.unwrap_or_else(|| source.full_rect());
    let dest_offset = dest_offset.unwrap_or(Point::ZERO);
    source_rect.validate()?;
    if !dest_offset.is_non_negative() {
      return Err(ValidationError::NegativePosition { x: dest_offset.x, y: dest_offset.y }.into());
    }
    if source.color_format != self.color_format {
      return Err(
        ValidationError::ImageFormatMismatch {
          source_format: source.color_format,
          dest_format: self.color_format,
        }
        .into(),
      );
    }
    if source.bit_depth != self.bit_depth {
      return Err(
        ValidationError::BitDepthMismatch {
          source_depth: source.bit_depth,
          dest_depth: self.bit_depth,
        }
        .into(),
      );
    }
    source_rect.check_fits(Point::ZERO, source.width, source.height)?;
    let dest_rect = Rect::from_offset_dimensions(dest_offset, source_rect.dimensions());
    dest_rect.check_fits(Point::ZERO, self.width, self.height)?;
    debug!("copy {source_rect:?} to {dest_offset:?}");
    copy_region_raw(
      &source.data,
      &mut self.data,
      source.width,
      source.height,
      self.width,
      self.height,
      raw_area(source_rect),
      dest_offset.x as u32,
      dest_offset.y as u32,
    )?;
    Ok(())
  }

  /// Reshapes the canvas: keeps the `clip` area of the current image, puts it
  /// at `offset` on a new canvas of size `dimensions`, and fills everything
  /// else with `fill_color`.
  ///
  /// The arguments are checked in this order:
  /// 1. The fill color is of the image's color format.
  /// 2. The new dimensions are at least 1x1.
  /// 3. The clip placed at the offset fits on the new canvas.
  /// 4. The clip fits inside the current image.
  /// 5. The clip is at least 1x1 and doesn't start at a negative position.
  /// 6. The offset isn't negative.
  pub fn resize_canvas(&mut self, options: ResizeCanvasOptions) -> Result<()> {
    let fill_color = match options.fill_color {
      Some(color) => {
        self.check_color(color)?;
        color
      }
      None => self.default_fill_color().ok_or(ValidationError::UnknownColorFormat)?,
    };
    let clip = options.clip.unwrap_or_else(|| self.full_rect());
    let dimensions = options.dimensions.unwrap_or_else(|| clip.dimensions());
    let offset = options.offset.unwrap_or(Point::ZERO);

    if dimensions.x < 1 || dimensions.y < 1 {
      return Err(
        ValidationError::DimensionsTooSmall {
          width: dimensions.x.into(),
          height: dimensions.y.into(),
        }
        .into(),
      );
    }
    let exceeds = |start: i32, len: i32, bound: i64| i64::from(start) + i64::from(len) > bound;
    if exceeds(offset.x, clip.width, dimensions.x.into())
      || exceeds(offset.y, clip.height, dimensions.y.into())
    {
      return Err(out_of_bounds(offset, clip.dimensions(), dimensions).into());
    }
    if exceeds(clip.x, clip.width, self.width.into())
      || exceeds(clip.y, clip.height, self.height.into())
    {
      let bounds = Point::new(self.width as i32, self.height as i32);
      return Err(out_of_bounds(clip.offset(), clip.dimensions(), bounds).into());
    }
    clip.validate()?;
    if !offset.is_non_negative() {
      return Err(ValidationError::NegativePosition { x: offset.x, y: offset.y }.into());
    }

    let (new_width, new_height) = (dimensions.x as u32, dimensions.y as u32);
    debug!(
      "resize canvas {}x{} -> {new_width}x{new_height}, clip {clip:?} at {offset:?}",
      self.width, self.height
    );
    let data = resize_canvas_raw(
      &self.data,
      self.width,
      self.height,
      new_width,
      new_height,
      offset.x as u32,
      offset.y as u32,
      raw_area(clip),
      &fill_color.to_vec(),
      self.bit_depth,
    )?;
    self.width = new_width;
    self.height = new_height;
    self.data = data;
    Ok(())
  }

  /// Cuts the image down to `rect`.
  #[inline]
  pub fn crop(&mut self, rect: Rect) -> Result<()> {
    self.resize_canvas(ResizeCanvasOptions::new().clip(rect).dimensions(rect.dimensions()))
  }
}

/// Only called on validated rects, which are never negative.
fn raw_area(rect: Rect) -> RawArea {
  RawArea::new(rect.x as u32, rect.y as u32, rect.width as u32, rect.height as u32)
}

fn out_of_bounds(offset: Point, size: Point, bounds: Point) -> ValidationError {
  ValidationError::OutOfBounds {
    x: offset.x.into(),
    y: offset.y.into(),
    width: size.x.into(),
    height: size.y.into(),
    bounds_width: bounds.x as u32,
    bounds_height: bounds.y as u32,
  }
}
