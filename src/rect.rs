use crate::{error::ValidationError, point::Point};

/// A rectangle: top left position plus size, in pixels.
///
/// Any rectangle handed to an image operation must be at least 1x1; a zero
/// sized rectangle is rejected, not treated as an empty region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rect {
  pub x: i32,
  pub y: i32,
  pub width: i32,
  pub height: i32,
}
impl Rect {
  #[inline]
  #[must_use]
  pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
    Self { x, y, width, height }
  }

  /// Makes a rectangle from its top left corner and its size.
  #[inline]
  #[must_use]
  pub const fn from_offset_dimensions(offset: Point, dimensions: Point) -> Self {
    Self { x: offset.x, y: offset.y, width: dimensions.x, height: dimensions.y }
  }

  /// Builds a rectangle from loosely-typed components: `[x, y, w, h]`.
  #[inline]
  #[must_use]
  pub const fn from_slice(components: &[i32]) -> Option<Self> {
    match components {
      [x, y, width, height] => Some(Self { x: *x, y: *y, width: *width, height: *height }),
      _ => None,
    }
  }

  /// The top left corner.
  #[inline]
  #[must_use]
  pub const fn offset(self) -> Point {
    Point { x: self.x, y: self.y }
  }

  /// The width and height as a point.
  #[inline]
  #[must_use]
  pub const fn dimensions(self) -> Point {
    Point { x: self.width, y: self.height }
  }

  /// Checks that the rectangle starts at a non-negative position and is at
  /// least 1x1.
  pub(crate) fn validate(self) -> Result<(), ValidationError> {
    if self.width < 1 || self.height < 1 {
      return Err(ValidationError::EmptyRect { width: self.width, height: self.height });
    }
    if !self.offset().is_non_negative() {
      return Err(ValidationError::NegativePosition { x: self.x, y: self.y });
    }
    Ok(())
  }

  /// Checks that the rectangle, moved by `shift`, lies inside a
  /// `bounds_width` x `bounds_height` area.
  pub(crate) fn check_fits(
    self, shift: Point, bounds_width: u32, bounds_height: u32,
  ) -> Result<(), ValidationError> {
    let x = i64::from(self.x) + i64::from(shift.x);
    let y = i64::from(self.y) + i64::from(shift.y);
    let width = i64::from(self.width);
    let height = i64::from(self.height);
    let fits_x = x >= 0 && x + width <= i64::from(bounds_width);
    let fits_y = y >= 0 && y + height <= i64::from(bounds_height);
    if !(fits_x && fits_y) {
      return Err(ValidationError::OutOfBounds {
        x,
        y,
        width,
        height,
        bounds_width,
        bounds_height,
      });
    }
    Ok(())
  }
}

/// Checks if loosely-typed components describe a [`Rect`].
#[inline]
#[must_use]
pub const fn is_rect(components: &[i32]) -> bool {
  Rect::from_slice(components).is_some()
}

impl From<(Point, Point)> for Rect {
  #[inline]
  fn from((offset, dimensions): (Point, Point)) -> Self {
    Self::from_offset_dimensions(offset, dimensions)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_rect_views() {
    let r = Rect::new(1, 2, 3, 4);
    assert_eq!(r.offset(), Point::new(1, 2));
    assert_eq!(r.dimensions(), Point::new(3, 4));
    assert_eq!(Rect::from_offset_dimensions(Point::new(1, 2), Point::new(3, 4)), r);
    assert_eq!(Rect::from((Point::new(1, 2), Point::new(3, 4))), r);
  }

  #[test]
  fn test_rect_from_slice() {
    assert_eq!(Rect::from_slice(&[1, 2, 3, 4]), Some(Rect::new(1, 2, 3, 4)));
    assert_eq!(Rect::from_slice(&[1, 2]), None);
    assert!(is_rect(&[0, 0, 8, 8]));
    assert!(!is_rect(&[0, 0, 8]));
  }

  #[test]
  fn test_rect_validate() {
    assert!(Rect::new(0, 0, 1, 1).validate().is_ok());
    assert_eq!(
      Rect::new(0, 0, 0, 5).validate(),
      Err(ValidationError::EmptyRect { width: 0, height: 5 })
    );
    assert_eq!(
      Rect::new(-1, 0, 2, 2).validate(),
      Err(ValidationError::NegativePosition { x: -1, y: 0 })
    );
  }

  #[test]
  fn test_rect_check_fits() {
    let r = Rect::new(2, 2, 4, 4);
    assert!(r.check_fits(Point::ZERO, 6, 6).is_ok());
    assert!(r.check_fits(Point::ZERO, 5, 6).is_err());
    assert!(r.check_fits(Point::new(1, 0), 6, 6).is_err());
    assert!(r.check_fits(Point::new(-2, -2), 4, 4).is_ok());
    assert!(r.check_fits(Point::new(-3, 0), 8, 8).is_err());
  }
}
