use core::ops::{Add, Sub};

/// A 2D position or size, in pixels.
///
/// ```
/// # use pngimage::Point;
/// let p = Point::new(10, 20);
/// assert_eq!((p.x, p.y), (10, 20));
/// assert_eq!(p + Point::new(1, 1), Point::new(11, 21));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
  pub x: i32,
  pub y: i32,
}
impl Point {
  /// The origin.
  pub const ZERO: Self = Self { x: 0, y: 0 };

  #[inline]
  #[must_use]
  pub const fn new(x: i32, y: i32) -> Self {
    Self { x, y }
  }

  /// Builds a point from loosely-typed components.
  ///
  /// Exactly two components are required, anything else gives `None`.
  #[inline]
  #[must_use]
  pub const fn from_slice(components: &[i32]) -> Option<Self> {
    match components {
      [x, y] => Some(Self { x: *x, y: *y }),
      _ => None,
    }
  }

  /// If both components are 0 or more.
  #[inline]
  #[must_use]
  pub const fn is_non_negative(self) -> bool {
    self.x >= 0 && self.y >= 0
  }
}

/// Checks if loosely-typed components describe a [`Point`].
#[inline]
#[must_use]
pub const fn is_point(components: &[i32]) -> bool {
  Point::from_slice(components).is_some()
}

impl From<(i32, i32)> for Point {
  #[inline]
  fn from((x, y): (i32, i32)) -> Self {
    Self { x, y }
  }
}
impl From<Point> for (i32, i32) {
  #[inline]
  fn from(Point { x, y }: Point) -> Self {
    (x, y)
  }
}
impl Add for Point {
  type Output = Self;
  #[inline]
  fn add(self, rhs: Self) -> Self {
    Self { x: self.x + rhs.x, y: self.y + rhs.y }
  }
}
impl Sub for Point {
  type Output = Self;
  #[inline]
  fn sub(self, rhs: Self) -> Self {
    Self { x: self.x - rhs.x, y: self.y - rhs.y }
  }
}
