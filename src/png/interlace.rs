/// Adam7 passes as `(x_step, x_start, y_step, y_start)`, with the full image
/// first so the table can be indexed by image level.
const ADAM7: [(u32, u32, u32, u32); 8] = [
  (1, 0, 1, 0),
  (8, 0, 8, 0),
  (8, 4, 8, 0),
  (4, 0, 8, 4),
  (4, 2, 4, 0),
  (2, 0, 4, 2),
  (2, 1, 2, 0),
  (1, 0, 2, 1),
];

#[inline]
const fn reduced_len(full: u32, step: u32, start: u32) -> u32 {
  if full > start {
    (full - start + step - 1) / step
  } else {
    0
  }
}

/// Given the full image dimensions, gives the dimensions of each reduced image.
///
/// Index 0 is the full image itself, indexes 1 through 7 are the Adam7 passes.
/// A reduced image can have a width or height of 0, in which case that pass
/// holds no data.
#[must_use]
pub const fn reduced_image_dimensions(full_width: u32, full_height: u32) -> [(u32, u32); 8] {
  let mut out = [(0, 0); 8];
  let mut level = 0;
  while level < 8 {
    let (x_step, x_start, y_step, y_start) = ADAM7[level];
    out[level] =
      (reduced_len(full_width, x_step, x_start), reduced_len(full_height, y_step, y_start));
    level += 1;
  }
  out
}

/// Maps a position within a reduced image back to the full image.
///
/// Image level 0 is the full image, so the position is unchanged.
#[inline]
#[must_use]
pub const fn interlaced_pos_to_full_pos(
  image_level: usize, reduced_x: u32, reduced_y: u32,
) -> (u32, u32) {
  let (x_step, x_start, y_step, y_start) = ADAM7[image_level];
  (reduced_x * x_step + x_start, reduced_y * y_step + y_start)
}
