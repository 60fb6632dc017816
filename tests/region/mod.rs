use pngimage::{Color, ColorFormat, PngError, PngImage, Point, Rect, ResizeCanvasOptions};

#[test]
fn test_fill_then_read() {
  let mut img = super::orange();
  let area = Rect::new(3, 2, 5, 4);
  let navy = Color::rgb(0, 0, 128);
  img.fill(navy, Some(area)).unwrap();
  for y in 0..16 {
    for x in 0..32 {
      let inside = x >= 3 && x < 8 && y >= 2 && y < 6;
      let expected = if inside { navy } else { Color::rgb(255, 128, 64) };
      assert_eq!(img.at(x, y).unwrap(), Some(expected), "({x},{y})");
    }
  }
}

#[test]
fn test_resize_canvas_scenario() {
  let mut img = super::orange();
  let opts = ResizeCanvasOptions::new()
    .dimensions(Point::new(18, 18))
    .offset(Point::new(10, 10))
    .clip(Rect::new(0, 0, 6, 6))
    .fill_color(Color::rgb(0, 0, 128));
  img.resize_canvas(opts).unwrap();
  assert_eq!((img.width(), img.height()), (18, 18));
  assert_eq!(img.data().len(), 18 * 18 * 3);
  assert_eq!(img.at(9, 9).unwrap(), Some(Color::rgb(0, 0, 128)));
  assert_eq!(img.at(10, 10).unwrap(), Some(Color::rgb(255, 128, 64)));
  assert_eq!(img.at(15, 15).unwrap(), Some(Color::rgb(255, 128, 64)));
  assert_eq!(img.at(16, 16).unwrap(), Some(Color::rgb(0, 0, 128)));
}

#[test]
fn test_resize_canvas_identity() {
  let mut img = super::orange();
  img.set(Color::rgb(1, 2, 3), Point::new(4, 5)).unwrap();
  let before = img.clone();
  img
    .resize_canvas(
      ResizeCanvasOptions::new()
        .offset(Point::ZERO)
        .clip(Rect::new(0, 0, 32, 16))
        .dimensions(Point::new(32, 16)),
    )
    .unwrap();
  assert_eq!(img, before);
  img.resize_canvas(ResizeCanvasOptions::default()).unwrap();
  assert_eq!(img, before);
}

#[test]
fn test_copy_from_format_mismatch_leaves_dest() {
  let source = PngImage::from_raw_parts(2, 2, 8, ColorFormat::Rgba, None, vec![9; 16]).unwrap();
  let mut dest = super::orange();
  let before = dest.data().to_vec();
  let err = dest.copy_from(&source, None, None).unwrap_err();
  assert!(matches!(err, PngError::Validation(_)));
  assert_eq!(dest.data(), before);
}

#[test]
fn test_copy_from_between_images() {
  let mut source = super::orange();
  source.fill(Color::rgb(9, 9, 9), Some(Rect::new(0, 0, 2, 2))).unwrap();
  let mut dest = super::orange();
  dest.copy_from(&source, Some(Point::new(30, 14)), Some(Rect::new(0, 0, 2, 2))).unwrap();
  assert_eq!(dest.at(31, 15).unwrap(), Some(Color::rgb(9, 9, 9)));
  assert_eq!(dest.at(29, 15).unwrap(), Some(Color::rgb(255, 128, 64)));
  // one pixel too far
  let too_far = dest.copy_from(&source, Some(Point::new(31, 14)), Some(Rect::new(0, 0, 2, 2)));
  assert!(too_far.is_err());
}

#[test]
fn test_crop_then_encode() {
  let mut img = super::orange();
  img.crop(Rect::new(4, 4, 8, 2)).unwrap();
  let again = pngimage::decode(&img.encode().unwrap()).unwrap();
  assert_eq!((again.width(), again.height()), (8, 2));
  assert!(again.data().chunks_exact(3).all(|px| px == [255, 128, 64]));
}

#[test]
fn test_sixteen_bit_fill_reads_back() {
  let mut img =
    PngImage::from_raw_parts(2, 2, 16, ColorFormat::Rgba, None, vec![0; 2 * 2 * 8]).unwrap();
  img.set(Color::rgba(10, 20, 30, 40), Point::new(1, 1)).unwrap();
  assert_eq!(img.at(1, 1).unwrap(), Some(Color::rgba(10, 20, 30, 40)));
  assert_eq!(&img.data()[24..], [10, 10, 20, 20, 30, 30, 40, 40]);
}
