use pngimage::{convert_to_rgba, Color, ColorFormat, PngError, PngImage, Point};

#[test]
fn test_decode_orange() {
  let img = super::orange();
  assert_eq!((img.width(), img.height()), (32, 16));
  assert_eq!(img.color_format(), ColorFormat::Rgb);
  assert_eq!(img.bit_depth(), 8);
  assert_eq!(img.channels(), 3);
  assert!(!img.alpha());
  assert_eq!(img.data().len(), 32 * 16 * 3);
  assert!(img.data().chunks_exact(3).all(|px| px == [255, 128, 64]));
}

#[test]
fn test_to_xy_inverts_to_index() {
  let img = super::orange();
  for y in 0..16 {
    for x in 0..32 {
      let index = img.to_index(x, y).unwrap();
      assert_eq!(img.to_xy(index), Some(Point::new(x, y)));
    }
  }
}

#[test]
fn test_out_of_bounds_at_fails() {
  let img = super::orange();
  for (x, y) in [(-1, 0), (0, -1), (32, 0), (0, 16), (32, 16), (i32::MIN, i32::MAX)] {
    assert!(matches!(img.at(x, y), Err(PngError::Index { .. })), "({x},{y})");
    assert!(img.rgba_at(x, y).is_err());
  }
  assert!(img.at(31, 15).is_ok());
}

#[test]
fn test_rgba_alpha_defaults_to_opaque() {
  let formats = [
    (ColorFormat::GrayScale, vec![7]),
    (ColorFormat::GrayScaleAlpha, vec![7, 9]),
    (ColorFormat::Rgb, vec![1, 2, 3]),
    (ColorFormat::Rgba, vec![1, 2, 3, 9]),
  ];
  for (format, data) in formats {
    let img = PngImage::from_raw_parts(1, 1, 8, format, None, data).unwrap();
    let rgba = img.rgba_at(0, 0).unwrap().unwrap();
    let expected_alpha = if format.has_alpha() { 9 } else { 255 };
    assert_eq!(rgba.a, expected_alpha, "{format:?}");
    let color = img.at(0, 0).unwrap().unwrap();
    assert_eq!(convert_to_rgba(color, None), Some(rgba));
  }
}

#[test]
fn test_palette_lookup_missing_index() {
  let palette = [(0, pngimage::RGB8::new(1, 2, 3))].into_iter().collect();
  let img =
    PngImage::from_raw_parts(2, 1, 8, ColorFormat::Palette, Some(palette), vec![0, 5]).unwrap();
  assert_eq!(img.at(1, 0).unwrap(), Some(Color::palette(5)));
  assert_eq!(img.rgba_at(0, 0).unwrap(), Some(pngimage::RGBA8::new(1, 2, 3, 255)));
  assert_eq!(img.rgba_at(1, 0).unwrap(), None);
}

#[test]
fn test_encode_round_trip() {
  let img = super::orange();
  let again = PngImage::decode(&img.encode().unwrap()).unwrap();
  assert_eq!(again.data(), img.data());
  assert_eq!(again.color_format(), ColorFormat::Rgb);
}
