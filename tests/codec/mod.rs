use pngimage::{EncodeError, EncodeOptions, PngError};

#[test]
fn test_encode_16x8() {
  let buffer = vec![7_u8; 16 * 8 * 3];
  let png = pngimage::encode(&buffer, &EncodeOptions::new().width(16).height(8)).unwrap();
  assert!(pngimage::is_png(&png));
  let img = pngimage::decode(&png).unwrap();
  assert_eq!((img.width(), img.height()), (16, 8));
  assert_eq!(img.data(), buffer);
}

#[test]
fn test_encode_rejects_five_bytes_per_pixel() {
  let buffer = vec![7_u8; 16 * 8 * 5];
  let err = pngimage::encode(&buffer, &EncodeOptions::new().width(16).height(8)).unwrap_err();
  assert!(matches!(err, PngError::Encode(EncodeError::UnsupportedColorLayout { .. })));
}

#[test]
fn test_round_trip_rgb_and_rgba() {
  for bpp in [3, 4] {
    let buffer: Vec<u8> = (0..(13 * 7 * bpp)).map(|i| (i * 31 % 256) as u8).collect();
    let opts = EncodeOptions::new().width(13).height(7);
    let img = pngimage::decode(&pngimage::encode(&buffer, &opts).unwrap()).unwrap();
    assert_eq!(img.data(), buffer);
    assert_eq!(img.alpha(), bpp == 4);
  }
}

#[test]
fn test_encode_one_dimension() {
  let buffer = vec![0_u8; 4 * 6 * 4];
  let opts = EncodeOptions::new().height(6).alpha(true).compression_level(1);
  let img = pngimage::decode(&pngimage::encode(&buffer, &opts).unwrap()).unwrap();
  assert_eq!((img.width(), img.height()), (4, 6));
}

#[test]
fn test_decode_garbage() {
  for _ in 0..10 {
    let err = pngimage::decode(&super::rand_bytes(256)).unwrap_err();
    assert!(matches!(err, PngError::Decode(_)));
  }
  assert!(!pngimage::is_png(b"\x89PNG"));
}
