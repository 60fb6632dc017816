use pngimage::{
  png::{
    decode_image, encode_raw, is_png_signature, PngColorType, PngRawChunkIter, PngWriteInfo, IHDR,
  },
  RGB8,
};

#[test]
fn test_PngRawChunkIter_no_panics() {
  let png = super::orange_png();
  let types: Vec<[u8; 4]> = PngRawChunkIter::new(&png).map(|c| c.chunk_type()).collect();
  assert_eq!(types.first(), Some(b"IHDR"));
  assert_eq!(types.last(), Some(b"IEND"));
  assert!(PngRawChunkIter::new(&png).all(|c| c.crc_is_correct()));

  // even totally random data should never panic the iterator!
  for _ in 0..10 {
    let v = super::rand_bytes(1024);
    for _ in PngRawChunkIter::new(&v) {
      //
    }
  }
}

#[test]
fn test_decode_image_no_panics() {
  let png = super::orange_png();
  for _ in 0..20 {
    // random bytes behind a real signature
    let mut v = png[..8].to_vec();
    v.extend(super::rand_bytes(512));
    assert!(decode_image(&v).is_err());
    // a real header and random image data
    let mut v = png[..33].to_vec();
    v.extend(super::rand_bytes(512));
    let _ = decode_image(&v);
  }
  // every truncation of a real file
  for len in 0..png.len() {
    let _ = decode_image(&png[..len]);
  }
}

#[test]
fn test_is_png_signature() {
  assert!(is_png_signature(&super::orange_png()));
  assert!(!is_png_signature(&[]));
  assert!(!is_png_signature(&super::rand_bytes(8)[..4]));
}

#[test]
fn test_palette_image_decodes_indexes() {
  let entries = [RGB8::new(255, 0, 0), RGB8::new(0, 255, 0), RGB8::new(0, 0, 255)];
  let header = IHDR {
    width: 3,
    height: 1,
    bit_depth: 4,
    color_type: PngColorType::Index,
    is_interlaced: false,
  };
  let mut info = PngWriteInfo::new(header);
  info.palette = Some(&entries[..]);
  let png = encode_raw(&info, &[2, 0, 1]).unwrap();
  let img = pngimage::decode(&png).unwrap();
  assert_eq!(img.data(), [2, 0, 1]);
  assert_eq!(img.palette().map(|p| p.len()), Some(3));
  assert_eq!(img.rgba_at(0, 0).unwrap(), Some(pngimage::RGBA8::new(0, 0, 255, 255)));
}

#[test]
fn test_interlaced_matches_plain() {
  let pixels: Vec<u8> = (0..(17 * 11 * 4)).map(|i| (i % 251) as u8).collect();
  let mut header = IHDR {
    width: 17,
    height: 11,
    bit_depth: 8,
    color_type: PngColorType::RGBA,
    is_interlaced: false,
  };
  let plain = decode_image(&encode_raw(&PngWriteInfo::new(header), &pixels).unwrap()).unwrap();
  header.is_interlaced = true;
  let adam7 = decode_image(&encode_raw(&PngWriteInfo::new(header), &pixels).unwrap()).unwrap();
  assert_eq!(plain.pixels, pixels);
  assert_eq!(adam7.pixels, pixels);
  assert_eq!(adam7.interlace_mode, pngimage::InterlaceMode::Adam7);
}
