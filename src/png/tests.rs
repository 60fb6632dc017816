use super::*;

use alloc::vec;

use super::write::{filter_line, write_chunk};

fn header(width: u32, height: u32, bit_depth: u8, color_type: PngColorType) -> IHDR {
  IHDR { width, height, bit_depth, color_type, is_interlaced: false }
}

/// A deterministic pixel pattern, with each sample kept within `bit_depth`.
fn pattern(len: usize, bit_depth: u8) -> Vec<u8> {
  let mask = if bit_depth >= 8 { 0xFF } else { (1_u8 << bit_depth) - 1 };
  (0..len).map(|i| ((i * 7 + i / 3) as u8) & mask).collect()
}

fn chunk(type_: &[u8; 4], data: &[u8]) -> Vec<u8> {
  let mut out = Vec::new();
  write_chunk(&mut out, PngRawChunkType(*type_), data);
  out
}

#[test]
fn test_reduced_image_dimensions() {
  assert_eq!(reduced_image_dimensions(0, 0), [(0, 0); 8]);
  // one
  for (w, ex) in (1..=8).zip([1, 1, 1, 1, 1, 1, 1, 1]) {
    assert_eq!(reduced_image_dimensions(w, 0)[1].0, ex, "failed w:{w}");
  }
  // two
  for (w, ex) in (1..=8).zip([0, 0, 0, 0, 1, 1, 1, 1]) {
    assert_eq!(reduced_image_dimensions(w, 0)[2].0, ex, "failed w:{w}");
  }
  // three
  for (h, ex) in (1..=8).zip([0, 0, 0, 0, 1, 1, 1, 1]) {
    assert_eq!(reduced_image_dimensions(0, h)[3].1, ex, "failed h: {h}");
  }
  // four
  for (w, ex) in (1..=8).zip([0, 0, 1, 1, 1, 1, 2, 2]) {
    assert_eq!(reduced_image_dimensions(w, 0)[4].0, ex, "failed w: {w}");
  }
  // five
  for (h, ex) in (1..=8).zip([0, 0, 1, 1, 1, 1, 2, 2]) {
    assert_eq!(reduced_image_dimensions(0, h)[5].1, ex, "failed h: {h}");
  }
  // six
  for (w, ex) in (1..=8).zip([0, 1, 1, 2, 2, 3, 3, 4]) {
    assert_eq!(reduced_image_dimensions(w, 0)[6].0, ex, "failed w: {w}");
  }
  // seven
  for (h, ex) in (1..=8).zip([0, 1, 1, 2, 2, 3, 3, 4]) {
    assert_eq!(reduced_image_dimensions(0, h)[7].1, ex, "failed h: {h}");
  }
  assert_eq!(
    reduced_image_dimensions(8, 8),
    [(8, 8), (1, 1), (1, 1), (2, 1), (2, 2), (4, 2), (4, 4), (8, 4)]
  );
}

#[test]
fn test_adam7_covers_every_pixel_once() {
  let (w, h) = (13_u32, 6_u32);
  let mut seen = vec![0_u8; (w * h) as usize];
  let dims = reduced_image_dimensions(w, h);
  for level in 1..8 {
    let (rw, rh) = dims[level];
    for ry in 0..rh {
      for rx in 0..rw {
        let (x, y) = interlaced_pos_to_full_pos(level, rx, ry);
        assert!(x < w && y < h, "level {level} sent ({x},{y})");
        seen[(x + y * w) as usize] += 1;
      }
    }
  }
  assert!(seen.iter().all(|&n| n == 1));
}

#[test]
fn test_ihdr_parse() {
  let h = header(300, 2, 16, PngColorType::RGBA);
  assert_eq!(IHDR::try_from(&h.to_bytes()[..]), Ok(h));
  // 16-bit palettes aren't allowed
  let mut bad = header(1, 1, 8, PngColorType::Index).to_bytes();
  bad[8] = 16;
  assert_eq!(IHDR::try_from(&bad[..]), Err(()));
  // compression method must be 0
  let mut bad = h.to_bytes();
  bad[10] = 1;
  assert_eq!(IHDR::try_from(&bad[..]), Err(()));
  assert_eq!(IHDR::try_from(&h.to_bytes()[..12]), Err(()));
}

#[test]
fn test_zlib_decompression_requirement() {
  // 1 filter byte + 2 bytes of packed 1-bit samples, per line
  assert_eq!(header(9, 3, 1, PngColorType::Y).zlib_decompression_requirement(), Some(9));
  assert_eq!(header(2, 2, 16, PngColorType::RGB).zlib_decompression_requirement(), Some(26));
  let mut h = header(8, 8, 8, PngColorType::Y);
  h.is_interlaced = true;
  // 7 passes: (1,1) (1,1) (2,1) (2,2) (4,2) (4,4) (8,4)
  assert_eq!(h.zlib_decompression_requirement(), Some(2 + 2 + 3 + 6 + 10 + 20 + 36));
}

#[test]
fn test_unfilter_each_filter_type() {
  // 2x2 RGB8 image, line 0 uses Sub and line 1 uses each filter in turn.
  let h = header(2, 2, 8, PngColorType::RGB);
  let expected = [[10_u8, 20, 30, 15, 25, 35], [12, 22, 32, 200, 100, 50]];
  for filter in 0..=4 {
    let mut data = Vec::new();
    let mut prev = vec![0_u8; 6];
    for (y, line) in expected.iter().enumerate() {
      let f = if y == 0 { 1 } else { filter };
      filter_line(f, 3, line, &prev, &mut data);
      prev = line.to_vec();
    }
    let mut out = vec![0_u8; 12];
    unfilter_decompressed_data(h, &mut data, |x, y, px| {
      let i = (x as usize + y as usize * 2) * 3;
      out[i..i + 3].copy_from_slice(px);
    })
    .unwrap();
    assert_eq!(out, expected.concat(), "filter {filter}");
    // filter bytes are reset to 0 afterwards
    assert_eq!(data[0], 0);
    assert_eq!(data[7], 0);
  }
}

#[test]
fn test_unfilter_rejects_bad_filter_and_short_data() {
  let h = header(1, 1, 8, PngColorType::Y);
  let mut data = [5_u8, 0];
  assert_eq!(
    unfilter_decompressed_data(h, &mut data, |_, _, _| ()),
    Err(DecodeError::IllegalFilterType(5))
  );
  let mut data = [0_u8];
  assert_eq!(unfilter_decompressed_data(h, &mut data, |_, _, _| ()), Err(DecodeError::Truncated));
}

#[test]
fn test_sub_byte_unpacking_skips_padding() {
  // 3 pixels of 2-bit gray: 0b11_01_10_00, last two bits are padding
  let h = header(3, 1, 2, PngColorType::Y);
  let mut data = [0_u8, 0b1101_1011];
  let mut got = Vec::new();
  unfilter_decompressed_data(h, &mut data, |x, y, px| got.push((x, y, px[0]))).unwrap();
  assert_eq!(got, [(0, 0, 3), (1, 0, 1), (2, 0, 2)]);
}

#[test]
fn test_round_trip_formats() {
  let cases = [
    (7, 5, 1, PngColorType::Y, false),
    (7, 5, 4, PngColorType::Y, true),
    (5, 9, 16, PngColorType::Y, false),
    (6, 3, 8, PngColorType::YA, true),
    (4, 4, 16, PngColorType::RGB, true),
    (3, 7, 16, PngColorType::RGBA, false),
    (9, 2, 2, PngColorType::Index, true),
  ];
  let entries: Vec<RGB8> = (0..4).map(|i| RGB8::new(i * 10, i * 20, i * 30)).collect();
  for (width, height, bit_depth, color_type, is_interlaced) in cases {
    let header = IHDR { width, height, bit_depth, color_type, is_interlaced };
    let pixels = pattern((width * height) as usize * header.unpacked_bytes_per_pixel(), bit_depth);
    let mut info = PngWriteInfo::new(header);
    info.palette = Some(&entries[..]);
    info.max_idat_len = 7;
    let png = encode_raw(&info, &pixels).unwrap();
    let decoded = decode_image(&png).unwrap();
    assert_eq!(decoded.pixels, pixels, "{header:?}");
    assert_eq!(decoded.width, width);
    assert_eq!(decoded.bit_depth, bit_depth);
    assert_eq!(decoded.interlace_mode, InterlaceMode::from(is_interlaced));
    assert_eq!(decoded.palette.is_some(), color_type == PngColorType::Index);
  }
}

#[test]
fn test_metadata_round_trip() {
  let mut info = PngWriteInfo::new(header(2, 1, 8, PngColorType::RGBA));
  info.background = Some(bKGD::RGB { r: 1, g: 2, b: 3 });
  info.gamma = Some(45_455);
  info.physical = Some(pHYs { ppu_x: 2835, ppu_y: 2836, is_meters: true });
  info.offset = Some(oFFs { x: -4, y: 9, is_pixels: true });
  info.time = Some(PngTime { year: 2024, month: 2, day: 29, hour: 23, minute: 59, second: 60 });
  let png = encode_raw(&info, &[0; 8]).unwrap();
  let decoded = decode_image(&png).unwrap();
  assert_eq!(decoded.background_color, Some(Color::rgb(1, 2, 3)));
  assert_eq!(decoded.gamma, Some(0.45455));
  assert_eq!((decoded.pixels_per_meter_x, decoded.pixels_per_meter_y), (2835, 2836));
  assert_eq!((decoded.offset_x, decoded.offset_y), (-4, 9));
  assert_eq!(decoded.time, info.time);
  assert_eq!(decoded.row_stride, 8);

  // other units report 0
  info.physical = Some(pHYs { ppu_x: 1, ppu_y: 1, is_meters: false });
  info.offset = Some(oFFs { x: 100, y: 100, is_pixels: false });
  let decoded = decode_image(&encode_raw(&info, &[0; 8]).unwrap()).unwrap();
  assert_eq!((decoded.pixels_per_meter_x, decoded.offset_x), (0, 0));
}

#[test]
fn test_decode_errors() {
  assert_eq!(decode_image(b"not a png"), Err(DecodeError::InvalidSignature));
  assert_eq!(decode_image(&PNG_SIGNATURE), Err(DecodeError::MissingHeader));

  let ihdr = chunk(b"IHDR", &header(1, 1, 8, PngColorType::Y).to_bytes());
  let png = [&PNG_SIGNATURE[..], &ihdr[..], &chunk(b"IEND", &[])[..]].concat();
  assert_eq!(decode_image(&png), Err(DecodeError::MissingImageData));

  let index = chunk(b"IHDR", &header(1, 1, 8, PngColorType::Index).to_bytes());
  let idat = chunk(b"IDAT", &compress_to_vec_zlib_for_test(&[0, 0]));
  let png = [&PNG_SIGNATURE[..], &index[..], &idat[..]].concat();
  assert_eq!(decode_image(&png), Err(DecodeError::MissingPalette));

  // short image data
  let idat = chunk(b"IDAT", &compress_to_vec_zlib_for_test(&[0]));
  let png = [&PNG_SIGNATURE[..], &ihdr[..], &idat[..]].concat();
  assert_eq!(decode_image(&png), Err(DecodeError::Truncated));

  let idat = chunk(b"IDAT", &[1, 2, 3, 4, 5]);
  let png = [&PNG_SIGNATURE[..], &ihdr[..], &idat[..]].concat();
  assert!(matches!(decode_image(&png), Err(DecodeError::Zlib | DecodeError::Truncated)));

  let zero = chunk(b"IHDR", &header(0, 1, 8, PngColorType::Y).to_bytes());
  let png = [&PNG_SIGNATURE[..], &zero[..]].concat();
  assert_eq!(decode_image(&png), Err(DecodeError::WidthOrHeightZero));
}

#[test]
fn test_crc_checks() {
  let png = encode_image(&[1, 2, 3], 1, 1, false, 6).unwrap();
  // the IHDR CRC lives at bytes 29..33
  let mut bad = png.clone();
  bad[30] ^= 0xFF;
  assert_eq!(decode_image(&bad), Err(DecodeError::CrcMismatch("IHDR".into())));

  // a damaged ancillary chunk is skipped
  let mut gama = chunk(b"gAMA", &45_455_u32.to_be_bytes());
  let last = gama.len() - 1;
  gama[last] ^= 0xFF;
  let with_gama = [&png[..33], &gama[..], &png[33..]].concat();
  let decoded = decode_image(&with_gama).unwrap();
  assert_eq!(decoded.gamma, None);
  assert_eq!(decoded.pixels, [1, 2, 3]);
}

#[test]
fn test_encode_raw_validation() {
  let info = PngWriteInfo::new(header(2, 2, 8, PngColorType::RGB));
  assert_eq!(
    encode_raw(&info, &[0; 11]),
    Err(EncodeError::BufferLengthMismatch { len: 11, expected: 12 })
  );
  let info = PngWriteInfo::new(header(2, 2, 8, PngColorType::Index));
  assert_eq!(encode_raw(&info, &[0; 4]), Err(EncodeError::IllegalPalette));
  let info = PngWriteInfo::new(header(0, 2, 8, PngColorType::Y));
  assert_eq!(encode_raw(&info, &[]), Err(EncodeError::IllegalHeader));
  let info = PngWriteInfo::new(header(1, 1, 4, PngColorType::RGB));
  assert_eq!(encode_raw(&info, &[0; 3]), Err(EncodeError::IllegalHeader));
}

#[test]
fn test_is_png_signature() {
  let png = encode_image(&[0; 4], 1, 1, true, 0).unwrap();
  assert!(is_png_signature(&png));
  assert!(!is_png_signature(&png[..7]));
  assert!(!is_png_signature(b"GIF89a.."));
}

fn compress_to_vec_zlib_for_test(data: &[u8]) -> Vec<u8> {
  miniz_oxide::deflate::compress_to_vec_zlib(data, 6)
}
