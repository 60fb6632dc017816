//! The CRC-32 used by PNG chunks (ISO 3309 polynomial, reflected).

const CRC_TABLE: [u32; 256] = make_crc_table();

const fn make_crc_table() -> [u32; 256] {
  let mut out = [0; 256];
  let mut n = 0;
  while n < 256 {
    let mut c = n as u32;
    let mut k = 0;
    while k < 8 {
      if (c & 1) != 0 {
        c = 0xEDB8_8320_u32 ^ (c >> 1);
      } else {
        c >>= 1;
      }
      k += 1;
    }
    out[n] = c;
    n += 1;
  }
  out
}

/// A running chunk CRC, fed one slice at a time.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PngCrc(u32);
impl PngCrc {
  #[inline]
  pub(crate) const fn new() -> Self {
    Self(u32::MAX)
  }
  #[inline]
  pub(crate) fn update(&mut self, bytes: &[u8]) {
    for byte in bytes {
      let i = (self.0 ^ u32::from(*byte)) as u8 as usize;
      self.0 = CRC_TABLE[i] ^ (self.0 >> 8);
    }
  }
  #[inline]
  #[must_use]
  pub(crate) const fn finish(self) -> u32 {
    self.0 ^ u32::MAX
  }
}

#[inline]
pub(crate) fn png_crc(iter: impl Iterator<Item = u8>) -> u32 {
  let mut crc = PngCrc::new();
  for byte in iter {
    crc.update(&[byte]);
  }
  crc.finish()
}

#[test]
fn test_png_crc_known_values() {
  // the IEND chunk of every PNG
  assert_eq!(png_crc(b"IEND".iter().copied()), 0xAE42_6082);
  let mut crc = PngCrc::new();
  crc.update(b"IE");
  crc.update(b"ND");
  assert_eq!(crc.finish(), 0xAE42_6082);
  assert_eq!(png_crc(b"123456789".iter().copied()), 0xCBF4_3926);
}
