use super::*;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub(crate) struct PngRawChunkType(pub(crate) [u8; 4]);
#[allow(nonstandard_style)]
impl PngRawChunkType {
  pub const IHDR: Self = Self(*b"IHDR");
  pub const PLTE: Self = Self(*b"PLTE");
  pub const IDAT: Self = Self(*b"IDAT");
  pub const IEND: Self = Self(*b"IEND");
  pub const bKGD: Self = Self(*b"bKGD");
  pub const gAMA: Self = Self(*b"gAMA");
  pub const pHYs: Self = Self(*b"pHYs");
  pub const oFFs: Self = Self(*b"oFFs");
  pub const tIME: Self = Self(*b"tIME");

  /// Critical chunks have an uppercase first letter.
  #[inline]
  #[must_use]
  pub const fn is_critical(self) -> bool {
    self.0[0].is_ascii_uppercase()
  }
}
impl Debug for PngRawChunkType {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_char(self.0[0] as char)?;
    f.write_char(self.0[1] as char)?;
    f.write_char(self.0[2] as char)?;
    f.write_char(self.0[3] as char)?;
    Ok(())
  }
}

/// An unparsed chunk from a PNG.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PngRawChunk<'b> {
  pub(crate) type_: PngRawChunkType,
  pub(crate) data: &'b [u8],
  pub(crate) declared_crc: u32,
}
impl Debug for PngRawChunk<'_> {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("PngRawChunk")
      .field("type_", &self.type_)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("declared_crc", &self.declared_crc)
      .finish()
  }
}
impl<'b> PngRawChunk<'b> {
  /// The four byte chunk type, such as `b"IHDR"`.
  #[inline]
  #[must_use]
  pub const fn chunk_type(&self) -> [u8; 4] {
    self.type_.0
  }

  /// The chunk's data bytes.
  #[inline]
  #[must_use]
  pub const fn data(&self) -> &'b [u8] {
    self.data
  }

  /// If the declared CRC matches the CRC computed over the type and data.
  #[inline]
  #[must_use]
  pub fn crc_is_correct(&self) -> bool {
    png_crc(self.type_.0.iter().copied().chain(self.data.iter().copied())) == self.declared_crc
  }
}

/// An iterator that produces successive raw chunks from PNG bytes.
///
/// Iteration stops at the first chunk that's cut short by the end of the
/// data. Random bytes never cause a panic, you just get garbage chunks.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PngRawChunkIter<'b>(pub(crate) &'b [u8]);
impl<'b> PngRawChunkIter<'b> {
  /// Pass the full PNG bytes, it will remove the PNG signature automatically.
  #[inline]
  pub const fn new(bytes: &'b [u8]) -> Self {
    match bytes {
      [_, _, _, _, _, _, _, _, rest @ ..] => Self(rest),
      _ => Self(&[]),
    }
  }
}
impl<'b> Iterator for PngRawChunkIter<'b> {
  type Item = PngRawChunk<'b>;
  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    let (len_bytes, rest) = split_array::<4>(self.0)?;
    let (type_bytes, rest) = split_array::<4>(rest)?;
    let chunk_len = u32::from_be_bytes(len_bytes) as usize;
    if rest.len() < chunk_len {
      self.0 = &[];
      return None;
    }
    let (data, rest) = rest.split_at(chunk_len);
    let Some((crc_bytes, rest)) = split_array::<4>(rest) else {
      self.0 = &[];
      return None;
    };
    self.0 = rest;
    Some(PngRawChunk {
      type_: PngRawChunkType(type_bytes),
      data,
      declared_crc: u32::from_be_bytes(crc_bytes),
    })
  }
}

#[inline]
fn split_array<const N: usize>(bytes: &[u8]) -> Option<([u8; N], &[u8])> {
  if bytes.len() >= N {
    let (head, tail) = bytes.split_at(N);
    head.try_into().ok().map(|a| (a, tail))
  } else {
    None
  }
}
