//! Low-level binary encoding for the mesh data file.
//!
//! Scalars are written in host byte order with no normalization, so a file
//! is only portable between hosts of the same endianness. Sizes are written
//! as 64-bit unsigned integers. Every read is bounds-checked against the
//! remaining input before anything is allocated.

use crate::geom::Vec2;

/// Name byte strings are padded to this alignment.
pub const NAME_ALIGNMENT: usize = 4;

/// Round `n` up to the next multiple of [`NAME_ALIGNMENT`].
pub fn pad4(n: usize) -> usize {
    n.div_ceil(NAME_ALIGNMENT) * NAME_ALIGNMENT
}

/// Errors raised while decoding a mesh container or data file.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DecodeError {
    #[error("unexpected end of input reading {what}: needed {needed} bytes, {remaining} left")]
    UnexpectedEof {
        what: &'static str,
        needed: usize,
        remaining: usize,
    },

    #[error("{what} length {len} exceeds the remaining input")]
    LengthOutOfRange { what: &'static str, len: u64 },

    #[error("invalid boolean byte {value:#04x} for {what}")]
    InvalidBool { what: &'static str, value: u8 },

    #[error("mesh name is not valid UTF-8")]
    InvalidUtf8,

    #[error("duplicate mesh name {0:?}")]
    DuplicateName(String),

    #[error("control mesh grid {cols}x{rows} does not match {points} stored points")]
    InvalidGrid { cols: u32, rows: u32, points: u64 },

    #[error("not a data file (magic {found:?})")]
    BadMagic { found: [u8; 4] },

    #[error("unsupported data file version {0}")]
    UnsupportedVersion(u32),

    #[error("section {id:?} declared {declared} bytes but consumed {consumed}")]
    SectionLength {
        id: String,
        declared: usize,
        consumed: usize,
    },
}

/// Append-only byte sink used by every `pack` routine.
#[derive(Debug, Default, Clone)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_size(&mut self, v: usize) {
        self.buf.extend_from_slice(&(v as u64).to_ne_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_ne_bytes());
    }

    pub fn write_f32(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_ne_bytes());
    }

    pub fn write_bool(&mut self, v: bool) {
        self.buf.push(u8::from(v));
    }

    pub fn write_vec2(&mut self, v: Vec2) {
        self.write_f32(v.x);
        self.write_f32(v.y);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Logical length first, then the bytes zero-padded to [`pad4`].
    pub fn write_padded_str(&mut self, s: &str) {
        let bytes = s.as_bytes();
        self.write_size(bytes.len());
        self.buf.extend_from_slice(bytes);
        self.buf
            .resize(self.buf.len() + pad4(bytes.len()) - bytes.len(), 0);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

/// Bounds-checked cursor over an in-memory byte slice.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_bytes(&mut self, n: usize, what: &'static str) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining() {
            return Err(DecodeError::UnexpectedEof {
                what,
                needed: n,
                remaining: self.remaining(),
            });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn read_array<const N: usize>(&mut self, what: &'static str) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N, what)?);
        Ok(out)
    }

    pub fn read_u64(&mut self, what: &'static str) -> Result<u64, DecodeError> {
        self.read_array(what).map(u64::from_ne_bytes)
    }

    pub fn read_u32(&mut self, what: &'static str) -> Result<u32, DecodeError> {
        self.read_array(what).map(u32::from_ne_bytes)
    }

    pub fn read_f32(&mut self, what: &'static str) -> Result<f32, DecodeError> {
        self.read_array(what).map(f32::from_ne_bytes)
    }

    pub fn read_bool(&mut self, what: &'static str) -> Result<bool, DecodeError> {
        match self.read_array::<1>(what)?[0] {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(DecodeError::InvalidBool { what, value }),
        }
    }

    pub fn read_vec2(&mut self, what: &'static str) -> Result<Vec2, DecodeError> {
        Ok(Vec2::new(self.read_f32(what)?, self.read_f32(what)?))
    }

    /// Read a stored size that must describe at most `remaining / unit`
    /// items of `unit` bytes each.
    pub fn read_count(&mut self, unit: usize, what: &'static str) -> Result<usize, DecodeError> {
        let len = self.read_u64(what)?;
        let max = (self.remaining() / unit.max(1)) as u64;
        if len > max {
            return Err(DecodeError::LengthOutOfRange { what, len });
        }
        Ok(len as usize)
    }

    /// Inverse of [`Encoder::write_padded_str`].
    pub fn read_padded_str(&mut self) -> Result<String, DecodeError> {
        let len = self.read_count(1, "name length")?;
        let padded = self.read_bytes(pad4(len), "name")?;
        String::from_utf8(padded[..len].to_vec()).map_err(|_| DecodeError::InvalidUtf8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad4() {
        assert_eq!(pad4(0), 0);
        assert_eq!(pad4(1), 4);
        assert_eq!(pad4(4), 4);
        assert_eq!(pad4(5), 8);
    }

    #[test]
    fn test_padded_string_layout() {
        let mut enc = Encoder::new();
        enc.write_padded_str("warp0");
        let bytes = enc.into_inner();
        assert_eq!(bytes.len(), 8 + 8);
        assert_eq!(&bytes[..8], &5u64.to_ne_bytes());
        assert_eq!(&bytes[8..13], b"warp0");
        assert_eq!(&bytes[13..], &[0, 0, 0]);

        let mut dec = Decoder::new(&bytes);
        assert_eq!(dec.read_padded_str().unwrap(), "warp0");
        assert!(dec.is_empty());
    }

    #[test]
    fn test_truncated_read_reports_eof() {
        let bytes = [1u8, 2, 3];
        let mut dec = Decoder::new(&bytes);
        assert_eq!(
            dec.read_f32("px"),
            Err(DecodeError::UnexpectedEof {
                what: "px",
                needed: 4,
                remaining: 3
            })
        );
    }

    #[test]
    fn test_huge_length_rejected_before_allocation() {
        let mut enc = Encoder::new();
        enc.write_size(usize::MAX);
        let bytes = enc.into_inner();
        let mut dec = Decoder::new(&bytes);
        assert!(matches!(
            dec.read_padded_str(),
            Err(DecodeError::LengthOutOfRange { .. })
        ));
    }

    #[test]
    fn test_invalid_bool() {
        let mut dec = Decoder::new(&[2u8]);
        assert_eq!(
            dec.read_bool("is_hidden"),
            Err(DecodeError::InvalidBool {
                what: "is_hidden",
                value: 2
            })
        );
    }
}
