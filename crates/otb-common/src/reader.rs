//! Escape-aware reader for node property bytes.
//!
//! Property data inside an OTB container is stored byte-stuffed: any byte that
//! collides with a structural marker is preceded by [`marker::ESCAPE`]. The
//! [`NodeReader`] is the single place where that encoding is undone. Every
//! length it deals with is a *logical* length, counted after unescaping.

use std::borrow::Cow;

use byteorder::{ByteOrder, LittleEndian};
use zerocopy::FromBytes;

use crate::{marker, Error, Position, Result};

/// A cursor over the raw (still escaped) property bytes of a node.
///
/// # Example
///
/// ```
/// use otb_common::NodeReader;
///
/// // 0xFE is escaped in the raw stream
/// let raw = [0x01, 0xFD, 0xFE, 0x00, 0x00];
/// let mut reader = NodeReader::new(&raw);
///
/// assert_eq!(reader.read_u32().unwrap(), 0x0000FE01);
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct NodeReader<'a> {
    data: &'a [u8],
    position: usize,
}

/// Raw extent of a run of logical bytes.
struct Span {
    end: usize,
    escaped: bool,
}

impl<'a> NodeReader<'a> {
    /// Create a new reader over raw property bytes.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Current raw position within the property bytes.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Number of raw bytes left, escape bytes included.
    #[inline]
    pub const fn remaining_raw(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// The raw bytes not consumed yet.
    #[inline]
    pub fn remaining_bytes(&self) -> &'a [u8] {
        &self.data[self.position.min(self.data.len())..]
    }

    /// Locate the raw end of the next `count` logical bytes.
    fn span(&self, count: usize) -> Result<Span> {
        let mut raw = self.position;
        let mut escaped = false;

        for logical in 0..count {
            match self.data.get(raw) {
                Some(&marker::ESCAPE) => {
                    // A trailing escape byte has no literal to protect.
                    if raw + 1 >= self.data.len() {
                        return Err(Error::UnexpectedEof {
                            needed: count,
                            available: logical,
                        });
                    }
                    escaped = true;
                    raw += 2;
                }
                Some(_) => raw += 1,
                None => {
                    return Err(Error::UnexpectedEof {
                        needed: count,
                        available: logical,
                    })
                }
            }
        }

        Ok(Span { end: raw, escaped })
    }

    /// Read `count` logical bytes.
    ///
    /// Borrows straight from the property data when the run contains no
    /// escape bytes, otherwise returns an unescaped copy.
    pub fn read_bytes(&mut self, count: usize) -> Result<Cow<'a, [u8]>> {
        let span = self.span(count)?;
        let raw = &self.data[self.position..span.end];
        self.position = span.end;

        if !span.escaped {
            return Ok(Cow::Borrowed(raw));
        }

        let mut out = Vec::with_capacity(count);
        let mut bytes = raw.iter();
        while let Some(&byte) = bytes.next() {
            if byte == marker::ESCAPE {
                if let Some(&literal) = bytes.next() {
                    out.push(literal);
                }
            } else {
                out.push(byte);
            }
        }

        Ok(Cow::Owned(out))
    }

    /// Read exactly `N` logical bytes into an array.
    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&bytes);
        Ok(out)
    }

    /// Skip `count` logical bytes.
    ///
    /// Escaped bytes count once but consume two raw bytes.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.position = self.span(count)?.end;
        Ok(())
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_array::<1>().map(|b| b[0])
    }

    /// Read a boolean (non-zero = true).
    #[inline]
    pub fn read_bool(&mut self) -> Result<bool> {
        self.read_u8().map(|b| b != 0)
    }

    /// Read a little-endian u16.
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(&self.read_array::<2>()?))
    }

    /// Read a little-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(&self.read_array::<4>()?))
    }

    /// Read a little-endian i32.
    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(&self.read_array::<4>()?))
    }

    /// Read a little-endian u64.
    #[inline]
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(LittleEndian::read_u64(&self.read_array::<8>()?))
    }

    /// Read a little-endian i64.
    #[inline]
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(LittleEndian::read_i64(&self.read_array::<8>()?))
    }

    /// Read a little-endian f64.
    #[inline]
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(LittleEndian::read_f64(&self.read_array::<8>()?))
    }

    /// Read a string of `length` logical bytes.
    ///
    /// Older files carry single-byte legacy text; bytes that are not valid
    /// UTF-8 are replaced rather than rejected.
    pub fn read_string(&mut self, length: usize) -> Result<String> {
        let bytes = self.read_bytes(length)?;
        Ok(match String::from_utf8(bytes.into_owned()) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })
    }

    /// Read a string prefixed by its u16 logical length.
    pub fn read_prefixed_string(&mut self) -> Result<String> {
        let length = self.read_u16()?;
        self.read_string(length as usize)
    }

    /// Read a map position (x: u16, y: u16, z: u8).
    pub fn read_position(&mut self) -> Result<Position> {
        let x = self.read_u16()?;
        let y = self.read_u16()?;
        let z = self.read_u8()?;
        Ok(Position::new(x, y, z))
    }

    /// Read a struct using zerocopy.
    ///
    /// The struct's size is taken as a logical byte count, so escaped bytes
    /// inside it are resolved before the struct is built.
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(&bytes).map_err(|_| Error::UnexpectedEof {
            needed: size,
            available: bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::escape;
    use crate::ErrorKind;

    #[test]
    fn test_read_primitives() {
        let data = [
            0x01u8, 0x02, 0x03, 0x04, // u32: 0x04030201
            0x34, 0x12, // u16: 0x1234
            0x07, // u8
        ];
        let mut reader = NodeReader::new(&data);

        assert_eq!(reader.read_u32().unwrap(), 0x04030201);
        assert_eq!(reader.read_u16().unwrap(), 0x1234);
        assert_eq!(reader.read_u8().unwrap(), 7);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_escaped_string() {
        let data = [0x41, 0xFD, 0xFE, 0x42];
        let mut reader = NodeReader::new(&data);

        let bytes = reader.read_bytes(3).unwrap();
        assert_eq!(bytes.as_ref(), &[0x41, 0xFE, 0x42]);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_unescaped_read_borrows() {
        let data = [0x41, 0x42, 0x43];
        let mut reader = NodeReader::new(&data);

        assert!(matches!(reader.read_bytes(2).unwrap(), Cow::Borrowed(_)));
        assert_eq!(reader.position(), 2);
    }

    #[test]
    fn test_escaped_integer() {
        // 0xFF and 0xFD inside a u16 must both be escaped
        let data = [0xFD, 0xFF, 0xFD, 0xFD];
        let mut reader = NodeReader::new(&data);

        assert_eq!(reader.read_u16().unwrap(), 0xFDFF);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_skip_counts_logical_bytes() {
        let data = [0xFD, 0xFE, 0x10, 0xFD, 0xFF, 0x2A];
        let mut reader = NodeReader::new(&data);

        reader.skip(3).unwrap();
        assert_eq!(reader.position(), 5);
        assert_eq!(reader.read_u8().unwrap(), 0x2A);
    }

    #[test]
    fn test_truncated_read() {
        let data = [0x01, 0x02];
        let mut reader = NodeReader::new(&data);

        let err = reader.read_u32().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
        assert!(matches!(
            err,
            Error::UnexpectedEof {
                needed: 4,
                available: 2
            }
        ));
    }

    #[test]
    fn test_trailing_escape_is_truncated() {
        let data = [0x01, 0xFD];
        let mut reader = NodeReader::new(&data);

        assert!(reader.read_u16().is_err());
        assert!(NodeReader::new(&data).skip(2).is_err());
    }

    #[test]
    fn test_prefixed_string_and_position() {
        let data = [0x03, 0x00, b'B', b'a', b'g', 0x64, 0x00, 0xC8, 0x00, 0x07];
        let mut reader = NodeReader::new(&data);

        assert_eq!(reader.read_prefixed_string().unwrap(), "Bag");
        assert_eq!(reader.read_position().unwrap(), Position::new(100, 200, 7));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let data = [b'a', 0xE9, b'b'];
        let mut reader = NodeReader::new(&data);

        assert_eq!(reader.read_string(3).unwrap(), "a\u{FFFD}b");
    }

    #[test]
    fn test_escape_round_trip() {
        // Every byte value, plus runs of consecutive markers
        let mut samples: Vec<Vec<u8>> = vec![
            (0..=255u8).collect(),
            vec![0xFD; 16],
            vec![0xFE, 0xFF, 0xFD, 0xFE],
            Vec::new(),
        ];
        samples.push((0..512u32).map(|i| (i * 37 % 256) as u8).collect());

        for original in samples {
            let raw = escape(&original);
            let mut reader = NodeReader::new(&raw);
            let decoded = reader.read_bytes(original.len()).unwrap();

            assert_eq!(decoded.as_ref(), original.as_slice());
            assert!(reader.is_empty());
        }
    }
}
