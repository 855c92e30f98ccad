//! Fixture helpers for assembling escaped node streams in tests.

use crate::marker;

/// Byte-stuff property data so it can sit inside a node.
pub fn escape(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + data.len() / 8);
    for &byte in data {
        if marker::is_marker(byte) {
            out.push(marker::ESCAPE);
        }
        out.push(byte);
    }
    out
}

/// Writes a container stream node by node.
///
/// Property values are little-endian and escaped on the way in; node type
/// bytes and markers are written raw.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    out: Vec<u8>,
}

impl TreeBuilder {
    /// Start a stream with a 4-byte identifier.
    pub fn new(identifier: &[u8; 4]) -> Self {
        Self {
            out: identifier.to_vec(),
        }
    }

    /// Start a stream without an identifier.
    pub fn bare() -> Self {
        Self::default()
    }

    /// Open a node of the given type.
    pub fn start(&mut self, kind: u8) -> &mut Self {
        self.out.push(marker::START);
        self.out.push(kind);
        self
    }

    /// Close the innermost node.
    pub fn end(&mut self) -> &mut Self {
        self.out.push(marker::END);
        self
    }

    /// Append property bytes, escaping markers.
    pub fn bytes(&mut self, data: &[u8]) -> &mut Self {
        self.out.extend(escape(data));
        self
    }

    /// Append bytes verbatim, without escaping.
    pub fn raw(&mut self, data: &[u8]) -> &mut Self {
        self.out.extend_from_slice(data);
        self
    }

    pub fn u8(&mut self, value: u8) -> &mut Self {
        self.bytes(&[value])
    }

    pub fn u16(&mut self, value: u16) -> &mut Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn u32(&mut self, value: u32) -> &mut Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn u64(&mut self, value: u64) -> &mut Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn i32(&mut self, value: i32) -> &mut Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn i64(&mut self, value: i64) -> &mut Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn f64(&mut self, value: f64) -> &mut Self {
        self.bytes(&value.to_le_bytes())
    }

    /// Append a u16 length-prefixed string.
    pub fn string(&mut self, value: &str) -> &mut Self {
        self.u16(value.len() as u16).bytes(value.as_bytes())
    }

    /// Append a position (x: u16, y: u16, z: u8).
    pub fn position(&mut self, x: u16, y: u16, z: u8) -> &mut Self {
        self.u16(x).u16(y).u8(z)
    }

    /// Take the assembled stream.
    pub fn finish(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.out)
    }
}
