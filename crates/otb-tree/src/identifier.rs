//! Container identifiers.

use std::fmt;

/// The 4-byte identifier at the start of every OTB container.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identifier([u8; 4]);

impl Identifier {
    /// Item type catalog (`items.otb`).
    pub const OTBI: Self = Self(*b"OTBI");

    /// Map (`.otbm`).
    pub const OTBM: Self = Self(*b"OTBM");

    /// Four zero bytes, accepted in place of any identifier.
    pub const WILDCARD: Self = Self([0; 4]);

    /// Size of the identifier in bytes.
    pub const LEN: usize = 4;

    /// Create an identifier from raw bytes.
    #[inline]
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Check whether `actual` is acceptable when `self` is expected.
    pub fn accepts(&self, actual: &[u8]) -> bool {
        actual == self.0 || actual == Self::WILDCARD.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.iter().all(u8::is_ascii_graphic) {
            // All bytes are ASCII, so this is a valid str.
            f.write_str(std::str::from_utf8(&self.0).unwrap_or_default())
        } else {
            write!(f, "{:02X?}", self.0)
        }
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_exact_and_wildcard() {
        assert!(Identifier::OTBI.accepts(b"OTBI"));
        assert!(Identifier::OTBI.accepts(&[0, 0, 0, 0]));
        assert!(!Identifier::OTBI.accepts(b"OTBM"));
        assert!(!Identifier::OTBI.accepts(b"OTB"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Identifier::OTBM.to_string(), "OTBM");
        assert_eq!(Identifier::WILDCARD.to_string(), "[00, 00, 00, 00]");
    }
}
