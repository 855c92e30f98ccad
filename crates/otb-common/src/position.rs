//! Map position type.

use std::fmt;

/// A position on the map: two horizontal axes and a floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: u16,
    pub y: u16,
    pub z: u8,
}

impl Position {
    /// Create a new position.
    #[inline]
    pub const fn new(x: u16, y: u16, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Offset this position on the same floor.
    ///
    /// Tile areas store tiles as single-byte offsets from the area origin;
    /// the sum wraps like the on-disk u16 fields do.
    #[inline]
    pub const fn offset(self, dx: u8, dy: u8) -> Self {
        Self {
            x: self.x.wrapping_add(dx as u16),
            y: self.y.wrapping_add(dy as u16),
            z: self.z,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Position::new(100, 200, 7).to_string(), "(100, 200, 7)");
    }

    #[test]
    fn test_offset_keeps_floor() {
        let origin = Position::new(256, 512, 7);
        assert_eq!(origin.offset(1, 255), Position::new(257, 767, 7));
    }
}
