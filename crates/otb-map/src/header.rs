//! OTBM root header.

use zerocopy::{FromBytes, Immutable, KnownLayout};

/// Header as stored in the root node's properties.
#[derive(Debug, Clone, Copy, FromBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub(crate) struct RawMapHeader {
    pub version: u32,
    pub width: u16,
    pub height: u16,
    pub items_major: u32,
    pub items_minor: u32,
}

/// Decoded map header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapHeader {
    /// OTBM layout version.
    pub version: u32,
    pub width: u16,
    pub height: u16,
    /// Catalog major version the map was saved against.
    pub items_major: u32,
    /// Catalog client build the map was saved against.
    pub items_minor: u32,
}

impl MapHeader {
    /// Newest layout version this crate understands.
    pub const LATEST_VERSION: u32 = 2;

    /// First version that stores waypoints.
    pub const WAYPOINTS_VERSION: u32 = 2;

    #[inline]
    pub fn has_waypoints(&self) -> bool {
        self.version >= Self::WAYPOINTS_VERSION
    }
}

impl From<RawMapHeader> for MapHeader {
    fn from(raw: RawMapHeader) -> Self {
        Self {
            version: raw.version,
            width: raw.width,
            height: raw.height,
            items_major: raw.items_major,
            items_minor: raw.items_minor,
        }
    }
}
