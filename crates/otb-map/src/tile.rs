//! Tiles and houses.

use bitflags::bitflags;
use otb_common::Position;

use crate::Item;

/// Zone flags as stored in a tile's flags attribute.
mod raw_flags {
    pub const PROTECTION_ZONE: u32 = 1 << 0;
    pub const NO_PVP: u32 = 1 << 2;
    pub const NO_LOGOUT: u32 = 1 << 3;
    pub const PVP_ZONE: u32 = 1 << 4;
}

bitflags! {
    /// Runtime state of a tile.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TileState: u32 {
        const PROTECTION_ZONE = 1 << 7;
        const NO_PVP_ZONE = 1 << 8;
        const NO_LOGOUT = 1 << 9;
        const PVP_ZONE = 1 << 10;
    }
}

impl TileState {
    /// Translate stored tile flags.
    ///
    /// A tile has at most one combat zone; protection beats no-pvp, which
    /// beats pvp. No-logout combines with any of them.
    pub fn from_raw_flags(flags: u32) -> Self {
        let mut state = if flags & raw_flags::PROTECTION_ZONE != 0 {
            Self::PROTECTION_ZONE
        } else if flags & raw_flags::NO_PVP != 0 {
            Self::NO_PVP_ZONE
        } else if flags & raw_flags::PVP_ZONE != 0 {
            Self::PVP_ZONE
        } else {
            Self::empty()
        };

        if flags & raw_flags::NO_LOGOUT != 0 {
            state |= Self::NO_LOGOUT;
        }
        state
    }
}

/// One map tile.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile<'c> {
    pub position: Position,
    pub ground: Option<Item<'c>>,
    /// Items above the ground, bottom first.
    pub items: Vec<Item<'c>>,
    pub state: TileState,
    /// Owning house for house tiles.
    pub house_id: Option<u32>,
}

impl<'c> Tile<'c> {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            ground: None,
            items: Vec::new(),
            state: TileState::empty(),
            house_id: None,
        }
    }

    #[inline]
    pub fn is_house_tile(&self) -> bool {
        self.house_id.is_some()
    }

    /// Number of items including the ground.
    pub fn item_count(&self) -> usize {
        self.items.len() + usize::from(self.ground.is_some())
    }

    /// Ground first, then the stack.
    pub fn all_items(&self) -> impl Iterator<Item = &Item<'c>> {
        self.ground.iter().chain(self.items.iter())
    }
}

/// A house and the tiles it owns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct House {
    pub id: u32,
    /// Tile positions in file order.
    pub tiles: Vec<Position>,
}

impl House {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            tiles: Vec::new(),
        }
    }
}
