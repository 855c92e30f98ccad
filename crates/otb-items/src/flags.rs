//! Item feature flags.

use bitflags::bitflags;

bitflags! {
    /// Feature bitmask stored at the start of every catalog item record.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ItemFlags: u32 {
        const BLOCK_SOLID = 1 << 0;
        const BLOCK_PROJECTILE = 1 << 1;
        const BLOCK_PATHFIND = 1 << 2;
        const HAS_HEIGHT = 1 << 3;
        const USEABLE = 1 << 4;
        const PICKUPABLE = 1 << 5;
        const MOVEABLE = 1 << 6;
        const STACKABLE = 1 << 7;
        const FLOOR_CHANGE_DOWN = 1 << 8;
        const FLOOR_CHANGE_NORTH = 1 << 9;
        const FLOOR_CHANGE_EAST = 1 << 10;
        const FLOOR_CHANGE_SOUTH = 1 << 11;
        const FLOOR_CHANGE_WEST = 1 << 12;
        const ALWAYS_ON_TOP = 1 << 13;
        const READABLE = 1 << 14;
        const ROTATABLE = 1 << 15;
        const HANGABLE = 1 << 16;
        const VERTICAL = 1 << 17;
        const HORIZONTAL = 1 << 18;
        const CANNOT_DECAY = 1 << 19;
        const ALLOW_DIST_READ = 1 << 20;
        const UNUSED = 1 << 21;
        /// Deprecated
        const CLIENT_CHARGES = 1 << 22;
        const LOOK_THROUGH = 1 << 23;
        const ANIMATION = 1 << 24;
        const FULL_TILE = 1 << 25;
        const FORCE_USE = 1 << 26;

        // Bits written by newer tools are kept as-is.
        const _ = !0;
    }
}
