//! Towns and waypoints.

use otb_common::Position;

/// A town and its temple.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Town {
    pub id: u32,
    pub name: String,
    /// Where players of this town respawn.
    pub temple: Position,
}

/// A named position.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    pub name: String,
    pub position: Position,
}
