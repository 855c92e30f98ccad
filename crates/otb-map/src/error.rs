//! Error types for map decoding.

use otb_common::{ErrorKind, Position};
use thiserror::Error;

/// Errors that can occur when decoding a map.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] otb_common::Error),

    /// Container loading error.
    #[error("{0}")]
    Tree(#[from] otb_tree::Error),

    /// Catalog lookup error.
    #[error("{0}")]
    Items(#[from] otb_items::Error),

    /// Version 0 maps predate the supported layout.
    #[error("this map needs to be upgraded by using the latest map editor version to be able to load correctly")]
    UpgradeRequired,

    /// Map version newer than any known layout.
    #[error("unknown OTBM version {0} detected")]
    UnknownVersion(u32),

    /// The root node does not have exactly one map data child.
    #[error("could not read map data node: found {count} root children, first of type {first:?}")]
    MissingMapData { count: usize, first: Option<u8> },

    /// Unknown tag among the map data properties.
    #[error("unknown map attribute {0}")]
    UnknownMapAttribute(u8),

    /// A node of a type that is not allowed where it appears.
    #[error("unknown {context} node type {kind}")]
    UnexpectedNode { context: &'static str, kind: u8 },

    /// Unknown tag among a tile's properties.
    #[error("unknown tile attribute {attribute} at {position}")]
    UnknownTileAttribute { attribute: u8, position: Position },

    /// Unknown tag in an item's attribute stream.
    #[error("unknown attribute {attribute} on item {item_id}")]
    UnknownItemAttribute { attribute: u8, item_id: u16 },

    /// Container contents stored as an attribute instead of child nodes.
    #[error("unexpected container items attribute on item {item_id}")]
    ContainerItems { item_id: u16 },

    /// An item node with child nodes.
    #[error("item {item_id} at {position} has nested items")]
    NestedItems { item_id: u16, position: Position },
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Common(e) => e.kind(),
            Self::Tree(e) => e.kind(),
            Self::Items(e) => e.kind(),
            Self::UpgradeRequired
            | Self::UnknownVersion(_)
            | Self::MissingMapData { .. }
            | Self::UnknownMapAttribute(_)
            | Self::UnexpectedNode { .. }
            | Self::UnknownTileAttribute { .. }
            | Self::UnknownItemAttribute { .. }
            | Self::ContainerItems { .. }
            | Self::NestedItems { .. } => ErrorKind::InvalidFormat,
        }
    }
}

/// Result type for map operations.
pub type Result<T> = std::result::Result<T, Error>;
