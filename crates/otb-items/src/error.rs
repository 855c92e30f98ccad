//! Error types for catalog decoding.

use otb_common::ErrorKind;
use thiserror::Error;

/// Errors that can occur when decoding an item catalog.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] otb_common::Error),

    /// Container loading error.
    #[error("{0}")]
    Tree(#[from] otb_tree::Error),

    /// The version block has the wrong declared length.
    #[error("invalid version block length: expected 140, got {0}")]
    InvalidVersionLength(u16),

    /// Catalog major version other than the supported one.
    #[error("old items.otb version {0} detected, a newer version is required")]
    OutdatedMajorVersion(u32),

    /// Catalog built for a client older than the minimum supported one.
    #[error("items.otb build {minor} is too old, at least {required} is required")]
    OutdatedMinorVersion { minor: u32, required: u32 },

    /// An attribute's declared length does not match its fixed size.
    #[error("invalid {attribute} attribute length: expected {expected}, got {actual}")]
    InvalidAttributeLength {
        attribute: &'static str,
        expected: u16,
        actual: u16,
    },

    /// A node type that is not a usable item group.
    #[error("invalid item group: {0}")]
    InvalidItemGroup(u8),

    /// A referenced item id is not in the catalog.
    #[error("item {0} not found in catalog")]
    UnknownItem(u16),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Common(e) => e.kind(),
            Self::Tree(e) => e.kind(),
            Self::OutdatedMajorVersion(_) | Self::OutdatedMinorVersion { .. } => ErrorKind::Version,
            Self::UnknownItem(_) => ErrorKind::Lookup,
            Self::InvalidVersionLength(_)
            | Self::InvalidAttributeLength { .. }
            | Self::InvalidItemGroup(_) => ErrorKind::InvalidFormat,
        }
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;
