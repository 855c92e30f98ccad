//! Error types for container loading and tree parsing.

use otb_common::ErrorKind;
use thiserror::Error;

use crate::Identifier;

/// Errors that can occur when loading an OTB container.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] otb_common::Error),

    /// The file does not start with the expected identifier.
    #[error("invalid identifier: expected {expected}, got {actual:02X?}")]
    InvalidIdentifier { expected: Identifier, actual: Vec<u8> },

    /// The node stream does not begin with a START marker.
    #[error("invalid first byte: expected node start, got {found:02X?}")]
    MissingRoot { found: Option<u8> },

    /// The stream ends directly after a START marker.
    #[error("stream ends after node start at offset {offset}")]
    TruncatedStart { offset: usize },

    /// The stream ends directly after an ESCAPE byte.
    #[error("stream ends after escape byte at offset {offset}")]
    TruncatedEscape { offset: usize },

    /// An END marker with no open node.
    #[error("node end at offset {offset} without an open node")]
    UnexpectedEnd { offset: usize },

    /// A START marker after the root node was closed.
    #[error("node start at offset {offset} after the root node was closed")]
    UnexpectedStart { offset: usize },

    /// Input ended with nodes still open.
    #[error("stream ended with {open} unterminated node(s)")]
    UnterminatedNodes { open: usize },
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::Io,
            Self::Common(e) => e.kind(),
            _ => ErrorKind::InvalidFormat,
        }
    }
}

/// Result type for container operations.
pub type Result<T> = std::result::Result<T, Error>;
