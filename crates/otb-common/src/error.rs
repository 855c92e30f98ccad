//! Error types for otb-common.

use std::fmt;

use thiserror::Error;

/// Common error type for OTB reading operations.
#[derive(Debug, Error)]
pub enum Error {
    /// End of the property range reached while reading.
    #[error("unexpected end of node data: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnexpectedEof { .. } => ErrorKind::TruncatedInput,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

/// Coarse classification of a failed load.
///
/// Every crate's error type maps onto one of these so callers can react to
/// the category without matching on format-specific variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Structurally malformed input.
    InvalidFormat,
    /// Unsupported schema version.
    Version,
    /// The data ended before a required length was satisfied.
    TruncatedInput,
    /// A referenced item id is missing from the catalog.
    Lookup,
    /// Opening or mapping the file failed.
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidFormat => "invalid format",
            Self::Version => "unsupported version",
            Self::TruncatedInput => "truncated input",
            Self::Lookup => "lookup failed",
            Self::Io => "I/O",
        };
        f.write_str(name)
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
