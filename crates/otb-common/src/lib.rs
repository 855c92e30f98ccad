//! Common utilities for the OTB crates.
//!
//! This crate provides the foundational pieces shared by every OTB format:
//!
//! - [`NodeReader`] - Escape-aware reading of node property bytes
//! - [`Position`] - Map coordinate used by both maps and catalogs' consumers
//! - [`Diagnostics`] - Sink for non-fatal decode warnings
//! - [`ErrorKind`] - Coarse classification shared by every crate's error type
//! - [`marker`] - Structural marker bytes of the node container format

mod diagnostics;
mod error;
mod position;
mod reader;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use diagnostics::{Collected, Diagnostics, LogDiagnostics, Silent};
pub use error::{Error, ErrorKind, Result};
pub use position::Position;
pub use reader::NodeReader;

/// Re-export the log level used by [`Diagnostics`].
pub use log::Level;

/// Structural marker bytes shared by all OTB containers.
pub mod marker {
    /// Marks that the next byte is literal data.
    pub const ESCAPE: u8 = 0xFD;
    /// Opens a node; followed by the node's type byte.
    pub const START: u8 = 0xFE;
    /// Closes the innermost open node.
    pub const END: u8 = 0xFF;

    /// Whether a byte has to be escaped when it appears in property data.
    #[inline]
    pub const fn is_marker(byte: u8) -> bool {
        matches!(byte, ESCAPE | START | END)
    }
}
