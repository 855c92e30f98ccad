//! Item type catalog (`items.otb`) decoder.
//!
//! The catalog maps server item ids to [`ItemType`] records: flags, group,
//! names, light and a handful of fixed-size properties. Maps reference item
//! types by server id, so a catalog has to be loaded before any map.
//!
//! # Example
//!
//! ```no_run
//! use otb_common::LogDiagnostics;
//! use otb_items::ItemCatalog;
//!
//! let catalog = ItemCatalog::load("items.otb", &mut LogDiagnostics::new())?;
//!
//! if let Some(bag) = catalog.get(1987) {
//!     println!("{} weighs {}", bag.name, bag.weight);
//! }
//! # Ok::<(), otb_items::Error>(())
//! ```

mod catalog;
mod error;
mod flags;
mod group;
mod item_type;

pub use catalog::{CatalogVersion, ItemCatalog};
pub use error::{Error, Result};
pub use flags::ItemFlags;
pub use group::{ItemGroup, ItemKind};
pub use item_type::ItemType;
