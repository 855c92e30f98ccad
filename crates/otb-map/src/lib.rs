//! OTBM map decoder.
//!
//! A map is a node container with the `OTBM` identifier. The root carries
//! the [`MapHeader`]; its single map data child holds map attributes, tile
//! areas, towns and (from version 2) waypoints.
//!
//! Items are resolved against an [`ItemCatalog`](otb_items::ItemCatalog)
//! while decoding. The resulting [`Map`] borrows the catalog.
//!
//! # Example
//!
//! ```no_run
//! use otb_common::{LogDiagnostics, Position};
//! use otb_items::ItemCatalog;
//! use otb_map::Map;
//!
//! let mut diag = LogDiagnostics::new();
//! let catalog = ItemCatalog::load("items.otb", &mut diag)?;
//! let map = Map::load("world.otbm", &catalog, &mut diag)?;
//!
//! if let Some(tile) = map.tile(Position::new(1000, 1000, 7)) {
//!     for item in tile.all_items() {
//!         println!("{} ({})", item.display_name(), item.id());
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod header;
mod item;
mod map;
mod tile;
mod town;

pub use error::{Error, Result};
pub use header::MapHeader;
pub use item::{persistent_id, CustomAttribute, Item};
pub use map::{Map, MapAttributes};
pub use tile::{House, Tile, TileState};
pub use town::{Town, Waypoint};
