//! OTB - item catalog and map decoding for OpenTibia data files.
//!
//! This crate provides a unified interface to the OTB crates.
//!
//! # Crates
//!
//! - [`otb_common`] - Escape-aware node reader, positions, diagnostics
//! - [`otb_tree`] - Node container parsing (memory-mapped or owned)
//! - [`otb_items`] - Item catalog (`items.otb`) decoding
//! - [`otb_map`] - Map (`.otbm`) decoding
//!
//! # Example
//!
//! ```no_run
//! use otb::prelude::*;
//!
//! let mut diag = LogDiagnostics::new();
//!
//! // The catalog has to outlive every map decoded against it
//! let catalog = ItemCatalog::load("items.otb", &mut diag)?;
//! let map = Map::load("world.otbm", &catalog, &mut diag)?;
//!
//! println!("{} tiles, {} towns", map.tile_count(), map.town_count());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use otb_common as common;
pub use otb_items as items;
pub use otb_map as map;
pub use otb_tree as tree;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use otb_common::{Collected, Diagnostics, ErrorKind, LogDiagnostics, NodeReader, Position, Silent};
    pub use otb_items::{CatalogVersion, ItemCatalog, ItemFlags, ItemGroup, ItemKind, ItemType};
    pub use otb_map::{CustomAttribute, House, Item, Map, MapAttributes, MapHeader, Tile, TileState, Town, Waypoint};
    pub use otb_tree::{Container, Identifier, Node};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use otb_common::testing::TreeBuilder;

    use super::prelude::*;

    fn catalog_bytes() -> Vec<u8> {
        let mut builder = TreeBuilder::new(b"OTBI");
        builder
            .start(0)
            .u32(0)
            .u8(0x01)
            .u16(140)
            .u32(3)
            .u32(57)
            .bytes(&[0; 132])
            // grass
            .start(ItemGroup::Ground as u8)
            .u32(0)
            .u8(0x10)
            .u16(2)
            .u16(102)
            .u8(0x12)
            .u16(5)
            .bytes(b"grass")
            .end()
            // torch, server id stored in the reserved band
            .start(ItemGroup::None as u8)
            .u32(ItemFlags::MOVEABLE.bits() | ItemFlags::PICKUPABLE.bits())
            .u8(0x10)
            .u16(2)
            .u16(30050)
            .end()
            .end()
            .finish()
    }

    fn map_bytes() -> Vec<u8> {
        let mut builder = TreeBuilder::new(b"OTBM");
        builder
            .start(0)
            .u32(2)
            .u16(64)
            .u16(64)
            .u32(3)
            .u32(57)
            .start(2)
            .u8(1)
            .string("end to end")
            .start(4)
            .position(32, 32, 7)
            .start(5)
            .u8(1)
            .u8(1)
            .u8(9)
            .u16(102)
            .start(6)
            .u16(50)
            .u8(15)
            .u8(3)
            .end()
            .end()
            .start(14)
            .u8(2)
            .u8(1)
            .u32(1)
            .u8(9)
            .u16(102)
            .u8(9)
            .u16(50)
            .end()
            .end()
            .start(12)
            .start(13)
            .u32(1)
            .string("Rookgaard")
            .position(33, 33, 7)
            .end()
            .end()
            .end()
            .end()
            .finish()
    }

    #[test]
    fn test_catalog_then_map() {
        let mut diag = Collected::new();
        let catalog = ItemCatalog::parse(catalog_bytes(), &mut diag).unwrap();

        assert_eq!(catalog.version(), Some(CatalogVersion { major: 3, minor: 57 }));
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get(50).unwrap().is_moveable());

        let map = Map::parse(map_bytes(), &catalog, &mut diag).unwrap();

        assert_eq!(map.attributes().descriptions, ["end to end"]);
        assert_eq!(map.town_by_name("Rookgaard").unwrap().temple, Position::new(33, 33, 7));

        let tile = map.tile(Position::new(33, 33, 7)).unwrap();
        assert_eq!(tile.ground.as_ref().unwrap().item_type().name, "grass");
        assert_eq!(tile.items.len(), 1);
        assert_eq!(tile.items[0].id(), 50);
        assert_eq!(tile.items[0].count, 3);

        let house_tile = map.tile(Position::new(34, 33, 7)).unwrap();
        assert_eq!(house_tile.house_id, Some(1));
        assert!(house_tile.items.is_empty());

        // reserved id normalization and the dropped house item
        assert_eq!(diag.warnings().count(), 2);
    }

    #[test]
    fn test_error_kinds_line_up() {
        let catalog = ItemCatalog::default();
        let err = Map::parse(catalog_bytes(), &catalog, &mut Silent).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }
}
