//! Map decoding.

use std::hash::BuildHasherDefault;
use std::path::Path;

use hashbrown::HashMap as FastHashMap;
use otb_common::{Diagnostics, Position};
use otb_items::ItemCatalog;
use otb_tree::{Container, Identifier, Node};
use rustc_hash::FxHasher;

use crate::header::RawMapHeader;
use crate::item::persistent_id;
use crate::{Error, House, Item, MapHeader, Result, Tile, TileState, Town, Waypoint};

type FxHashMap<K, V> = FastHashMap<K, V, BuildHasherDefault<FxHasher>>;

/// Node types.
mod kind {
    pub const MAP_DATA: u8 = 2;
    pub const TILE_AREA: u8 = 4;
    pub const TILE: u8 = 5;
    pub const ITEM: u8 = 6;
    pub const TOWNS: u8 = 12;
    pub const TOWN: u8 = 13;
    pub const HOUSETILE: u8 = 14;
    pub const WAYPOINTS: u8 = 15;
    pub const WAYPOINT: u8 = 16;
}

/// Property tags of map data and tile nodes.
mod attr {
    pub const DESCRIPTION: u8 = 1;
    pub const TILE_FLAGS: u8 = 3;
    pub const ITEM: u8 = 9;
    pub const EXT_SPAWN_FILE: u8 = 11;
    pub const EXT_HOUSE_FILE: u8 = 13;
}

/// Map-level properties.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapAttributes {
    /// Description lines in file order.
    pub descriptions: Vec<String>,
    /// Spawn file name, relative to the map.
    pub spawn_file: Option<String>,
    /// House file name, relative to the map.
    pub house_file: Option<String>,
}

/// A decoded map.
///
/// Items on the map borrow their types from the catalog passed to the
/// decoder, hence the lifetime.
#[derive(Debug, Clone)]
pub struct Map<'c> {
    header: MapHeader,
    attributes: MapAttributes,
    tiles: FxHashMap<Position, Tile<'c>>,
    houses: FxHashMap<u32, House>,
    towns: FxHashMap<u32, Town>,
    waypoints: FxHashMap<String, Waypoint>,
}

impl<'c> Map<'c> {
    /// Load a map file (memory-mapped).
    pub fn load<P: AsRef<Path>>(
        path: P,
        catalog: &'c ItemCatalog,
        diag: &mut dyn Diagnostics,
    ) -> Result<Self> {
        let container = Container::open(path, Identifier::OTBM)?;
        Self::from_container(&container, catalog, diag)
    }

    /// Decode a map from bytes.
    pub fn parse(data: Vec<u8>, catalog: &'c ItemCatalog, diag: &mut dyn Diagnostics) -> Result<Self> {
        let container = Container::from_bytes(data, Identifier::OTBM)?;
        Self::from_container(&container, catalog, diag)
    }

    /// Decode a map from an already loaded container.
    ///
    /// The container may be dropped afterwards; the map owns everything it
    /// holds except the item types.
    pub fn from_container(
        container: &Container,
        catalog: &'c ItemCatalog,
        diag: &mut dyn Diagnostics,
    ) -> Result<Self> {
        let root = container.root();
        let header = read_header(root, catalog, diag)?;

        let mut decoder = Decoder {
            catalog,
            diag,
            map: Map {
                header,
                attributes: MapAttributes::default(),
                tiles: FxHashMap::default(),
                houses: FxHashMap::default(),
                towns: FxHashMap::default(),
                waypoints: FxHashMap::default(),
            },
        };

        let mut children = root.children();
        let map_data = match (children.len(), children.next()) {
            (1, Some(node)) if node.kind() == kind::MAP_DATA => node,
            (count, first) => {
                return Err(Error::MissingMapData {
                    count,
                    first: first.map(|node| node.kind()),
                })
            }
        };

        decoder.read_map_data(map_data)?;
        Ok(decoder.finish())
    }

    #[inline]
    pub fn header(&self) -> &MapHeader {
        &self.header
    }

    #[inline]
    pub fn attributes(&self) -> &MapAttributes {
        &self.attributes
    }

    /// Get the tile at a position.
    pub fn tile(&self, position: Position) -> Option<&Tile<'c>> {
        self.tiles.get(&position)
    }

    /// Iterate over all tiles in no particular order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile<'c>> {
        self.tiles.values()
    }

    #[inline]
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn house(&self, id: u32) -> Option<&House> {
        self.houses.get(&id)
    }

    pub fn houses(&self) -> impl Iterator<Item = &House> {
        self.houses.values()
    }

    #[inline]
    pub fn house_count(&self) -> usize {
        self.houses.len()
    }

    pub fn town(&self, id: u32) -> Option<&Town> {
        self.towns.get(&id)
    }

    /// Find a town by exact name.
    pub fn town_by_name(&self, name: &str) -> Option<&Town> {
        self.towns.values().find(|town| town.name == name)
    }

    pub fn towns(&self) -> impl Iterator<Item = &Town> {
        self.towns.values()
    }

    #[inline]
    pub fn town_count(&self) -> usize {
        self.towns.len()
    }

    pub fn waypoint(&self, name: &str) -> Option<&Waypoint> {
        self.waypoints.get(name)
    }

    pub fn waypoints(&self) -> impl Iterator<Item = &Waypoint> {
        self.waypoints.values()
    }

    #[inline]
    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }
}

fn read_header(root: Node<'_>, catalog: &ItemCatalog, diag: &mut dyn Diagnostics) -> Result<MapHeader> {
    let header = MapHeader::from(root.reader().read_struct::<RawMapHeader>()?);

    match header.version {
        0 => return Err(Error::UpgradeRequired),
        version if version > MapHeader::LATEST_VERSION => return Err(Error::UnknownVersion(version)),
        _ => {}
    }

    if let Some(version) = catalog.version().filter(|v| !v.is_generic()) {
        if header.items_major > version.major {
            diag.warn(format_args!(
                "map was saved with items.otb major version {}, loaded catalog is {}",
                header.items_major, version.major
            ));
        }
        if header.items_minor > version.minor {
            diag.warn(format_args!(
                "this map needs an updated items.otb (build {}, loaded {})",
                header.items_minor, version.minor
            ));
        }
    }

    diag.info(format_args!("map size: {}x{}", header.width, header.height));
    Ok(header)
}

/// State of one decode pass.
struct Decoder<'c, 'd> {
    catalog: &'c ItemCatalog,
    diag: &'d mut dyn Diagnostics,
    map: Map<'c>,
}

impl<'c, 'd> Decoder<'c, 'd> {
    fn finish(self) -> Map<'c> {
        let Self { diag, map, .. } = self;
        diag.debug(format_args!(
            "decoded {} tiles, {} houses, {} towns, {} waypoints",
            map.tiles.len(),
            map.houses.len(),
            map.towns.len(),
            map.waypoints.len()
        ));
        map
    }

    fn read_map_data(&mut self, node: Node<'_>) -> Result<()> {
        let mut reader = node.reader();
        let attributes = &mut self.map.attributes;

        while !reader.is_empty() {
            match reader.read_u8()? {
                attr::DESCRIPTION => {
                    let description = reader.read_prefixed_string()?;
                    self.diag.info(format_args!("map description: {}", description));
                    attributes.descriptions.push(description);
                }
                attr::EXT_SPAWN_FILE => attributes.spawn_file = Some(reader.read_prefixed_string()?),
                attr::EXT_HOUSE_FILE => attributes.house_file = Some(reader.read_prefixed_string()?),
                unknown => return Err(Error::UnknownMapAttribute(unknown)),
            }
        }

        for child in node.children() {
            match child.kind() {
                kind::TILE_AREA => self.read_tile_area(child)?,
                kind::TOWNS => self.read_towns(child)?,
                kind::WAYPOINTS if self.map.header.has_waypoints() => self.read_waypoints(child)?,
                other => {
                    return Err(Error::UnexpectedNode {
                        context: "map",
                        kind: other,
                    })
                }
            }
        }

        Ok(())
    }

    fn read_tile_area(&mut self, node: Node<'_>) -> Result<()> {
        let origin = node.reader().read_position()?;

        for child in node.children() {
            match child.kind() {
                kind::TILE | kind::HOUSETILE => self.read_tile(child, origin)?,
                other => {
                    return Err(Error::UnexpectedNode {
                        context: "tile area",
                        kind: other,
                    })
                }
            }
        }

        Ok(())
    }

    fn read_tile(&mut self, node: Node<'_>, origin: Position) -> Result<()> {
        let mut reader = node.reader();
        let dx = reader.read_u8()?;
        let dy = reader.read_u8()?;
        let position = origin.offset(dx, dy);

        let mut tile = Tile::new(position);
        if node.kind() == kind::HOUSETILE {
            // House id 0 means no owner; such a tile loads like a plain one.
            let house_id = reader.read_u32()?;
            if house_id != 0 {
                tile.house_id = Some(house_id);
                self.map
                    .houses
                    .entry(house_id)
                    .or_insert_with(|| House::new(house_id))
                    .tiles
                    .push(position);
            }
        }

        // Ground items are only taken until the first non-ground item.
        let mut stacking = false;

        while !reader.is_empty() {
            match reader.read_u8()? {
                attr::TILE_FLAGS => tile.state |= TileState::from_raw_flags(reader.read_u32()?),
                attr::ITEM => {
                    let item = self.create_item(reader.read_u16()?)?;
                    if !self.admit(&tile, &item) {
                        continue;
                    }

                    if item.is_ground() && !stacking && tile.ground.is_none() {
                        tile.ground = Some(item);
                    } else {
                        stacking |= !item.is_ground();
                        tile.items.push(item);
                    }
                }
                unknown => {
                    return Err(Error::UnknownTileAttribute {
                        attribute: unknown,
                        position,
                    })
                }
            }
        }

        for child in node.children() {
            if child.kind() != kind::ITEM {
                return Err(Error::UnexpectedNode {
                    context: "tile",
                    kind: child.kind(),
                });
            }

            let item = self.read_item(child, position)?;
            if self.admit(&tile, &item) {
                tile.items.push(item);
            }
        }

        self.map.tiles.insert(position, tile);
        Ok(())
    }

    fn create_item(&self, id: u16) -> Result<Item<'c>> {
        let item_type = self.catalog.try_get(persistent_id(id))?;
        Ok(Item::new(item_type))
    }

    fn read_item(&mut self, node: Node<'_>, position: Position) -> Result<Item<'c>> {
        let mut reader = node.reader();
        let id = reader.read_u16()?;

        if node.has_children() {
            return Err(Error::NestedItems { item_id: id, position });
        }

        let mut item = self.create_item(id)?;
        item.read_attributes(&mut reader)?;
        Ok(item)
    }

    /// House tiles never keep moveable items.
    fn admit(&mut self, tile: &Tile<'c>, item: &Item<'c>) -> bool {
        if tile.is_house_tile() && item.is_moveable() {
            self.diag.warn(format_args!(
                "moveable item {} on house tile at {} dropped",
                item.id(),
                tile.position
            ));
            return false;
        }
        true
    }

    fn read_towns(&mut self, node: Node<'_>) -> Result<()> {
        for child in node.children() {
            if child.kind() != kind::TOWN {
                return Err(Error::UnexpectedNode {
                    context: "towns",
                    kind: child.kind(),
                });
            }

            let mut reader = child.reader();
            let id = reader.read_u32()?;
            let name = reader.read_prefixed_string()?;
            let temple = reader.read_position()?;

            self.map.towns.insert(id, Town { id, name, temple });
        }

        self.diag.info(format_args!("loaded {} towns", self.map.towns.len()));
        Ok(())
    }

    fn read_waypoints(&mut self, node: Node<'_>) -> Result<()> {
        for child in node.children() {
            if child.kind() != kind::WAYPOINT {
                return Err(Error::UnexpectedNode {
                    context: "waypoints",
                    kind: child.kind(),
                });
            }

            let mut reader = child.reader();
            let name = reader.read_prefixed_string()?;
            let position = reader.read_position()?;

            self.map
                .waypoints
                .insert(name.clone(), Waypoint { name, position });
        }

        self.diag.info(format_args!("loaded {} waypoints", self.map.waypoints.len()));
        Ok(())
    }
}
