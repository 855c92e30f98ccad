//! Item catalog decoding.

use std::hash::BuildHasherDefault;
use std::path::Path;

use hashbrown::HashMap as FastHashMap;
use otb_common::{Diagnostics, NodeReader};
use otb_tree::{Container, Identifier, Node};
use rustc_hash::FxHasher;

use crate::{Error, ItemFlags, ItemGroup, ItemKind, ItemType, Result};

type FxHashMap<K, V> = FastHashMap<K, V, BuildHasherDefault<FxHasher>>;

/// Root attribute introducing the version block.
const ROOT_ATTR_VERSION: u8 = 0x01;

/// Declared length of the version block.
const VERSION_BLOCK_LEN: u16 = 140;

/// Server ids in `RESERVED_ID_BASE + 1 .. RESERVED_ID_BASE + RESERVED_ID_COUNT`
/// alias the low ids.
const RESERVED_ID_BASE: u16 = 30000;
const RESERVED_ID_COUNT: u16 = 100;

/// Names and descriptions at least this long are suspicious.
const MAX_TEXT_LENGTH: u16 = 128;

/// Item attribute tags. Every entry carries a u16 length.
mod attr {
    pub const SERVER_ID: u8 = 0x10;
    pub const CLIENT_ID: u8 = 0x11;
    pub const NAME: u8 = 0x12;
    pub const DESCRIPTION: u8 = 0x13;
    pub const SPEED: u8 = 0x14;
    pub const MAX_ITEMS: u8 = 0x16;
    pub const WEIGHT: u8 = 0x17;
    pub const ROTATE_TO: u8 = 0x1E;
    pub const SPRITE_HASH: u8 = 0x20;
    pub const MINIMAP_COLOR: u8 = 0x21;
    pub const UNKNOWN_07: u8 = 0x22;
    pub const UNKNOWN_08: u8 = 0x23;
    pub const LIGHT2: u8 = 0x2A;
    pub const TOP_ORDER: u8 = 0x2B;
    pub const WRITEABLE3: u8 = 0x2C;
    pub const WARE_ID: u8 = 0x2D;
}

/// Catalog schema version from the root version block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogVersion {
    pub major: u32,
    /// Client build number.
    pub minor: u32,
}

impl CatalogVersion {
    /// The only supported major version.
    pub const SUPPORTED_MAJOR: u32 = 3;

    /// Major version marking a catalog usable with any client.
    pub const GENERIC_MAJOR: u32 = u32::MAX;

    /// Oldest supported client build (10.98).
    pub const MIN_CLIENT_BUILD: u32 = 57;

    /// Whether this catalog is not tied to a client build.
    #[inline]
    pub fn is_generic(&self) -> bool {
        self.major == Self::GENERIC_MAJOR
    }
}

/// Item types keyed by server id.
///
/// A catalog is immutable once built and can be shared freely between map
/// loads, including across threads.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: FxHashMap<u16, ItemType>,
    version: Option<CatalogVersion>,
}

impl ItemCatalog {
    /// Build a catalog from records; later duplicates replace earlier ones.
    pub fn new<I: IntoIterator<Item = ItemType>>(items: I, version: Option<CatalogVersion>) -> Self {
        Self {
            items: items.into_iter().map(|item| (item.server_id, item)).collect(),
            version,
        }
    }

    /// Load a catalog file (memory-mapped).
    pub fn load<P: AsRef<Path>>(path: P, diag: &mut dyn Diagnostics) -> Result<Self> {
        let container = Container::open(path, Identifier::OTBI)?;
        Self::from_container(&container, diag)
    }

    /// Decode a catalog from bytes.
    pub fn parse(data: Vec<u8>, diag: &mut dyn Diagnostics) -> Result<Self> {
        let container = Container::from_bytes(data, Identifier::OTBI)?;
        Self::from_container(&container, diag)
    }

    /// Decode a catalog from an already loaded container.
    pub fn from_container(container: &Container, diag: &mut dyn Diagnostics) -> Result<Self> {
        let root = container.root();
        let mut reader = root.reader();

        let _flags = reader.read_u32()?;
        let version = match reader.read_u8()? {
            ROOT_ATTR_VERSION => Some(Self::read_version(&mut reader)?),
            _ => None,
        };
        Self::check_version(version, diag)?;

        let mut items = FxHashMap::default();
        items.reserve(root.child_count());

        for node in root.children() {
            let item = Self::read_item(node, diag)?;
            items.insert(item.server_id, item);
        }

        diag.debug(format_args!("loaded {} item types", items.len()));

        Ok(Self { items, version })
    }

    fn read_version(reader: &mut NodeReader<'_>) -> Result<CatalogVersion> {
        let length = reader.read_u16()?;
        if length != VERSION_BLOCK_LEN {
            return Err(Error::InvalidVersionLength(length));
        }

        let major = reader.read_u32()?;
        let minor = reader.read_u32()?;
        // Remaining bytes hold the CSD version string.
        reader.skip(VERSION_BLOCK_LEN as usize - 2 * std::mem::size_of::<u32>())?;

        Ok(CatalogVersion { major, minor })
    }

    fn check_version(version: Option<CatalogVersion>, diag: &mut dyn Diagnostics) -> Result<()> {
        let Some(version) = version else {
            diag.warn(format_args!("items.otb has no version block, treating it as generic"));
            return Ok(());
        };

        if version.is_generic() {
            diag.warn(format_args!("items.otb using generic client version"));
        } else if version.major != CatalogVersion::SUPPORTED_MAJOR {
            return Err(Error::OutdatedMajorVersion(version.major));
        } else if version.minor < CatalogVersion::MIN_CLIENT_BUILD {
            return Err(Error::OutdatedMinorVersion {
                minor: version.minor,
                required: CatalogVersion::MIN_CLIENT_BUILD,
            });
        }

        Ok(())
    }

    fn read_item(node: Node<'_>, diag: &mut dyn Diagnostics) -> Result<ItemType> {
        let group = ItemGroup::from_u8(node.kind()).ok_or(Error::InvalidItemGroup(node.kind()))?;
        let kind = ItemKind::from_group(group)?;

        let mut reader = node.reader();
        let mut item = ItemType {
            flags: ItemFlags::from_bits_retain(reader.read_u32()?),
            group,
            kind,
            ..ItemType::default()
        };

        while !reader.is_empty() {
            let attribute = reader.read_u8()?;
            let length = reader.read_u16()?;

            match attribute {
                attr::SERVER_ID => {
                    expect_length("server id", length, 2)?;
                    item.server_id = normalize_server_id(reader.read_u16()?, diag);
                }
                attr::CLIENT_ID => {
                    expect_length("client id", length, 2)?;
                    item.client_id = reader.read_u16()?;
                }
                attr::NAME => {
                    if length >= MAX_TEXT_LENGTH {
                        diag.warn(format_args!("unexpected item name length: {}", length));
                    }
                    item.name = reader.read_string(length as usize)?;
                }
                attr::DESCRIPTION => {
                    if length >= MAX_TEXT_LENGTH {
                        diag.warn(format_args!("unexpected item description length: {}", length));
                    }
                    item.description = reader.read_string(length as usize)?;
                }
                attr::SPEED => {
                    expect_length("speed", length, 2)?;
                    item.speed = reader.read_u16()?;
                }
                attr::MAX_ITEMS => {
                    expect_length("max items", length, 2)?;
                    item.max_items = reader.read_u16()?;
                }
                attr::WEIGHT => {
                    expect_length("weight", length, 8)?;
                    item.weight = reader.read_f64()?;
                }
                attr::ROTATE_TO => {
                    expect_length("rotate to", length, 2)?;
                    item.rotate_to = reader.read_u16()?;
                }
                attr::LIGHT2 => {
                    expect_length("light", length, 4)?;
                    item.light_level = reader.read_u16()?;
                    item.light_color = reader.read_u16()?;
                }
                attr::TOP_ORDER => {
                    expect_length("top order", length, 1)?;
                    item.always_on_top_order = reader.read_u8()?;
                }
                attr::WRITEABLE3 => {
                    expect_length("writeable", length, 4)?;
                    item.read_only_id = reader.read_u16()?;
                    item.max_text_length = reader.read_u16()?;
                }
                attr::WARE_ID => {
                    expect_length("ware id", length, 2)?;
                    item.ware_id = reader.read_u16()?;
                }
                attr::SPRITE_HASH | attr::MINIMAP_COLOR | attr::UNKNOWN_07 | attr::UNKNOWN_08 => {
                    reader.skip(length as usize)?;
                }
                unknown => {
                    diag.warn(format_args!(
                        "unknown item attribute {} length {} (server id {}, client id {})",
                        unknown, length, item.server_id, item.client_id
                    ));
                    reader.skip(length as usize)?;
                }
            }
        }

        Ok(item)
    }

    /// Catalog version, if the file carried a version block.
    #[inline]
    pub fn version(&self) -> Option<CatalogVersion> {
        self.version
    }

    /// Get an item type by server id.
    #[inline]
    pub fn get(&self, id: u16) -> Option<&ItemType> {
        self.items.get(&id)
    }

    /// Get an item type by server id, failing if it is missing.
    pub fn try_get(&self, id: u16) -> Result<&ItemType> {
        self.get(id).ok_or(Error::UnknownItem(id))
    }

    /// Whether the catalog has an entry for this id.
    #[inline]
    pub fn contains(&self, id: u16) -> bool {
        self.items.contains_key(&id)
    }

    /// Number of item types.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over all item types in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemType> {
        self.items.values()
    }
}

impl FromIterator<ItemType> for ItemCatalog {
    fn from_iter<I: IntoIterator<Item = ItemType>>(iter: I) -> Self {
        Self::new(iter, None)
    }
}

fn expect_length(attribute: &'static str, actual: u16, expected: u16) -> Result<()> {
    if actual != expected {
        return Err(Error::InvalidAttributeLength {
            attribute,
            expected,
            actual,
        });
    }
    Ok(())
}

fn normalize_server_id(id: u16, diag: &mut dyn Diagnostics) -> u16 {
    if id > RESERVED_ID_BASE && id < RESERVED_ID_BASE + RESERVED_ID_COUNT {
        let normalized = id - RESERVED_ID_BASE;
        diag.warn(format_args!("reserved server id {} mapped to {}", id, normalized));
        normalized
    } else {
        id
    }
}
