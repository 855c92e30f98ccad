//! Item instances placed on the map.

use std::hash::BuildHasherDefault;

use hashbrown::HashMap as FastHashMap;
use otb_common::NodeReader;
use otb_items::ItemType;
use rustc_hash::FxHasher;

use crate::{Error, Result};

type FxHashMap<K, V> = FastHashMap<K, V, BuildHasherDefault<FxHasher>>;

/// Item attribute tags. Payload sizes are implied by the tag.
mod attr {
    pub const ACTION_ID: u8 = 4;
    pub const UNIQUE_ID: u8 = 5;
    pub const TEXT: u8 = 6;
    pub const DESC: u8 = 7;
    pub const TELE_DEST: u8 = 8;
    pub const DEPOT_ID: u8 = 10;
    pub const RUNE_CHARGES: u8 = 12;
    pub const HOUSEDOORID: u8 = 14;
    pub const COUNT: u8 = 15;
    pub const DURATION: u8 = 16;
    pub const DECAYING_STATE: u8 = 17;
    pub const WRITTENDATE: u8 = 18;
    pub const WRITTENBY: u8 = 19;
    pub const SLEEPERGUID: u8 = 20;
    pub const SLEEPSTART: u8 = 21;
    pub const CHARGES: u8 = 22;
    pub const CONTAINER_ITEMS: u8 = 23;
    pub const NAME: u8 = 24;
    pub const ARTICLE: u8 = 25;
    pub const PLURALNAME: u8 = 26;
    pub const WEIGHT: u8 = 27;
    pub const ATTACK: u8 = 28;
    pub const DEFENSE: u8 = 29;
    pub const EXTRADEFENSE: u8 = 30;
    pub const ARMOR: u8 = 31;
    pub const HITCHANCE: u8 = 32;
    pub const SHOOTRANGE: u8 = 33;
    pub const CUSTOM_ATTRIBUTES: u8 = 34;
    pub const DECAYTO: u8 = 35;
    pub const WRAPID: u8 = 36;
    pub const STOREITEM: u8 = 37;
}

/// Value kinds of custom attributes.
mod custom_kind {
    pub const STRING: u8 = 1;
    pub const INTEGER: u8 = 2;
    pub const FLOAT: u8 = 3;
    pub const BOOLEAN: u8 = 4;
}

/// Map a PVP field or wall id to its persistent counterpart.
///
/// Maps never store the combat variants; any that were saved are replaced
/// by the non-damaging version on load.
pub fn persistent_id(id: u16) -> u16 {
    match id {
        1487 => 1492,
        1488 => 1493,
        1489 => 1494,
        1491 => 1495,
        1490 => 1496,
        1497 => 1498,
        1499 => 2721,
        other => other,
    }
}

/// Value of a script-defined item attribute.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CustomAttribute {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

/// One item on a tile.
///
/// The item borrows its [`ItemType`] from the catalog the map was decoded
/// with, so the catalog has to outlive the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Item<'c> {
    item_type: &'c ItemType,
    pub fluid_type: u8,
    pub count: u8,
    pub charges: u16,
    pub action_id: u16,
    pub unique_id: u16,
    pub text: Option<String>,
    pub written_by: Option<String>,
    /// Unix timestamp of the last edit.
    pub written_date: u32,
    pub description: Option<String>,
    pub name: Option<String>,
    pub article: Option<String>,
    pub plural_name: Option<String>,
    pub weight: Option<u32>,
    pub attack: Option<i32>,
    pub defense: Option<i32>,
    pub extra_defense: Option<i32>,
    pub armor: Option<i32>,
    pub hit_chance: Option<u8>,
    pub shoot_range: Option<u8>,
    /// Remaining decay time in milliseconds, never negative.
    pub duration: Option<i32>,
    pub decay_to: Option<i32>,
    pub wrap_id: Option<u16>,
    pub store_item: bool,
    /// Custom attributes; `None` when the stored kind was not recognized.
    pub custom_attributes: FxHashMap<String, Option<CustomAttribute>>,
}

impl<'c> Item<'c> {
    /// Create an item of the given type with default runtime state.
    pub fn new(item_type: &'c ItemType) -> Self {
        Self {
            item_type,
            fluid_type: 0,
            count: 1,
            charges: item_type.charges,
            action_id: 0,
            unique_id: 0,
            text: None,
            written_by: None,
            written_date: 0,
            description: None,
            name: None,
            article: None,
            plural_name: None,
            weight: None,
            attack: None,
            defense: None,
            extra_defense: None,
            armor: None,
            hit_chance: None,
            shoot_range: None,
            duration: None,
            decay_to: None,
            wrap_id: None,
            store_item: false,
            custom_attributes: FxHashMap::default(),
        }
    }

    /// The catalog record of this item.
    #[inline]
    pub fn item_type(&self) -> &'c ItemType {
        self.item_type
    }

    /// Server id of this item.
    #[inline]
    pub fn id(&self) -> u16 {
        self.item_type.server_id
    }

    #[inline]
    pub fn is_ground(&self) -> bool {
        self.item_type.is_ground()
    }

    #[inline]
    pub fn is_moveable(&self) -> bool {
        self.item_type.is_moveable()
    }

    /// Name override if present, otherwise the catalog name.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.item_type.name)
    }

    /// Store a subtype byte in the field its type gives it meaning for.
    pub fn set_subtype(&mut self, value: u8) {
        let item_type = self.item_type;
        if item_type.is_fluid_container() || item_type.is_splash() {
            self.fluid_type = value;
        } else if item_type.is_stackable() {
            self.count = value;
        } else if item_type.charges != 0 {
            self.charges = value as u16;
        } else {
            self.count = value;
        }
    }

    /// Current subtype value, read back through the same rule.
    pub fn subtype(&self) -> u16 {
        let item_type = self.item_type;
        if item_type.is_fluid_container() || item_type.is_splash() {
            self.fluid_type as u16
        } else if item_type.is_stackable() {
            self.count as u16
        } else if item_type.charges != 0 {
            self.charges
        } else {
            self.count as u16
        }
    }

    /// Read attributes until the reader is exhausted.
    pub(crate) fn read_attributes(&mut self, reader: &mut NodeReader<'_>) -> Result<()> {
        while !reader.is_empty() {
            let attribute = reader.read_u8()?;
            self.read_attribute(attribute, reader)?;
        }
        Ok(())
    }

    fn read_attribute(&mut self, attribute: u8, reader: &mut NodeReader<'_>) -> Result<()> {
        match attribute {
            attr::ACTION_ID => self.action_id = reader.read_u16()?,
            attr::UNIQUE_ID => self.unique_id = reader.read_u16()?,
            attr::TEXT => self.text = Some(reader.read_prefixed_string()?),
            attr::DESC => self.description = Some(reader.read_prefixed_string()?),
            // Position of a teleport target; teleports are not modelled.
            attr::TELE_DEST => reader.skip(5)?,
            attr::DEPOT_ID => reader.skip(2)?,
            attr::HOUSEDOORID => reader.skip(1)?,
            attr::SLEEPERGUID | attr::SLEEPSTART => reader.skip(4)?,
            attr::RUNE_CHARGES | attr::COUNT | attr::CHARGES => {
                let value = reader.read_u8()?;
                self.set_subtype(value);
            }
            attr::DURATION => self.duration = Some(reader.read_i32()?.max(0)),
            attr::DECAYING_STATE => {
                reader.read_u8()?;
            }
            attr::WRITTENDATE => self.written_date = reader.read_u32()?,
            attr::WRITTENBY => self.written_by = Some(reader.read_prefixed_string()?),
            attr::CONTAINER_ITEMS => return Err(Error::ContainerItems { item_id: self.id() }),
            attr::NAME => self.name = Some(reader.read_prefixed_string()?),
            attr::ARTICLE => self.article = Some(reader.read_prefixed_string()?),
            attr::PLURALNAME => self.plural_name = Some(reader.read_prefixed_string()?),
            attr::WEIGHT => self.weight = Some(reader.read_u32()?),
            attr::ATTACK => self.attack = Some(reader.read_i32()?),
            attr::DEFENSE => self.defense = Some(reader.read_i32()?),
            attr::EXTRADEFENSE => self.extra_defense = Some(reader.read_i32()?),
            attr::ARMOR => self.armor = Some(reader.read_i32()?),
            attr::HITCHANCE => self.hit_chance = Some(reader.read_u8()?),
            attr::SHOOTRANGE => self.shoot_range = Some(reader.read_u8()?),
            attr::CUSTOM_ATTRIBUTES => self.read_custom_attributes(reader)?,
            attr::DECAYTO => self.decay_to = Some(reader.read_i32()?),
            attr::WRAPID => self.wrap_id = Some(reader.read_u16()?),
            attr::STOREITEM => self.store_item = reader.read_u8()? != 0,
            unknown => {
                return Err(Error::UnknownItemAttribute {
                    attribute: unknown,
                    item_id: self.id(),
                })
            }
        }
        Ok(())
    }

    fn read_custom_attributes(&mut self, reader: &mut NodeReader<'_>) -> Result<()> {
        // The count is untrusted; a bogus one runs into the end of the node.
        let count = reader.read_u64()?;
        for _ in 0..count {
            let key = reader.read_prefixed_string()?;
            let value = match reader.read_u8()? {
                custom_kind::STRING => Some(CustomAttribute::String(reader.read_prefixed_string()?)),
                custom_kind::INTEGER => Some(CustomAttribute::Integer(reader.read_i64()?)),
                custom_kind::FLOAT => Some(CustomAttribute::Float(reader.read_f64()?)),
                custom_kind::BOOLEAN => Some(CustomAttribute::Boolean(reader.read_bool()?)),
                _ => None,
            };
            self.custom_attributes.insert(key, value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use otb_common::testing::TreeBuilder;
    use otb_common::ErrorKind;
    use otb_items::{ItemFlags, ItemGroup};

    use super::*;

    /// Escaped attribute bytes written by `build`.
    fn stream(build: impl FnOnce(&mut TreeBuilder)) -> Vec<u8> {
        let mut builder = TreeBuilder::bare();
        build(&mut builder);
        builder.finish()
    }

    fn decode<'c>(item_type: &'c ItemType, data: &[u8]) -> Result<Item<'c>> {
        let mut item = Item::new(item_type);
        item.read_attributes(&mut NodeReader::new(data))?;
        Ok(item)
    }

    #[test]
    fn test_persistent_ids() {
        assert_eq!(persistent_id(1487), 1492);
        assert_eq!(persistent_id(1488), 1493);
        assert_eq!(persistent_id(1489), 1494);
        assert_eq!(persistent_id(1490), 1496);
        assert_eq!(persistent_id(1491), 1495);
        assert_eq!(persistent_id(1497), 1498);
        assert_eq!(persistent_id(1499), 2721);
        assert_eq!(persistent_id(1492), 1492);
        assert_eq!(persistent_id(100), 100);
    }

    #[test]
    fn test_subtype_routing() {
        let fluid = ItemType::new(1, ItemGroup::Fluid);
        let splash = ItemType::new(2, ItemGroup::Splash);
        let stackable = ItemType {
            flags: ItemFlags::STACKABLE,
            ..ItemType::new(3, ItemGroup::None)
        };
        let charged = ItemType {
            charges: 5,
            ..ItemType::new(4, ItemGroup::Charges)
        };
        let plain = ItemType::new(5, ItemGroup::None);

        let mut item = Item::new(&fluid);
        item.set_subtype(7);
        assert_eq!((item.fluid_type, item.count), (7, 1));

        let mut item = Item::new(&splash);
        item.set_subtype(2);
        assert_eq!(item.fluid_type, 2);

        let mut item = Item::new(&stackable);
        item.set_subtype(25);
        assert_eq!(item.count, 25);

        let mut item = Item::new(&charged);
        assert_eq!(item.charges, 5);
        item.set_subtype(3);
        assert_eq!((item.charges, item.count), (3, 1));
        assert_eq!(item.subtype(), 3);

        let mut item = Item::new(&plain);
        item.set_subtype(9);
        assert_eq!(item.count, 9);
    }

    #[test]
    fn test_read_attributes() {
        let sign = ItemType::new(1, ItemGroup::None);
        let data = stream(|b| {
            b.u8(attr::ACTION_ID)
                .u16(1000)
                .u8(attr::UNIQUE_ID)
                .u16(2000)
                .u8(attr::TEXT)
                .string("hello")
                .u8(attr::WRITTENBY)
                .string("Someone")
                .u8(attr::WRITTENDATE)
                .u32(1_600_000_000)
                .u8(attr::TELE_DEST)
                .position(100, 100, 7)
                .u8(attr::DEPOT_ID)
                .u16(1)
                .u8(attr::HOUSEDOORID)
                .u8(3)
                .u8(attr::DECAYING_STATE)
                .u8(1)
                .u8(attr::ARMOR)
                .i32(-2)
                .u8(attr::HITCHANCE)
                .u8(90)
                .u8(attr::WRAPID)
                .u16(0xFEFF)
                .u8(attr::STOREITEM)
                .u8(1);
        });

        let item = decode(&sign, &data).unwrap();

        assert_eq!(item.action_id, 1000);
        assert_eq!(item.unique_id, 2000);
        assert_eq!(item.text.as_deref(), Some("hello"));
        assert_eq!(item.written_by.as_deref(), Some("Someone"));
        assert_eq!(item.written_date, 1_600_000_000);
        assert_eq!(item.armor, Some(-2));
        assert_eq!(item.hit_chance, Some(90));
        assert_eq!(item.wrap_id, Some(0xFEFF));
        assert!(item.store_item);
    }

    #[test]
    fn test_negative_duration_clamped() {
        let torch = ItemType::new(1, ItemGroup::None);
        let data = stream(|b| {
            b.u8(attr::DURATION).i32(-500);
        });

        assert_eq!(decode(&torch, &data).unwrap().duration, Some(0));
    }

    #[test]
    fn test_overrides() {
        let sword = ItemType {
            name: "sword".into(),
            ..ItemType::new(1, ItemGroup::None)
        };
        let plain = decode(&sword, &[]).unwrap();
        assert_eq!(plain.display_name(), "sword");

        let data = stream(|b| {
            b.u8(attr::NAME)
                .string("blade")
                .u8(attr::ARTICLE)
                .string("a")
                .u8(attr::PLURALNAME)
                .string("blades")
                .u8(attr::ATTACK)
                .i32(30)
                .u8(attr::DEFENSE)
                .i32(20)
                .u8(attr::EXTRADEFENSE)
                .i32(1)
                .u8(attr::WEIGHT)
                .u32(3500);
        });
        let item = decode(&sword, &data).unwrap();

        assert_eq!(item.display_name(), "blade");
        assert_eq!(item.article.as_deref(), Some("a"));
        assert_eq!(item.plural_name.as_deref(), Some("blades"));
        assert_eq!((item.attack, item.defense, item.extra_defense), (Some(30), Some(20), Some(1)));
        assert_eq!(item.weight, Some(3500));
    }

    #[test]
    fn test_custom_attributes() {
        let chest = ItemType::new(1, ItemGroup::Container);
        let data = stream(|b| {
            b.u8(attr::CUSTOM_ATTRIBUTES)
                .u64(4)
                .string("owner")
                .u8(custom_kind::STRING)
                .string("Eve")
                .string("level")
                .u8(custom_kind::INTEGER)
                .i64(-8)
                .string("ratio")
                .u8(custom_kind::FLOAT)
                .f64(0.5)
                .string("locked")
                .u8(custom_kind::BOOLEAN)
                .u8(1);
        });

        let item = decode(&chest, &data).unwrap();
        let custom = &item.custom_attributes;

        assert_eq!(custom.len(), 4);
        assert_eq!(custom["owner"], Some(CustomAttribute::String("Eve".into())));
        assert_eq!(custom["level"], Some(CustomAttribute::Integer(-8)));
        assert_eq!(custom["ratio"], Some(CustomAttribute::Float(0.5)));
        assert_eq!(custom["locked"], Some(CustomAttribute::Boolean(true)));
    }

    #[test]
    fn test_unknown_custom_kind_is_unset() {
        let chest = ItemType::new(1, ItemGroup::Container);
        let data = stream(|b| {
            b.u8(attr::CUSTOM_ATTRIBUTES)
                .u64(1)
                .string("mystery")
                .u8(9)
                .u8(attr::ACTION_ID)
                .u16(7);
        });

        let item = decode(&chest, &data).unwrap();

        assert_eq!(item.custom_attributes.get("mystery"), Some(&None));
        assert_eq!(item.action_id, 7);
    }

    #[test]
    fn test_unknown_attribute_fails() {
        let plain = ItemType::new(42, ItemGroup::None);
        let data = stream(|b| {
            b.u8(99);
        });

        let err = decode(&plain, &data).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownItemAttribute {
                attribute: 99,
                item_id: 42
            }
        ));
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_container_items_attribute_fails() {
        let bag = ItemType::new(1987, ItemGroup::Container);
        let data = stream(|b| {
            b.u8(attr::CONTAINER_ITEMS).u32(0);
        });

        let err = decode(&bag, &data).unwrap_err();
        assert!(matches!(err, Error::ContainerItems { item_id: 1987 }));
    }

    #[test]
    fn test_truncated_attribute() {
        let plain = ItemType::new(1, ItemGroup::None);
        let data = stream(|b| {
            b.u8(attr::ACTION_ID).u8(1);
        });

        let err = decode(&plain, &data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
    }
}
