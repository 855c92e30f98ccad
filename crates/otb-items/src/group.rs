//! Item groups and derived item kinds.

use crate::{Error, Result};

/// Coarse item category, stored as the type byte of each catalog node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ItemGroup {
    #[default]
    None = 0,
    Ground = 1,
    Container = 2,
    /// Deprecated.
    Weapon = 3,
    /// Deprecated.
    Ammunition = 4,
    /// Deprecated.
    Armor = 5,
    Charges = 6,
    /// Deprecated.
    Teleport = 7,
    /// Deprecated.
    MagicField = 8,
    /// Deprecated.
    Writeable = 9,
    /// Deprecated.
    Key = 10,
    Splash = 11,
    Fluid = 12,
    /// Deprecated.
    Door = 13,
    Deprecated = 14,
}

impl ItemGroup {
    /// Parse from a node type byte.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Ground),
            2 => Some(Self::Container),
            3 => Some(Self::Weapon),
            4 => Some(Self::Ammunition),
            5 => Some(Self::Armor),
            6 => Some(Self::Charges),
            7 => Some(Self::Teleport),
            8 => Some(Self::MagicField),
            9 => Some(Self::Writeable),
            10 => Some(Self::Key),
            11 => Some(Self::Splash),
            12 => Some(Self::Fluid),
            13 => Some(Self::Door),
            14 => Some(Self::Deprecated),
            _ => None,
        }
    }
}

/// Item kind derived from the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    #[default]
    None,
    Depot,
    Mailbox,
    TrashHolder,
    Container,
    Door,
    MagicField,
    Teleport,
    Bed,
    Key,
    Rune,
}

impl ItemKind {
    /// Derive the kind of an item from its group.
    ///
    /// Groups that no longer occur in catalogs are rejected.
    pub fn from_group(group: ItemGroup) -> Result<Self> {
        match group {
            ItemGroup::Container => Ok(Self::Container),
            ItemGroup::Door => Ok(Self::Door),
            ItemGroup::MagicField => Ok(Self::MagicField),
            ItemGroup::Teleport => Ok(Self::Teleport),
            ItemGroup::None
            | ItemGroup::Ground
            | ItemGroup::Splash
            | ItemGroup::Fluid
            | ItemGroup::Charges
            | ItemGroup::Deprecated => Ok(Self::None),
            other => Err(Error::InvalidItemGroup(other as u8)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_round_trip() {
        for value in 0..=14u8 {
            assert_eq!(ItemGroup::from_u8(value).map(|g| g as u8), Some(value));
        }
        assert_eq!(ItemGroup::from_u8(15), None);
    }

    #[test]
    fn test_kind_from_group() {
        assert_eq!(ItemKind::from_group(ItemGroup::Container).unwrap(), ItemKind::Container);
        assert_eq!(ItemKind::from_group(ItemGroup::Teleport).unwrap(), ItemKind::Teleport);
        assert_eq!(ItemKind::from_group(ItemGroup::Ground).unwrap(), ItemKind::None);
        assert_eq!(ItemKind::from_group(ItemGroup::Fluid).unwrap(), ItemKind::None);
        assert!(matches!(
            ItemKind::from_group(ItemGroup::Weapon),
            Err(Error::InvalidItemGroup(3))
        ));
        assert!(ItemKind::from_group(ItemGroup::Key).is_err());
    }
}
