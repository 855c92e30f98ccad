//! Item type records.

use crate::{ItemFlags, ItemGroup, ItemKind};

/// One entry of the item catalog.
///
/// Records are immutable once they are part of an [`ItemCatalog`](crate::ItemCatalog);
/// the catalog only hands out shared references.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemType {
    /// Server id, the catalog key.
    pub server_id: u16,
    /// Client id used for rendering.
    pub client_id: u16,
    pub name: String,
    pub description: String,
    pub weight: f64,
    pub flags: ItemFlags,
    pub group: ItemGroup,
    pub kind: ItemKind,
    pub speed: u16,
    pub max_items: u16,
    pub rotate_to: u16,
    pub read_only_id: u16,
    pub max_text_length: u16,
    pub ware_id: u16,
    pub light_level: u16,
    pub light_color: u16,
    /// Stacking order for always-on-top items.
    pub always_on_top_order: u8,
    /// Default charge count for new instances.
    pub charges: u16,
}

impl ItemType {
    /// Create a record with the given id and group; everything else default.
    pub fn new(server_id: u16, group: ItemGroup) -> Self {
        Self {
            server_id,
            group,
            ..Self::default()
        }
    }

    #[inline]
    pub fn id(&self) -> u16 {
        self.server_id
    }

    #[inline]
    pub fn has_flag(&self, flag: ItemFlags) -> bool {
        self.flags.contains(flag)
    }

    #[inline]
    pub fn is_moveable(&self) -> bool {
        self.has_flag(ItemFlags::MOVEABLE)
    }

    #[inline]
    pub fn is_stackable(&self) -> bool {
        self.has_flag(ItemFlags::STACKABLE)
    }

    #[inline]
    pub fn is_pickupable(&self) -> bool {
        self.has_flag(ItemFlags::PICKUPABLE)
    }

    #[inline]
    pub fn is_ground(&self) -> bool {
        self.group == ItemGroup::Ground
    }

    #[inline]
    pub fn is_container(&self) -> bool {
        self.group == ItemGroup::Container
    }

    #[inline]
    pub fn is_splash(&self) -> bool {
        self.group == ItemGroup::Splash
    }

    #[inline]
    pub fn is_fluid_container(&self) -> bool {
        self.group == ItemGroup::Fluid
    }
}
