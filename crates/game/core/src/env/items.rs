use crate::state::{EffectId, ItemId};

pub trait ItemOracle: Send + Sync {
    fn item(&self, id: ItemId) -> Option<&ItemDefinition>;
}

/// Item definition with common fields and kind-specific data.
///
/// # Stacking
///
/// All items have a `max_stack` value:
/// - Equipment: max_stack=1 (cannot stack)
/// - Consumables: stackable
/// - Keys: max_stack=1 (unique keys don't stack)
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub id: ItemId,
    pub name: String,
    pub kind: ItemKind,
    /// Effect resolved on use. Consumables without an effect cannot be used.
    #[cfg_attr(feature = "serde", serde(default))]
    pub effect: Option<EffectId>,
    pub max_stack: u32,
}

impl ItemDefinition {
    /// True when the item can be used as a combat or exploration action.
    pub fn is_usable(&self) -> bool {
        matches!(self.kind, ItemKind::Consumable) && self.effect.is_some()
    }

    pub fn equipment_bonus(&self) -> Option<EquipmentBonus> {
        match self.kind {
            ItemKind::Equipment(bonus) => Some(bonus),
            _ => None,
        }
    }
}

/// Item type with kind-specific data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    /// Consumed on use (potions, scrolls).
    Consumable,

    /// Worn gear; bonuses apply while equipped.
    Equipment(EquipmentBonus),

    /// Quest key; never used directly.
    Key,
}

/// Attribute bonuses granted by an equipped item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EquipmentBonus {
    pub defense: i32,
    pub speed: i32,
}
