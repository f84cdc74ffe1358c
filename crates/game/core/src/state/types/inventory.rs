//! Ordered inventory owned by the player.
//!
//! Each item id occupies at most one slot; the slot's count is the stack size.
//! Slots whose count reaches 0 are removed.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::state::ItemId;

/// Inventory slot containing an item and its stack count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventorySlot {
    pub item: ItemId,
    pub count: u32,
    /// Equipment only: whether the item's bonuses currently apply.
    pub equipped: bool,
}

impl InventorySlot {
    pub fn new(item: ItemId, count: u32) -> Self {
        Self {
            item,
            count,
            equipped: false,
        }
    }
}

/// Errors raised by inventory bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InventoryError {
    #[error("inventory is full")]
    Full,

    #[error("{item} is not in the inventory")]
    Missing { item: ItemId },

    #[error("{item}: requested {requested}, holding {held}")]
    NotEnough {
        item: ItemId,
        requested: u32,
        held: u32,
    },

    #[error("{item} is already at its stack limit")]
    StackLimit { item: ItemId },
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventoryState {
    slots: ArrayVec<InventorySlot, { GameConfig::MAX_INVENTORY_SLOTS }>,
}

impl InventoryState {
    pub fn empty() -> Self {
        Self {
            slots: ArrayVec::new(),
        }
    }

    pub fn slot(&self, item: ItemId) -> Option<&InventorySlot> {
        self.slots.iter().find(|slot| slot.item == item)
    }

    fn slot_mut(&mut self, item: ItemId) -> Option<&mut InventorySlot> {
        self.slots.iter_mut().find(|slot| slot.item == item)
    }

    /// Stack count held for `item` (0 when absent).
    pub fn count(&self, item: ItemId) -> u32 {
        self.slot(item).map_or(0, |slot| slot.count)
    }

    /// Adds up to `count` items, respecting `max_stack`.
    ///
    /// Returns the number actually added. Fails when nothing can be added.
    pub fn add(&mut self, item: ItemId, count: u32, max_stack: u32) -> Result<u32, InventoryError> {
        if count == 0 {
            return Ok(0);
        }

        if let Some(slot) = self.slot_mut(item) {
            let room = max_stack.saturating_sub(slot.count);
            if room == 0 {
                return Err(InventoryError::StackLimit { item });
            }
            let added = count.min(room);
            slot.count += added;
            return Ok(added);
        }

        let added = count.min(max_stack.max(1));
        self.slots
            .try_push(InventorySlot::new(item, added))
            .map_err(|_| InventoryError::Full)?;
        Ok(added)
    }

    /// Removes `count` items, dropping the slot when it empties.
    pub fn remove(&mut self, item: ItemId, count: u32) -> Result<(), InventoryError> {
        let index = self
            .slots
            .iter()
            .position(|slot| slot.item == item)
            .ok_or(InventoryError::Missing { item })?;

        let held = self.slots[index].count;
        if held < count {
            return Err(InventoryError::NotEnough {
                item,
                requested: count,
                held,
            });
        }

        self.slots[index].count = held - count;
        if self.slots[index].count == 0 {
            self.slots.remove(index);
        }
        Ok(())
    }

    pub fn set_equipped(&mut self, item: ItemId, equipped: bool) -> Result<(), InventoryError> {
        let slot = self.slot_mut(item).ok_or(InventoryError::Missing { item })?;
        slot.equipped = equipped;
        Ok(())
    }

    /// Equipped slots in inventory order.
    pub fn equipped(&self) -> impl Iterator<Item = &InventorySlot> {
        self.slots.iter().filter(|slot| slot.equipped)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InventorySlot> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
