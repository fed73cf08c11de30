//! Battle reward rolls and the inventory port they feed.

use serde::{Deserialize, Serialize};

use crate::content::ContentProvider;
use crate::items::{ItemInstance, ItemRoller};
use crate::rng::RandomSource;

/// Roll loot for a completed battle.
///
/// One draw against the drop chance decides whether anything drops; a
/// second, independent draw against the tier's bonus chance may add a
/// second item. Returns zero, one or two items and never fails.
pub fn grant_battle_rewards(
    battle: usize,
    tier: usize,
    content: &dyn ContentProvider,
    rng: &mut dyn RandomSource,
    roller: &mut dyn ItemRoller,
) -> Vec<ItemInstance> {
    let mut drops = Vec::new();

    let drop_chance = content.drop_chance(battle, tier);
    if rng.next_f64() > drop_chance {
        return drops;
    }

    drops.extend(roller.roll_item(rng));

    let bonus_chance = content.bonus_drop_chance(tier);
    if bonus_chance > 0.0 && rng.next_f64() < bonus_chance {
        drops.extend(roller.roll_item(rng));
    }

    drops
}

/// Where granted loot goes. Returns `false` when the item does not fit.
pub trait LootSink {
    /// Try to store `item`.
    fn try_add(&mut self, item: ItemInstance) -> bool;
}

/// Capacity-bounded inventory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LootBag {
    capacity: usize,
    items: Vec<ItemInstance>,
}

impl LootBag {
    /// Create an empty bag holding at most `capacity` items.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: Vec::new(),
        }
    }

    /// Maximum number of items.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Items held.
    #[must_use]
    pub fn items(&self) -> &[ItemInstance] {
        &self.items
    }

    /// Number of items held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the bag holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether another item would be rejected.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Take an item out by uid.
    pub fn remove(&mut self, uid: u64) -> Option<ItemInstance> {
        let index = self.items.iter().position(|i| i.uid == uid)?;
        Some(self.items.remove(index))
    }
}

impl LootSink for LootBag {
    fn try_add(&mut self, item: ItemInstance) -> bool {
        if self.is_full() {
            return false;
        }
        self.items.push(item);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{EquipmentSlot, ItemDefinition, Rarity};

    fn item(uid: u64) -> ItemInstance {
        ItemInstance {
            uid,
            definition: ItemDefinition {
                id: "iron_ring".to_string(),
                name: "Iron Ring".to_string(),
                rarity: Rarity::Normal,
                slot: EquipmentSlot::Ring,
                implicit_modifiers: Vec::new(),
            },
            rolled_modifiers: Vec::new(),
        }
    }

    #[test]
    fn test_bag_rejects_when_full() {
        let mut bag = LootBag::new(2);
        assert!(bag.try_add(item(1)));
        assert!(bag.try_add(item(2)));
        assert!(bag.is_full());
        assert!(!bag.try_add(item(3)));
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn test_bag_remove_frees_space() {
        let mut bag = LootBag::new(1);
        assert!(bag.try_add(item(7)));
        assert_eq!(bag.remove(7).map(|i| i.uid), Some(7));
        assert!(bag.remove(7).is_none());
        assert!(bag.try_add(item(8)));
    }

    #[test]
    fn test_zero_capacity_bag_accepts_nothing() {
        let mut bag = LootBag::new(0);
        assert!(!bag.try_add(item(1)));
        assert!(bag.is_empty());
    }
}
