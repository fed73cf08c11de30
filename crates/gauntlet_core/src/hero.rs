//! Hero stat state and equipment application.

use serde::{Deserialize, Serialize};

use crate::events::HeroStatsChanged;
use crate::items::ItemInstance;
use crate::progression::DEFAULT_HERO_ID;
use crate::stats::{StatCollection, StatType};

/// Base stats of a fresh hero.
pub const HERO_DEFAULTS: [(StatType, f32); 10] = [
    (StatType::MaxHealth, 100.0),
    (StatType::CurrentHealth, 100.0),
    (StatType::PhysicalDamage, 10.0),
    (StatType::AttackSpeed, 1.0),
    (StatType::CriticalChance, 0.05),
    (StatType::CriticalMultiplier, 1.5),
    (StatType::Armor, 5.0),
    (StatType::Evasion, 0.0),
    (StatType::MovementSpeed, 3.0),
    (StatType::HealthRegen, 1.0),
];

/// The player's hero outside of combat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroState {
    /// Hero id.
    pub id: String,
    stats: StatCollection,
}

impl Default for HeroState {
    fn default() -> Self {
        Self::new(DEFAULT_HERO_ID)
    }
}

impl HeroState {
    /// Hero with default base stats and no modifiers.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let mut stats = StatCollection::new();
        for (stat, value) in HERO_DEFAULTS {
            stats.set_base(stat, value);
        }
        Self {
            id: id.into(),
            stats,
        }
    }

    /// Stat collection.
    #[must_use]
    pub fn stats(&self) -> &StatCollection {
        &self.stats
    }

    /// Mutable stat collection.
    pub fn stats_mut(&mut self) -> &mut StatCollection {
        &mut self.stats
    }

    /// Rebuild modifiers from the equipped items.
    ///
    /// Every modifier is tagged with its item's source so one item can later
    /// be swapped without touching the others.
    pub fn apply_equipment<'a>(
        &mut self,
        items: impl IntoIterator<Item = &'a ItemInstance>,
    ) -> HeroStatsChanged {
        self.stats.clear_modifiers();
        for item in items {
            let source = item.source();
            self.stats
                .replace_source(&source, item.modifiers().cloned());
        }
        let snapshot = self.snapshot();
        tracing::debug!(hero = %self.id, stats = snapshot.final_stats.len(), "Equipment applied");
        snapshot
    }

    /// Final value of every tracked stat.
    #[must_use]
    pub fn snapshot(&self) -> HeroStatsChanged {
        HeroStatsChanged {
            final_stats: self.stats.all_final(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{EquipmentSlot, ItemDefinition, Rarity};
    use crate::stats::Modifier;

    use approx::assert_relative_eq;

    fn item(uid: u64, implicit: Vec<Modifier>, rolled: Vec<Modifier>) -> ItemInstance {
        ItemInstance {
            uid,
            definition: ItemDefinition {
                id: format!("item_{uid}"),
                name: format!("Item {uid}"),
                rarity: Rarity::Magic,
                slot: EquipmentSlot::MainHand,
                implicit_modifiers: implicit,
            },
            rolled_modifiers: rolled,
        }
    }

    #[test]
    fn test_defaults() {
        let hero = HeroState::default();
        assert_eq!(hero.id, "default_hero");
        let snapshot = hero.snapshot();
        assert_eq!(snapshot.final_stats.len(), 10);
        assert_relative_eq!(snapshot.final_stats[&StatType::PhysicalDamage], 10.0);
        assert_relative_eq!(snapshot.final_stats[&StatType::CriticalMultiplier], 1.5);
    }

    #[test]
    fn test_apply_equipment_stacks_and_tags() {
        let mut hero = HeroState::default();
        let sword = item(
            1,
            vec![Modifier::flat(StatType::PhysicalDamage, 5.0)],
            vec![Modifier::increased(StatType::AttackSpeed, 0.25)],
        );
        let ring = item(2, vec![Modifier::flat(StatType::PhysicalDamage, 2.0)], Vec::new());

        let changed = hero.apply_equipment([&sword, &ring]);

        assert_relative_eq!(changed.final_stats[&StatType::PhysicalDamage], 17.0);
        assert_relative_eq!(changed.final_stats[&StatType::AttackSpeed], 1.25);
        assert_eq!(
            hero.stats()
                .modifiers()
                .iter()
                .filter(|m| m.source == sword.source())
                .count(),
            2
        );
    }

    #[test]
    fn test_reapplying_replaces_previous_loadout() {
        let mut hero = HeroState::default();
        let sword = item(1, vec![Modifier::flat(StatType::PhysicalDamage, 5.0)], Vec::new());
        hero.apply_equipment([&sword]);
        let changed = hero.apply_equipment(std::iter::empty());
        assert_relative_eq!(changed.final_stats[&StatType::PhysicalDamage], 10.0);
        assert!(hero.stats().modifiers().is_empty());
    }
}
