//! Content definitions and the lookup port the simulation reads them through.
//!
//! This module contains no IO. Callers hand in RON text; the headless runner
//! owns file access.

mod builtin;
mod database;
mod definitions;

pub use database::{ContentData, ContentDatabase};
pub use definitions::{
    BattleDefinition, EnemyDefinition, LootTable, MapDefinition, RewardEntry, RewardType,
    ScaledEnemyStats, TierDefinition, TierScaling, WaveDefinition, WaveSpawnEntry,
};

/// Read-only view of authored content.
///
/// Out-of-range indices and unknown ids return `None`; nothing here panics.
pub trait ContentProvider {
    /// Tier at `tier` (ordered by [`TierDefinition::order`]).
    fn tier(&self, tier: usize) -> Option<&TierDefinition>;

    /// Map at `map` inside tier `tier`.
    fn map(&self, tier: usize, map: usize) -> Option<&MapDefinition>;

    /// Battle at `battle` inside map `map` of tier `tier`.
    fn battle(&self, tier: usize, map: usize, battle: usize) -> Option<&BattleDefinition>;

    /// Enemy definition by id.
    fn enemy(&self, id: &str) -> Option<&EnemyDefinition>;

    /// Multiplier applied to enemy health, damage and armor in a tier.
    fn tier_scaling(&self, tier: usize) -> f32;

    /// Number of tiers.
    fn tier_count(&self) -> usize;

    /// Number of maps in a tier, 0 for an unknown tier.
    fn map_count(&self, tier: usize) -> usize {
        self.tier(tier).map_or(0, |t| t.map_ids.len())
    }

    /// Number of battles in a map, 0 for an unknown map.
    fn battle_count(&self, tier: usize, map: usize) -> usize {
        self.map(tier, map).map_or(0, |m| m.battle_ids.len())
    }

    /// Chance that completing a battle drops an item.
    fn drop_chance(&self, battle: usize, tier: usize) -> f64;

    /// Chance of a second, bonus item.
    fn bonus_drop_chance(&self, tier: usize) -> f64;
}
