//! Authored content definitions.
//!
//! Pure data, deserialized from RON. Indices into ordered id lists are
//! resolved by [`ContentDatabase`](super::ContentDatabase).

use serde::{Deserialize, Serialize};

/// Top-level content grouping ("Act I").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierDefinition {
    /// Unique id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Sort key; tiers are indexed in ascending order.
    pub order: u32,
    /// Maps in play order.
    pub map_ids: Vec<String>,
}

/// Group of battles inside a tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDefinition {
    /// Unique id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Owning tier id.
    pub tier_id: String,
    /// Battles in play order.
    pub battle_ids: Vec<String>,
}

/// A single encounter: ordered waves plus a reward list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleDefinition {
    /// Unique id.
    pub id: String,
    /// Owning map id.
    pub map_id: String,
    /// Position within the map.
    pub order: u32,
    /// Waves in spawn order.
    pub waves: Vec<WaveDefinition>,
    /// Rewards announced on completion.
    #[serde(default)]
    pub rewards: Vec<RewardEntry>,
}

/// A timed group of spawns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveDefinition {
    /// Spawn groups.
    pub spawns: Vec<WaveSpawnEntry>,
    /// Seconds between the wave being announced and its enemies appearing.
    pub delay_before_wave: f32,
}

/// `count` copies of one enemy type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveSpawnEntry {
    /// Enemy definition id.
    pub enemy_id: String,
    /// Number to spawn.
    pub count: u32,
}

impl WaveSpawnEntry {
    /// Create a spawn entry.
    #[must_use]
    pub fn new(enemy_id: impl Into<String>, count: u32) -> Self {
        Self {
            enemy_id: enemy_id.into(),
            count,
        }
    }
}

/// Base stats for an enemy type, before tier scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyDefinition {
    /// Unique id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Base maximum health.
    pub base_health: f32,
    /// Base physical damage.
    pub base_damage: f32,
    /// Base armor.
    pub base_armor: f32,
    /// Movement speed in world units per second.
    pub base_speed: f32,
}

/// Enemy stats after tier scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledEnemyStats {
    /// Scaled maximum health.
    pub health: f32,
    /// Scaled damage.
    pub damage: f32,
    /// Scaled armor.
    pub armor: f32,
    /// Unscaled move speed.
    pub speed: f32,
}

impl EnemyDefinition {
    /// Apply a tier scaling factor. Move speed is deliberately left alone.
    #[must_use]
    pub fn scaled(&self, factor: f32) -> ScaledEnemyStats {
        ScaledEnemyStats {
            health: self.base_health * factor,
            damage: self.base_damage * factor,
            armor: self.base_armor * factor,
            speed: self.base_speed,
        }
    }
}

/// Kind of battle reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RewardType {
    /// Experience points.
    Experience,
    /// Soft currency.
    Currency,
    /// A specific item.
    Item,
}

/// One line of a battle's reward list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardEntry {
    /// Reward kind.
    pub reward_type: RewardType,
    /// Reward id ("xp", "gold", an item id).
    pub reward_id: String,
    /// Amount granted.
    pub amount: u32,
}

impl RewardEntry {
    /// Create a reward entry.
    #[must_use]
    pub fn new(reward_type: RewardType, reward_id: impl Into<String>, amount: u32) -> Self {
        Self {
            reward_type,
            reward_id: reward_id.into(),
            amount,
        }
    }
}

/// Drop-chance tuning for battle rewards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LootTable {
    /// Drop chance of the first battle.
    pub base_drop_chance: f64,
    /// Added per battle index.
    pub drop_chance_per_battle: f64,
    /// Upper bound for the scaled drop chance.
    pub max_drop_chance: f64,
    /// Bonus second-drop chance per tier index.
    pub bonus_drop_chance_per_tier: f64,
}

impl Default for LootTable {
    fn default() -> Self {
        Self {
            base_drop_chance: 0.3,
            drop_chance_per_battle: 0.025,
            max_drop_chance: 0.65,
            bonus_drop_chance_per_tier: 0.1,
        }
    }
}

impl LootTable {
    /// Chance of the primary drop for a battle.
    #[must_use]
    pub fn drop_chance(&self, battle_index: usize, _tier_index: usize) -> f64 {
        (self.base_drop_chance + battle_index as f64 * self.drop_chance_per_battle)
            .min(self.max_drop_chance)
    }

    /// Chance of the bonus drop for a tier.
    #[must_use]
    pub fn bonus_drop_chance(&self, tier_index: usize) -> f64 {
        tier_index as f64 * self.bonus_drop_chance_per_tier
    }
}

/// Linear per-tier enemy scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierScaling {
    /// Factor at tier 0.
    pub base: f32,
    /// Added per tier index.
    pub per_tier: f32,
}

impl Default for TierScaling {
    fn default() -> Self {
        Self {
            base: 1.0,
            per_tier: 0.5,
        }
    }
}

impl TierScaling {
    /// Scaling factor for a tier.
    #[must_use]
    pub fn factor(&self, tier_index: usize) -> f32 {
        self.base + tier_index as f32 * self.per_tier
    }
}
