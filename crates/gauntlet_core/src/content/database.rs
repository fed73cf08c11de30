//! Indexed content database.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::definitions::{
    BattleDefinition, EnemyDefinition, LootTable, MapDefinition, TierDefinition, TierScaling,
};
use super::ContentProvider;
use crate::error::{EncounterError, Result};
use crate::items::ItemDefinition;

/// Authored content as it appears on disk.
///
/// # Example RON
///
/// ```ron
/// ContentData(
///     tiers: [(id: "tier_1", name: "Act I", order: 1, map_ids: ["map_1_1"])],
///     maps: [(id: "map_1_1", name: "Twilight Shore", tier_id: "tier_1", battle_ids: ["b1"])],
///     battles: [(
///         id: "b1",
///         map_id: "map_1_1",
///         order: 1,
///         waves: [(spawns: [(enemy_id: "skeleton", count: 3)], delay_before_wave: 1.0)],
///     )],
///     enemies: [(
///         id: "skeleton",
///         name: "Skeleton",
///         base_health: 30.0,
///         base_damage: 5.0,
///         base_armor: 2.0,
///         base_speed: 2.0,
///     )],
/// )
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentData {
    /// Tier definitions, in any order.
    pub tiers: Vec<TierDefinition>,
    /// Map definitions.
    pub maps: Vec<MapDefinition>,
    /// Battle definitions.
    pub battles: Vec<BattleDefinition>,
    /// Enemy definitions.
    pub enemies: Vec<EnemyDefinition>,
    /// Item bases available to the loot roller.
    #[serde(default)]
    pub items: Vec<ItemDefinition>,
    /// Drop-chance tuning.
    #[serde(default)]
    pub loot: LootTable,
    /// Per-tier enemy scaling.
    #[serde(default)]
    pub scaling: TierScaling,
}

impl ContentData {
    /// Check cross references and basic sanity.
    ///
    /// Returns a list of validation errors; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let tier_ids = collect_ids(self.tiers.iter().map(|t| &t.id), "tier", &mut errors);
        let map_ids = collect_ids(self.maps.iter().map(|m| &m.id), "map", &mut errors);
        let battle_ids = collect_ids(self.battles.iter().map(|b| &b.id), "battle", &mut errors);
        let enemy_ids = collect_ids(self.enemies.iter().map(|e| &e.id), "enemy", &mut errors);
        collect_ids(self.items.iter().map(|i| &i.id), "item", &mut errors);

        for tier in &self.tiers {
            if tier.map_ids.is_empty() {
                errors.push(format!("Tier '{}' has no maps", tier.id));
            }
            for map_id in &tier.map_ids {
                if !map_ids.contains(map_id.as_str()) {
                    errors.push(format!("Tier '{}' references unknown map '{}'", tier.id, map_id));
                }
            }
        }

        for map in &self.maps {
            if !tier_ids.contains(map.tier_id.as_str()) {
                errors.push(format!(
                    "Map '{}' belongs to unknown tier '{}'",
                    map.id, map.tier_id
                ));
            }
            if map.battle_ids.is_empty() {
                errors.push(format!("Map '{}' has no battles", map.id));
            }
            for battle_id in &map.battle_ids {
                if !battle_ids.contains(battle_id.as_str()) {
                    errors.push(format!(
                        "Map '{}' references unknown battle '{}'",
                        map.id, battle_id
                    ));
                }
            }
        }

        for battle in &self.battles {
            if !map_ids.contains(battle.map_id.as_str()) {
                errors.push(format!(
                    "Battle '{}' belongs to unknown map '{}'",
                    battle.id, battle.map_id
                ));
            }
            if battle.waves.is_empty() {
                errors.push(format!("Battle '{}' has no waves", battle.id));
            }
            for (index, wave) in battle.waves.iter().enumerate() {
                if wave.delay_before_wave < 0.0 {
                    errors.push(format!(
                        "Battle '{}' wave {} has a negative delay",
                        battle.id, index
                    ));
                }
                for spawn in &wave.spawns {
                    if spawn.count == 0 {
                        errors.push(format!(
                            "Battle '{}' wave {} spawns zero '{}'",
                            battle.id, index, spawn.enemy_id
                        ));
                    }
                    if !enemy_ids.contains(spawn.enemy_id.as_str()) {
                        errors.push(format!(
                            "Battle '{}' wave {} spawns unknown enemy '{}'",
                            battle.id, index, spawn.enemy_id
                        ));
                    }
                }
            }
        }

        for enemy in &self.enemies {
            if enemy.base_health <= 0.0 {
                errors.push(format!("Enemy '{}' has non-positive health", enemy.id));
            }
        }

        errors
    }
}

fn collect_ids<'a>(
    ids: impl Iterator<Item = &'a String>,
    kind: &str,
    errors: &mut Vec<String>,
) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id.as_str()) {
            errors.push(format!("Duplicate {kind} id '{id}'"));
        }
    }
    seen
}

/// Content with id indices, ready for lookups by cursor.
#[derive(Debug, Clone)]
pub struct ContentDatabase {
    data: ContentData,
    /// Indices into `data.tiers`, sorted by tier order.
    tier_order: Vec<usize>,
    maps: HashMap<String, usize>,
    battles: HashMap<String, usize>,
    enemies: HashMap<String, usize>,
}

impl ContentDatabase {
    /// Index content. Never fails; dangling references simply resolve to `None`.
    #[must_use]
    pub fn new(data: ContentData) -> Self {
        let mut tier_order: Vec<usize> = (0..data.tiers.len()).collect();
        tier_order.sort_by_key(|&i| data.tiers[i].order);

        let maps = index_by_id(data.maps.iter().map(|m| &m.id));
        let battles = index_by_id(data.battles.iter().map(|b| &b.id));
        let enemies = index_by_id(data.enemies.iter().map(|e| &e.id));

        Self {
            data,
            tier_order,
            maps,
            battles,
            enemies,
        }
    }

    /// Parse content from RON text. `label` names the source in errors.
    ///
    /// # Errors
    ///
    /// Returns [`EncounterError::ContentParse`] if the text is not valid content RON.
    pub fn from_ron_str(text: &str, label: &str) -> Result<Self> {
        let data: ContentData = ron::from_str(text).map_err(|e| EncounterError::ContentParse {
            path: label.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::new(data))
    }

    /// Parse and validate content from RON text.
    ///
    /// # Errors
    ///
    /// Returns [`EncounterError::ContentParse`] on malformed RON and
    /// [`EncounterError::ContentValidation`] when cross references are broken.
    pub fn load_validated(text: &str, label: &str) -> Result<Self> {
        let database = Self::from_ron_str(text, label)?;
        let errors = database.data.validate();
        if !errors.is_empty() {
            return Err(EncounterError::ContentValidation(errors));
        }
        tracing::debug!(
            source = label,
            tiers = database.data.tiers.len(),
            battles = database.data.battles.len(),
            "Content loaded"
        );
        Ok(database)
    }

    /// Serialize the authored form back to pretty RON.
    ///
    /// # Errors
    ///
    /// Returns [`EncounterError::InvalidState`] if serialization fails.
    pub fn to_ron_string(&self) -> Result<String> {
        ron::ser::to_string_pretty(&self.data, ron::ser::PrettyConfig::default())
            .map_err(|e| EncounterError::InvalidState(e.to_string()))
    }

    /// Authored data.
    #[must_use]
    pub fn data(&self) -> &ContentData {
        &self.data
    }

    /// Validate the authored data.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        self.data.validate()
    }

    /// Item bases for the loot roller.
    #[must_use]
    pub fn items(&self) -> &[ItemDefinition] {
        &self.data.items
    }

    /// Drop-chance tuning.
    #[must_use]
    pub fn loot_table(&self) -> &LootTable {
        &self.data.loot
    }

    /// Total number of battles across every tier and map.
    #[must_use]
    pub fn total_battle_count(&self) -> usize {
        (0..self.tier_count())
            .map(|tier| {
                (0..self.map_count(tier))
                    .map(|map| self.battle_count(tier, map))
                    .sum::<usize>()
            })
            .sum()
    }
}

fn index_by_id<'a>(ids: impl Iterator<Item = &'a String>) -> HashMap<String, usize> {
    let mut index = HashMap::new();
    for (i, id) in ids.enumerate() {
        // First definition wins on duplicates; validation reports them.
        index.entry(id.clone()).or_insert(i);
    }
    index
}

impl ContentProvider for ContentDatabase {
    fn tier(&self, tier: usize) -> Option<&TierDefinition> {
        self.tier_order
            .get(tier)
            .and_then(|&i| self.data.tiers.get(i))
    }

    fn map(&self, tier: usize, map: usize) -> Option<&MapDefinition> {
        let id = self.tier(tier)?.map_ids.get(map)?;
        self.maps.get(id).and_then(|&i| self.data.maps.get(i))
    }

    fn battle(&self, tier: usize, map: usize, battle: usize) -> Option<&BattleDefinition> {
        let id = self.map(tier, map)?.battle_ids.get(battle)?;
        self.battles.get(id).and_then(|&i| self.data.battles.get(i))
    }

    fn enemy(&self, id: &str) -> Option<&EnemyDefinition> {
        self.enemies.get(id).and_then(|&i| self.data.enemies.get(i))
    }

    fn tier_scaling(&self, tier: usize) -> f32 {
        self.data.scaling.factor(tier)
    }

    fn tier_count(&self) -> usize {
        self.tier_order.len()
    }

    fn drop_chance(&self, battle: usize, tier: usize) -> f64 {
        self.data.loot.drop_chance(battle, tier)
    }

    fn bonus_drop_chance(&self, tier: usize) -> f64 {
        self.data.loot.bonus_drop_chance(tier)
    }
}
