//! Stat aggregation with flat, increased and more modifiers.
//!
//! Final value of a stat:
//!
//! ```text
//! Final = (Base + Σ flat) × (1 + Σ increased) × Π (1 + more_i)
//! ```
//!
//! Every modifier carries a [`ModifierSource`] so that everything granted by
//! one origin (an equipped item, a buff) can be removed or replaced as a unit.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// Stats tracked for heroes and enemies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatType {
    /// Maximum health points.
    MaxHealth,
    /// Current health points.
    CurrentHealth,
    /// Physical damage per hit.
    PhysicalDamage,
    /// Attacks per second.
    AttackSpeed,
    /// Chance to crit, as a fraction.
    CriticalChance,
    /// Damage multiplier applied on a crit.
    CriticalMultiplier,
    /// Flat armor used for mitigation.
    Armor,
    /// Evasion rating.
    Evasion,
    /// World units per second.
    MovementSpeed,
    /// Health regenerated per second.
    HealthRegen,
}

impl StatType {
    /// Every stat, in declaration order.
    pub const ALL: [StatType; 10] = [
        StatType::MaxHealth,
        StatType::CurrentHealth,
        StatType::PhysicalDamage,
        StatType::AttackSpeed,
        StatType::CriticalChance,
        StatType::CriticalMultiplier,
        StatType::Armor,
        StatType::Evasion,
        StatType::MovementSpeed,
        StatType::HealthRegen,
    ];
}

/// How a modifier combines with the base value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierKind {
    /// Added to the base before any percentage.
    Flat,
    /// Summed with other increased modifiers, then applied once.
    Increased,
    /// Applied as its own multiplier.
    More,
}

/// Tag identifying where a modifier came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ModifierSource(pub String);

impl ModifierSource {
    /// Create a source tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Borrow the tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ModifierSource {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// A single stat modifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    /// Stat affected.
    pub stat: StatType,
    /// Combination rule.
    pub kind: ModifierKind,
    /// Magnitude. Increased and more values are fractions (0.2 = +20%).
    pub value: f32,
    /// Origin tag.
    #[serde(default)]
    pub source: ModifierSource,
}

impl Modifier {
    /// Create a modifier with an empty source.
    #[must_use]
    pub fn new(stat: StatType, kind: ModifierKind, value: f32) -> Self {
        Self {
            stat,
            kind,
            value,
            source: ModifierSource::default(),
        }
    }

    /// Flat modifier shorthand.
    #[must_use]
    pub fn flat(stat: StatType, value: f32) -> Self {
        Self::new(stat, ModifierKind::Flat, value)
    }

    /// Increased modifier shorthand.
    #[must_use]
    pub fn increased(stat: StatType, value: f32) -> Self {
        Self::new(stat, ModifierKind::Increased, value)
    }

    /// More modifier shorthand.
    #[must_use]
    pub fn more(stat: StatType, value: f32) -> Self {
        Self::new(stat, ModifierKind::More, value)
    }

    /// Builder method to set the source tag.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<ModifierSource>) -> Self {
        self.source = source.into();
        self
    }
}

impl From<String> for ModifierSource {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

/// Base values plus a modifier list for one actor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatCollection {
    base: HashMap<StatType, f32>,
    modifiers: Vec<Modifier>,
}

impl StatCollection {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base value of a stat.
    pub fn set_base(&mut self, stat: StatType, value: f32) {
        self.base.insert(stat, value);
    }

    /// Base value of a stat, 0 when unset.
    #[must_use]
    pub fn base(&self, stat: StatType) -> f32 {
        self.base.get(&stat).copied().unwrap_or(0.0)
    }

    /// All modifiers currently applied.
    #[must_use]
    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    /// Add a modifier.
    pub fn add_modifier(&mut self, modifier: Modifier) {
        self.modifiers.push(modifier);
    }

    /// Remove every modifier granted by `source`. Returns how many were removed.
    pub fn remove_modifiers_by_source(&mut self, source: &ModifierSource) -> usize {
        let before = self.modifiers.len();
        self.modifiers.retain(|m| &m.source != source);
        before - self.modifiers.len()
    }

    /// Swap out everything granted by `source` for a new set.
    ///
    /// The incoming modifiers are re-tagged with `source`.
    pub fn replace_source(
        &mut self,
        source: &ModifierSource,
        modifiers: impl IntoIterator<Item = Modifier>,
    ) {
        self.remove_modifiers_by_source(source);
        self.modifiers.extend(modifiers.into_iter().map(|mut m| {
            m.source = source.clone();
            m
        }));
    }

    /// Drop all modifiers, keeping base values.
    pub fn clear_modifiers(&mut self) {
        self.modifiers.clear();
    }

    /// Final value of a stat after the full modifier pipeline.
    #[must_use]
    pub fn final_value(&self, stat: StatType) -> f32 {
        let mut flat = 0.0;
        let mut increased = 0.0;
        let mut more = 1.0;

        for modifier in self.modifiers.iter().filter(|m| m.stat == stat) {
            match modifier.kind {
                ModifierKind::Flat => flat += modifier.value,
                ModifierKind::Increased => increased += modifier.value,
                ModifierKind::More => more *= 1.0 + modifier.value,
            }
        }

        (self.base(stat) + flat) * (1.0 + increased) * more
    }

    /// Stats that have a base value or at least one modifier.
    #[must_use]
    pub fn tracked_stats(&self) -> BTreeSet<StatType> {
        self.base
            .keys()
            .copied()
            .chain(self.modifiers.iter().map(|m| m.stat))
            .collect()
    }

    /// Final values of every tracked stat.
    #[must_use]
    pub fn all_final(&self) -> BTreeMap<StatType, f32> {
        self.tracked_stats()
            .into_iter()
            .map(|stat| (stat, self.final_value(stat)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn test_unknown_stat_defaults_to_zero() {
        let stats = StatCollection::new();
        assert_eq!(stats.base(StatType::Armor), 0.0);
        assert_eq!(stats.final_value(StatType::Armor), 0.0);
    }

    #[test]
    fn test_pipeline_order() {
        let mut stats = StatCollection::new();
        stats.set_base(StatType::PhysicalDamage, 10.0);
        stats.add_modifier(Modifier::flat(StatType::PhysicalDamage, 5.0));
        stats.add_modifier(Modifier::increased(StatType::PhysicalDamage, 0.20));
        stats.add_modifier(Modifier::more(StatType::PhysicalDamage, 0.10));

        // (10 + 5) × 1.20 × 1.10
        assert_relative_eq!(
            stats.final_value(StatType::PhysicalDamage),
            19.8,
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_increased_sums_but_more_multiplies() {
        let mut stats = StatCollection::new();
        stats.set_base(StatType::AttackSpeed, 1.0);
        stats.add_modifier(Modifier::increased(StatType::AttackSpeed, 0.5));
        stats.add_modifier(Modifier::increased(StatType::AttackSpeed, 0.5));
        assert_relative_eq!(stats.final_value(StatType::AttackSpeed), 2.0);

        stats.clear_modifiers();
        stats.add_modifier(Modifier::more(StatType::AttackSpeed, 0.5));
        stats.add_modifier(Modifier::more(StatType::AttackSpeed, 0.5));
        assert_relative_eq!(stats.final_value(StatType::AttackSpeed), 2.25);
    }

    #[test]
    fn test_modifiers_only_touch_their_stat() {
        let mut stats = StatCollection::new();
        stats.set_base(StatType::Armor, 4.0);
        stats.add_modifier(Modifier::flat(StatType::MaxHealth, 50.0));
        assert_relative_eq!(stats.final_value(StatType::Armor), 4.0);
        assert_relative_eq!(stats.final_value(StatType::MaxHealth), 50.0);
    }

    #[test]
    fn test_remove_by_source_leaves_others() {
        let mut stats = StatCollection::new();
        stats.set_base(StatType::Armor, 1.0);
        stats.add_modifier(Modifier::flat(StatType::Armor, 3.0).with_source("helm"));
        stats.add_modifier(Modifier::flat(StatType::Armor, 5.0).with_source("boots"));

        let removed = stats.remove_modifiers_by_source(&ModifierSource::new("helm"));

        assert_eq!(removed, 1);
        assert_relative_eq!(stats.final_value(StatType::Armor), 6.0);
    }

    #[test]
    fn test_replace_source_retags() {
        let mut stats = StatCollection::new();
        let ring = ModifierSource::new("ring");
        stats.add_modifier(Modifier::flat(StatType::Evasion, 2.0).with_source("ring"));

        stats.replace_source(
            &ring,
            [
                Modifier::flat(StatType::Evasion, 7.0),
                Modifier::flat(StatType::Armor, 1.0),
            ],
        );

        assert_relative_eq!(stats.final_value(StatType::Evasion), 7.0);
        assert!(stats.modifiers().iter().all(|m| m.source == ring));
    }

    #[test]
    fn test_tracked_stats_include_modifier_only_stats() {
        let mut stats = StatCollection::new();
        stats.set_base(StatType::MaxHealth, 100.0);
        stats.add_modifier(Modifier::flat(StatType::HealthRegen, 2.0));

        let all = stats.all_final();
        assert_eq!(all.len(), 2);
        assert_relative_eq!(all[&StatType::HealthRegen], 2.0);
        assert_relative_eq!(all[&StatType::MaxHealth], 100.0);
    }
}
