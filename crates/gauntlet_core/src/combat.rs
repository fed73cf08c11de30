//! Damage resolution with armor mitigation and critical hits.
//!
//! This module implements:
//! - Diminishing-returns armor: `reduction = armor / (armor + 10 × raw)`
//! - Critical hits rolled against the attacker's clamped crit chance
//! - A single [`mitigate`] function shared by the standalone resolver and
//!   the projectile hit system
//!
//! Armor alone can never reach 100% reduction, and zero defensive stats
//! degrade to "no reduction" instead of producing NaN.

use serde::{Deserialize, Serialize};

use crate::rng::RandomSource;
use crate::stats::{StatCollection, StatType};

/// Armor scaling constant in the mitigation formula.
pub const ARMOR_DAMAGE_FACTOR: f32 = 10.0;

/// Damage classification carried through to events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DamageType {
    /// Physical hits, mitigated by armor.
    #[default]
    Physical,
    /// Elemental hits. Mitigated the same way for now.
    Elemental,
}

/// Outcome of a resolved hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageResult {
    /// Damage before armor, after the crit multiplier.
    pub raw: f32,
    /// Damage after armor.
    pub mitigated: f32,
    /// Whether the hit was a critical.
    pub is_critical: bool,
    /// Damage classification.
    pub damage_type: DamageType,
}

/// Result of a crit roll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CritRoll {
    /// Damage after the crit multiplier (unchanged on a non-crit).
    pub damage: f32,
    /// Whether the roll succeeded.
    pub is_critical: bool,
}

/// Roll a critical hit.
///
/// The roll succeeds when `random() < clamp(crit_chance, 0, 1)`. A roll
/// exactly equal to the chance is not a crit.
pub fn roll_critical<R: RandomSource + ?Sized>(
    base_damage: f32,
    crit_chance: f32,
    crit_multiplier: f32,
    rng: &mut R,
) -> CritRoll {
    let chance = f64::from(crit_chance.clamp(0.0, 1.0));
    let is_critical = rng.next_f64() < chance;
    let damage = if is_critical {
        base_damage * crit_multiplier
    } else {
        base_damage
    };
    CritRoll {
        damage,
        is_critical,
    }
}

/// Fraction of `raw` damage removed by `armor`.
#[must_use]
pub fn armor_reduction(raw: f32, armor: f32) -> f32 {
    if armor <= 0.0 || raw <= 0.0 {
        return 0.0;
    }
    armor / (armor + ARMOR_DAMAGE_FACTOR * raw)
}

/// Apply armor mitigation to raw damage. Never negative.
#[must_use]
pub fn mitigate(raw: f32, armor: f32) -> f32 {
    if raw <= 0.0 {
        return 0.0;
    }
    (raw * (1.0 - armor_reduction(raw, armor))).max(0.0)
}

/// Resolve one attack from `attacker` against `defender`.
///
/// Reads physical damage, crit chance and crit multiplier from the attacker
/// and armor from the defender. Pure apart from the single draw on `rng`.
pub fn resolve_damage<R: RandomSource + ?Sized>(
    attacker: &StatCollection,
    defender: &StatCollection,
    damage_type: DamageType,
    rng: &mut R,
) -> DamageResult {
    let crit = roll_critical(
        attacker.final_value(StatType::PhysicalDamage),
        attacker.final_value(StatType::CriticalChance),
        attacker.final_value(StatType::CriticalMultiplier),
        rng,
    );

    let armor = defender.final_value(StatType::Armor);

    DamageResult {
        raw: crit.damage,
        mitigated: mitigate(crit.damage, armor),
        is_critical: crit.is_critical,
        damage_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    struct Fixed(f64);

    impl RandomSource for Fixed {
        fn next_f64(&mut self) -> f64 {
            self.0
        }

        fn range_i32(&mut self, min: i32, _max_exclusive: i32) -> i32 {
            min
        }

        fn range_f32(&mut self, min: f32, _max: f32) -> f32 {
            min
        }
    }

    fn attacker(damage: f32, crit_chance: f32, crit_multiplier: f32) -> StatCollection {
        let mut stats = StatCollection::new();
        stats.set_base(StatType::PhysicalDamage, damage);
        stats.set_base(StatType::CriticalChance, crit_chance);
        stats.set_base(StatType::CriticalMultiplier, crit_multiplier);
        stats
    }

    fn defender(armor: f32) -> StatCollection {
        let mut stats = StatCollection::new();
        stats.set_base(StatType::Armor, armor);
        stats
    }

    #[test]
    fn test_no_armor_no_reduction() {
        let result = resolve_damage(
            &attacker(10.0, 0.0, 1.5),
            &defender(0.0),
            DamageType::Physical,
            &mut Fixed(0.5),
        );
        assert_relative_eq!(result.raw, 10.0);
        assert_relative_eq!(result.mitigated, 10.0);
        assert!(!result.is_critical);
    }

    #[test]
    fn test_armor_mitigation_formula() {
        // reduction = 10 / (10 + 10 × 10) = 1/11
        let result = resolve_damage(
            &attacker(10.0, 0.0, 1.5),
            &defender(10.0),
            DamageType::Physical,
            &mut Fixed(0.9),
        );
        assert_relative_eq!(result.mitigated, 10.0 * (1.0 - 1.0 / 11.0), epsilon = 1e-5);
    }

    #[test]
    fn test_crit_applies_multiplier_before_armor() {
        let result = resolve_damage(
            &attacker(10.0, 0.5, 2.0),
            &defender(20.0),
            DamageType::Physical,
            &mut Fixed(0.1),
        );
        assert!(result.is_critical);
        assert_relative_eq!(result.raw, 20.0);
        // 20 × (1 − 20 / (20 + 200))
        assert_relative_eq!(result.mitigated, 20.0 * (1.0 - 20.0 / 220.0), epsilon = 1e-5);
    }

    #[test]
    fn test_crit_boundary_is_strict() {
        let mut at_chance = Fixed(0.25);
        assert!(!roll_critical(10.0, 0.25, 2.0, &mut at_chance).is_critical);

        let mut below = Fixed(0.25 - 1e-9);
        assert!(roll_critical(10.0, 0.25, 2.0, &mut below).is_critical);
    }

    #[test]
    fn test_crit_chance_is_clamped() {
        // Chance above 1 clamps to 1: a roll of 0.999 still crits.
        assert!(roll_critical(1.0, 3.0, 2.0, &mut Fixed(0.999)).is_critical);
        // Negative chance clamps to 0: even a roll of 0 misses.
        assert!(!roll_critical(1.0, -1.0, 2.0, &mut Fixed(0.0)).is_critical);
    }

    #[test]
    fn test_zero_damage_zero_armor_is_not_nan() {
        assert_eq!(mitigate(0.0, 0.0), 0.0);
        assert_eq!(armor_reduction(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_damage_type_is_carried() {
        let result = resolve_damage(
            &attacker(5.0, 0.0, 1.0),
            &defender(0.0),
            DamageType::Elemental,
            &mut Fixed(0.0),
        );
        assert_eq!(result.damage_type, DamageType::Elemental);
    }
}
