//! Property tests for stat aggregation, mitigation and determinism.

use approx::assert_relative_eq;
use gauntlet_core::combat::{armor_reduction, mitigate, roll_critical};
use gauntlet_core::content::ContentDatabase;
use gauntlet_core::rng::SeededRandom;
use gauntlet_core::simulation::CombatWorld;
use gauntlet_core::stats::{ModifierKind, StatCollection, StatType};
use gauntlet_test_utils::determinism::{
    find_first_divergence, run_parallel_worlds, verify_determinism,
};
use gauntlet_test_utils::doubles::ConstantRandom;
use gauntlet_test_utils::fixtures::{hero_combat_stats, skeleton_wave};
use gauntlet_test_utils::proptest::prelude::*;
use gauntlet_test_utils::strategies::{
    arb_armor, arb_base_value, arb_modifier_for, arb_raw_damage, arb_seed, arb_unit_roll,
};

proptest! {
    #[test]
    fn prop_final_value_follows_stat_law(
        base in arb_base_value(),
        modifiers in prop::collection::vec(arb_modifier_for(StatType::PhysicalDamage), 0..6),
    ) {
        let mut stats = StatCollection::new();
        stats.set_base(StatType::PhysicalDamage, base);

        let mut flat = 0.0_f64;
        let mut increased = 0.0_f64;
        let mut more = 1.0_f64;
        for m in &modifiers {
            match m.kind {
                ModifierKind::Flat => flat += f64::from(m.value),
                ModifierKind::Increased => increased += f64::from(m.value),
                ModifierKind::More => more *= 1.0 + f64::from(m.value),
            }
            stats.add_modifier(m.clone());
        }

        let expected = (f64::from(base) + flat) * (1.0 + increased) * more;
        let actual = f64::from(stats.final_value(StatType::PhysicalDamage));
        prop_assert!(
            (actual - expected).abs() <= 1e-3 * expected.abs().max(1.0),
            "expected {expected}, got {actual}"
        );
        prop_assert_eq!(stats.final_value(StatType::Armor), 0.0);
    }

    #[test]
    fn prop_mitigation_bounded(raw in arb_raw_damage(), armor in arb_armor()) {
        let dealt = mitigate(raw, armor);
        prop_assert!(dealt >= 0.0);
        prop_assert!(dealt <= raw);
        let reduction = armor_reduction(raw, armor);
        prop_assert!((0.0..1.0).contains(&reduction));
    }

    #[test]
    fn prop_more_armor_strictly_reduces_damage(
        raw in arb_raw_damage(),
        a in arb_armor(),
        extra in 1.0_f32..500.0,
    ) {
        let low = mitigate(raw, a);
        let high = mitigate(raw, a + extra);
        prop_assert!(high < low, "armor {a} -> {low}, armor {} -> {high}", a + extra);
    }

    #[test]
    fn prop_crit_iff_roll_below_chance(roll in arb_unit_roll(), chance in 0.0_f32..1.0) {
        let crit = roll_critical(10.0, chance, 2.0, &mut ConstantRandom(roll));
        prop_assert_eq!(crit.is_critical, roll < f64::from(chance));
        let expected = if crit.is_critical { 20.0 } else { 10.0 };
        prop_assert_eq!(crit.damage, expected);
    }

    #[test]
    fn prop_same_seed_same_world(seed in arb_seed()) {
        prop_assert_eq!(find_first_divergence(|| crowded_world(seed), seed, 120, 0.05), None);
    }
}

#[test]
fn test_zero_armor_takes_full_damage() {
    assert_relative_eq!(mitigate(37.5, 0.0), 37.5);
    assert_eq!(mitigate(0.0, 50.0), 0.0);
}

fn crowded_world(seed: u64) -> CombatWorld {
    let content = ContentDatabase::builtin();
    let mut rng = SeededRandom::new(seed);
    let mut world = CombatWorld::default();
    world.spawn_hero(hero_combat_stats(12.0, 2.5, 0.4));
    world.spawn_wave(&skeleton_wave(6, 0.0), 0, 1.5, &content, &mut rng);
    world
}

#[test]
fn test_repeated_runs_hash_identically() {
    let result = verify_determinism(
        3,
        400,
        || (crowded_world(42), SeededRandom::new(42)),
        |(world, rng): &mut (CombatWorld, SeededRandom)| {
            world.tick(0.05, rng);
        },
        |(world, _): &(CombatWorld, SeededRandom)| world.state_hash(),
    );
    result.assert_deterministic();
}

#[test]
fn test_parallel_worlds_agree() {
    let result = run_parallel_worlds(|| crowded_world(9), 9, 4, 300, 1.0 / 60.0);
    result.assert_deterministic();
    assert_eq!(result.hashes.len(), 4);
}

#[test]
fn test_different_seeds_diverge() {
    let a = {
        let mut world = crowded_world(1);
        let mut rng = SeededRandom::new(1);
        for _ in 0..50 {
            world.tick(0.05, &mut rng);
        }
        world.state_hash()
    };
    let b = {
        let mut world = crowded_world(2);
        let mut rng = SeededRandom::new(2);
        for _ in 0..50 {
            world.tick(0.05, &mut rng);
        }
        world.state_hash()
    };
    assert_ne!(a, b);
}
