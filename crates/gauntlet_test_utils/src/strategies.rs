//! Proptest strategies for property-based tests.

use gauntlet_core::stats::{Modifier, ModifierKind, StatType};
use proptest::prelude::*;

/// Any stat type.
pub fn arb_stat_type() -> impl Strategy<Value = StatType> {
    proptest::sample::select(StatType::ALL.to_vec())
}

/// Any modifier kind.
pub fn arb_modifier_kind() -> impl Strategy<Value = ModifierKind> {
    prop_oneof![
        Just(ModifierKind::Flat),
        Just(ModifierKind::Increased),
        Just(ModifierKind::More),
    ]
}

/// A non-negative modifier on `stat`.
pub fn arb_modifier_for(stat: StatType) -> impl Strategy<Value = Modifier> {
    (arb_modifier_kind(), 0.0_f32..2.0_f32)
        .prop_map(move |(kind, value)| Modifier::new(stat, kind, value))
}

/// Base stat value in a gameplay range.
pub fn arb_base_value() -> impl Strategy<Value = f32> {
    0.0_f32..1000.0_f32
}

/// Raw hit damage, strictly positive.
pub fn arb_raw_damage() -> impl Strategy<Value = f32> {
    0.1_f32..500.0_f32
}

/// Armor value, non-negative.
pub fn arb_armor() -> impl Strategy<Value = f32> {
    0.0_f32..2000.0_f32
}

/// Uniform roll in `[0, 1)`.
pub fn arb_unit_roll() -> impl Strategy<Value = f64> {
    0.0_f64..1.0_f64
}

/// Seed for a [`gauntlet_core::rng::SeededRandom`].
pub fn arb_seed() -> impl Strategy<Value = u64> {
    any::<u64>()
}

/// Battle-count layout for [`crate::fixtures::content_with_layout`]:
/// 1 to 3 tiers of 1 to 3 maps of 1 to 4 battles.
pub fn arb_layout() -> impl Strategy<Value = Vec<Vec<usize>>> {
    prop::collection::vec(prop::collection::vec(1_usize..=4, 1..=3), 1..=3)
}
