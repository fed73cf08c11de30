//! Test doubles for the core's ports.

use std::collections::VecDeque;

use gauntlet_core::items::{EquipmentSlot, ItemDefinition, ItemInstance, ItemRoller, Rarity};
use gauntlet_core::rewards::LootSink;
use gauntlet_core::rng::RandomSource;

fn scale_i32(u: f64, min: i32, max_exclusive: i32) -> i32 {
    if max_exclusive <= min {
        return min;
    }
    let span = f64::from(max_exclusive - min);
    let offset = (u * span).floor() as i32;
    (min + offset).min(max_exclusive - 1)
}

fn scale_f32(u: f64, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    min + (max - min) * u as f32
}

/// Returns the same uniform value forever.
///
/// Ranges are mapped through that value, so `ConstantRandom(0.0)` always
/// yields the lower bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantRandom(pub f64);

impl RandomSource for ConstantRandom {
    fn next_f64(&mut self) -> f64 {
        self.0
    }

    fn range_i32(&mut self, min: i32, max_exclusive: i32) -> i32 {
        scale_i32(self.0, min, max_exclusive)
    }

    fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        scale_f32(self.0, min, max)
    }
}

/// Plays back a fixed list of uniform values, then repeats a fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedRandom {
    script: VecDeque<f64>,
    fallback: f64,
    draws: usize,
}

impl ScriptedRandom {
    /// Play `values` in order, then return `fallback`.
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self {
            script: values.into_iter().collect(),
            fallback,
            draws: 0,
        }
    }

    /// Number of values drawn so far, ranges included.
    #[must_use]
    pub fn draws(&self) -> usize {
        self.draws
    }

    /// Values not yet played.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    fn next_value(&mut self) -> f64 {
        self.draws += 1;
        self.script.pop_front().unwrap_or(self.fallback)
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        self.next_value()
    }

    fn range_i32(&mut self, min: i32, max_exclusive: i32) -> i32 {
        let u = self.next_value();
        scale_i32(u, min, max_exclusive)
    }

    fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        let u = self.next_value();
        scale_f32(u, min, max)
    }
}

/// Item roller that hands out copies of one definition, or nothing.
#[derive(Debug, Clone)]
pub struct StubItemRoller {
    definition: Option<ItemDefinition>,
    next_uid: u64,
    calls: usize,
}

impl StubItemRoller {
    /// Always rolls a plain "Test Ring".
    #[must_use]
    pub fn always() -> Self {
        Self::with_definition(test_item_definition("test_ring", Rarity::Normal))
    }

    /// Always rolls `definition`.
    #[must_use]
    pub fn with_definition(definition: ItemDefinition) -> Self {
        Self {
            definition: Some(definition),
            next_uid: 1,
            calls: 0,
        }
    }

    /// Never produces an item.
    #[must_use]
    pub fn never() -> Self {
        Self {
            definition: None,
            next_uid: 1,
            calls: 0,
        }
    }

    /// Number of roll requests.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl ItemRoller for StubItemRoller {
    fn roll_item(&mut self, _rng: &mut dyn RandomSource) -> Option<ItemInstance> {
        self.calls += 1;
        let definition = self.definition.clone()?;
        let uid = self.next_uid;
        self.next_uid += 1;
        Some(ItemInstance {
            uid,
            definition,
            rolled_modifiers: Vec::new(),
        })
    }
}

/// Loot sink that records what it accepted and what it turned away.
#[derive(Debug, Clone, Default)]
pub struct RecordingLootSink {
    capacity: Option<usize>,
    /// Items accepted, in order.
    pub accepted: Vec<ItemInstance>,
    /// Items rejected, in order.
    pub rejected: Vec<ItemInstance>,
}

impl RecordingLootSink {
    /// Sink that accepts everything.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Sink that accepts at most `capacity` items.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }
}

impl LootSink for RecordingLootSink {
    fn try_add(&mut self, item: ItemInstance) -> bool {
        if self.capacity.is_some_and(|cap| self.accepted.len() >= cap) {
            tracing::trace!(uid = item.uid, "Recording sink rejected item");
            self.rejected.push(item);
            return false;
        }
        self.accepted.push(item);
        true
    }
}

/// Minimal item definition for tests.
#[must_use]
pub fn test_item_definition(id: &str, rarity: Rarity) -> ItemDefinition {
    ItemDefinition {
        id: id.to_string(),
        name: "Test Ring".to_string(),
        rarity,
        slot: EquipmentSlot::Ring,
        implicit_modifiers: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_plays_then_falls_back() {
        let mut rng = ScriptedRandom::new([0.1, 0.9], 0.5);
        assert_eq!(rng.next_f64(), 0.1);
        assert_eq!(rng.next_f64(), 0.9);
        assert_eq!(rng.next_f64(), 0.5);
        assert_eq!(rng.draws(), 3);
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn test_constant_ranges() {
        let mut low = ConstantRandom(0.0);
        assert_eq!(low.range_i32(1, 3), 1);
        assert_eq!(low.range_f32(5.5, 7.0), 5.5);

        let mut high = ConstantRandom(0.999_999);
        assert_eq!(high.range_i32(1, 3), 2);
        assert!(high.range_f32(0.0, 1.0) < 1.0);
    }

    #[test]
    fn test_stub_roller_counts_calls() {
        let mut roller = StubItemRoller::never();
        assert!(roller.roll_item(&mut ConstantRandom(0.0)).is_none());
        assert_eq!(roller.calls(), 1);

        let mut roller = StubItemRoller::always();
        let a = roller.roll_item(&mut ConstantRandom(0.0)).unwrap();
        let b = roller.roll_item(&mut ConstantRandom(0.0)).unwrap();
        assert_ne!(a.uid, b.uid);
    }

    #[test]
    fn test_recording_sink_capacity() {
        let mut roller = StubItemRoller::always();
        let mut sink = RecordingLootSink::with_capacity(1);
        let mut rng = ConstantRandom(0.0);
        assert!(sink.try_add(roller.roll_item(&mut rng).unwrap()));
        assert!(!sink.try_add(roller.roll_item(&mut rng).unwrap()));
        assert_eq!(sink.accepted.len(), 1);
        assert_eq!(sink.rejected.len(), 1);
    }
}
