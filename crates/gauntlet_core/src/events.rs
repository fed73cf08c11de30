//! Outbound notifications.
//!
//! The core appends to one queue per notification kind; an external consumer
//! drains them. Nothing in the core reads these back.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::combat::{DamageResult, DamageType};
use crate::content::RewardEntry;
use crate::items::Rarity;
use crate::stats::StatType;
use crate::systems::DamageEvent;

/// A wave was announced; its enemies spawn after the delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveStarted {
    /// Zero-based wave index.
    pub wave_index: usize,
    /// Waves in the battle.
    pub total_waves: usize,
}

/// A battle began.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleStarted {
    /// Tier index.
    pub tier: usize,
    /// Map index.
    pub map: usize,
    /// Battle index.
    pub battle: usize,
    /// Battles in the current map.
    pub total_battles: usize,
    /// Tier display name, or `"Unknown"`.
    pub tier_name: String,
}

/// A battle was cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleCompleted {
    /// Tier index.
    pub tier: usize,
    /// Map index.
    pub map: usize,
    /// Battle index.
    pub battle: usize,
    /// Configured rewards of the battle.
    pub rewards: Vec<RewardEntry>,
}

/// An item was accepted into the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootDropped {
    /// Item display name.
    pub name: String,
    /// Item rarity.
    pub rarity: Rarity,
}

/// A hit landed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageDealt {
    /// Resolved damage.
    pub result: DamageResult,
    /// Whether the hero dealt the damage.
    pub is_hero_damage: bool,
    /// Impact x.
    pub world_x: f32,
    /// Impact y.
    pub world_y: f32,
    /// Actor id of the target.
    pub target_actor: u64,
}

impl From<DamageEvent> for DamageDealt {
    fn from(event: DamageEvent) -> Self {
        Self {
            result: DamageResult {
                raw: event.raw,
                mitigated: event.amount,
                is_critical: event.is_critical,
                damage_type: DamageType::Physical,
            },
            is_hero_damage: true,
            world_x: event.position.x,
            world_y: event.position.y,
            target_actor: event.target_actor,
        }
    }
}

/// An enemy was removed after dying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyKilled {
    /// Enemy definition id.
    pub definition_id: String,
    /// Wave that spawned it.
    pub wave_index: usize,
}

/// The hero's final stats changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroStatsChanged {
    /// Final value of every tracked stat.
    pub final_stats: BTreeMap<StatType, f32>,
}

/// Queues of pending notifications, one per kind.
#[derive(Debug, Clone, Default)]
pub struct EncounterEvents {
    /// Wave announcements.
    pub wave_started: Vec<WaveStarted>,
    /// Battle starts.
    pub battle_started: Vec<BattleStarted>,
    /// Battle completions.
    pub battle_completed: Vec<BattleCompleted>,
    /// Accepted loot.
    pub loot_dropped: Vec<LootDropped>,
    /// Resolved hits.
    pub damage_dealt: Vec<DamageDealt>,
    /// Removed enemies.
    pub enemy_killed: Vec<EnemyKilled>,
}

impl EncounterEvents {
    /// Create empty queues.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queue, leaving them empty.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Drop everything queued.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether every queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.wave_started.is_empty()
            && self.battle_started.is_empty()
            && self.battle_completed.is_empty()
            && self.loot_dropped.is_empty()
            && self.damage_dealt.is_empty()
            && self.enemy_killed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;

    #[test]
    fn test_damage_event_maps_to_notification() {
        let dealt = DamageDealt::from(DamageEvent {
            amount: 9.0,
            raw: 10.0,
            position: Vec2::new(1.0, 2.0),
            is_critical: true,
            target_actor: 4,
            killed: false,
        });
        assert_eq!(dealt.result.mitigated, 9.0);
        assert_eq!(dealt.result.raw, 10.0);
        assert!(dealt.result.is_critical);
        assert!(dealt.is_hero_damage);
        assert_eq!((dealt.world_x, dealt.world_y), (1.0, 2.0));
    }

    #[test]
    fn test_take_empties_queues() {
        let mut events = EncounterEvents::new();
        events.wave_started.push(WaveStarted {
            wave_index: 0,
            total_waves: 2,
        });
        let taken = events.take();
        assert_eq!(taken.wave_started.len(), 1);
        assert!(events.is_empty());
    }
}
