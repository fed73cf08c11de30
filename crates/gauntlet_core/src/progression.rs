//! Progression cursor and the battle → map → tier advancer.

use serde::{Deserialize, Serialize};

use crate::content::ContentProvider;

/// Default hero id for a fresh save.
pub const DEFAULT_HERO_ID: &str = "default_hero";

/// Persisted player progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionState {
    /// Current tier index.
    pub tier: usize,
    /// Current map index within the tier.
    pub map: usize,
    /// Current battle index within the map.
    pub battle: usize,
    /// Enemies killed across all battles.
    #[serde(default)]
    pub total_kills: u64,
    /// Hero this progress belongs to.
    #[serde(default = "default_hero_id")]
    pub hero_id: String,
}

fn default_hero_id() -> String {
    DEFAULT_HERO_ID.to_string()
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self {
            tier: 0,
            map: 0,
            battle: 0,
            total_kills: 0,
            hero_id: default_hero_id(),
        }
    }
}

impl ProgressionState {
    /// Cursor pointing at a specific battle.
    #[must_use]
    pub fn at(tier: usize, map: usize, battle: usize) -> Self {
        Self {
            tier,
            map,
            battle,
            ..Self::default()
        }
    }

    /// The `(tier, map, battle)` triple.
    #[must_use]
    pub fn cursor(&self) -> (usize, usize, usize) {
        (self.tier, self.map, self.battle)
    }
}

/// Outcome of advancing past a completed battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionResult {
    /// Tier index of the next battle.
    pub tier: usize,
    /// Map index of the next battle.
    pub map: usize,
    /// Battle index of the next battle.
    pub battle: usize,
    /// Whether the map changed. Also set on a tier change.
    pub map_changed: bool,
    /// Whether the tier changed.
    pub tier_changed: bool,
}

/// Compute the battle after `(tier, map, battle)` without touching any state.
///
/// Order is battle, then map, then tier. Past the last battle of the last
/// tier the cursor stays put and the same battle repeats.
#[must_use]
pub fn next_cursor(
    content: &dyn ContentProvider,
    tier: usize,
    map: usize,
    battle: usize,
) -> ProgressionResult {
    if battle + 1 < content.battle_count(tier, map) {
        return ProgressionResult {
            tier,
            map,
            battle: battle + 1,
            map_changed: false,
            tier_changed: false,
        };
    }

    if map + 1 < content.map_count(tier) {
        return ProgressionResult {
            tier,
            map: map + 1,
            battle: 0,
            map_changed: true,
            tier_changed: false,
        };
    }

    if tier + 1 < content.tier_count() {
        return ProgressionResult {
            tier: tier + 1,
            map: 0,
            battle: 0,
            map_changed: true,
            tier_changed: true,
        };
    }

    ProgressionResult {
        tier,
        map,
        battle,
        map_changed: false,
        tier_changed: false,
    }
}

/// Advance `state` past its current battle and report what changed.
pub fn advance(state: &mut ProgressionState, content: &dyn ContentProvider) -> ProgressionResult {
    let result = next_cursor(content, state.tier, state.map, state.battle);
    state.tier = result.tier;
    state.map = result.map;
    state.battle = result.battle;

    if result.tier_changed {
        tracing::info!(tier = result.tier, "Tier advanced");
    }
    if result.map_changed {
        tracing::info!(tier = result.tier, map = result.map, "Map advanced");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentDatabase;

    #[test]
    fn test_builtin_walks_battles_then_plateaus() {
        let content = ContentDatabase::builtin();
        let mut state = ProgressionState::default();

        for expected in 1..10 {
            let result = advance(&mut state, &content);
            assert_eq!(result.battle, expected);
            assert!(!result.map_changed);
        }
        assert_eq!(state.cursor(), (0, 0, 9));

        let result = advance(&mut state, &content);
        assert_eq!(state.cursor(), (0, 0, 9));
        assert!(!result.map_changed && !result.tier_changed);
    }

    #[test]
    fn test_default_state() {
        let state = ProgressionState::default();
        assert_eq!(state.cursor(), (0, 0, 0));
        assert_eq!(state.total_kills, 0);
        assert_eq!(state.hero_id, "default_hero");
    }

    #[test]
    fn test_old_saves_get_defaults() {
        let state: ProgressionState = ron::from_str("(tier: 1, map: 2, battle: 3)").unwrap();
        assert_eq!(state.cursor(), (1, 2, 3));
        assert_eq!(state.hero_id, DEFAULT_HERO_ID);
    }
}
