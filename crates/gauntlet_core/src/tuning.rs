//! Tunable constants for the per-tick combat systems.

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Combat tuning, loadable from RON.
///
/// # Example RON
///
/// ```ron
/// CombatTuning(
///     melee_range: 1.0,
///     projectile_speed: 12.0,
///     hit_radius: 0.3,
///     hero_crits: false,
/// )
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Enemies stop advancing once this close to the hero.
    pub melee_range: f32,
    /// Hero projectile speed in world units per second.
    pub projectile_speed: f32,
    /// A projectile hits when within this distance of its target.
    pub hit_radius: f32,
    /// A projectile this close to its target stops moving.
    pub projectile_arrival_distance: f32,
    /// Where the hero is placed.
    pub hero_spawn: Vec2,
    /// Lower bound of the enemy spawn row.
    pub enemy_spawn_min_y: f32,
    /// Upper bound of the enemy spawn row.
    pub enemy_spawn_max_y: f32,
    /// Horizontal gap between enemies of one spawn group.
    pub enemy_spacing: f32,
    /// Random horizontal offset applied to each enemy, in `[-jitter, jitter)`.
    pub enemy_jitter: f32,
    /// Attack speed given to spawned enemies.
    pub enemy_attack_speed: f32,
    /// Whether hero shots roll for critical hits when fired.
    pub hero_crits: bool,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            melee_range: 1.0,
            projectile_speed: 12.0,
            hit_radius: 0.3,
            projectile_arrival_distance: 0.2,
            hero_spawn: Vec2::new(0.0, -1.7),
            enemy_spawn_min_y: 5.5,
            enemy_spawn_max_y: 7.0,
            enemy_spacing: 1.0,
            enemy_jitter: 0.3,
            enemy_attack_speed: 0.8,
            hero_crits: true,
        }
    }
}

impl CombatTuning {
    /// Builder method to toggle hero crits.
    #[must_use]
    pub fn with_hero_crits(mut self, enabled: bool) -> Self {
        self.hero_crits = enabled;
        self
    }

    /// Builder method to set the projectile speed.
    #[must_use]
    pub fn with_projectile_speed(mut self, speed: f32) -> Self {
        self.projectile_speed = speed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let tuning: CombatTuning = ron::from_str("(hero_crits: false, hit_radius: 0.5)").unwrap();
        assert!(!tuning.hero_crits);
        assert_eq!(tuning.hit_radius, 0.5);
        assert_eq!(tuning.projectile_speed, 12.0);
        assert_eq!(tuning.hero_spawn, Vec2::new(0.0, -1.7));
    }
}
