//! Combat world: entity store plus the per-tick system pipeline.
//!
//! # Example
//!
//! ```
//! use gauntlet_core::components::CombatStats;
//! use gauntlet_core::rng::SeededRandom;
//! use gauntlet_core::simulation::CombatWorld;
//!
//! let mut world = CombatWorld::default();
//! world.spawn_hero(CombatStats {
//!     max_health: 100.0,
//!     current_health: 100.0,
//!     physical_damage: 10.0,
//!     attack_speed: 1.0,
//!     ..Default::default()
//! });
//!
//! let mut rng = SeededRandom::new(1);
//! let events = world.tick(0.1, &mut rng);
//! assert!(events.deaths.is_empty());
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::components::{AttackCooldown, CombatStats, Combatant, EntityId, Role};
use crate::content::{ContentProvider, WaveDefinition};
use crate::entities::{Entity, EntityStore};
use crate::math::Vec2;
use crate::rng::RandomSource;
use crate::stats::StatCollection;
use crate::systems::{
    death_cleanup_system, hero_attack_system, movement_system, projectile_hit_system,
    projectile_movement_system, DamageEvent, Death,
};
use crate::tuning::CombatTuning;

/// Events generated during one world tick.
#[derive(Debug, Clone, Default)]
pub struct TickEvents {
    /// Projectiles fired this tick.
    pub projectiles_fired: Vec<EntityId>,
    /// Number of projectile hits resolved this tick.
    pub hits: usize,
    /// Enemies removed by cleanup this tick.
    pub deaths: Vec<Death>,
}

/// The combat world.
///
/// Owns every combatant and projectile for the lifetime of the session.
///
/// # System Execution Order
///
/// 1. **Movement** - enemies walk toward the hero
/// 2. **Hero Attack** - hero fires at the nearest enemy
/// 3. **Projectile Movement** - shots home in on their targets
/// 4. **Projectile Hit** - shots in range deal damage
/// 5. **Death Cleanup** - dead enemies and spent shots are removed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatWorld {
    tick: u64,
    entities: EntityStore,
    tuning: CombatTuning,
    #[serde(skip)]
    damage_events: Vec<DamageEvent>,
}

impl Default for CombatWorld {
    fn default() -> Self {
        Self::new(CombatTuning::default())
    }
}

impl CombatWorld {
    /// Create an empty world.
    #[must_use]
    pub fn new(tuning: CombatTuning) -> Self {
        Self {
            tick: 0,
            entities: EntityStore::new(),
            tuning,
            damage_events: Vec::new(),
        }
    }

    /// Number of ticks run so far.
    #[must_use]
    pub const fn get_tick(&self) -> u64 {
        self.tick
    }

    /// Entity store.
    #[must_use]
    pub fn entities(&self) -> &EntityStore {
        &self.entities
    }

    /// Mutable entity store.
    pub fn entities_mut(&mut self) -> &mut EntityStore {
        &mut self.entities
    }

    /// Active tuning.
    #[must_use]
    pub fn tuning(&self) -> &CombatTuning {
        &self.tuning
    }

    /// Advance every system by `dt` seconds.
    pub fn tick<R: RandomSource + ?Sized>(&mut self, dt: f32, rng: &mut R) -> TickEvents {
        let mut events = TickEvents::default();
        let ids = self.entities.sorted_ids();

        movement_system(&mut self.entities, &ids, dt, &self.tuning);

        if let Some(shot) = hero_attack_system(&mut self.entities, &ids, dt, &self.tuning, rng) {
            events.projectiles_fired.push(shot);
        }

        // Re-read ids so shots fired this tick start moving immediately.
        let ids = self.entities.sorted_ids();
        projectile_movement_system(&mut self.entities, &ids, dt, &self.tuning);

        let hits = projectile_hit_system(&mut self.entities, &ids, &self.tuning);
        events.hits = hits.len();
        self.damage_events.extend(hits);

        events.deaths = death_cleanup_system(&mut self.entities, &ids);

        self.tick += 1;
        events
    }

    /// Spawn the hero at the tuned spawn point. Cooldown starts full.
    pub fn spawn_hero(&mut self, stats: CombatStats) -> EntityId {
        let id = self.entities.spawn_combatant(
            self.tuning.hero_spawn,
            Combatant {
                role: Role::Hero,
                stats,
                cooldown: Some(AttackCooldown::new(stats.attack_interval())),
                dead: false,
                actor_id: 0,
                definition_id: None,
                wave_index: 0,
            },
        );
        tracing::debug!(
            damage = stats.physical_damage,
            attack_speed = stats.attack_speed,
            "Hero spawned"
        );
        id
    }

    /// Hero entity, if spawned.
    #[must_use]
    pub fn hero(&self) -> Option<&Entity> {
        self.entities.get(self.entities.hero_id()?)
    }

    /// Push new hero stats onto the live hero.
    ///
    /// Updates the stat block and cooldown length but keeps the running
    /// timer and current health. Returns `false` when no hero exists.
    pub fn apply_hero_stats(&mut self, stats: &StatCollection) -> bool {
        let fresh = CombatStats::from_collection(stats);
        let Some(combatant) = self
            .entities
            .hero_id()
            .and_then(|id| self.entities.get_mut(id))
            .and_then(|e| e.combatant.as_mut())
        else {
            return false;
        };

        combatant.stats = CombatStats {
            current_health: combatant.stats.current_health,
            ..fresh
        };
        let interval = fresh.attack_interval();
        match combatant.cooldown.as_mut() {
            Some(cooldown) => cooldown.cooldown = interval,
            None => combatant.cooldown = Some(AttackCooldown::new(interval)),
        }

        tracing::debug!(
            damage = fresh.physical_damage,
            attack_speed = fresh.attack_speed,
            "Hero stats applied"
        );
        true
    }

    /// Spawn every group of `wave`, scaling enemy stats by `scaling`.
    ///
    /// Groups whose enemy id is unknown are skipped with a warning. Returns
    /// the number of enemies spawned.
    pub fn spawn_wave<R: RandomSource + ?Sized>(
        &mut self,
        wave: &WaveDefinition,
        wave_index: usize,
        scaling: f32,
        content: &dyn ContentProvider,
        rng: &mut R,
    ) -> usize {
        let mut spawned = 0;

        for spawn in &wave.spawns {
            let Some(definition) = content.enemy(&spawn.enemy_id) else {
                tracing::warn!(
                    enemy = %spawn.enemy_id,
                    wave = wave_index,
                    "Enemy definition not found, skipping spawn group"
                );
                continue;
            };
            let stats =
                CombatStats::for_enemy(definition.scaled(scaling), self.tuning.enemy_attack_speed);
            let half_width = (spawn.count as f32 - 1.0) / 2.0;

            for i in 0..spawn.count {
                let jitter = rng.range_f32(-self.tuning.enemy_jitter, self.tuning.enemy_jitter);
                let x = (i as f32 - half_width) * self.tuning.enemy_spacing + jitter;
                let y = rng.range_f32(self.tuning.enemy_spawn_min_y, self.tuning.enemy_spawn_max_y);

                self.entities.spawn_combatant(
                    Vec2::new(x, y),
                    Combatant {
                        role: Role::Enemy,
                        stats,
                        cooldown: None,
                        dead: false,
                        actor_id: 0,
                        definition_id: Some(definition.id.clone()),
                        wave_index,
                    },
                );
                spawned += 1;
            }
        }

        tracing::debug!(wave = wave_index, spawned, scaling, "Wave spawned");
        spawned
    }

    /// Enemies not flagged dead.
    #[must_use]
    pub fn alive_enemy_count(&self) -> usize {
        self.entities.alive_enemy_count()
    }

    /// Take every buffered damage event.
    pub fn drain_damage_events(&mut self) -> Vec<DamageEvent> {
        std::mem::take(&mut self.damage_events)
    }

    /// Hash of the world state, for checking that two runs agree.
    ///
    /// Covers the tick counter, every entity in id order, positions, health
    /// and projectile data. Floats are hashed by bit pattern.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.tick.hash(&mut hasher);

        let ids = self.entities.sorted_ids();
        ids.len().hash(&mut hasher);

        for id in ids {
            let Some(entity) = self.entities.get(id) else {
                continue;
            };
            id.hash(&mut hasher);
            entity.position.x.to_bits().hash(&mut hasher);
            entity.position.y.to_bits().hash(&mut hasher);

            if let Some(combatant) = &entity.combatant {
                combatant.actor_id.hash(&mut hasher);
                combatant.dead.hash(&mut hasher);
                combatant.stats.current_health.to_bits().hash(&mut hasher);
                if let Some(cooldown) = combatant.cooldown {
                    cooldown.timer.to_bits().hash(&mut hasher);
                }
            }

            if let Some(projectile) = &entity.projectile {
                projectile.target.hash(&mut hasher);
                projectile.damage.to_bits().hash(&mut hasher);
                projectile.is_critical.hash(&mut hasher);
            }
        }

        hasher.finish()
    }

    /// Buffered damage events not yet drained.
    #[must_use]
    pub fn pending_damage_events(&self) -> &[DamageEvent] {
        &self.damage_events
    }
}
