//! Per-tick combat systems.
//!
//! Each system does one thing and runs in a fixed order from
//! [`CombatWorld::tick`](crate::simulation::CombatWorld::tick):
//!
//! 1. [`movement_system`]
//! 2. [`hero_attack_system`]
//! 3. [`projectile_movement_system`]
//! 4. [`projectile_hit_system`]
//! 5. [`death_cleanup_system`]
//!
//! Systems iterate sorted ids so the same inputs always produce the same
//! outputs. None of them removes entities directly; removal is staged and
//! applied by the cleanup pass.

use serde::{Deserialize, Serialize};

use crate::combat::{mitigate, roll_critical};
use crate::components::{ActorId, EntityId, Projectile, Role};
use crate::entities::EntityStore;
use crate::math::Vec2;
use crate::rng::RandomSource;
use crate::tuning::CombatTuning;

/// A resolved projectile hit, buffered until the consumer drains it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageEvent {
    /// Damage after armor.
    pub amount: f32,
    /// Damage before armor.
    pub raw: f32,
    /// Target position at the moment of impact.
    pub position: Vec2,
    /// Whether the shot was critical.
    pub is_critical: bool,
    /// Actor id of the target.
    pub target_actor: ActorId,
    /// Whether the hit killed the target.
    pub killed: bool,
}

/// A combatant removed by the cleanup pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Death {
    /// Entity handle, no longer valid.
    pub entity: EntityId,
    /// Actor id of the removed combatant.
    pub actor_id: ActorId,
    /// Enemy definition id.
    pub definition_id: Option<String>,
    /// Wave that spawned it.
    pub wave_index: usize,
}

fn living_hero_position(store: &EntityStore) -> Option<Vec2> {
    let hero = store.get(store.hero_id()?)?;
    hero.is_living_combatant().then_some(hero.position)
}

/// Moves every living enemy straight toward the hero until within melee range.
pub fn movement_system(store: &mut EntityStore, ids: &[EntityId], dt: f32, tuning: &CombatTuning) {
    let Some(hero_pos) = living_hero_position(store) else {
        return;
    };
    let melee_sq = tuning.melee_range * tuning.melee_range;

    for &id in ids {
        let Some(entity) = store.get_mut(id) else {
            continue;
        };
        let Some(speed) = entity
            .combatant
            .as_ref()
            .filter(|c| c.is_living_enemy())
            .map(|c| c.stats.move_speed)
        else {
            continue;
        };

        if entity.position.distance_squared(hero_pos) <= melee_sq {
            continue;
        }
        entity.position = entity.position.move_towards(hero_pos, speed * dt);
    }
}

/// Nearest living enemy to `from`. Ties go to the lowest id.
#[must_use]
pub fn nearest_living_enemy(store: &EntityStore, ids: &[EntityId], from: Vec2) -> Option<EntityId> {
    let mut nearest = None;
    let mut nearest_dist_sq = f32::MAX;

    for &id in ids {
        let Some(entity) = store.get(id) else {
            continue;
        };
        if !entity.is_living_enemy() {
            continue;
        }
        let dist_sq = from.distance_squared(entity.position);
        if dist_sq < nearest_dist_sq {
            nearest_dist_sq = dist_sq;
            nearest = Some(id);
        }
    }

    nearest
}

/// Counts down the hero's attack timer and fires at the nearest enemy.
///
/// The timer is frozen while no living enemy exists. Returns the spawned
/// projectile, if any.
pub fn hero_attack_system<R: RandomSource + ?Sized>(
    store: &mut EntityStore,
    ids: &[EntityId],
    dt: f32,
    tuning: &CombatTuning,
    rng: &mut R,
) -> Option<EntityId> {
    let hero_id = store.hero_id()?;
    let target = {
        let hero = store.get(hero_id)?;
        if !hero.is_living_combatant() {
            return None;
        }
        nearest_living_enemy(store, ids, hero.position)?
    };

    let (position, stats) = {
        let hero = store.get_mut(hero_id)?;
        let combatant = hero.combatant.as_mut()?;
        let cooldown = combatant.cooldown.as_mut()?;

        cooldown.timer -= dt;
        if cooldown.timer > 0.0 {
            return None;
        }
        cooldown.timer = cooldown.cooldown;
        (hero.position, combatant.stats)
    };

    let (damage, is_critical) = if tuning.hero_crits {
        let crit = roll_critical(
            stats.physical_damage,
            stats.crit_chance,
            stats.crit_multiplier,
            rng,
        );
        (crit.damage, crit.is_critical)
    } else {
        (stats.physical_damage, false)
    };

    Some(store.spawn_projectile(
        position,
        Projectile {
            target,
            speed: tuning.projectile_speed,
            damage,
            is_critical,
            spent: false,
        },
    ))
}

/// Target position if the target exists and is alive.
fn live_target_position(store: &EntityStore, target: EntityId) -> Option<Vec2> {
    store
        .get(target)
        .filter(|t| t.is_living_combatant())
        .map(|t| t.position)
}

/// Advances projectiles toward their targets. Shots whose target is gone or
/// dead fizzle.
pub fn projectile_movement_system(
    store: &mut EntityStore,
    ids: &[EntityId],
    dt: f32,
    tuning: &CombatTuning,
) {
    for &id in ids {
        let Some(projectile) = store
            .get(id)
            .and_then(|e| e.projectile)
            .filter(|p| !p.spent)
        else {
            continue;
        };

        let Some(target_pos) = live_target_position(store, projectile.target) else {
            store.mark_for_removal(id);
            continue;
        };

        let Some(entity) = store.get_mut(id) else {
            continue;
        };
        if entity.position.distance(target_pos) < tuning.projectile_arrival_distance {
            continue;
        }
        entity.position = entity
            .position
            .move_towards(target_pos, projectile.speed * dt);
    }
}

/// Resolves projectiles within hit radius of their target.
///
/// This is a direct distance check per live projectile. A spatial index
/// would be needed if entity counts grow large.
pub fn projectile_hit_system(
    store: &mut EntityStore,
    ids: &[EntityId],
    tuning: &CombatTuning,
) -> Vec<DamageEvent> {
    let hit_sq = tuning.hit_radius * tuning.hit_radius;
    let mut events = Vec::new();

    for &id in ids {
        let Some((projectile, position)) = store
            .get(id)
            .and_then(|e| e.projectile.map(|p| (p, e.position)))
            .filter(|(p, _)| !p.spent)
        else {
            continue;
        };

        let Some(target_pos) = live_target_position(store, projectile.target) else {
            store.mark_for_removal(id);
            continue;
        };

        if position.distance_squared(target_pos) > hit_sq {
            continue;
        }

        let Some(combatant) = store
            .get_mut(projectile.target)
            .and_then(|t| t.combatant.as_mut())
        else {
            continue;
        };

        let amount = mitigate(projectile.damage, combatant.stats.armor);
        combatant.stats.current_health -= amount;
        let killed = combatant.stats.current_health <= 0.0;
        if killed {
            combatant.dead = true;
        }

        events.push(DamageEvent {
            amount,
            raw: projectile.damage,
            position: target_pos,
            is_critical: projectile.is_critical,
            target_actor: combatant.actor_id,
            killed,
        });
        store.mark_for_removal(id);
    }

    events
}

/// Stages dead enemies for removal, then applies every staged removal.
///
/// Returns the enemies that were removed. A dead hero stays in the store.
pub fn death_cleanup_system(store: &mut EntityStore, ids: &[EntityId]) -> Vec<Death> {
    for &id in ids {
        let is_dead_enemy = store
            .get(id)
            .and_then(|e| e.combatant.as_ref())
            .is_some_and(|c| c.role == Role::Enemy && c.dead);
        if is_dead_enemy {
            store.mark_for_removal(id);
        }
    }

    store
        .apply_removals()
        .into_iter()
        .filter_map(|entity| {
            let combatant = entity.combatant?;
            Some(Death {
                entity: entity.id,
                actor_id: combatant.actor_id,
                definition_id: combatant.definition_id,
                wave_index: combatant.wave_index,
            })
        })
        .collect()
}
