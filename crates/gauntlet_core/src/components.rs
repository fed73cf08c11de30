//! Component definitions for combat entities.
//!
//! Components are plain data. Systems in [`crate::systems`] read and write
//! them; nothing here has behaviour beyond small constructors.

use serde::{Deserialize, Serialize};

use crate::content::ScaledEnemyStats;
use crate::stats::{StatCollection, StatType};

/// Handle into the [`EntityStore`](crate::entities::EntityStore).
pub type EntityId = u64;

/// Gameplay-facing id used to correlate damage events with actors.
pub type ActorId = u64;

/// Side a combatant fights on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The player's hero.
    Hero,
    /// A spawned enemy.
    Enemy,
}

/// Flat stat block read by the per-tick systems.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CombatStats {
    /// Maximum health.
    pub max_health: f32,
    /// Current health. The combatant dies at or below zero.
    pub current_health: f32,
    /// Damage per hit.
    pub physical_damage: f32,
    /// Attacks per second.
    pub attack_speed: f32,
    /// Armor used for mitigation.
    pub armor: f32,
    /// World units per second.
    pub move_speed: f32,
    /// Crit chance as a fraction.
    pub crit_chance: f32,
    /// Crit damage multiplier.
    pub crit_multiplier: f32,
}

impl CombatStats {
    /// Snapshot the final values of a stat collection.
    #[must_use]
    pub fn from_collection(stats: &StatCollection) -> Self {
        Self {
            max_health: stats.final_value(StatType::MaxHealth),
            current_health: stats.final_value(StatType::CurrentHealth),
            physical_damage: stats.final_value(StatType::PhysicalDamage),
            attack_speed: stats.final_value(StatType::AttackSpeed),
            armor: stats.final_value(StatType::Armor),
            move_speed: stats.final_value(StatType::MovementSpeed),
            crit_chance: stats.final_value(StatType::CriticalChance),
            crit_multiplier: stats.final_value(StatType::CriticalMultiplier),
        }
    }

    /// Stats for a freshly spawned enemy.
    #[must_use]
    pub fn for_enemy(scaled: ScaledEnemyStats, attack_speed: f32) -> Self {
        Self {
            max_health: scaled.health,
            current_health: scaled.health,
            physical_damage: scaled.damage,
            attack_speed,
            armor: scaled.armor,
            move_speed: scaled.speed,
            crit_chance: 0.0,
            crit_multiplier: 1.0,
        }
    }

    /// Seconds between attacks: `1 / attack_speed`, or 1 when attack speed is not positive.
    #[must_use]
    pub fn attack_interval(&self) -> f32 {
        if self.attack_speed > 0.0 {
            1.0 / self.attack_speed
        } else {
            1.0
        }
    }
}

/// Attack timer. Fires when `timer` reaches zero, then resets to `cooldown`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackCooldown {
    /// Seconds between attacks.
    pub cooldown: f32,
    /// Seconds until the next attack.
    pub timer: f32,
}

impl AttackCooldown {
    /// Cooldown starting a full interval away from the first attack.
    #[must_use]
    pub fn new(cooldown: f32) -> Self {
        Self {
            cooldown,
            timer: cooldown,
        }
    }
}

/// Hero or enemy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    /// Side.
    pub role: Role,
    /// Stat block.
    pub stats: CombatStats,
    /// Attack timer, for combatants that auto-attack.
    pub cooldown: Option<AttackCooldown>,
    /// Set once health reaches zero; removal happens in cleanup.
    pub dead: bool,
    /// Stable actor id.
    pub actor_id: ActorId,
    /// Enemy definition this combatant was spawned from.
    pub definition_id: Option<String>,
    /// Wave that spawned this combatant.
    pub wave_index: usize,
}

impl Combatant {
    /// Whether the combatant still counts as alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    /// Whether this is a living enemy.
    #[must_use]
    pub fn is_living_enemy(&self) -> bool {
        self.role == Role::Enemy && !self.dead
    }
}

/// A shot in flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Entity the projectile homes in on.
    pub target: EntityId,
    /// World units per second.
    pub speed: f32,
    /// Damage before armor.
    pub damage: f32,
    /// Whether the shot was a critical when fired.
    pub is_critical: bool,
    /// Hit or fizzled; waiting for removal.
    pub spent: bool,
}
