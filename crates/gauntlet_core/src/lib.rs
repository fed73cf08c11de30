//! # Gauntlet Core
//!
//! Combat encounter simulation and progression engine.
//!
//! This crate contains **only** simulation logic:
//! - No rendering
//! - No IO (content arrives as RON text, saves go through a port)
//! - No ambient randomness (every roll uses an injected [`rng::RandomSource`])
//!
//! A battle is a list of waves; battles live in maps, maps in tiers. The
//! [`battle_flow::BattleFlowController`] walks that hierarchy tick by tick,
//! spawning waves into a [`simulation::CombatWorld`], granting loot and
//! advancing the [`progression::ProgressionState`] cursor.
//!
//! ## Crate Structure
//!
//! - [`stats`] - Flat / increased / more stat aggregation
//! - [`combat`] - Crit rolls and armor mitigation
//! - [`entities`] / [`components`] - Entity store and combat components
//! - [`systems`] - Per-tick combat systems
//! - [`simulation`] - The combat world and its tick pipeline
//! - [`battle_flow`] - Battle and wave state machine
//! - [`progression`] - Battle → map → tier advancement
//! - [`rewards`] - Loot drop rolls and the inventory port
//! - [`content`] - Content definitions, lookups and built-in content

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod battle_flow;
pub mod combat;
pub mod components;
pub mod content;
pub mod entities;
pub mod error;
pub mod events;
pub mod hero;
pub mod items;
pub mod math;
pub mod persistence;
pub mod progression;
pub mod rewards;
pub mod rng;
pub mod simulation;
pub mod stats;
pub mod systems;
pub mod tuning;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::battle_flow::{BattleFlowController, BattlePhase, TickContext};
    pub use crate::combat::{resolve_damage, DamageResult, DamageType};
    pub use crate::components::*;
    pub use crate::content::{ContentDatabase, ContentProvider};
    pub use crate::error::{EncounterError, Result};
    pub use crate::events::EncounterEvents;
    pub use crate::hero::HeroState;
    pub use crate::items::{ItemInstance, ItemRoller, Rarity, TableItemRoller};
    pub use crate::math::Vec2;
    pub use crate::persistence::{InMemoryProgressRepository, ProgressRepository};
    pub use crate::progression::{ProgressionResult, ProgressionState};
    pub use crate::rewards::{LootBag, LootSink};
    pub use crate::rng::{RandomSource, SeededRandom};
    pub use crate::simulation::CombatWorld;
    pub use crate::stats::{Modifier, ModifierKind, StatCollection, StatType};
    pub use crate::tuning::CombatTuning;
}
