//! Battle and wave phase controller.
//!
//! Drives one battle at a time through its waves, then grants rewards,
//! advances progression and starts the next battle.
//!
//! ```text
//! WaitingToStart ─► WaveDelay ─► WaveActive ─┬─► WaveDelay (next wave)
//!                       ▲                    └─► BattleComplete
//!                       └──────── next battle ◄──────┘
//! ```
//!
//! A cursor that does not resolve to a battle halts the controller for good.

use crate::content::{BattleDefinition, ContentProvider};
use crate::error::{EncounterError, Result};
use crate::events::{
    BattleCompleted, BattleStarted, DamageDealt, EncounterEvents, EnemyKilled, LootDropped,
    WaveStarted,
};
use crate::items::ItemRoller;
use crate::progression::{advance, ProgressionState};
use crate::rewards::{grant_battle_rewards, LootSink};
use crate::rng::RandomSource;
use crate::simulation::CombatWorld;

/// Tier name published when the tier definition is missing.
const UNKNOWN_TIER_NAME: &str = "Unknown";

/// Controller phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    /// No battle resolved yet; waiting for a hero in the world.
    WaitingToStart,
    /// Counting down before the current wave spawns.
    WaveDelay,
    /// Current wave is on the field.
    WaveActive,
    /// Every wave cleared; rewards are granted on the next tick.
    BattleComplete,
    /// Configuration error; the controller will not tick again.
    Halted,
}

/// Everything the controller touches during one tick.
pub struct TickContext<'a> {
    /// Content lookups.
    pub content: &'a dyn ContentProvider,
    /// Random source for spawns, crits and loot.
    pub rng: &'a mut dyn RandomSource,
    /// Progress cursor, advanced on battle completion.
    pub progression: &'a mut ProgressionState,
    /// Combat world.
    pub world: &'a mut CombatWorld,
    /// Loot roller.
    pub item_roller: &'a mut dyn ItemRoller,
    /// Inventory receiving loot.
    pub loot_sink: &'a mut dyn LootSink,
    /// Outbound notifications.
    pub events: &'a mut EncounterEvents,
}

/// The battle/wave state machine.
#[derive(Debug, Clone)]
pub struct BattleFlowController {
    phase: BattlePhase,
    battle: Option<BattleDefinition>,
    wave_index: usize,
    wave_delay_timer: f32,
    battles_completed: u64,
    halted_at: Option<(usize, usize, usize)>,
}

impl Default for BattleFlowController {
    fn default() -> Self {
        Self::new()
    }
}

impl BattleFlowController {
    /// Controller waiting to start.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: BattlePhase::WaitingToStart,
            battle: None,
            wave_index: 0,
            wave_delay_timer: 0.0,
            battles_completed: 0,
            halted_at: None,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    /// Battle being fought.
    #[must_use]
    pub fn current_battle(&self) -> Option<&BattleDefinition> {
        self.battle.as_ref()
    }

    /// Index of the current wave.
    #[must_use]
    pub fn wave_index(&self) -> usize {
        self.wave_index
    }

    /// Seconds left before the pending wave spawns.
    #[must_use]
    pub fn wave_delay_remaining(&self) -> f32 {
        self.wave_delay_timer.max(0.0)
    }

    /// Battles completed since construction.
    #[must_use]
    pub fn battles_completed(&self) -> u64 {
        self.battles_completed
    }

    /// Whether the controller has halted.
    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.phase == BattlePhase::Halted
    }

    /// Discard battle state and wait to start again.
    pub fn reset(&mut self) {
        *self = Self {
            battles_completed: self.battles_completed,
            ..Self::new()
        };
    }

    /// Run phase logic, then one world tick.
    ///
    /// # Errors
    ///
    /// [`EncounterError::BattleNotFound`] the tick the cursor fails to
    /// resolve, and [`EncounterError::ControllerHalted`] on every tick after.
    pub fn tick(&mut self, ctx: &mut TickContext<'_>, dt: f32) -> Result<()> {
        match self.phase {
            BattlePhase::Halted => {
                let (tier, map, battle) = self
                    .halted_at
                    .unwrap_or_else(|| ctx.progression.cursor());
                return Err(EncounterError::ControllerHalted { tier, map, battle });
            }
            BattlePhase::WaitingToStart => self.try_start(ctx)?,
            BattlePhase::WaveDelay => self.update_wave_delay(ctx, dt),
            BattlePhase::WaveActive => self.update_wave_active(ctx),
            BattlePhase::BattleComplete => self.complete_battle(ctx)?,
        }

        Self::run_world(ctx, dt);
        Ok(())
    }

    fn try_start(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        if ctx.world.hero().is_none() {
            return Ok(());
        }
        self.start_battle(ctx)
    }

    fn start_battle(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        let (tier, map, battle) = ctx.progression.cursor();
        let Some(definition) = ctx.content.battle(tier, map, battle) else {
            tracing::error!(tier, map, battle, "No battle found for current progress, halting");
            self.phase = BattlePhase::Halted;
            self.halted_at = Some((tier, map, battle));
            self.battle = None;
            return Err(EncounterError::BattleNotFound { tier, map, battle });
        };

        self.wave_index = 0;
        self.battle = Some(definition.clone());

        let tier_name = ctx
            .content
            .tier(tier)
            .map_or_else(|| UNKNOWN_TIER_NAME.to_string(), |t| t.name.clone());
        ctx.events.battle_started.push(BattleStarted {
            tier,
            map,
            battle,
            total_battles: ctx.content.battle_count(tier, map),
            tier_name,
        });
        tracing::info!(
            tier,
            map,
            battle,
            id = %definition.id,
            waves = definition.waves.len(),
            "Battle started"
        );

        self.start_wave_delay(ctx);
        Ok(())
    }

    fn start_wave_delay(&mut self, ctx: &mut TickContext<'_>) {
        let Some(battle) = self.battle.as_ref() else {
            return;
        };
        let Some(wave) = battle.waves.get(self.wave_index) else {
            self.phase = BattlePhase::BattleComplete;
            return;
        };

        self.wave_delay_timer = wave.delay_before_wave;
        self.phase = BattlePhase::WaveDelay;
        ctx.events.wave_started.push(WaveStarted {
            wave_index: self.wave_index,
            total_waves: battle.waves.len(),
        });
    }

    fn update_wave_delay(&mut self, ctx: &mut TickContext<'_>, dt: f32) {
        self.wave_delay_timer -= dt;
        if self.wave_delay_timer > 0.0 {
            return;
        }

        let Some(wave) = self
            .battle
            .as_ref()
            .and_then(|b| b.waves.get(self.wave_index))
        else {
            self.phase = BattlePhase::BattleComplete;
            return;
        };

        let scaling = ctx.content.tier_scaling(ctx.progression.tier);
        ctx.world
            .spawn_wave(wave, self.wave_index, scaling, ctx.content, &mut *ctx.rng);
        self.phase = BattlePhase::WaveActive;
    }

    fn update_wave_active(&mut self, ctx: &mut TickContext<'_>) {
        if ctx.world.alive_enemy_count() > 0 {
            return;
        }
        self.wave_index += 1;
        self.start_wave_delay(ctx);
    }

    fn complete_battle(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        let (tier, map, battle) = ctx.progression.cursor();
        let (id, rewards) = self
            .battle
            .as_ref()
            .map(|b| (b.id.clone(), b.rewards.clone()))
            .unwrap_or_default();

        ctx.events.battle_completed.push(BattleCompleted {
            tier,
            map,
            battle,
            rewards,
        });
        tracing::info!(tier, map, battle, id = %id, "Battle completed");

        Self::grant_rewards(ctx, battle, tier);
        advance(ctx.progression, ctx.content);
        self.battles_completed += 1;

        self.start_battle(ctx)
    }

    fn grant_rewards(ctx: &mut TickContext<'_>, battle: usize, tier: usize) {
        let drops = grant_battle_rewards(
            battle,
            tier,
            ctx.content,
            &mut *ctx.rng,
            &mut *ctx.item_roller,
        );

        for item in drops {
            let name = item.name().to_string();
            let rarity = item.rarity();
            if ctx.loot_sink.try_add(item) {
                tracing::info!(item = %name, ?rarity, "Loot granted");
                ctx.events.loot_dropped.push(LootDropped { name, rarity });
            } else {
                tracing::info!(item = %name, "Inventory full, loot discarded");
            }
        }
    }

    fn run_world(ctx: &mut TickContext<'_>, dt: f32) {
        let tick = ctx.world.tick(dt, &mut *ctx.rng);

        for death in tick.deaths {
            ctx.progression.total_kills += 1;
            ctx.events.enemy_killed.push(EnemyKilled {
                definition_id: death.definition_id.unwrap_or_default(),
                wave_index: death.wave_index,
            });
        }

        ctx.events.damage_dealt.extend(
            ctx.world
                .drain_damage_events()
                .into_iter()
                .map(DamageDealt::from),
        );
    }
}
