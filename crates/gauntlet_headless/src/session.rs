//! A self-contained encounter session.
//!
//! Owns everything the battle flow controller borrows each tick: content,
//! seeded randomness, progression, the combat world, the item roller and the
//! loot bag.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use gauntlet_core::battle_flow::{BattleFlowController, TickContext};
use gauntlet_core::components::CombatStats;
use gauntlet_core::content::ContentDatabase;
use gauntlet_core::events::{EncounterEvents, HeroStatsChanged};
use gauntlet_core::hero::HeroState;
use gauntlet_core::items::{EquipmentSlot, ItemInstance, TableItemRoller};
use gauntlet_core::persistence::ProgressRepository;
use gauntlet_core::progression::ProgressionState;
use gauntlet_core::rewards::LootBag;
use gauntlet_core::rng::SeededRandom;
use gauntlet_core::simulation::CombatWorld;
use gauntlet_core::tuning::CombatTuning;

use crate::error::{HeadlessError, Result};
use crate::report::{BattleReport, LootReport, RunSummary};

/// Session settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Seed for every random roll in the session.
    pub seed: u64,
    /// Loot bag size.
    pub inventory_capacity: usize,
    /// Equip the newest item per slot whenever loot lands.
    pub auto_equip: bool,
    /// Combat constants.
    pub tuning: CombatTuning,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            inventory_capacity: 20,
            auto_equip: false,
            tuning: CombatTuning::default(),
        }
    }
}

impl SessionConfig {
    /// Set the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the loot bag size.
    pub fn with_inventory_capacity(mut self, capacity: usize) -> Self {
        self.inventory_capacity = capacity;
        self
    }

    /// Enable or disable auto-equip.
    pub fn with_auto_equip(mut self, auto_equip: bool) -> Self {
        self.auto_equip = auto_equip;
        self
    }
}

/// One hero fighting through the content.
#[derive(Debug)]
pub struct EncounterSession {
    content: ContentDatabase,
    rng: SeededRandom,
    progression: ProgressionState,
    world: CombatWorld,
    controller: BattleFlowController,
    roller: TableItemRoller,
    bag: LootBag,
    hero: HeroState,
    events: EncounterEvents,
    config: SessionConfig,
}

impl EncounterSession {
    /// Start a session at `progression`, spawning the hero immediately.
    pub fn new(
        content: ContentDatabase,
        progression: ProgressionState,
        config: SessionConfig,
    ) -> Self {
        let hero = HeroState::new(progression.hero_id.clone());
        let mut world = CombatWorld::new(config.tuning);
        world.spawn_hero(CombatStats::from_collection(hero.stats()));
        let roller = TableItemRoller::new(content.items().to_vec());

        tracing::info!(
            seed = config.seed,
            tier = progression.tier,
            map = progression.map,
            battle = progression.battle,
            "Session created"
        );

        Self {
            content,
            rng: SeededRandom::new(config.seed),
            progression,
            world,
            controller: BattleFlowController::new(),
            roller,
            bag: LootBag::new(config.inventory_capacity),
            hero,
            events: EncounterEvents::new(),
            config,
        }
    }

    /// Start a session from whatever `repository` holds.
    ///
    /// # Errors
    ///
    /// Returns the repository's error if the save can't be read.
    pub fn resume(
        content: ContentDatabase,
        repository: &dyn ProgressRepository,
        config: SessionConfig,
    ) -> Result<Self> {
        let progression = repository.load_or_default()?;
        Ok(Self::new(content, progression, config))
    }

    /// Current progress.
    pub fn progression(&self) -> &ProgressionState {
        &self.progression
    }

    /// The combat world.
    pub fn world(&self) -> &CombatWorld {
        &self.world
    }

    /// The phase controller.
    pub fn controller(&self) -> &BattleFlowController {
        &self.controller
    }

    /// Collected loot.
    pub fn bag(&self) -> &LootBag {
        &self.bag
    }

    /// Hero stats outside combat.
    pub fn hero(&self) -> &HeroState {
        &self.hero
    }

    /// Settings the session was created with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Advance one tick and return the notifications it produced.
    ///
    /// # Errors
    ///
    /// Returns the controller's error when the cursor has no battle.
    pub fn step(&mut self, dt: f32) -> Result<EncounterEvents> {
        let mut ctx = TickContext {
            content: &self.content,
            rng: &mut self.rng,
            progression: &mut self.progression,
            world: &mut self.world,
            item_roller: &mut self.roller,
            loot_sink: &mut self.bag,
            events: &mut self.events,
        };
        self.controller.tick(&mut ctx, dt)?;

        let events = self.events.take();
        if self.config.auto_equip && !events.loot_dropped.is_empty() {
            self.equip_best();
        }
        Ok(events)
    }

    /// Equip the newest bag item in each slot and push the stats to the live hero.
    pub fn equip_best(&mut self) -> HeroStatsChanged {
        let mut by_slot: BTreeMap<EquipmentSlot, &ItemInstance> = BTreeMap::new();
        for item in self.bag.items() {
            by_slot.insert(item.definition.slot, item);
        }

        let changed = self.hero.apply_equipment(by_slot.into_values());
        self.world.apply_hero_stats(self.hero.stats());
        changed
    }

    /// Play until `battles` more battles complete.
    ///
    /// `on_battle` sees a report for every completed battle, in order.
    ///
    /// # Errors
    ///
    /// Returns [`HeadlessError::TickLimit`] after `max_ticks` ticks, any
    /// controller error, and whatever `on_battle` returns.
    pub fn run_battles<F>(
        &mut self,
        battles: u64,
        dt: f32,
        max_ticks: u64,
        mut on_battle: F,
    ) -> Result<RunSummary>
    where
        F: FnMut(&BattleReport) -> Result<()>,
    {
        let start = self.controller.battles_completed();
        let mut ticks = 0_u64;
        let mut kills = 0_u64;
        let mut loot = Vec::new();

        let mut battle_kills = 0_u64;
        let mut battle_hits = 0_u64;
        let mut battle_loot = Vec::new();

        while self.controller.battles_completed() - start < battles {
            if ticks >= max_ticks {
                return Err(HeadlessError::TickLimit {
                    max_ticks,
                    completed: self.controller.battles_completed() - start,
                    requested: battles,
                });
            }

            let events = self.step(dt)?;
            ticks += 1;

            battle_kills += events.enemy_killed.len() as u64;
            battle_hits += events.damage_dealt.len() as u64;
            battle_loot.extend(events.loot_dropped.iter().map(|drop| LootReport {
                name: drop.name.clone(),
                rarity: drop.rarity,
            }));

            for completed in &events.battle_completed {
                let report = BattleReport {
                    tier: completed.tier,
                    map: completed.map,
                    battle: completed.battle,
                    kills: battle_kills,
                    hits: battle_hits,
                    loot: std::mem::take(&mut battle_loot),
                    tick: self.world.get_tick(),
                };
                on_battle(&report)?;

                kills += report.kills;
                loot.extend(report.loot);
                battle_kills = 0;
                battle_hits = 0;
            }
        }

        let summary = RunSummary {
            seed: self.config.seed,
            battles_completed: self.controller.battles_completed() - start,
            kills,
            total_kills: self.progression.total_kills,
            loot,
            final_cursor: self.progression.cursor().into(),
            ticks,
            state_hash: self.world.state_hash(),
        };
        tracing::info!(
            battles = summary.battles_completed,
            kills = summary.kills,
            ticks = summary.ticks,
            "Run finished"
        );
        Ok(summary)
    }

    /// Persist the current progress.
    ///
    /// # Errors
    ///
    /// Returns the repository's error if the save fails.
    pub fn save(&self, repository: &mut dyn ProgressRepository) -> Result<()> {
        repository.save(&self.progression)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauntlet_core::battle_flow::BattlePhase;
    use gauntlet_core::persistence::InMemoryProgressRepository;

    fn session(seed: u64) -> EncounterSession {
        EncounterSession::new(
            ContentDatabase::builtin(),
            ProgressionState::default(),
            SessionConfig::default().with_seed(seed),
        )
    }

    #[test]
    fn test_first_step_starts_battle() {
        let mut session = session(1);
        let events = session.step(0.05).unwrap();
        assert_eq!(events.battle_started.len(), 1);
        assert_eq!(events.battle_started[0].tier_name, "Act I");
        assert_eq!(session.controller().phase(), BattlePhase::WaveDelay);
    }

    #[test]
    fn test_run_reports_each_battle() {
        let mut session = session(3);
        let mut reports = Vec::new();
        let summary = session
            .run_battles(2, 0.05, 200_000, |r| {
                reports.push(r.clone());
                Ok(())
            })
            .unwrap();

        assert_eq!(summary.battles_completed, 2);
        assert_eq!(reports.len(), 2);
        assert_eq!((reports[0].battle, reports[1].battle), (0, 1));
        assert_eq!(summary.kills, reports.iter().map(|r| r.kills).sum::<u64>());
        assert_eq!(summary.total_kills, summary.kills);
        assert_eq!(session.progression().cursor(), (0, 0, 2));
        assert!(reports.iter().all(|r| r.kills > 0 && r.hits >= r.kills));
    }

    #[test]
    fn test_tick_limit() {
        let mut session = session(5);
        let err = session.run_battles(1, 0.05, 10, |_| Ok(())).unwrap_err();
        assert!(matches!(
            err,
            HeadlessError::TickLimit {
                max_ticks: 10,
                completed: 0,
                requested: 1
            }
        ));
    }

    #[test]
    fn test_same_seed_same_summary() {
        let a = session(9).run_battles(3, 0.05, 200_000, |_| Ok(())).unwrap();
        let b = session(9).run_battles(3, 0.05, 200_000, |_| Ok(())).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_save_and_resume() {
        let mut repo = InMemoryProgressRepository::new();
        let mut first = session(2);
        first.run_battles(1, 0.05, 200_000, |_| Ok(())).unwrap();
        first.save(&mut repo).unwrap();

        let resumed =
            EncounterSession::resume(ContentDatabase::builtin(), &repo, SessionConfig::default())
                .unwrap();
        assert_eq!(resumed.progression().cursor(), (0, 0, 1));
        assert_eq!(resumed.progression().total_kills, first.progression().total_kills);
    }

    #[test]
    fn test_equip_best_updates_live_hero() {
        let mut session = EncounterSession::new(
            ContentDatabase::builtin(),
            ProgressionState::default(),
            SessionConfig::default().with_seed(4).with_auto_equip(true),
        );
        let before = session.world().hero().and_then(|h| h.combatant.clone()).unwrap();
        session.run_battles(10, 0.05, 500_000, |_| Ok(())).unwrap();

        let changed = session.equip_best();
        if session.bag().is_empty() {
            assert_eq!(changed.final_stats, session.hero().snapshot().final_stats);
            return;
        }
        let after = session.world().hero().and_then(|h| h.combatant.clone()).unwrap();
        assert_eq!(
            after.stats.physical_damage,
            session.hero().stats().final_value(gauntlet_core::stats::StatType::PhysicalDamage)
        );
        assert_eq!(after.stats.current_health, before.stats.current_health);
    }
}
