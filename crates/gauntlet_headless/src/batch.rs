//! Batch runner for balance sweeps.
//!
//! Plays the same content under many seeds in parallel using rayon and
//! aggregates the per-run summaries.

use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use gauntlet_core::content::ContentDatabase;
use gauntlet_core::progression::ProgressionState;

use crate::report::RunSummary;
use crate::session::{EncounterSession, SessionConfig};

/// Configuration for a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of runs.
    pub runs: u32,
    /// Seed of the first run; run `i` uses `seed_start + i`.
    pub seed_start: u64,
    /// Battles per run.
    pub battles: u64,
    /// Fixed timestep in seconds.
    pub dt: f32,
    /// Tick limit per run.
    pub max_ticks: u64,
    /// Session settings shared by every run. The seed is overwritten per run.
    pub session: SessionConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            runs: 32,
            seed_start: 0,
            battles: 10,
            dt: 0.05,
            max_ticks: 500_000,
            session: SessionConfig::default(),
        }
    }
}

impl BatchConfig {
    /// Config for `runs` runs of `battles` battles each.
    pub fn new(runs: u32, battles: u64) -> Self {
        Self {
            runs,
            battles,
            ..Default::default()
        }
    }

    /// Set the first seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed_start = seed;
        self
    }

    /// Set the timestep.
    pub fn with_dt(mut self, dt: f32) -> Self {
        self.dt = dt;
        self
    }
}

/// A run that failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchError {
    /// Seed of the failed run.
    pub seed: u64,
    /// Error message.
    pub message: String,
}

/// Aggregate over all runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Runs that finished.
    pub completed_runs: usize,
    /// Battles completed across all runs.
    pub total_battles: u64,
    /// Kills across all runs.
    pub total_kills: u64,
    /// Items looted across all runs.
    pub total_loot: usize,
    /// Mean world ticks per battle.
    pub mean_ticks_per_battle: f64,
    /// Fewest ticks any run needed.
    pub min_ticks: u64,
    /// Most ticks any run needed.
    pub max_ticks: u64,
}

impl BatchSummary {
    /// Aggregate a set of run summaries.
    pub fn from_runs(runs: &[RunSummary]) -> Self {
        let total_battles: u64 = runs.iter().map(|r| r.battles_completed).sum();
        let total_ticks: u64 = runs.iter().map(|r| r.ticks).sum();
        let mean_ticks_per_battle = if total_battles == 0 {
            0.0
        } else {
            total_ticks as f64 / total_battles as f64
        };

        Self {
            completed_runs: runs.len(),
            total_battles,
            total_kills: runs.iter().map(|r| r.kills).sum(),
            total_loot: runs.iter().map(|r| r.loot.len()).sum(),
            mean_ticks_per_battle,
            min_ticks: runs.iter().map(|r| r.ticks).min().unwrap_or(0),
            max_ticks: runs.iter().map(|r| r.ticks).max().unwrap_or(0),
        }
    }
}

/// Results from a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResults {
    /// Configuration used.
    pub config: BatchConfig,
    /// Per-run summaries, ordered by seed.
    pub runs: Vec<RunSummary>,
    /// Aggregate over `runs`.
    pub summary: BatchSummary,
    /// Failed runs.
    pub errors: Vec<BatchError>,
    /// Wall-clock duration.
    pub duration_seconds: f64,
}

fn run_single(
    content: &ContentDatabase,
    config: &BatchConfig,
    seed: u64,
) -> Result<RunSummary, String> {
    let session_config = config.session.with_seed(seed);
    let mut session =
        EncounterSession::new(content.clone(), ProgressionState::default(), session_config);
    session
        .run_battles(config.battles, config.dt, config.max_ticks, |report| {
            debug!(seed, battle = report.battle, kills = report.kills, "Battle finished");
            Ok(())
        })
        .map_err(|e| e.to_string())
}

/// Run every seed of `config` against `content` in parallel.
pub fn run_batch(content: &ContentDatabase, config: BatchConfig) -> BatchResults {
    let start = Instant::now();
    info!(
        runs = config.runs,
        battles = config.battles,
        seed_start = config.seed_start,
        "Starting batch"
    );

    let outcomes: Vec<(u64, Result<RunSummary, String>)> = (0..config.runs)
        .into_par_iter()
        .map(|i| {
            let seed = config.seed_start + u64::from(i);
            (seed, run_single(content, &config, seed))
        })
        .collect();

    let mut runs = Vec::new();
    let mut errors = Vec::new();
    for (seed, outcome) in outcomes {
        match outcome {
            Ok(summary) => runs.push(summary),
            Err(message) => {
                warn!(seed, error = %message, "Run failed");
                errors.push(BatchError { seed, message });
            }
        }
    }

    let summary = BatchSummary::from_runs(&runs);
    let duration_seconds = start.elapsed().as_secs_f64();
    info!(
        completed = summary.completed_runs,
        failed = errors.len(),
        duration_seconds,
        "Batch finished"
    );

    BatchResults {
        config,
        runs,
        summary,
        errors,
        duration_seconds,
    }
}
