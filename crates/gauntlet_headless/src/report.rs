//! JSON reports written to stdout.

use std::io::Write;

use gauntlet_core::items::Rarity;
use serde::{Deserialize, Serialize};

use crate::error::{HeadlessError, Result};

/// One completed battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleReport {
    /// Tier index of the finished battle.
    pub tier: usize,
    /// Map index of the finished battle.
    pub map: usize,
    /// Battle index of the finished battle.
    pub battle: usize,
    /// Enemies killed during this battle.
    pub kills: u64,
    /// Hits landed during this battle.
    pub hits: u64,
    /// Loot accepted into the bag.
    pub loot: Vec<LootReport>,
    /// World tick at completion.
    pub tick: u64,
}

/// An item that landed in the bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootReport {
    /// Display name.
    pub name: String,
    /// Rarity.
    pub rarity: Rarity,
}

/// Progress cursor in report form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorReport {
    /// Tier index.
    pub tier: usize,
    /// Map index.
    pub map: usize,
    /// Battle index.
    pub battle: usize,
}

impl From<(usize, usize, usize)> for CursorReport {
    fn from((tier, map, battle): (usize, usize, usize)) -> Self {
        Self { tier, map, battle }
    }
}

/// Outcome of one `run`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Seed the session was created with.
    pub seed: u64,
    /// Battles completed in this run.
    pub battles_completed: u64,
    /// Enemies killed in this run.
    pub kills: u64,
    /// Kills across the whole save.
    pub total_kills: u64,
    /// Loot accepted in this run.
    pub loot: Vec<LootReport>,
    /// Cursor after the run.
    pub final_cursor: CursorReport,
    /// World ticks simulated in this run.
    pub ticks: u64,
    /// World state hash at the end of the run.
    pub state_hash: u64,
}

impl RunSummary {
    /// Average world ticks per completed battle, 0 when none completed.
    pub fn ticks_per_battle(&self) -> f64 {
        if self.battles_completed == 0 {
            return 0.0;
        }
        self.ticks as f64 / self.battles_completed as f64
    }
}

/// Write `value` as one line of JSON.
///
/// # Errors
///
/// Returns [`HeadlessError::Json`] if serialization fails and
/// [`HeadlessError::Io`] if the writer does.
pub fn write_json_line<T: Serialize, W: Write>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out).map_err(|e| HeadlessError::io("<stdout>", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(battles: u64, ticks: u64) -> RunSummary {
        RunSummary {
            seed: 1,
            battles_completed: battles,
            kills: 0,
            total_kills: 0,
            loot: Vec::new(),
            final_cursor: (0, 0, 0).into(),
            ticks,
            state_hash: 0,
        }
    }

    #[test]
    fn test_ticks_per_battle() {
        assert_eq!(summary(0, 100).ticks_per_battle(), 0.0);
        assert_eq!(summary(4, 100).ticks_per_battle(), 25.0);
    }

    #[test]
    fn test_json_line_ends_with_newline() {
        let mut out = Vec::new();
        write_json_line(&mut out, &summary(1, 10)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 1);

        let parsed: RunSummary = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(parsed.final_cursor, CursorReport { tier: 0, map: 0, battle: 0 });
    }
}
