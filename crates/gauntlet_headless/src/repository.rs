//! RON save file for progression.

use std::fs;
use std::path::{Path, PathBuf};

use gauntlet_core::error::{EncounterError, Result};
use gauntlet_core::persistence::ProgressRepository;
use gauntlet_core::progression::ProgressionState;

/// Stores [`ProgressionState`] as pretty RON at a fixed path.
#[derive(Debug, Clone)]
pub struct RonFileProgressRepository {
    path: PathBuf,
}

impl RonFileProgressRepository {
    /// Repository backed by `path`. The file is created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Save file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn repository_error(&self, action: &str, err: impl std::fmt::Display) -> EncounterError {
        EncounterError::Repository(format!(
            "failed to {action} '{}': {err}",
            self.path.display()
        ))
    }
}

impl ProgressRepository for RonFileProgressRepository {
    fn load(&self) -> Result<Option<ProgressionState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path).map_err(|e| self.repository_error("read", e))?;
        let state: ProgressionState =
            ron::from_str(&text).map_err(|e| self.repository_error("parse", e))?;
        tracing::debug!(
            path = %self.path.display(),
            tier = state.tier,
            map = state.map,
            battle = state.battle,
            "Progress loaded"
        );
        Ok(Some(state))
    }

    fn save(&mut self, state: &ProgressionState) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| self.repository_error("create directory for", e))?;
        }
        let text = ron::ser::to_string_pretty(state, ron::ser::PrettyConfig::default())
            .map_err(|e| self.repository_error("serialize", e))?;
        fs::write(&self.path, text).map_err(|e| self.repository_error("write", e))?;
        tracing::debug!(path = %self.path.display(), "Progress saved");
        Ok(())
    }

    fn has_save(&self) -> bool {
        self.path.exists()
    }
}
