//! Progress persistence port.
//!
//! The core never touches storage. Implementations live with the caller;
//! [`InMemoryProgressRepository`] is provided for tests and ephemeral runs.

use crate::error::Result;
use crate::progression::ProgressionState;

/// Loads and saves [`ProgressionState`].
pub trait ProgressRepository {
    /// Load the saved state, or `None` if nothing has been saved.
    fn load(&self) -> Result<Option<ProgressionState>>;

    /// Persist `state`, replacing any previous save.
    fn save(&mut self, state: &ProgressionState) -> Result<()>;

    /// Whether a save exists.
    fn has_save(&self) -> bool;

    /// Load the saved state or fall back to a fresh one.
    fn load_or_default(&self) -> Result<ProgressionState> {
        Ok(self.load()?.unwrap_or_default())
    }
}

/// Repository that keeps the save in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProgressRepository {
    saved: Option<ProgressionState>,
    save_count: usize,
}

impl InMemoryProgressRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful saves.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl ProgressRepository for InMemoryProgressRepository {
    fn load(&self) -> Result<Option<ProgressionState>> {
        Ok(self.saved.clone())
    }

    fn save(&mut self, state: &ProgressionState) -> Result<()> {
        self.saved = Some(state.clone());
        self.save_count += 1;
        Ok(())
    }

    fn has_save(&self) -> bool {
        self.saved.is_some()
    }
}
