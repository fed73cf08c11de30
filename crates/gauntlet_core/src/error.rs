//! Error types for the encounter simulation.
//!
//! Only configuration problems are errors. Missing targets, missing enemy
//! definitions and full inventories are expected branches and are logged
//! instead of being returned.

use thiserror::Error;

/// Result type alias using [`EncounterError`].
pub type Result<T> = std::result::Result<T, EncounterError>;

/// Top-level error type for the encounter core.
#[derive(Debug, Error)]
pub enum EncounterError {
    /// The progression cursor does not resolve to a battle definition.
    #[error("No battle defined for tier {tier}, map {map}, battle {battle}")]
    BattleNotFound {
        /// Tier index.
        tier: usize,
        /// Map index within the tier.
        map: usize,
        /// Battle index within the map.
        battle: usize,
    },

    /// The phase controller halted earlier and will not tick again.
    #[error("Battle flow halted at tier {tier}, map {map}, battle {battle}")]
    ControllerHalted {
        /// Tier index.
        tier: usize,
        /// Map index within the tier.
        map: usize,
        /// Battle index within the map.
        battle: usize,
    },

    /// Content data could not be parsed.
    #[error("Failed to parse content '{path}': {message}")]
    ContentParse {
        /// Path (or label) of the content source.
        path: String,
        /// Parser message.
        message: String,
    },

    /// Content data parsed but is internally inconsistent.
    #[error("Content validation failed: {0:?}")]
    ContentValidation(Vec<String>),

    /// Progress repository failure.
    #[error("Progress repository error: {0}")]
    Repository(String),

    /// Invalid encounter state.
    #[error("Invalid encounter state: {0}")]
    InvalidState(String),
}
