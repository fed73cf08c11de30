//! Error types for the headless runner.

use std::path::PathBuf;

use gauntlet_core::error::EncounterError;
use thiserror::Error;

/// Result type alias using [`HeadlessError`].
pub type Result<T> = std::result::Result<T, HeadlessError>;

/// Errors raised while loading files or driving a session.
#[derive(Debug, Error)]
pub enum HeadlessError {
    /// A file could not be read or written.
    #[error("IO error on '{path}': {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// A RON file did not parse.
    #[error("Failed to parse '{path}': {source}")]
    RonParse {
        /// File involved.
        path: PathBuf,
        /// Parser error with position.
        source: ron::error::SpannedError,
    },

    /// A value could not be written as RON.
    #[error("Failed to write RON: {0}")]
    RonWrite(#[from] ron::Error),

    /// A report could not be written as JSON.
    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The encounter core reported an error.
    #[error(transparent)]
    Encounter(#[from] EncounterError),

    /// A run hit its tick limit before finishing its battles.
    #[error("Tick limit of {max_ticks} reached after {completed} of {requested} battles")]
    TickLimit {
        /// Configured limit.
        max_ticks: u64,
        /// Battles finished before the limit.
        completed: u64,
        /// Battles requested.
        requested: u64,
    },
}

impl HeadlessError {
    /// Wrap an IO error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
