//! Headless encounter runner for CI and balance testing.
//!
//! Runs the encounter loop without any presentation layer:
//!
//! - **Run**: play N battles from a save file and report the result
//! - **Batch**: sweep many seeds in parallel and aggregate the results
//! - **Validate**: check a content file for broken references
//!
//! # Output
//!
//! - **stdout**: JSON lines (one battle report per line, then a summary)
//! - **stderr**: human-readable logs
//!
//! # Example
//!
//! ```bash
//! cargo run -p gauntlet_headless -- run --battles 5 --seed 7
//! cargo run -p gauntlet_headless -- batch --runs 64 --battles 10
//! cargo run -p gauntlet_headless -- validate --content assets/content.ron
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod batch;
pub mod content_loader;
pub mod error;
pub mod report;
pub mod repository;
pub mod session;

pub use batch::{run_batch, BatchConfig, BatchResults};
pub use content_loader::load_content;
pub use error::{HeadlessError, Result};
pub use report::{BattleReport, RunSummary};
pub use repository::RonFileProgressRepository;
pub use session::{EncounterSession, SessionConfig};
