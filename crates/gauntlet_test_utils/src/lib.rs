//! # Gauntlet Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Scripted random sources and other test doubles
//! - Content fixtures with exact tier/map/battle layouts
//! - Determinism harness
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod doubles;
pub mod fixtures;
pub mod strategies;

/// Re-export proptest for convenience.
pub use proptest;
