//! Headless encounter runner.
//!
//! Runs the encounter loop without presentation, writing JSON to stdout and
//! logs to stderr.
//!
//! # Usage
//!
//! ```bash
//! # Play three battles from a save file, creating it if missing
//! cargo run -p gauntlet_headless -- run --battles 3 --save saves/hero.ron
//!
//! # Sweep 64 seeds in parallel
//! cargo run -p gauntlet_headless -- batch --runs 64 --battles 10 --output results.json
//!
//! # Check a content file
//! cargo run -p gauntlet_headless -- validate --content assets/content.ron
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gauntlet_core::persistence::{InMemoryProgressRepository, ProgressRepository};
use gauntlet_headless::{
    batch::{run_batch, BatchConfig},
    content_loader::{load_content, validate_content_file},
    error::{HeadlessError, Result},
    report::write_json_line,
    repository::RonFileProgressRepository,
    session::{EncounterSession, SessionConfig},
};

#[derive(Parser)]
#[command(name = "gauntlet_headless")]
#[command(about = "Headless encounter runner for CI and balance testing")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play battles in one session
    Run {
        /// Content RON file (built-in content when omitted)
        #[arg(short, long)]
        content: Option<PathBuf>,

        /// Number of battles to complete
        #[arg(short, long, default_value = "1")]
        battles: u64,

        /// Random seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Fixed timestep in seconds
        #[arg(long, default_value = "0.05")]
        dt: f32,

        /// Progress save file, loaded at start and written at the end
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Loot bag size
        #[arg(long, default_value = "20")]
        inventory_capacity: usize,

        /// Equip looted items as they drop
        #[arg(long)]
        auto_equip: bool,

        /// Give up after this many ticks
        #[arg(long, default_value = "500000")]
        max_ticks: u64,
    },

    /// Run many seeds in parallel and aggregate
    Batch {
        /// Content RON file (built-in content when omitted)
        #[arg(short, long)]
        content: Option<PathBuf>,

        /// Number of runs
        #[arg(short, long, default_value = "32")]
        runs: u32,

        /// Battles per run
        #[arg(short, long, default_value = "10")]
        battles: u64,

        /// Seed of the first run
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Fixed timestep in seconds
        #[arg(long, default_value = "0.05")]
        dt: f32,

        /// Loot bag size
        #[arg(long, default_value = "20")]
        inventory_capacity: usize,

        /// Also write the full results as pretty JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a content file for broken references
    Validate {
        /// Content RON file
        #[arg(short, long)]
        content: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout is for JSON
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(true),
        )
        .with(filter)
        .init();

    let outcome = match cli.command {
        Commands::Run {
            content,
            battles,
            seed,
            dt,
            save,
            inventory_capacity,
            auto_equip,
            max_ticks,
        } => {
            let config = SessionConfig::default()
                .with_seed(seed)
                .with_inventory_capacity(inventory_capacity)
                .with_auto_equip(auto_equip);
            cmd_run(content, save, config, battles, dt, max_ticks)
        }
        Commands::Batch {
            content,
            runs,
            battles,
            seed,
            dt,
            inventory_capacity,
            output,
        } => {
            let mut config = BatchConfig::new(runs, battles).with_seed(seed).with_dt(dt);
            config.session = config.session.with_inventory_capacity(inventory_capacity);
            cmd_batch(content, config, output)
        }
        Commands::Validate { content } => cmd_validate(content),
    };

    match outcome {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            ExitCode::FAILURE
        }
    }
}

/// Play battles in one session, optionally backed by a save file.
fn cmd_run(
    content: Option<PathBuf>,
    save: Option<PathBuf>,
    config: SessionConfig,
    battles: u64,
    dt: f32,
    max_ticks: u64,
) -> Result<ExitCode> {
    let content = load_content(content.as_deref())?;
    let mut repository: Box<dyn ProgressRepository> = match save {
        Some(path) => Box::new(RonFileProgressRepository::new(path)),
        None => Box::new(InMemoryProgressRepository::new()),
    };

    let mut session = EncounterSession::resume(content, repository.as_ref(), config)?;
    let mut stdout = io::stdout().lock();

    let summary = session.run_battles(battles, dt, max_ticks, |report| {
        write_json_line(&mut stdout, report)
    })?;
    session.save(repository.as_mut())?;

    write_json_line(&mut stdout, &summary)?;
    stdout.flush().map_err(|e| HeadlessError::io("<stdout>", e))?;
    Ok(ExitCode::SUCCESS)
}

/// Sweep seeds in parallel.
fn cmd_batch(
    content: Option<PathBuf>,
    config: BatchConfig,
    output: Option<PathBuf>,
) -> Result<ExitCode> {
    let content = load_content(content.as_deref())?;
    let results = run_batch(&content, config);

    if let Some(path) = output {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| HeadlessError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(&results)?;
        std::fs::write(&path, json).map_err(|e| HeadlessError::io(&path, e))?;
        tracing::info!(path = %path.display(), "Results written");
    }

    let mut stdout = io::stdout().lock();
    write_json_line(&mut stdout, &results.summary)?;

    if results.errors.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Report content problems as JSON; fail when there are any.
fn cmd_validate(content: PathBuf) -> Result<ExitCode> {
    let problems = validate_content_file(&content)?;
    let mut stdout = io::stdout().lock();
    write_json_line(
        &mut stdout,
        &serde_json::json!({
            "path": content.display().to_string(),
            "valid": problems.is_empty(),
            "problems": problems,
        }),
    )?;

    if problems.is_empty() {
        tracing::info!(path = %content.display(), "Content is valid");
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
