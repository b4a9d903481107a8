#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a headless Raft Runner session.

mod config;
mod logging;
mod session;
mod store;

use std::{path::PathBuf, time::Duration};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use raft_runner_core::{collaborators::MemoryStore, WELCOME_BANNER};

use config::SessionConfig;
use session::Session;
use store::FileStore;

/// Plays a fixed-step Raft Runner session without a renderer.
#[derive(Debug, Parser)]
#[command(name = "raft-runner", version, about)]
struct Cli {
    /// TOML file overriding the default tuning.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated seconds to play.
    #[arg(long, default_value_t = 60.0)]
    seconds: f64,

    /// Fixed simulation steps per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Seed shared by the spawner and the simulated player.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// TOML file persisting progress between runs.
    #[arg(long)]
    store: Option<PathBuf>,

    /// Print debug logging.
    #[arg(short, long)]
    verbose: bool,
}

/// Entry point for the Raft Runner command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    ensure!(cli.fps > 0, "--fps must be positive");
    ensure!(
        cli.seconds.is_finite() && cli.seconds >= 0.0,
        "--seconds must be a non-negative number"
    );

    let config = match &cli.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };

    let frames = (cli.seconds * f64::from(cli.fps)).round() as u64;
    let dt = Duration::from_secs_f64(1.0 / f64::from(cli.fps));

    println!("{WELCOME_BANNER}");
    let summary = match &cli.store {
        Some(path) => {
            let mut store = FileStore::open(path)
                .with_context(|| format!("failed to open progress store {}", path.display()))?;
            log::info!("progress store at {}", store.path().display());
            let summary = Session::new(config, cli.seed, &mut store).run(frames, dt);
            store
                .flush()
                .with_context(|| format!("failed to write progress store {}", path.display()))?;
            summary
        }
        None => {
            let mut store = MemoryStore::new();
            Session::new(config, cli.seed, &mut store).run(frames, dt)
        }
    };
    println!("{summary}");
    Ok(())
}
