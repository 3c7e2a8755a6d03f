//! # Cryptwalk Main Entry Point
//!
//! Parses the command line, initializes logging, loads the configuration
//! and hands control to the scene manager.

use clap::Parser;
use cryptwalk::scenes::SceneManager;
use cryptwalk::{CryptwalkResult, DungeonConfig, InputHandler};
use log::{error, info};
use macroquad::prelude::*;
use std::path::PathBuf;

/// Command line arguments for Cryptwalk.
#[derive(Parser, Debug)]
#[command(name = "cryptwalk")]
#[command(about = "Walk an endless crypt of procedurally generated, trapped rooms")]
#[command(version)]
struct Args {
    /// Master seed for room generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fix every room to this side length
    #[arg(long)]
    room_size: Option<i32>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[macroquad::main("Cryptwalk")]
async fn main() {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    info!("Starting Cryptwalk v{}", cryptwalk::VERSION);
    if let Err(err) = run(args).await {
        error!("{}", err);
        std::process::exit(1);
    }
    info!("Game loop ended");
}

/// Initializes `env_logger` with the given filter, e.g. `debug` or
/// `cryptwalk::game=trace`.
fn initialize_logging(log_level: &str) {
    env_logger::Builder::new()
        .parse_filters(log_level)
        .format_timestamp_millis()
        .init();
}

/// Builds the configuration from the file and flags.
fn load_config(args: &Args) -> CryptwalkResult<DungeonConfig> {
    let mut config = match &args.config {
        Some(path) => DungeonConfig::load(path)?,
        None => DungeonConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.generation.seed = seed;
    }
    if let Some(size) = args.room_size {
        config.generation = config.generation.with_room_size(size);
    }
    config.validate()?;
    Ok(config)
}

async fn run(args: Args) -> CryptwalkResult<()> {
    let config = load_config(&args)?;
    info!(
        "seed {}, rooms {}..={}",
        config.generation.seed, config.generation.min_room_size, config.generation.max_room_size
    );

    request_new_screen_size(1024.0, 768.0);
    let mut scenes = SceneManager::new(config, InputHandler::new()).await?;
    scenes.run().await
}
