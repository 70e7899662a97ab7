#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Labyrinth sessions in a terminal.

mod config;
mod game;
mod render;
mod sink;

use std::{io, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use labyrinth_system_submission::ScoreSink;

use crate::{
    config::GameConfig,
    game::Game,
    sink::{JsonLinesSink, LogSink},
};

/// Walk a randomly generated maze from the top-left corner to the exit.
#[derive(Debug, Parser)]
#[command(name = "labyrinth", about, long_about = None, version)]
struct Args {
    /// TOML file with game settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Edge length of the maze
    #[arg(short, long)]
    size: Option<u32>,

    /// Seed for reproducible mazes
    #[arg(long)]
    seed: Option<u64>,

    /// Level identifier reported with submitted scores
    #[arg(long)]
    level: Option<String>,

    /// File receiving one JSON line per submitted score
    #[arg(long)]
    submission_log: Option<PathBuf>,

    /// Walk the shortest path automatically and answer the quiz
    #[arg(long, default_value_t = false)]
    autoplay: bool,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

impl Args {
    /// Loads the configuration file, if any, and applies flag overrides.
    fn resolve(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(size) = self.size {
            config.size = size;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(level) = &self.level {
            config.level.clone_from(level);
        }
        if let Some(path) = &self.submission_log {
            config.submission_log = Some(path.clone());
        }

        Ok(config)
    }
}

/// Entry point for the Labyrinth command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.debug {
        let _ = logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let config = args.resolve()?;
    log::debug!("starting with {config:?}");

    let sink: Box<dyn ScoreSink> = match &config.submission_log {
        Some(path) => Box::new(JsonLinesSink::new(path)),
        None => Box::new(LogSink),
    };

    let mut game = Game::new(&config, sink)?;
    let mut stdout = io::stdout().lock();
    if args.autoplay {
        game.autoplay(&mut stdout)
    } else {
        game.play(io::stdin().lock(), &mut stdout)
    }
}
