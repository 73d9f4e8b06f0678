#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** Tangle **
//! Plays a branching passage story in the terminal.

use std::path::PathBuf;
use std::sync::Arc;

use tangle_engine::config::load_config;
use tangle_engine::style::GameStyle;
use tangle_engine::{Navigator, TurnController, load_story, run_repl};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

#[derive(Debug, Parser)]
#[command(name = "tangle", version, about = "Play a branching passage story in the terminal")]
struct Cli {
    /// Story file (.html Twine export, .json or .toml)
    #[arg(long)]
    story: Option<PathBuf>,
    /// Passage to start at instead of the story's own start
    #[arg(long)]
    start: Option<String>,
    /// Configuration file (defaults to tangle.toml in the data directory)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Wrap output at this many columns
    #[arg(long)]
    width: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).context("while loading configuration")?;
    if let Some(story) = cli.story {
        config.story = story;
    }
    if cli.start.is_some() {
        config.start = cli.start;
    }
    if let Some(width) = cli.width {
        config.wrap_width = width;
    }

    info!("Start: loading story from {}", config.story.display());
    let store = load_story(&config.story).context("while loading story")?;
    let title = store.title().to_string();
    let nav = Navigator::new(Arc::new(store), config.start.as_deref()).context("while starting the story")?;
    let mut turns = TurnController::new(nav);

    if !title.is_empty() {
        println!("{:^width$}\n", title.title_style(), width = config.wrap_width);
    }
    run_repl(&mut turns, &config)
}
