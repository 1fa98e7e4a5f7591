use std::fs::File;

use anyhow::Context;
use clap::Parser;
use log::info;
use simplelog::{Config as LogConfig, WriteLogger};

use grid_snake::config::Config;
use grid_snake::game::SnakeGame;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // The terminal is in raw mode while playing, so logs go to a file.
    let log_file = File::create(&config.log_file)
        .with_context(|| format!("creating log file {}", config.log_file.display()))?;
    WriteLogger::init(config.log_level.into(), LogConfig::default(), log_file)
        .context("initializing logger")?;

    info!("starting with {:?}", config);

    let mut game = SnakeGame::new(config)?;
    game.run()
}
