use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use crate::engine::Rules;
use crate::error::ConfigError;
use crate::grid::Grid;
use crate::snake::Direction;

const MIN_TICK_MS: u64 = 10;

/// Classic Snake on a fixed grid. Space starts, arrow keys (or WASD) steer.
#[derive(Parser, Debug, Clone)]
#[command(name = "grid-snake", version, about)]
pub struct Config {
    /// Number of grid rows.
    #[arg(long, default_value_t = 21)]
    pub rows: i32,

    /// Number of grid columns.
    #[arg(long, default_value_t = 21)]
    pub cols: i32,

    /// Milliseconds between two moves.
    #[arg(long, default_value_t = 150)]
    pub tick_ms: u64,

    /// Starting length of the snake.
    #[arg(long, default_value_t = 5)]
    pub length: i32,

    /// Ignore turns that would send the snake straight back into itself.
    #[arg(long)]
    pub no_reverse: bool,

    /// Seed for food placement, for reproducible games.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Where log lines go; the terminal itself is taken by the game.
    #[arg(long, default_value = "grid-snake.log")]
    pub log_file: PathBuf,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let grid = self.grid()?;

        if self.tick_ms < MIN_TICK_MS {
            return Err(ConfigError::TickTooShort(self.tick_ms));
        }

        // The spawn body ends at the center column and extends to the left.
        if self.length < 1 || self.length > grid.center().0 + 1 {
            return Err(ConfigError::SnakeTooLong { length: self.length, cols: self.cols });
        }

        Ok(())
    }

    pub fn grid(&self) -> Result<Grid, ConfigError> {
        Grid::new(self.rows, self.cols)
    }

    pub fn rules(&self) -> Rules {
        Rules { allow_reversal: !self.no_reverse, initial_direction: Direction::Right }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}
