use thiserror::Error;

use crate::engine::GameStatus;
use crate::Coords;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid initial snake: {0}")]
    InvalidInitialState(InvalidBody),

    #[error("game is not running (status: {0:?})")]
    NotRunning(GameStatus),
}

/// Why a starting body was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidBody {
    #[error("body is empty")]
    Empty,

    #[error("segment {0:?} lies outside the grid")]
    OutOfBounds(Coords),

    #[error("segments {0:?} and {1:?} are not adjacent")]
    Disjoint(Coords, Coords),

    #[error("cell {0:?} is occupied more than once")]
    Overlapping(Coords),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid must have at least one row and column, got {rows}x{cols}")]
    EmptyGrid { rows: i32, cols: i32 },

    #[error("tick interval of {0}ms is too short")]
    TickTooShort(u64),

    #[error("grid of {rows}x{cols} does not fit a {width}x{height} terminal")]
    GridTooLarge { rows: i32, cols: i32, width: u16, height: u16 },

    #[error("snake of length {length} does not fit in {cols} columns")]
    SnakeTooLong { length: i32, cols: i32 },
}
