//! Grid-based Snake: a deterministic tick simulation plus a terminal front end.
//!
//! The [`engine::SnakeEngine`] is the single source of truth for the game. The
//! terminal renderer and the timer driver only read its state and call its
//! synchronous commands.

pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod grid;
pub mod input;
pub mod snake;
pub mod term;

/// A cell position as `(x, y)`, i.e. `(column, row)`.
pub type Coords = (i32, i32);
