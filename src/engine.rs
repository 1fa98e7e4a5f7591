use std::collections::{HashSet, VecDeque};

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{EngineError, InvalidBody};
use crate::grid::Grid;
use crate::snake::{is_step, Direction};
use crate::Coords;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    NotStarted,
    Running,
    GameOver,
    /// The snake filled every cell, so no food can be placed.
    Won,
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameStatus::GameOver | GameStatus::Won)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CrashCause {
    Wall,
    SelfBite,
}

/// What a single tick did. Renderers redraw from this instead of the full state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Moved {
        new_head: Coords,
        old_head: Coords,
        old_tail: Option<Coords>,
        ate: bool,
    },
    Crashed { at: Coords, cause: CrashCause },
    /// The snake ate the last piece of food that could ever be placed.
    BoardFull { new_head: Coords, old_head: Coords },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Body,
    Head,
    Food,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rules {
    /// When false, a turn straight back onto the neck is ignored.
    pub allow_reversal: bool,
    pub initial_direction: Direction,
}

impl Default for Rules {
    fn default() -> Self {
        Rules { allow_reversal: true, initial_direction: Direction::Right }
    }
}

/// Read-only copy of everything a renderer needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineState {
    pub body: Vec<Coords>,
    pub food: Option<Coords>,
    pub score: u32,
    pub status: GameStatus,
}

pub struct SnakeEngine {
    grid: Grid,
    rules: Rules,
    body: VecDeque<Coords>,
    direction: Direction,
    last_moved: Direction,
    food: Option<Coords>,
    score: u32,
    status: GameStatus,
    rng: StdRng,
}

impl SnakeEngine {
    pub fn new(grid: Grid, rules: Rules, body: &[Coords]) -> Result<Self, EngineError> {
        Self::with_rng(grid, rules, body, StdRng::from_entropy())
    }

    pub fn with_seed(grid: Grid, rules: Rules, body: &[Coords], seed: u64) -> Result<Self, EngineError> {
        Self::with_rng(grid, rules, body, StdRng::seed_from_u64(seed))
    }

    fn with_rng(grid: Grid, rules: Rules, body: &[Coords], rng: StdRng) -> Result<Self, EngineError> {
        let mut engine = SnakeEngine {
            grid,
            rules,
            body: VecDeque::new(),
            direction: rules.initial_direction,
            last_moved: rules.initial_direction,
            food: None,
            score: 0,
            status: GameStatus::NotStarted,
            rng,
        };
        engine.initialize(body)?;
        Ok(engine)
    }

    /// Resets the session around `body` (tail first, head last). On error the
    /// engine is left as it was.
    pub fn initialize(&mut self, body: &[Coords]) -> Result<(), EngineError> {
        validate_body(&self.grid, body).map_err(EngineError::InvalidInitialState)?;

        // The guard compares against the way the body faces, and a default
        // heading that points back into the neck is replaced by that facing.
        let faces = facing(body).unwrap_or(self.rules.initial_direction);
        self.body = body.iter().copied().collect();
        self.direction = if !self.rules.allow_reversal && self.rules.initial_direction.is_opposite(&faces) {
            faces
        } else {
            self.rules.initial_direction
        };
        self.last_moved = faces;
        self.score = 0;
        self.food = None;
        self.status = GameStatus::NotStarted;

        if self.place_food().is_none() {
            info!("no free cell for food at spawn, board is already full");
            self.status = GameStatus::Won;
        }

        debug!("initialized snake of {} segments, food at {:?}", self.body.len(), self.food);
        Ok(())
    }

    pub fn set_direction(&mut self, direction: Direction) {
        if self.status.is_terminal() {
            return;
        }

        if !self.rules.allow_reversal && direction.is_opposite(&self.last_moved) {
            debug!("ignoring reversal from {:?} to {:?}", self.last_moved, direction);
            return;
        }

        self.direction = direction;
    }

    /// Returns true if this call started the game.
    pub fn start(&mut self) -> bool {
        if self.status != GameStatus::NotStarted {
            return false;
        }

        info!("game started on a {}x{} grid", self.grid.cols(), self.grid.rows());
        self.status = GameStatus::Running;
        true
    }

    pub fn tick(&mut self) -> Result<TickOutcome, EngineError> {
        if self.status != GameStatus::Running {
            return Err(EngineError::NotRunning(self.status));
        }

        let old_head = self.head();
        let new_head = self.direction.step(old_head);

        if let Some(cause) = self.collision_at(new_head) {
            info!("game over at {:?} ({:?}), score {}", new_head, cause, self.score);
            self.status = GameStatus::GameOver;
            return Ok(TickOutcome::Crashed { at: new_head, cause });
        }

        self.last_moved = self.direction;

        let ate = self.food == Some(new_head);
        let old_tail = if ate {
            self.food = None;
            self.score += 1;
            info!("food eaten at {:?}, score {}", new_head, self.score);
            None
        } else {
            self.body.pop_front()
        };

        self.body.push_back(new_head);

        if ate && self.place_food().is_none() {
            info!("board full with score {}", self.score);
            self.status = GameStatus::Won;
            return Ok(TickOutcome::BoardFull { new_head, old_head });
        }

        debug!("head {:?} -> {:?}", old_head, new_head);
        Ok(TickOutcome::Moved { new_head, old_head, old_tail, ate })
    }

    /// Puts food on a uniformly chosen free cell. Returns `None`, leaving no
    /// food, when the snake covers the whole grid.
    pub fn place_food(&mut self) -> Option<Coords> {
        let occupied: HashSet<Coords> = self.body.iter().copied().collect();
        let free: Vec<Coords> = self.grid.cells().filter(|c| !occupied.contains(c)).collect();

        self.food = free.choose(&mut self.rng).copied();
        self.food
    }

    /// Puts food on `pos` for scripted setups. Refused, returning false, when
    /// the cell is outside the grid or under the snake.
    pub fn place_food_at(&mut self, pos: Coords) -> bool {
        if !self.grid.contains(pos) || self.body.contains(&pos) {
            return false;
        }

        self.food = Some(pos);
        true
    }

    pub fn state(&self) -> EngineState {
        EngineState {
            body: self.body.iter().copied().collect(),
            food: self.food,
            score: self.score,
            status: self.status,
        }
    }

    pub fn cell(&self, pos: Coords) -> Cell {
        if pos == self.head() {
            Cell::Head
        } else if self.body.contains(&pos) {
            Cell::Body
        } else if self.food == Some(pos) {
            Cell::Food
        } else {
            Cell::Empty
        }
    }

    pub fn head(&self) -> Coords {
        self.body[self.body.len() - 1]
    }

    pub fn body(&self) -> &VecDeque<Coords> {
        &self.body
    }

    pub fn food(&self) -> Option<Coords> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[cfg(test)]
    pub(crate) fn set_food(&mut self, food: Option<Coords>) {
        self.food = food;
    }

    fn collision_at(&self, pos: Coords) -> Option<CrashCause> {
        if !self.grid.contains(pos) {
            return Some(CrashCause::Wall);
        }

        // The current head is about to move, so it never blocks.
        let neck_len = self.body.len() - 1;
        if self.body.iter().take(neck_len).any(|seg| *seg == pos) {
            return Some(CrashCause::SelfBite);
        }

        None
    }
}

/// A straight body of `len` segments ending at the grid center, moving
/// towards `direction`. Tail first, like every body the engine works with.
pub fn spawn_body(grid: &Grid, len: i32, direction: Direction) -> Vec<Coords> {
    let head = grid.center();
    let (dx, dy) = direction.offset();

    (0..len.max(1))
        .rev()
        .map(|i| (head.0 - dx * i, head.1 - dy * i))
        .collect()
}

/// Direction from the neck to the head, skipping a stacked head segment.
/// `None` for a single cell.
fn facing(body: &[Coords]) -> Option<Direction> {
    let head = *body.last()?;
    let neck = body.iter().rev().find(|seg| **seg != head)?;
    Direction::between(*neck, head)
}

fn validate_body(grid: &Grid, body: &[Coords]) -> Result<(), InvalidBody> {
    if body.is_empty() {
        return Err(InvalidBody::Empty);
    }

    if let Some(pos) = body.iter().find(|pos| !grid.contains(**pos)) {
        return Err(InvalidBody::OutOfBounds(*pos));
    }

    // One superimposed pair is tolerated: a freshly spawned snake may carry a
    // duplicate segment that the first moves pull apart.
    let mut stacked = 0;
    for pair in body.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if a == b {
            stacked += 1;
            if stacked > 1 {
                return Err(InvalidBody::Overlapping(a));
            }
        } else if !is_step(a, b) {
            return Err(InvalidBody::Disjoint(a, b));
        }
    }

    let mut seen = HashSet::new();
    let mut prev = None;
    for pos in body {
        if prev != Some(*pos) && !seen.insert(*pos) {
            return Err(InvalidBody::Overlapping(*pos));
        }
        prev = Some(*pos);
    }

    Ok(())
}
