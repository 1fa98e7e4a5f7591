use std::io::{stdout, Stdout, Write};
use std::time::Duration;

use crossterm::event::{poll, read, Event, KeyEvent};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, style, terminal, Result};

use crate::engine::{Cell, SnakeEngine, TickOutcome};
use crate::error::ConfigError;
use crate::grid::Grid;
use crate::snake::Direction;
use crate::Coords;

type TermPos = (u16, u16);

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHAR: char = 'O';
const EMPTY_CHAR: char = ' ';
const DEAD_SNAKE_CHAR: char = 'X';
const SCORE_APPLE_CHAR: char = '@';

/// Draws engine state on the terminal. Holds no game data of its own: the
/// screen buffer only remembers glyphs so messages can be hidden again.
pub struct TermManager {
    width: u16,
    height: u16,
    board: Grid,
    stdout: Stdout,
    screen: Vec<char>,
    current_msg: Option<Message>,
}

struct Message {
    top_left: TermPos,
    width: u16,
    height: u16,
}

impl TermManager {
    pub fn new(board: Grid) -> Result<Self> {
        let (width, height) = terminal::size()?;
        let screen = vec![' '; width as usize * height as usize];
        Ok(TermManager { width, height, board, stdout: stdout(), screen, current_msg: None })
    }

    /// Fails if the board plus its border and score line does not fit.
    pub fn check_fits(&self) -> std::result::Result<(), ConfigError> {
        fits(&self.board, self.width, self.height)
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen, cursor::Hide, cursor::DisableBlinking)?;
        terminal::enable_raw_mode()
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
    }

    pub fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(ev);
            }
        }
    }

    pub fn read_key_events_queue(&self) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(1))? {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
        }

        Ok(events)
    }

    /// Clears the screen and projects the whole engine state.
    pub fn draw_game(&mut self, engine: &SnakeEngine) -> Result<()> {
        self.clear()?;
        self.draw_borders()?;

        let board = self.board;
        for pos in board.cells() {
            self.draw_cell(pos, engine.cell(pos), engine.direction())?;
        }

        self.draw_score(engine.score())?;
        self.flush()
    }

    /// Redraws the head so its glyph follows a heading change made before
    /// the first tick.
    pub fn draw_head(&mut self, engine: &SnakeEngine) -> Result<()> {
        self.draw_cell(engine.head(), Cell::Head, engine.direction())?;
        self.flush()
    }

    /// Redraws only the cells a tick touched.
    pub fn draw_outcome(&mut self, engine: &SnakeEngine, outcome: &TickOutcome) -> Result<()> {
        match *outcome {
            TickOutcome::Moved { new_head, old_head, old_tail, ate } => {
                if let Some(tail) = old_tail {
                    self.draw_cell(tail, engine.cell(tail), engine.direction())?;
                }
                self.draw_cell(old_head, engine.cell(old_head), engine.direction())?;
                self.draw_cell(new_head, Cell::Head, engine.direction())?;

                if ate {
                    if let Some(food) = engine.food() {
                        self.draw_cell(food, Cell::Food, engine.direction())?;
                    }
                    self.draw_score(engine.score())?;
                }
            }
            TickOutcome::BoardFull { new_head, old_head } => {
                self.draw_cell(old_head, Cell::Body, engine.direction())?;
                self.draw_cell(new_head, Cell::Head, engine.direction())?;
                self.draw_score(engine.score())?;
            }
            TickOutcome::Crashed { .. } => {
                for pos in engine.body() {
                    self.print_at(board_pos(*pos), DEAD_SNAKE_CHAR)?;
                }
            }
        }

        self.flush()
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as u16;
        let msg_width = (lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 2) as u16;
        let (board_w, board_h) = board_extent(&self.board);
        let center = ((board_w / 2) as u16, (board_h / 2) as u16);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        for y in [top_left.1, top_left.1 + msg_height - 1] {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, y), ' ')?;
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{: ^width$}", line, width = msg_width as usize);
            let y = top_left.1 + i as u16 + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as u16, y), ch)?;
            }
        }

        self.current_msg = Some(Message { width: msg_width, height: msg_height, top_left });
        self.flush()
    }

    pub fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };

        for y in msg.top_left.1..msg.top_left.1 + msg.height {
            for x in msg.top_left.0..msg.top_left.0 + msg.width {
                if let Some(ch) = self.saved(x, y) {
                    self.print_at_no_save((x, y), ch)?;
                }
            }
        }

        self.flush()
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    pub fn flush(&mut self) -> Result<()> {
        Ok(self.stdout.flush()?)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.screen = vec![' '; self.width as usize * self.height as usize];
        self.current_msg = None;
        Ok(())
    }

    fn draw_borders(&mut self) -> Result<()> {
        let (w, h) = board_extent(&self.board);
        let (end_x, end_y) = ((w - 1) as u16, (h - 1) as u16);

        for x in 0..=end_x {
            let ch = if x == 0 || x == end_x { '+' } else { '-' };
            self.print_at((x, 0), ch)?;
            self.print_at((x, end_y), ch)?;
        }

        for y in 1..end_y {
            self.print_at((0, y), '|')?;
            self.print_at((end_x, y), '|')?;
        }

        Ok(())
    }

    fn draw_cell(&mut self, pos: Coords, cell: Cell, heading: Direction) -> Result<()> {
        self.print_at(board_pos(pos), glyph(cell, heading))
    }

    fn draw_score(&mut self, score: u32) -> Result<()> {
        let y = board_extent(&self.board).1 as u16;
        let line = score_line(score, self.width as usize);

        for (x, ch) in line.chars().chain(std::iter::repeat(' ')).take(self.width as usize).enumerate() {
            self.print_at((x as u16, y), ch)?;
        }

        Ok(())
    }

    // Cells under an open message only reach the buffer; hiding the message
    // puts them on screen.
    fn print_at(&mut self, pos: TermPos, ch: char) -> Result<()> {
        if let Some(slot) = self.screen.get_mut(self.width as usize * pos.1 as usize + pos.0 as usize) {
            *slot = ch;
        }

        if self.current_msg.as_ref().map_or(false, |msg| msg.covers(pos)) {
            return Ok(());
        }

        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))
    }

    // Messages are drawn without touching the buffer so hiding them restores
    // what was underneath.
    fn print_at_no_save(&mut self, pos: TermPos, ch: char) -> Result<()> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))
    }

    fn saved(&self, x: u16, y: u16) -> Option<char> {
        self.screen.get(self.width as usize * y as usize + x as usize).copied()
    }
}

impl Message {
    fn covers(&self, (x, y): TermPos) -> bool {
        x >= self.top_left.0
            && x < self.top_left.0 + self.width
            && y >= self.top_left.1
            && y < self.top_left.1 + self.height
    }
}

/// Board plus border, in terminal cells.
fn board_extent(board: &Grid) -> (i64, i64) {
    (board.cols() as i64 + 2, board.rows() as i64 + 2)
}

/// The board, its border and the score line below must fit the terminal.
pub fn fits(board: &Grid, width: u16, height: u16) -> std::result::Result<(), ConfigError> {
    let (w, h) = board_extent(board);
    if w > width as i64 || h + 1 > height as i64 {
        return Err(ConfigError::GridTooLarge { rows: board.rows(), cols: board.cols(), width, height });
    }
    Ok(())
}

fn board_pos((x, y): Coords) -> TermPos {
    (x as u16 + 1, y as u16 + 1)
}

pub fn glyph(cell: Cell, heading: Direction) -> char {
    match cell {
        Cell::Empty => EMPTY_CHAR,
        Cell::Body => SNAKE_BODY_CHAR,
        Cell::Head => heading.head_char(),
        Cell::Food => FOOD_CHAR,
    }
}

/// One apple per point, cut to `max_width` characters.
pub fn score_line(score: u32, max_width: usize) -> String {
    let apples: String = std::iter::repeat(SCORE_APPLE_CHAR).take(score as usize).collect();
    format!("Score: {} {}", score, apples).chars().take(max_width).collect()
}
