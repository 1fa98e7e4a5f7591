use std::thread::sleep;
use std::time::{Duration, Instant};

use anyhow::Context;
use log::{info, warn};

use crate::config::Config;
use crate::engine::{spawn_body, GameStatus, SnakeEngine, TickOutcome};
use crate::input::{translate, Command};
use crate::term::TermManager;

const INPUT_POLL_MS: u64 = 5;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Owns the timer and the input stream, and feeds both into the engine.
pub struct SnakeGame {
    config: Config,
    engine: SnakeEngine,
    term: TermManager,
    paused: bool,
}

impl SnakeGame {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        config.validate()?;

        let grid = config.grid()?;

        // Size check first: building the engine walks every cell of the grid.
        let term = TermManager::new(grid).context("reading terminal size")?;
        if let Err(e) = term.check_fits() {
            warn!("{}", e);
            return Err(e.into());
        }

        let rules = config.rules();
        let body = spawn_body(&grid, config.length, rules.initial_direction);
        let engine = match config.seed {
            Some(seed) => SnakeEngine::with_seed(grid, rules, &body, seed)?,
            None => SnakeEngine::new(grid, rules, &body)?,
        };

        Ok(SnakeGame { config, engine, term, paused: false })
    }

    /// Plays sessions until the player quits. The terminal is restored even
    /// when a session fails.
    pub fn run(&mut self) -> anyhow::Result<()> {
        self.term.setup().context("setting up terminal")?;
        let result = self.sessions();
        self.term.restore().context("restoring terminal")?;
        result
    }

    ///////////////////////////////////////////////////////////////////////////

    fn sessions(&mut self) -> anyhow::Result<()> {
        let mut first = true;

        loop {
            if !first {
                let grid = *self.engine.grid();
                let body = spawn_body(&grid, self.config.length, self.config.rules().initial_direction);
                self.engine.initialize(&body)?;
            }
            first = false;

            if self.play()? == Flow::Quit {
                info!("player quit");
                return Ok(());
            }
        }
    }

    fn play(&mut self) -> anyhow::Result<Flow> {
        self.paused = false;
        self.term.draw_game(&self.engine)?;

        if self.wait_for_start()? == Flow::Quit {
            return Ok(Flow::Quit);
        }

        let mut clock = TickClock::new(self.config.tick_interval(), Instant::now());

        while !self.engine.status().is_terminal() {
            sleep(Duration::from_millis(INPUT_POLL_MS));

            for key_ev in self.term.read_key_events_queue()? {
                match translate(&key_ev) {
                    Some(Command::Quit) => return Ok(Flow::Quit),
                    Some(Command::Pause) => {
                        if !self.toggle_pause()? {
                            clock.restart(Instant::now());
                        }
                    }
                    Some(Command::Turn(dir)) if !self.paused => self.engine.set_direction(dir),
                    _ => {}
                }
            }

            if self.paused || !clock.due(Instant::now()) {
                continue;
            }

            let outcome = self.engine.tick()?;
            self.term.draw_outcome(&self.engine, &outcome)?;

            if let TickOutcome::Crashed { cause, .. } = outcome {
                info!("crashed: {:?}", cause);
            }
        }

        self.game_over()
    }

    /// Shows the instructions until Space is pressed. Turns given before the
    /// start still set the heading.
    fn wait_for_start(&mut self) -> anyhow::Result<Flow> {
        if self.engine.status() == GameStatus::Won {
            return Ok(Flow::Continue);
        }

        self.term.show_message(&[
            "Space to start",
            "Arrows or WASD to move",
            "Esc to pause",
            "CTRL+C to quit",
        ])?;

        loop {
            match translate(&self.term.read_key_blocking()?) {
                Some(Command::Quit) => return Ok(Flow::Quit),
                Some(Command::Start) => break,
                Some(Command::Turn(dir)) => {
                    self.engine.set_direction(dir);
                    self.term.draw_head(&self.engine)?;
                }
                _ => {}
            }
        }

        self.engine.start();
        self.term.hide_message()?;
        Ok(Flow::Continue)
    }

    fn game_over(&mut self) -> anyhow::Result<Flow> {
        let title = if self.engine.status() == GameStatus::Won { "You won!" } else { "Game over!" };
        let score = format!("Score: {}", self.engine.score());

        self.term.show_message(&[title, &score, "", "Press any key to play again,", "or CTRL+C to quit."])?;

        match translate(&self.term.read_key_blocking()?) {
            Some(Command::Quit) => Ok(Flow::Quit),
            _ => Ok(Flow::Continue),
        }
    }

    /// Returns whether the game is paused afterwards.
    fn toggle_pause(&mut self) -> anyhow::Result<bool> {
        if self.paused {
            self.term.hide_message()?;
        } else {
            self.term.show_message(&["Paused", "Esc to resume", "CTRL+C to quit"])?;
        }

        self.paused = !self.paused;
        Ok(self.paused)
    }
}

/// Fixed-interval schedule for ticks.
struct TickClock {
    interval: Duration,
    last: Instant,
}

impl TickClock {
    fn new(interval: Duration, now: Instant) -> Self {
        TickClock { interval, last: now }
    }

    /// True once a full interval has passed since the last tick or restart,
    /// which then counts as the new last tick.
    fn due(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last) < self.interval {
            return false;
        }
        self.last = now;
        true
    }

    /// Waits a full interval again, e.g. after a pause.
    fn restart(&mut self, now: Instant) {
        self.last = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_fires_once_per_interval() {
        let start = Instant::now();
        let mut clock = TickClock::new(Duration::from_millis(150), start);

        assert!(!clock.due(start + Duration::from_millis(149)));
        assert!(clock.due(start + Duration::from_millis(150)));
        assert!(!clock.due(start + Duration::from_millis(200)));
        assert!(clock.due(start + Duration::from_millis(300)));
    }

    #[test]
    fn resuming_waits_a_full_interval() {
        let start = Instant::now();
        let mut clock = TickClock::new(Duration::from_millis(150), start);

        // Paused long enough for a tick to be overdue, then resumed.
        let resumed = start + Duration::from_secs(5);
        clock.restart(resumed);

        assert!(!clock.due(resumed));
        assert!(!clock.due(resumed + Duration::from_millis(100)));
        assert!(clock.due(resumed + Duration::from_millis(150)));
    }
}
