use std::collections::HashSet;

use grid_snake::engine::{CrashCause, GameStatus, Rules, SnakeEngine, TickOutcome};
use grid_snake::error::EngineError;
use grid_snake::grid::Grid;
use grid_snake::snake::{is_step, Direction};
use grid_snake::Coords;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn running(rows: i32, cols: i32, body: &[Coords], food: Coords) -> SnakeEngine {
    let grid = Grid::new(rows, cols).unwrap();
    let mut engine = SnakeEngine::with_seed(grid, Rules::default(), body, 42).unwrap();
    assert!(engine.place_food_at(food));
    assert!(engine.start());
    engine
}

#[test]
fn wall_ends_the_game() {
    let mut engine = running(5, 5, &[(3, 2), (4, 2)], (0, 0));
    let before = engine.state();

    let outcome = engine.tick().unwrap();

    assert_eq!(outcome, TickOutcome::Crashed { at: (5, 2), cause: CrashCause::Wall });
    assert_eq!(engine.status(), GameStatus::GameOver);
    assert_eq!(engine.state().body, before.body);
    assert_eq!(engine.score(), before.score);
}

#[test]
fn biting_the_body_ends_the_game() {
    let mut engine = running(6, 6, &[(2, 2), (3, 2), (4, 2), (4, 3), (3, 3)], (0, 5));
    engine.set_direction(Direction::Up);

    let outcome = engine.tick().unwrap();

    assert_eq!(outcome, TickOutcome::Crashed { at: (3, 2), cause: CrashCause::SelfBite });
    assert_eq!(engine.status(), GameStatus::GameOver);
}

#[test]
fn eating_grows_and_scores() {
    let mut engine = running(5, 5, &[(1, 1), (2, 1)], (3, 1));

    let outcome = engine.tick().unwrap();

    assert_eq!(
        outcome,
        TickOutcome::Moved { new_head: (3, 1), old_head: (2, 1), old_tail: None, ate: true }
    );
    let state = engine.state();
    assert_eq!(state.body, vec![(1, 1), (2, 1), (3, 1)]);
    assert_eq!(state.score, 1);
    let food = state.food.unwrap();
    assert!(!state.body.contains(&food));
}

#[test]
fn plain_move_keeps_length() {
    let mut engine = running(6, 6, &[(1, 1), (2, 1), (3, 1)], (0, 5));

    let outcome = engine.tick().unwrap();

    assert_eq!(
        outcome,
        TickOutcome::Moved { new_head: (4, 1), old_head: (3, 1), old_tail: Some((1, 1)), ate: false }
    );
    assert_eq!(engine.state().body, vec![(2, 1), (3, 1), (4, 1)]);
    assert_eq!(engine.score(), 0);
    assert_eq!(engine.food(), Some((0, 5)));
}

#[test]
fn chasing_the_tail_bites() {
    // The tail is checked before it moves out of the way.
    let mut engine = running(4, 4, &[(1, 1), (2, 1), (2, 2), (1, 2)], (3, 3));
    engine.set_direction(Direction::Up);

    assert_eq!(engine.tick().unwrap(), TickOutcome::Crashed { at: (1, 1), cause: CrashCause::SelfBite });
}

#[test]
fn nothing_moves_after_game_over() {
    let mut engine = running(5, 5, &[(3, 2), (4, 2)], (0, 0));
    engine.tick().unwrap();
    let frozen = engine.state();

    for _ in 0..3 {
        assert_eq!(engine.tick(), Err(EngineError::NotRunning(GameStatus::GameOver)));
        engine.set_direction(Direction::Left);
    }

    assert_eq!(engine.state(), frozen);
}

fn assert_invariants(engine: &SnakeEngine) {
    let grid = engine.grid();
    let body: Vec<Coords> = engine.body().iter().copied().collect();

    assert!(body.iter().all(|seg| grid.contains(*seg)), "segment off grid: {:?}", body);
    assert!(body.windows(2).all(|w| is_step(w[0], w[1])), "broken body: {:?}", body);

    let unique: HashSet<Coords> = body.iter().copied().collect();
    assert_eq!(unique.len(), body.len(), "overlapping body: {:?}", body);

    if let Some(food) = engine.food() {
        assert!(!unique.contains(&food), "food {:?} under body {:?}", food, body);
    }
}

#[test]
fn random_walks_keep_invariants() {
    let mut moves = StdRng::seed_from_u64(2024);
    let dirs = [Direction::Left, Direction::Up, Direction::Right, Direction::Down];
    let grid = Grid::new(8, 10).unwrap();

    for seed in 0..30 {
        let rules = Rules { allow_reversal: seed % 2 == 0, ..Rules::default() };
        let mut engine = SnakeEngine::with_seed(grid, rules, &[(2, 4), (3, 4), (4, 4)], seed).unwrap();
        engine.start();
        assert_invariants(&engine);

        for _ in 0..500 {
            if let Some(dir) = dirs.choose(&mut moves) {
                engine.set_direction(*dir);
            }

            let len_before = engine.body().len();
            let score_before = engine.score();

            match engine.tick().unwrap() {
                TickOutcome::Moved { ate: true, .. } | TickOutcome::BoardFull { .. } => {
                    assert_eq!(engine.body().len(), len_before + 1);
                    assert_eq!(engine.score(), score_before + 1);
                }
                TickOutcome::Moved { ate: false, .. } => {
                    assert_eq!(engine.body().len(), len_before);
                    assert_eq!(engine.score(), score_before);
                }
                TickOutcome::Crashed { .. } => {
                    assert_eq!(engine.body().len(), len_before);
                    assert_eq!(engine.status(), GameStatus::GameOver);
                }
            }

            assert_invariants(&engine);
            if engine.status().is_terminal() {
                break;
            }
        }
    }
}
