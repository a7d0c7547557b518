// Test utilities, kept in the library so integration tests can share them.

use rand::prelude::*;

use crate::board::{Move, MoveError};
use crate::game::GameState;
use crate::rules;


// In theory random tests verify properties that should always hold, but
// let's fix the seed to avoid sporadic failures.
pub fn deterministic_rng() -> impl Rng {
    rand::rngs::StdRng::from_seed([0; 32])
}

// Every move of the active force that is legal by piece shape. King safety
// is not considered, so candidates may still be rejected by the validator.
pub fn shape_legal_moves(game: &GameState) -> Vec<Move> {
    let grid = game.board().grid();
    let force = game.board().active_force();
    let mut moves = Vec::new();
    for (from, piece) in grid.pieces() {
        if piece.force == force {
            for to in rules::valid_moves(grid, from) {
                moves.push(Move { from, to });
            }
        }
    }
    moves
}

// Uniform-random legal move selection over the validator: tries shape-legal
// candidates in random order until one commits. Returns `None` when no move
// of the active force survives the self-check veto.
pub fn play_random_move(game: &mut GameState, rng: &mut impl Rng) -> Option<Move> {
    let force = game.board().active_force();
    let mut candidates = shape_legal_moves(game);
    candidates.shuffle(rng);
    for mv in candidates {
        match game.try_move(force, mv) {
            Ok(_) => return Some(mv),
            Err(MoveError::UnprotectedKing) => continue,
            Err(err) => panic!("unexpected rejection of a shape-legal move: {:?}", err),
        }
    }
    None
}

// Replays a whitespace-separated log of moves like "e2e4 e7e5 g1f3".
pub fn replay_move_log(game: &mut GameState, log: &str) -> Result<(), MoveError> {
    for notation in log.split_whitespace() {
        let mv = Move::from_algebraic(notation)
            .unwrap_or_else(|| panic!("bad move notation: {}", notation));
        let force = game.board().active_force();
        game.try_move(force, mv)?;
    }
    Ok(())
}
