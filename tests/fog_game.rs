use std::collections::HashSet;

use pretty_assertions::assert_eq;

use fog_chess::board::{is_in_check, Move, MoveError};
use fog_chess::coord::Coord;
use fog_chess::fog;
use fog_chess::force::Force;
use fog_chess::game::GameState;
use fog_chess::test_util::{deterministic_rng, play_random_move, replay_move_log};


fn mv(s: &str) -> Move {
    Move::from_algebraic(s).unwrap()
}

#[test]
fn pawn_double_step_only_before_its_first_move() {
    let mut game = GameState::new();
    game.try_move(Force::White, mv("e2e4")).unwrap();
    game.try_move(Force::Black, mv("d7d5")).unwrap();
    // The e-pawn has already moved, so no second double step.
    assert_eq!(
        game.try_move(Force::White, mv("e4e6")),
        Err(MoveError::ImpossibleTrajectory)
    );
    game.try_move(Force::White, mv("e4e5")).unwrap();
}

#[test]
fn pawn_double_step_blocked_by_the_transit_square() {
    let mut game = GameState::new();
    replay_move_log(&mut game, "g1f3 e7e5").unwrap();
    // The knight on f3 stands on the f-pawn's transit square.
    assert_eq!(
        game.try_move(Force::White, mv("f2f4")),
        Err(MoveError::ImpossibleTrajectory)
    );
    game.try_move(Force::White, mv("d2d4")).unwrap();
}

#[test]
fn turns_strictly_alternate() {
    let mut game = GameState::new();
    assert_eq!(
        game.try_move(Force::Black, mv("e7e5")),
        Err(MoveError::WrongTurnOrder)
    );
    replay_move_log(&mut game, "e2e4 e7e5 g1f3 b8c6 f1c4 g8f6").unwrap();
    assert_eq!(game.board().active_force(), Force::White);
    assert_eq!(
        game.try_move(Force::Black, mv("f6e4")),
        Err(MoveError::WrongTurnOrder)
    );
    assert_eq!(game.board().grid().pieces().count(), 32);
}

#[test]
fn in_turn_player_cannot_move_opponent_pieces() {
    let mut game = GameState::new();
    // White to move; a black pawn is not theirs to push.
    assert_eq!(
        game.try_move(Force::White, mv("e7e5")),
        Err(MoveError::WrongTurnOrder)
    );
    assert_eq!(game.board().active_force(), Force::White);
    game.try_move(Force::White, mv("e2e4")).unwrap();
    assert_eq!(
        game.try_move(Force::Black, mv("d2d4")),
        Err(MoveError::WrongTurnOrder)
    );
    assert_eq!(game.board().active_force(), Force::Black);
}

#[test]
fn a_move_that_ignores_check_is_rejected() {
    let mut game = GameState::new();
    replay_move_log(&mut game, "e2e4 e7e5 d1h5 b8c6").unwrap();
    let outcome = game.try_move(Force::White, mv("h5f7")).unwrap();
    assert!(outcome.opponent_in_check);
    // Any move that leaves the king under attack is vetoed.
    assert_eq!(
        game.try_move(Force::Black, mv("b7b6")),
        Err(MoveError::UnprotectedKing)
    );
    assert_eq!(
        game.try_move(Force::Black, mv("g8f6")),
        Err(MoveError::UnprotectedKing)
    );
    // Capturing the attacker resolves the check.
    game.try_move(Force::Black, mv("e8f7")).unwrap();
    assert!(!is_in_check(game.board().grid(), Force::Black).unwrap());
}

#[test]
fn an_advanced_pawn_scouts_ahead() {
    let mut game = GameState::new();
    game.try_move(Force::White, mv("e2e4")).unwrap();
    let visible = fog::visible_set(game.board().grid(), Force::White);
    for square in ["d5", "e5", "f5", "e6"] {
        assert!(visible.contains(&Coord::from_algebraic(square)), "{}", square);
    }
    assert!(!visible.contains(&Coord::from_algebraic("e7")));
    // Black in turn sees the arrived pawn.
    let enemy_visible = fog::visible_set(game.board().grid(), Force::Black);
    assert!(enemy_visible.contains(&Coord::from_algebraic("e4")));
}

#[test]
fn captures_shrink_the_piece_count() {
    let mut game = GameState::new();
    replay_move_log(&mut game, "e2e4 d7d5 e4d5 d8d5").unwrap();
    assert_eq!(game.board().grid().pieces().count(), 30);
    let queen = game.board().grid()[Coord::from_algebraic("d5")].unwrap();
    assert_eq!(queen.force, Force::Black);
}

#[test]
fn random_play_keeps_the_board_invariants() {
    let mut game = GameState::new();
    let mut rng = deterministic_rng();
    let mut visible_union: HashSet<Coord> = HashSet::new();
    for _ in 0..100 {
        let force = game.board().active_force();
        if play_random_move(&mut game, &mut rng).is_none() {
            break;
        }
        // A committed move never leaves its own king in check, and the
        // turn always passes to the opponent.
        assert!(!is_in_check(game.board().grid(), force).unwrap());
        assert_eq!(game.board().active_force(), force.opponent());
        // Every piece sees its own square, so the fog maps jointly cover
        // all occupied squares.
        visible_union.clear();
        visible_union.extend(fog::visible_set(game.board().grid(), Force::White));
        visible_union.extend(fog::visible_set(game.board().grid(), Force::Black));
        for (pos, _) in game.board().grid().pieces() {
            assert!(visible_union.contains(&pos));
        }
    }
}
