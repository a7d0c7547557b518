use lazy_static::lazy_static;
use regex_lite::Regex;

use crate::coord::Coord;
use crate::force::Force;
use crate::grid::Grid;
use crate::piece::{PieceKind, PieceOnBoard};
use crate::rules;


// A move carries no piece reference: the piece is looked up by `from` at
// apply time, so validation always acts on current board truth.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Move {
    pub from: Coord,
    pub to: Coord,
}

impl Move {
    // Console notation: "e2e4", with an optional '-', 'x' or ':' separator.
    pub fn from_algebraic(s: &str) -> Option<Move> {
        lazy_static! {
            static ref MOVE_RE: Regex = Regex::new("^([a-h][1-8])[-x:]?([a-h][1-8])$").unwrap();
        }
        let cap = MOVE_RE.captures(s.trim())?;
        Some(Move {
            from: Coord::from_algebraic(cap.get(1).unwrap().as_str()),
            to: Coord::from_algebraic(cap.get(2).unwrap().as_str()),
        })
    }

    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.from.to_algebraic(), self.to.to_algebraic())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveError {
    // Ordinary rejections: reported to the move's originator, game continues.
    PieceMissing,
    WrongTurnOrder,
    FriendlyFire,
    ImpossibleTrajectory,
    UnprotectedKing,
    // Invariant violation: a side has no king. Fatal to the session.
    KingMissing,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MoveOutcome {
    pub capture: Option<PieceOnBoard>,
    // Whether the mover's opponent is in check on the new board. Displayed
    // as a "you are in check" notice; checkmate is not detected.
    pub opponent_in_check: bool,
}

pub fn find_king(grid: &Grid, force: Force) -> Option<Coord> {
    grid.pieces()
        .find(|(_, piece)| piece.kind == PieceKind::King && piece.force == force)
        .map(|(pos, _)| pos)
}

// A force is in check iff any opposite piece could move onto its king's
// square on this very grid snapshot.
pub fn is_in_check(grid: &Grid, force: Force) -> Result<bool, MoveError> {
    let king_pos = find_king(grid, force).ok_or(MoveError::KingMissing)?;
    Ok(grid
        .pieces()
        .any(|(pos, piece)| piece.force != force && rules::valid_moves(grid, pos).contains(&king_pos)))
}


#[derive(Clone, Debug)]
pub struct Board {
    grid: Grid,
    active_force: Force,
}

impl Board {
    pub fn new(starting_grid: Grid) -> Board {
        Board {
            grid: starting_grid,
            active_force: Force::White,
        }
    }

    pub fn grid(&self) -> &Grid { &self.grid }
    pub fn active_force(&self) -> Force { self.active_force }

    // The single authorized mutation path, used identically for local and
    // network moves. Validation is split into two phases: first determine
    // the outcome on a cloned grid (cannot corrupt live state, can fail),
    // then commit it as one atomic grid swap (cannot fail). Only a piece of
    // the active force may move, so every committed move passes the turn to
    // the opponent. Shape legality
    // is tested before king safety, so the self-check veto only ever runs
    // against moves that are otherwise legal.
    pub fn try_move(&mut self, mv: Move) -> Result<MoveOutcome, MoveError> {
        let piece = self.grid[mv.from].ok_or(MoveError::PieceMissing)?;
        if piece.force != self.active_force {
            return Err(MoveError::WrongTurnOrder);
        }
        if let Some(target) = self.grid[mv.to] {
            if target.force == piece.force {
                return Err(MoveError::FriendlyFire);
            }
        }
        if !rules::is_valid_move(&self.grid, mv.from, mv.to) {
            return Err(MoveError::ImpossibleTrajectory);
        }

        let mut new_grid = self.grid.clone();
        new_grid[mv.from] = None;
        let capture = new_grid[mv.to];
        new_grid[mv.to] = Some(PieceOnBoard {
            has_moved: true,
            ..piece
        });

        if is_in_check(&new_grid, piece.force)? {
            return Err(MoveError::UnprotectedKing);
        }
        let opponent_in_check = is_in_check(&new_grid, piece.force.opponent())?;

        self.grid = new_grid;
        self.active_force = self.active_force.opponent();
        Ok(MoveOutcome {
            capture,
            opponent_in_check,
        })
    }
}
