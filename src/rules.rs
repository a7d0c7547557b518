use std::collections::HashSet;

use crate::coord::Coord;
use crate::grid::Grid;
use crate::piece::{PieceKind, PieceOnBoard};


const ORTHOGONAL_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2),
];
const KING_STEPS: [(i8, i8); 8] = [
    (1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (-1, -1), (0, -1), (1, -1),
];

// Candidate destination squares for the piece standing on `from`, as a pure
// function of the given grid snapshot. Own color blocks, opposite color is a
// capturable stop, off-board squares are excluded. King safety is not
// considered here; that is the validator's job.
pub fn valid_moves(grid: &Grid, from: Coord) -> HashSet<Coord> {
    let Some(piece) = grid[from] else {
        return HashSet::new();
    };
    match piece.kind {
        PieceKind::Pawn => pawn_moves(grid, from, piece),
        PieceKind::Knight => leaper_moves(grid, from, piece, &KNIGHT_JUMPS),
        PieceKind::Bishop => slider_moves(grid, from, piece, &DIAGONAL_DIRECTIONS),
        PieceKind::Rook => slider_moves(grid, from, piece, &ORTHOGONAL_DIRECTIONS),
        PieceKind::Queen => {
            let mut moves = slider_moves(grid, from, piece, &ORTHOGONAL_DIRECTIONS);
            moves.extend(slider_moves(grid, from, piece, &DIAGONAL_DIRECTIONS));
            moves
        }
        PieceKind::King => leaper_moves(grid, from, piece, &KING_STEPS),
    }
}

pub fn is_valid_move(grid: &Grid, from: Coord, to: Coord) -> bool {
    valid_moves(grid, from).contains(&to)
}

// What the piece standing on `from` currently sees: its destination squares
// plus its own square. Pawns are better scouts than movers, see below.
pub fn visible_squares(grid: &Grid, from: Coord) -> HashSet<Coord> {
    let Some(piece) = grid[from] else {
        return HashSet::new();
    };
    let mut visible = valid_moves(grid, from);
    visible.insert(from);
    if piece.kind == PieceKind::Pawn {
        // A pawn always watches the three squares it could conceivably step
        // or capture to, and two ranks ahead, whether or not those are
        // currently legal moves.
        let fwd = piece.force.forward();
        for delta in [(fwd, 0), (fwd, 1), (fwd, -1), (fwd * 2, 0)] {
            if let Some(pos) = from.shift(delta) {
                visible.insert(pos);
            }
        }
    }
    visible
}

fn pawn_moves(grid: &Grid, from: Coord, piece: PieceOnBoard) -> HashSet<Coord> {
    let fwd = piece.force.forward();
    let mut moves = HashSet::new();
    let fwd_one = from.shift((fwd, 0));
    if let Some(one) = fwd_one {
        if grid[one].is_none() {
            moves.insert(one);
            // Double step: the transit square was just verified empty, the
            // landing square must be empty too.
            if !piece.has_moved {
                if let Some(two) = from.shift((fwd * 2, 0)) {
                    if grid[two].is_none() {
                        moves.insert(two);
                    }
                }
            }
        }
    }
    for d_col in [-1, 1] {
        if let Some(target) = from.shift((fwd, d_col)) {
            if let Some(other) = grid[target] {
                if other.force != piece.force {
                    moves.insert(target);
                }
            }
        }
    }
    moves
}

fn leaper_moves(
    grid: &Grid, from: Coord, piece: PieceOnBoard, deltas: &[(i8, i8)],
) -> HashSet<Coord> {
    let mut moves = HashSet::new();
    for &delta in deltas {
        if let Some(to) = from.shift(delta) {
            match grid[to] {
                Some(other) if other.force == piece.force => {}
                _ => {
                    moves.insert(to);
                }
            }
        }
    }
    moves
}

fn slider_moves(
    grid: &Grid, from: Coord, piece: PieceOnBoard, directions: &[(i8, i8)],
) -> HashSet<Coord> {
    let mut moves = HashSet::new();
    for &direction in directions {
        let mut pos = from;
        while let Some(next) = pos.shift(direction) {
            match grid[next] {
                None => {
                    moves.insert(next);
                    pos = next;
                }
                Some(other) => {
                    if other.force != piece.force {
                        moves.insert(next);
                    }
                    break;
                }
            }
        }
    }
    moves
}
