use crate::board::{Board, Move, MoveError, MoveOutcome};
use crate::coord::{Col, Coord, Row, NUM_ROWS};
use crate::force::Force;
use crate::grid::Grid;
use crate::piece::{PieceKind, PieceOnBoard};


fn new_white(kind: PieceKind) -> PieceOnBoard {
    PieceOnBoard::new(kind, Force::White)
}

fn setup_white_pawns_on_2nd_row(grid: &mut Grid) {
    for col in Col::all() {
        grid[Coord::new(Row::_2, col)] = Some(new_white(PieceKind::Pawn));
    }
}

fn setup_black_pieces_mirrorlike(grid: &mut Grid) {
    for coord in Coord::all() {
        if let Some(piece) = grid[coord] {
            if piece.force == Force::White {
                let mirror_row = Row::from_zero_based(NUM_ROWS - coord.row.to_zero_based() - 1);
                let mirror_coord = Coord::new(mirror_row, coord.col);
                assert!(grid[mirror_coord].is_none(), "{:?}", grid);
                grid[mirror_coord] = Some(PieceOnBoard {
                    force: Force::Black,
                    ..piece
                });
            }
        }
    }
}

pub fn starting_grid() -> Grid {
    use PieceKind::*;
    let mut grid = Grid::new();
    let back_row = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
    for (col, kind) in Col::all().zip(back_row) {
        grid[Coord::new(Row::_1, col)] = Some(new_white(kind));
    }
    setup_white_pawns_on_2nd_row(&mut grid);
    setup_black_pieces_mirrorlike(&mut grid);
    grid
}


// One authoritative game per peer. `local_force` stays `None` on the client
// until the handshake assigns it. Both input sources funnel through
// `try_move`; the turn gate makes a rejected requester indistinguishable
// from any other rejected move, and the identical apply path on both peers
// is what keeps their boards convergent.
#[derive(Clone, Debug)]
pub struct GameState {
    board: Board,
    local_force: Option<Force>,
}

impl GameState {
    pub fn new() -> Self {
        GameState {
            board: Board::new(starting_grid()),
            local_force: None,
        }
    }

    pub fn board(&self) -> &Board { &self.board }
    pub fn local_force(&self) -> Option<Force> { self.local_force }
    pub fn set_local_force(&mut self, force: Force) { self.local_force = Some(force); }

    pub fn is_local_turn(&self) -> bool {
        self.local_force == Some(self.board.active_force())
    }

    pub fn try_move(&mut self, requester: Force, mv: Move) -> Result<MoveOutcome, MoveError> {
        if requester != self.board.active_force() {
            return Err(MoveError::WrongTurnOrder);
        }
        self.board.try_move(mv)
    }
}
