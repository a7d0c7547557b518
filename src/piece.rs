use derive_new::new;
use enum_map::Enum;
use strum::EnumIter;

use crate::force::Force;


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Enum, EnumIter)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

// A piece as stored in the grid. The square it stands on is the grid key;
// `has_moved` only affects a pawn's double-step eligibility.
#[derive(Clone, Copy, PartialEq, Eq, Debug, new)]
pub struct PieceOnBoard {
    pub kind: PieceKind,
    pub force: Force,
    #[new(default)]
    pub has_moved: bool,
}

impl PieceKind {
    pub fn to_full_algebraic(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }
}

pub fn algebraic_to_piece_kind(ch: char) -> Option<PieceKind> {
    use strum::IntoEnumIterator;
    PieceKind::iter().find(|kind| kind.to_full_algebraic() == ch)
}

pub fn piece_to_pictogram(piece_kind: PieceKind, force: Force) -> char {
    use self::Force::*;
    use self::PieceKind::*;
    match (force, piece_kind) {
        (White, Pawn) => '♙',
        (White, Knight) => '♘',
        (White, Bishop) => '♗',
        (White, Rook) => '♖',
        (White, Queen) => '♕',
        (White, King) => '♔',
        (Black, Pawn) => '♟',
        (Black, Knight) => '♞',
        (Black, Bishop) => '♝',
        (Black, Rook) => '♜',
        (Black, Queen) => '♛',
        (Black, King) => '♚',
    }
}


#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn algebraic_letters_round_trip() {
        for kind in PieceKind::iter() {
            assert_eq!(algebraic_to_piece_kind(kind.to_full_algebraic()), Some(kind));
        }
        assert_eq!(algebraic_to_piece_kind('X'), None);
    }

    #[test]
    fn pictograms_are_distinct() {
        let pictograms: Vec<_> = Force::iter()
            .cartesian_product(PieceKind::iter())
            .map(|(force, kind)| piece_to_pictogram(kind, force))
            .collect();
        assert_eq!(pictograms.iter().unique().count(), pictograms.len());
    }
}
