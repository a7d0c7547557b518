use std::str::FromStr;

use enum_map::Enum;
use strum::EnumIter;


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Enum, EnumIter)]
pub enum Force {
    White,
    Black,
}

impl Force {
    pub fn opponent(self) -> Force {
        match self {
            Force::White => Force::Black,
            Force::Black => Force::White,
        }
    }

    // Direction of pawn movement: white pawns climb the rows, black pawns descend.
    pub fn forward(self) -> i8 {
        match self {
            Force::White => 1,
            Force::Black => -1,
        }
    }
}

impl FromStr for Force {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "white" => Ok(Force::White),
            "black" => Ok(Force::Black),
            _ => Err(format!(r#"expected "white" or "black", got "{s}""#)),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opponent_is_involutive() {
        assert_eq!(Force::White.opponent(), Force::Black);
        assert_eq!(Force::Black.opponent().opponent(), Force::Black);
    }
}
