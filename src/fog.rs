use std::collections::HashSet;

use enum_map::{enum_map, EnumMap};

use crate::coord::{Col, Coord, Row};
use crate::force::Force;
use crate::grid::Grid;
use crate::rules;


// Everything a force currently observes: the union of its pieces' visible
// squares. Always recomputed from live board state, never cached across
// moves.
pub fn visible_set(grid: &Grid, force: Force) -> HashSet<Coord> {
    let mut visible = HashSet::new();
    for (pos, piece) in grid.pieces() {
        if piece.force == force {
            visible.extend(rules::visible_squares(grid, pos));
        }
    }
    visible
}

#[derive(Clone, Debug)]
pub struct FogOfWar {
    visible: EnumMap<Force, HashSet<Coord>>,
}

impl FogOfWar {
    pub fn compute(grid: &Grid) -> Self {
        FogOfWar {
            visible: enum_map! { force => visible_set(grid, force) },
        }
    }

    pub fn visible(&self, force: Force) -> &HashSet<Coord> { &self.visible[force] }

    pub fn is_visible(&self, force: Force, pos: Coord) -> bool {
        self.visible[force].contains(&pos)
    }
}

fn gcd(a: u8, b: u8) -> u8 {
    if b == 0 { a } else { gcd(b, a % b) }
}

// Ordered lattice points on the straight line from `from` to `to`, both
// endpoints inclusive, stepping by the gcd-reduced direction vector. A
// knight's delta reduces to a single step, so its path degenerates to the
// two endpoints: no intermediate lattice point lies on the segment.
pub fn path_between(from: Coord, to: Coord) -> Vec<Coord> {
    let (d_row, d_col) = to - from;
    let steps = gcd(d_row.unsigned_abs(), d_col.unsigned_abs());
    if steps == 0 {
        return vec![from];
    }
    let step = (d_row / steps as i8, d_col / steps as i8);
    let mut path = Vec::with_capacity(steps as usize + 1);
    for i in 0..=steps as i8 {
        path.push(Coord::new(
            Row::from_zero_based((from.row.to_zero_based() as i8 + step.0 * i) as u8),
            Col::from_zero_based((from.col.to_zero_based() as i8 + step.1 * i) as u8),
        ));
    }
    path
}
