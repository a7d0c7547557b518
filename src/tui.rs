use std::collections::HashSet;

use console::Style;
use itertools::Itertools;

use crate::coord::{Col, Coord, Row};
use crate::force::Force;
use crate::grid::Grid;
use crate::piece::piece_to_pictogram;


// Renders the board from one player's perspective: squares outside their
// fog map are blanked entirely, pieces included. Presentation only; the
// fog map itself comes from the visibility engine.
pub fn render_fogged_grid(grid: &Grid, visible: &HashSet<Coord>, perspective: Force) -> String {
    let square_colors = [
        Style::new().color256(233).on_color256(230),
        Style::new().color256(233).on_color256(222),
    ];
    let fog_color = Style::new().color256(240).on_color256(236);

    let mut rows = Row::all().collect_vec();
    let mut cols = Col::all().collect_vec();
    match perspective {
        Force::White => rows.reverse(),
        Force::Black => cols.reverse(),
    }

    let mut col_names = String::new();
    col_names.push_str(&format_square(' '));
    for col in &cols {
        col_names.push_str(&format_square(col.to_algebraic()));
    }
    col_names.push_str(&format_square(' '));
    col_names.push('\n');

    let mut ret = String::new();
    ret.push_str(&col_names);
    for row in rows {
        ret.push_str(&format_square(row.to_algebraic()));
        for col in &cols {
            let pos = Coord::new(row, *col);
            let rendered = if visible.contains(&pos) {
                let color_idx = ((row.to_zero_based() + col.to_zero_based()) % 2) as usize;
                square_colors[color_idx].apply_to(format_square(match grid[pos] {
                    Some(piece) => piece_to_pictogram(piece.kind, piece.force),
                    None => ' ',
                }))
            } else {
                fog_color.apply_to(format_square('·'))
            };
            ret.push_str(&rendered.to_string());
        }
        ret.push_str(&format_square(row.to_algebraic()));
        ret.push('\n');
    }
    ret.push_str(&col_names);
    ret
}

fn format_square(ch: char) -> String {
    format!(" {} ", ch)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::fog;
    use crate::game::starting_grid;

    #[test]
    fn own_pieces_rendered_enemy_fogged() {
        let grid = starting_grid();
        let visible = fog::visible_set(&grid, Force::White);
        let rendered = render_fogged_grid(&grid, &visible, Force::White);
        assert!(rendered.contains('♔'));
        assert!(rendered.contains('♙'));
        // Black's pieces are behind the fog.
        assert!(!rendered.contains('♚'));
        assert!(!rendered.contains('♟'));
    }
}
