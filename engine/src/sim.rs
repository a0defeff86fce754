//! Discrete random-walk descent through the peg board.

use pegfall_types::{Direction, PathStep, PegMap, DROP_COLUMN_ADJUSTMENT, ROWS};

use crate::rng::RoundRng;

/// Walk a ball down the board, one decision per row.
///
/// The ball's position is the count of rightward moves so far; after
/// `ROWS` rows it is the landing bin, one of `ROWS + 1` values. The
/// per-row bias shift steers the walk toward the chosen drop column
/// without making the outcome a function of the column alone.
///
/// Draws continue the sequence the board generation started; the peg
/// lookup clamps to the row's last peg where the position exceeds the
/// triangular matrix.
pub fn simulate_drop(rng: &mut RoundRng, peg_map: &PegMap, drop_column: u8) -> Vec<PathStep> {
    let center_column = ROWS / 2;
    let adjustment =
        (f64::from(drop_column) - f64::from(center_column)) * DROP_COLUMN_ADJUSTMENT;

    let mut path = Vec::with_capacity(ROWS as usize);
    let mut position: u8 = 0;
    for row in 0..ROWS {
        let peg_index = position.min(row);
        let left_bias = peg_map[row as usize][peg_index as usize];
        let adjusted_bias = (left_bias + adjustment).clamp(0.0, 1.0);

        let random_value = rng.next();
        let direction = if random_value < adjusted_bias {
            Direction::Left
        } else {
            position += 1;
            Direction::Right
        };

        path.push(PathStep {
            row,
            column: position,
            direction,
            peg_bias: left_bias,
            adjusted_bias,
            random_value,
        });
    }
    path
}
