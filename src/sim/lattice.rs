//! Peg lattice geometry for the triangular board
//!
//! In normalized board coordinates, a peg is defined by:
//! - row: 0 at the top, increasing downward
//! - column: 0..=row, left to right
//! - x, y: scaled by 1 / (rows + 1) so the lattice always spans the board width
//!
//! Bins sit on a virtual row at index `rows`, so bin `k` is horizontally
//! aligned with the peg at `(rows, k)`.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{BOARD_WIDTH, PEG_OFFSET};

/// Distance between neighbouring pegs for a given row count
#[inline]
pub fn peg_spacing(number_of_rows: usize) -> f64 {
    BOARD_WIDTH / (number_of_rows as f64 + 1.0)
}

/// Horizontal peg position
#[inline]
pub fn peg_position_x(row: usize, column: usize, number_of_rows: usize) -> f64 {
    (-(row as f64) / 2.0 + column as f64) / (number_of_rows as f64 + 1.0)
}

/// Vertical peg position (the column does not matter)
#[inline]
pub fn peg_position_y(row: usize, number_of_rows: usize) -> f64 {
    (-(row as f64) - 2.0 * PEG_OFFSET) / (number_of_rows as f64 + 1.0)
}

/// Peg position as a vector
#[inline]
pub fn peg_position(row: usize, column: usize, number_of_rows: usize) -> DVec2 {
    DVec2::new(
        peg_position_x(row, column, number_of_rows),
        peg_position_y(row, number_of_rows),
    )
}

/// Horizontal center of a bin
#[inline]
pub fn bin_center_x(bin_index: usize, number_of_rows: usize) -> f64 {
    peg_position_x(number_of_rows, bin_index, number_of_rows)
}

/// A single peg. Pegs past the current row count are hidden, not removed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peg {
    pub row_index: usize,
    pub column_index: usize,
    pub position: DVec2,
    pub visible: bool,
}

/// All pegs for the largest supported board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaltonBoard {
    row_count: usize,
    max_row_count: usize,
    /// Row-major: row 0 first, `row + 1` pegs per row
    pegs: Vec<Peg>,
}

impl GaltonBoard {
    pub fn new(row_count: usize, max_row_count: usize) -> Self {
        let mut pegs = Vec::with_capacity(max_row_count * (max_row_count + 1) / 2);
        for row_index in 0..max_row_count {
            for column_index in 0..=row_index {
                pegs.push(Peg {
                    row_index,
                    column_index,
                    position: DVec2::ZERO,
                    visible: false,
                });
            }
        }

        let mut board = Self {
            row_count,
            max_row_count,
            pegs,
        };
        board.set_row_count(row_count);
        board
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn max_row_count(&self) -> usize {
        self.max_row_count
    }

    /// Peg separation at the current row count
    pub fn peg_spacing(&self) -> f64 {
        peg_spacing(self.row_count)
    }

    /// Show the first `row_count` rows and reposition them.
    ///
    /// Hidden pegs keep whatever position they had last.
    pub fn set_row_count(&mut self, row_count: usize) {
        debug_assert!(
            row_count <= self.max_row_count,
            "row count {} exceeds maximum {}",
            row_count,
            self.max_row_count
        );
        self.row_count = row_count;
        for peg in &mut self.pegs {
            peg.visible = peg.row_index < row_count;
            if peg.visible {
                peg.position = peg_position(peg.row_index, peg.column_index, row_count);
            }
        }
    }

    /// Look up a peg by row and column
    pub fn peg(&self, row: usize, column: usize) -> Option<&Peg> {
        if row >= self.max_row_count || column > row {
            return None;
        }
        self.pegs.get(row * (row + 1) / 2 + column)
    }

    pub fn pegs(&self) -> &[Peg] {
        &self.pegs
    }

    pub fn visible_pegs(&self) -> impl Iterator<Item = &Peg> {
        self.pegs.iter().filter(|p| p.visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_peg_spacing() {
        assert_relative_eq!(peg_spacing(1), 0.5);
        assert_relative_eq!(peg_spacing(9), 0.1);
    }

    #[test]
    fn test_peg_geometry_formulas() {
        // rows = 4 -> denominator 5
        let p = peg_position(2, 1, 4);
        assert_relative_eq!(p.x, 0.0);
        assert_relative_eq!(p.y, (-2.0 - 1.4) / 5.0);

        let p = peg_position(3, 0, 4);
        assert_relative_eq!(p.x, -1.5 / 5.0);
    }

    #[test]
    fn test_neighbouring_rows_are_half_a_spacing_apart() {
        let rows = 7;
        let spacing = peg_spacing(rows);
        for row in 0..rows {
            for col in 0..=row {
                let here = peg_position(row, col, rows);
                let left = peg_position(row + 1, col, rows);
                let right = peg_position(row + 1, col + 1, rows);
                assert_relative_eq!(left.x - here.x, -0.5 * spacing, epsilon = 1e-12);
                assert_relative_eq!(right.x - here.x, 0.5 * spacing, epsilon = 1e-12);
                assert_relative_eq!(left.y - here.y, -spacing, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_bins_are_symmetric_about_center() {
        let rows = 6;
        for k in 0..=rows {
            assert_relative_eq!(
                bin_center_x(k, rows),
                -bin_center_x(rows - k, rows),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_set_row_count_hides_pegs_without_destroying_them() {
        let mut board = GaltonBoard::new(10, 26);
        let total = board.pegs().len();
        assert_eq!(total, 26 * 27 / 2);
        assert_eq!(board.visible_pegs().count(), 10 * 11 / 2);

        let stale = board.peg(9, 4).copied().unwrap();
        board.set_row_count(5);
        assert_eq!(board.pegs().len(), total);
        assert_eq!(board.visible_pegs().count(), 15);

        let hidden = board.peg(9, 4).unwrap();
        assert!(!hidden.visible);
        assert_eq!(hidden.position, stale.position);

        let shown = board.peg(4, 2).unwrap();
        assert!(shown.visible);
        assert_eq!(shown.position, peg_position(4, 2, 5));
    }

    #[test]
    fn test_peg_lookup_out_of_range() {
        let board = GaltonBoard::new(3, 4);
        assert!(board.peg(1, 2).is_none());
        assert!(board.peg(4, 0).is_none());
        assert!(board.peg(3, 3).is_some());
    }
}
