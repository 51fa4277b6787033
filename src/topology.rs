//! The hexagonal region of triangular cells and its adjacency relation.
//!
//! A hexagon of side `S` has `2S` rows. Row `r` holds `2S + 1 + 2r` cells in
//! the upper half and mirrors that count in the lower half, centered inside
//! the widest row. Cells are numbered in ascending row, then ascending
//! column order; every scan in the crate walks them in that order.

use crate::error::{PuzzleError, Result};
use crate::geometry::{Cell, Orientation};

/// Immutable cell set of one puzzle instance.
///
/// Lookups go through a dense `rows x width` table, so translating a
/// placement never hashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    side: usize,
    width: usize,
    cells: Vec<Cell>,
    /// Cell index per `(row, col)` slot of the bounding rectangle.
    slots: Vec<Option<usize>>,
    /// Left, right and vertical neighbor of every cell, when present.
    neighbors: Vec<[Option<usize>; 3]>,
}

impl Topology {
    /// Builds the hexagon of the given side length.
    pub fn build(side: usize) -> Result<Self> {
        if side < 1 {
            return Err(PuzzleError::InvalidConfiguration {
                reason: format!("hexagon side must be at least 1, got {side}"),
            });
        }

        let rows = 2 * side;
        let width = row_len(side, side - 1);
        let mut cells = Vec::new();
        let mut slots = vec![None; rows * width];

        for row in 0..rows {
            let count = row_len(side, row);
            let offset = (width - count) / 2;
            for col in offset..offset + count {
                slots[row * width + col] = Some(cells.len());
                cells.push((row as i32, col as i32));
            }
        }

        let mut topology = Self {
            side,
            width,
            cells,
            slots,
            neighbors: Vec::new(),
        };
        topology.neighbors = topology
            .cells
            .iter()
            .map(|&cell| {
                candidate_neighbors(cell).map(|candidate| topology.index_of(candidate))
            })
            .collect();

        Ok(topology)
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Number of rows (`2 * side`).
    pub fn rows(&self) -> usize {
        2 * self.side
    }

    /// Number of columns in the widest row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All cells in scan order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The cell with the given scan index.
    #[inline]
    pub fn cell(&self, index: usize) -> Cell {
        self.cells[index]
    }

    /// Scan index of `cell`, or `None` when it lies outside the hexagon.
    #[inline]
    pub fn index_of(&self, (row, col): Cell) -> Option<usize> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= self.rows() || col >= self.width {
            return None;
        }
        self.slots[row * self.width + col]
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        self.index_of(cell).is_some()
    }

    /// Neighbors of `cell` that lie inside the hexagon.
    ///
    /// Order is left, right, then the vertical neighbor. A cell outside the
    /// hexagon has no neighbors.
    pub fn neighbors(&self, cell: Cell) -> Vec<Cell> {
        match self.index_of(cell) {
            Some(index) => self
                .neighbor_indices(index)
                .map(|neighbor| self.cells[neighbor])
                .collect(),
            None => Vec::new(),
        }
    }

    /// Scan indices of the neighbors of the cell at `index`.
    #[inline]
    pub fn neighbor_indices(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.neighbors[index].iter().flatten().copied()
    }
}

/// Cell count of `row` in a hexagon of side `side`.
pub fn row_len(side: usize, row: usize) -> usize {
    let base = 2 * side + 1;
    if row < side {
        base + 2 * row
    } else {
        base + 2 * (2 * side - 1 - row)
    }
}

/// Left, right and vertical neighbor positions, ignoring bounds.
fn candidate_neighbors((row, col): Cell) -> [Cell; 3] {
    let vertical = match Orientation::of((row, col)) {
        Orientation::Up => (row + 1, col),
        Orientation::Down => (row - 1, col),
    };
    [(row, col - 1), (row, col + 1), vertical]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_zero_is_rejected() {
        assert!(matches!(
            Topology::build(0),
            Err(PuzzleError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_side_one_cells() {
        let topology = Topology::build(1).unwrap();
        assert_eq!(
            topology.cells(),
            &[(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]
        );
    }

    #[test]
    fn test_side_one_neighbors() {
        let topology = Topology::build(1).unwrap();
        assert_eq!(topology.neighbors((0, 0)), vec![(0, 1), (1, 0)]);
        assert_eq!(topology.neighbors((0, 1)), vec![(0, 0), (0, 2)]);
        assert_eq!(topology.neighbors((1, 1)), vec![(1, 0), (1, 2)]);
        assert!(topology.neighbors((5, 5)).is_empty());
    }

    #[test]
    fn test_cell_count_matches_row_formula() {
        for side in 1..=6 {
            let topology = Topology::build(side).unwrap();
            let expected: usize = (0..2 * side).map(|row| row_len(side, row)).sum();
            assert_eq!(topology.len(), expected, "side {side}");
            assert_eq!(topology.len(), 6 * side * side, "side {side}");
        }
    }

    #[test]
    fn test_scan_order_is_row_then_column() {
        let topology = Topology::build(3).unwrap();
        assert!(topology.cells().windows(2).all(|pair| pair[0] < pair[1]));
        for (index, &cell) in topology.cells().iter().enumerate() {
            assert_eq!(topology.index_of(cell), Some(index));
        }
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        for side in 1..=4 {
            let topology = Topology::build(side).unwrap();
            for &cell in topology.cells() {
                for neighbor in topology.neighbors(cell) {
                    assert!(
                        topology.neighbors(neighbor).contains(&cell),
                        "{cell:?} -> {neighbor:?} is not mirrored (side {side})"
                    );
                }
            }
        }
    }

    #[test]
    fn test_rows_are_centered() {
        let topology = Topology::build(2).unwrap();
        assert_eq!(topology.width(), 7);
        assert!(!topology.contains((0, 0)));
        assert!(topology.contains((0, 1)));
        assert!(topology.contains((1, 0)));
        assert!(topology.contains((3, 5)));
        assert!(!topology.contains((3, 6)));
        assert!(!topology.contains((-1, 2)));
    }
}
