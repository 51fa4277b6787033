//! Grid occupancy and placement legality.
//!
//! The grid is a flat array parallel to the topology's cell list; each slot
//! holds the occupying piece or `None`. The cell set never changes after
//! construction, only occupants do.

use crate::error::{PuzzleError, Result};
use crate::geometry::{translate, Cell, Orientation};
use crate::pieces::{Piece, PieceId, Shape};
use crate::topology::Topology;

/// Occupancy of every cell of one topology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    topology: Topology,
    occupants: Vec<Option<PieceId>>,
}

impl Grid {
    /// An all-empty grid over `topology`.
    pub fn new(topology: Topology) -> Self {
        let occupants = vec![None; topology.len()];
        Self {
            topology,
            occupants,
        }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Occupant of `cell`; `None` when the cell is outside the hexagon.
    #[inline]
    pub fn get(&self, cell: Cell) -> Option<Option<PieceId>> {
        self.topology
            .index_of(cell)
            .map(|index| self.occupants[index])
    }

    /// Cells paired with their occupants, in scan order.
    pub fn occupancy(&self) -> impl Iterator<Item = (Cell, Option<PieceId>)> + '_ {
        self.topology
            .cells()
            .iter()
            .copied()
            .zip(self.occupants.iter().copied())
    }

    /// True when every offset of `shape` anchored at `anchor` lands on an
    /// empty cell inside the hexagon.
    #[inline]
    pub fn can_place(&self, shape: &Shape, anchor: Cell) -> bool {
        shape.offsets().iter().all(|&offset| {
            self.topology
                .index_of(translate(anchor, offset))
                .is_some_and(|index| self.occupants[index].is_none())
        })
    }

    /// Places `piece` with its anchor on `anchor`.
    ///
    /// Re-validates before mutating: on error the grid and piece are left
    /// exactly as they were.
    pub fn place(&mut self, piece: &mut Piece, anchor: Cell) -> Result<()> {
        if piece.is_placed() {
            return Err(PuzzleError::PieceAlreadyPlaced(piece.id()));
        }
        if !self.can_place(piece.shape(), anchor) {
            return Err(PuzzleError::PlacementBlocked {
                piece: piece.id(),
                anchor,
            });
        }
        self.fill(piece, anchor);
        Ok(())
    }

    /// Interactive placement: additionally requires the anchor cell to point
    /// the same way as the piece's anchor triangle, so the footprint on the
    /// grid matches the drawn one.
    pub fn place_matching(&mut self, piece: &mut Piece, anchor: Cell) -> Result<()> {
        if Orientation::of(anchor) != piece.anchor_orientation() {
            return Err(PuzzleError::OrientationMismatch {
                piece: piece.id(),
                anchor,
            });
        }
        self.place(piece, anchor)
    }

    /// Lifts `piece` off the grid and returns the anchor it occupied.
    pub fn remove(&mut self, piece: &mut Piece) -> Result<Cell> {
        let anchor = piece
            .anchor()
            .ok_or(PuzzleError::PieceNotPlaced(piece.id()))?;
        Ok(self.clear(piece, anchor))
    }

    /// Writes the piece into its cells. Caller has checked `can_place`.
    pub(crate) fn fill(&mut self, piece: &mut Piece, anchor: Cell) {
        self.write(piece.shape(), anchor, Some(piece.id()));
        piece.anchor = Some(anchor);
    }

    /// Empties the piece's cells and marks it unplaced.
    pub(crate) fn clear(&mut self, piece: &mut Piece, anchor: Cell) -> Cell {
        self.write(piece.shape(), anchor, None);
        piece.anchor = None;
        anchor
    }

    fn write(&mut self, shape: &Shape, anchor: Cell, occupant: Option<PieceId>) {
        for cell in shape.cells_at(anchor) {
            if let Some(index) = self.topology.index_of(cell) {
                self.occupants[index] = occupant;
            }
        }
    }

    /// Scan index of the first empty cell, or `None` when the grid is full.
    #[inline]
    pub fn first_empty(&self) -> Option<usize> {
        self.occupants.iter().position(Option::is_none)
    }

    pub fn is_full(&self) -> bool {
        self.occupants.iter().all(Option::is_some)
    }

    /// Number of occupied cells.
    pub fn filled(&self) -> usize {
        self.occupants.iter().filter(|occupant| occupant.is_some()).count()
    }

    /// Empties every cell. Pieces keep their own flags; see
    /// [`Puzzle::reset`](crate::puzzle::Puzzle::reset) for a full reset.
    pub fn clear_all(&mut self) {
        self.occupants.fill(None);
    }
}

/// Formats the grid as text, one character per column of the bounding box.
///
/// `.` marks positions outside the hexagon, `^`/`v` empty point-up and
/// point-down cells, and anything else the label of the occupying piece.
pub fn format_grid(grid: &Grid) -> String {
    let topology = grid.topology();
    let mut output = String::new();

    for row in 0..topology.rows() as i32 {
        for col in 0..topology.width() as i32 {
            let display_char = match grid.get((row, col)) {
                None => '.',
                Some(None) => Orientation::of((row, col)).symbol(),
                Some(Some(piece)) => piece.label(),
            };
            output.push(display_char);
        }
        output.push('\n');
    }

    output
}
