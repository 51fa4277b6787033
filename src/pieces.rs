//! Piece definitions: footprints, identifiers and display attributes.
//!
//! A shape is stored as offsets from its anchor, normalized so the smallest
//! offset (by row, then column) is `(0, 0)`. Because the lattice alternates
//! orientation, a shape is only meaningful together with the orientation of
//! its anchor triangle.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::error::{PuzzleError, Result};
use crate::geometry::{normalize_to_anchor, reflect, translate, Cell, Offset, Orientation, Reflection};
use crate::topology::Topology;

/// Smallest piece the generator will keep.
pub const MIN_PIECE_SIZE: usize = 3;

/// Largest piece the generator will grow.
pub const MAX_PIECE_SIZE: usize = 9;

/// Stable identifier of a piece; equal to its position in the piece list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceId(pub usize);

impl PieceId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }

    /// Single-character label used by the text renderings.
    pub fn label(self) -> char {
        const LABELS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
        LABELS.get(self.0).map_or('#', |&byte| char::from(byte))
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An RGB display color. The engine stores it and never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u8, pub u8, pub u8);

/// Colors assigned cyclically by piece index.
pub const PALETTE: [Color; 16] = [
    Color(255, 107, 107),
    Color(78, 205, 196),
    Color(255, 230, 109),
    Color(26, 83, 92),
    Color(247, 255, 247),
    Color(255, 50, 50),
    Color(100, 100, 255),
    Color(100, 255, 100),
    Color(255, 100, 255),
    Color(100, 255, 255),
    Color(255, 150, 50),
    Color(150, 50, 255),
    Color(50, 250, 150),
    Color(250, 50, 150),
    Color(50, 150, 250),
    Color(200, 200, 200),
];

/// Palette entry for the piece with the given index.
#[inline]
pub fn palette_color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

/// A normalized footprint plus the orientation of its anchor triangle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    offsets: Vec<Offset>,
    anchor_orientation: Orientation,
}

impl Shape {
    /// Validates and normalizes an externally supplied footprint.
    ///
    /// `orientation` is the orientation of the cell at offset `(0, 0)` as
    /// given; offsets need not be normalized yet.
    pub fn new(offsets: Vec<Offset>, orientation: Orientation) -> Result<Self> {
        if !(MIN_PIECE_SIZE..=MAX_PIECE_SIZE).contains(&offsets.len()) {
            return Err(PuzzleError::InvalidShape {
                reason: format!(
                    "{} cells, expected {MIN_PIECE_SIZE} to {MAX_PIECE_SIZE}",
                    offsets.len()
                ),
            });
        }
        let mut seen = FxHashSet::default();
        if let Some(duplicate) = offsets.iter().find(|&&offset| !seen.insert(offset)) {
            return Err(PuzzleError::InvalidShape {
                reason: format!("duplicate offset ({}, {})", duplicate.0, duplicate.1),
            });
        }

        let (offsets, anchor_orientation) = normalize_to_anchor(offsets, orientation);
        Ok(Self {
            offsets,
            anchor_orientation,
        })
    }

    /// Builds the shape of a set of grid cells, returning it with the cell
    /// that becomes its anchor.
    ///
    /// `cells` must be non-empty and free of duplicates.
    pub(crate) fn from_cells(cells: &[Cell]) -> (Self, Cell) {
        let anchor = cells.iter().copied().min().unwrap_or_default();
        let offsets = cells
            .iter()
            .map(|&(row, col)| (row - anchor.0, col - anchor.1))
            .collect();
        let (offsets, anchor_orientation) = normalize_to_anchor(offsets, Orientation::of(anchor));
        (
            Self {
                offsets,
                anchor_orientation,
            },
            anchor,
        )
    }

    /// Offsets in ascending (row, col) order, starting with `(0, 0)`.
    #[inline]
    pub fn offsets(&self) -> &[Offset] {
        &self.offsets
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Orientation of the triangle at offset `(0, 0)` when the footprint
    /// looks the way it was drawn.
    #[inline]
    pub fn anchor_orientation(&self) -> Orientation {
        self.anchor_orientation
    }

    /// Grid cells covered when anchored at `anchor`.
    pub fn cells_at(&self, anchor: Cell) -> impl Iterator<Item = Cell> + '_ {
        self.offsets.iter().map(move |&offset| translate(anchor, offset))
    }

    /// The mirrored shape. The receiver is left untouched.
    pub fn reflected(&self, reflection: Reflection) -> Self {
        let (offsets, anchor_orientation) =
            reflect(&self.offsets, self.anchor_orientation, reflection);
        Self {
            offsets,
            anchor_orientation,
        }
    }
}

/// One puzzle piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    id: PieceId,
    shape: Shape,
    color: Color,
    origin: Option<Cell>,
    pub(crate) anchor: Option<Cell>,
}

impl Piece {
    /// An unplaced piece with the palette color for its index.
    pub fn new(id: PieceId, shape: Shape) -> Self {
        Self {
            id,
            shape,
            color: palette_color(id.index()),
            origin: None,
            anchor: None,
        }
    }

    /// A piece cut from the decomposition at `origin`.
    pub(crate) fn with_origin(id: PieceId, shape: Shape, origin: Cell) -> Self {
        Self {
            origin: Some(origin),
            ..Self::new(id, shape)
        }
    }

    #[inline]
    pub fn id(&self) -> PieceId {
        self.id
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Size in cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.shape.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shape.is_empty()
    }

    #[inline]
    pub fn anchor_orientation(&self) -> Orientation {
        self.shape.anchor_orientation()
    }

    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn is_placed(&self) -> bool {
        self.anchor.is_some()
    }

    /// Where the piece currently sits, if placed.
    #[inline]
    pub fn anchor(&self) -> Option<Cell> {
        self.anchor
    }

    /// Anchor held in the generated decomposition, for generated pieces
    /// whose shape has not been mirrored since.
    pub fn origin(&self) -> Option<Cell> {
        self.origin
    }

    /// Replaces the shape with its mirror image. Only meaningful while the
    /// piece is off the grid; callers enforce that.
    pub(crate) fn reflect(&mut self, reflection: Reflection) {
        self.shape = self.shape.reflected(reflection);
        self.origin = None;
    }
}

/// Builds an unplaced piece list from externally supplied shapes.
pub fn pieces_from_shapes(shapes: impl IntoIterator<Item = Shape>) -> Vec<Piece> {
    shapes
        .into_iter()
        .enumerate()
        .map(|(index, shape)| Piece::new(PieceId(index), shape))
        .collect()
}

/// Checks that `placements` cover every cell of `topology` exactly once.
pub fn verify_cover<'a>(
    topology: &Topology,
    placements: impl IntoIterator<Item = (&'a Shape, Cell)>,
) -> bool {
    let mut covered: FxHashSet<Cell> = FxHashSet::default();
    for (shape, anchor) in placements {
        for cell in shape.cells_at(anchor) {
            if !topology.contains(cell) || !covered.insert(cell) {
                return false;
            }
        }
    }
    covered.len() == topology.len()
}

/// Draws a shape as rows of `^`/`v` triangles, `.` where the bounding box
/// has no cell.
pub fn format_shape(shape: &Shape) -> String {
    let offsets = shape.offsets();
    let (Some(min_col), Some(max_col)) = (
        offsets.iter().map(|&(_, dc)| dc).min(),
        offsets.iter().map(|&(_, dc)| dc).max(),
    ) else {
        return String::new();
    };
    let max_row = offsets.iter().map(|&(dr, _)| dr).max().unwrap_or(0);

    let mut output = String::new();
    for dr in 0..=max_row {
        for dc in min_col..=max_col {
            if offsets.contains(&(dr, dc)) {
                output.push(shape.anchor_orientation().shifted((dr, dc)).symbol());
            } else {
                output.push('.');
            }
        }
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_rejects_bad_sizes() {
        assert!(Shape::new(vec![(0, 0), (0, 1)], Orientation::Up).is_err());
        let ten = (0..10).map(|dc| (0, dc)).collect();
        assert!(Shape::new(ten, Orientation::Up).is_err());
    }

    #[test]
    fn test_shape_rejects_duplicates() {
        let result = Shape::new(vec![(0, 0), (0, 1), (0, 1)], Orientation::Up);
        assert!(matches!(result, Err(PuzzleError::InvalidShape { .. })));
    }

    #[test]
    fn test_shape_is_normalized() {
        let shape = Shape::new(vec![(1, 1), (0, 2), (0, 1)], Orientation::Down).unwrap();
        assert_eq!(shape.offsets(), &[(0, 0), (0, 1), (1, 0)]);
        assert_eq!(shape.anchor_orientation(), Orientation::Up);
    }

    #[test]
    fn test_from_cells_picks_minimal_anchor() {
        let (shape, anchor) = Shape::from_cells(&[(2, 3), (1, 4), (1, 3)]);
        assert_eq!(anchor, (1, 3));
        assert_eq!(shape.offsets(), &[(0, 0), (0, 1), (1, 0)]);
        assert_eq!(shape.anchor_orientation(), Orientation::Up);
    }

    #[test]
    fn test_palette_cycles() {
        assert_eq!(palette_color(0), PALETTE[0]);
        assert_eq!(palette_color(17), PALETTE[1]);
        let pieces = pieces_from_shapes([
            Shape::new(vec![(0, 0), (0, 1), (0, 2)], Orientation::Up).unwrap(),
        ]);
        assert_eq!(pieces[0].color(), PALETTE[0]);
        assert!(!pieces[0].is_placed());
    }

    #[test]
    fn test_labels() {
        assert_eq!(PieceId(0).label(), '0');
        assert_eq!(PieceId(10).label(), 'A');
        assert_eq!(PieceId(36).label(), 'a');
        assert_eq!(PieceId(500).label(), '#');
    }

    #[test]
    fn test_verify_cover_detects_overlap_and_gaps() {
        let topology = Topology::build(1).unwrap();
        let top = Shape::new(vec![(0, 0), (0, 1), (0, 2)], Orientation::Up).unwrap();
        let bottom = Shape::new(vec![(0, 0), (0, 1), (0, 2)], Orientation::Down).unwrap();

        assert!(verify_cover(&topology, [(&top, (0, 0)), (&bottom, (1, 0))]));
        assert!(!verify_cover(&topology, [(&top, (0, 0))]));
        assert!(!verify_cover(&topology, [(&top, (0, 0)), (&bottom, (0, 0))]));
        assert!(!verify_cover(&topology, [(&top, (0, 0)), (&bottom, (1, 1))]));
    }

    #[test]
    fn test_format_shape() {
        let shape = Shape::new(vec![(0, 0), (0, 1), (1, -1), (1, 0)], Orientation::Up).unwrap();
        assert_eq!(format_shape(&shape), ".^v\n^v.\n");
    }
}
