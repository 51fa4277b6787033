//! Triangular cell coordinates and shape transforms.
//!
//! Cells are addressed by `(row, col)`. A cell points up when `row + col` is
//! even and down otherwise, so stepping one column always flips the
//! orientation. An up triangle shares its flat edge with the cell below it,
//! a down triangle with the cell above it.
//!
//! Pieces never rotate during solving. Manual play may mirror a piece with
//! one of the two [`Reflection`]s, which are the only transforms that keep a
//! footprint on the lattice without changing its row structure.

/// A grid cell as `(row, col)`.
pub type Cell = (i32, i32);

/// A cell position relative to a piece anchor, as `(row, col)` deltas.
pub type Offset = (i32, i32);

/// Which way a triangular cell points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Up,
    Down,
}

impl Orientation {
    /// Orientation derived from cell parity. Wrapping keeps the parity, so
    /// any coordinate pair is accepted.
    #[inline]
    pub const fn of(cell: Cell) -> Self {
        if cell.0.wrapping_add(cell.1).rem_euclid(2) == 0 {
            Orientation::Up
        } else {
            Orientation::Down
        }
    }

    /// `0` for point-up, `1` for point-down.
    #[inline]
    pub const fn parity(self) -> u8 {
        match self {
            Orientation::Up => 0,
            Orientation::Down => 1,
        }
    }

    #[inline]
    pub const fn flipped(self) -> Self {
        match self {
            Orientation::Up => Orientation::Down,
            Orientation::Down => Orientation::Up,
        }
    }

    /// Orientation of the cell `offset` away from a cell with this orientation.
    #[inline]
    pub const fn shifted(self, offset: Offset) -> Self {
        if offset.0.wrapping_add(offset.1).rem_euclid(2) == 0 {
            self
        } else {
            self.flipped()
        }
    }

    /// Character used by the text renderings.
    pub const fn symbol(self) -> char {
        match self {
            Orientation::Up => '^',
            Orientation::Down => 'v',
        }
    }
}

/// Translates `offset` by `anchor`.
#[inline(always)]
pub const fn translate(anchor: Cell, offset: Offset) -> Cell {
    (anchor.0.wrapping_add(offset.0), anchor.1.wrapping_add(offset.1))
}

/// The two mirror transforms available in manual play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reflection {
    /// Mirror across a horizontal axis: row offsets negate and every
    /// triangle turns over.
    AcrossRows,
    /// Mirror across a vertical axis: column offsets negate and every
    /// triangle keeps its orientation.
    AcrossColumns,
}

impl Reflection {
    #[inline]
    const fn apply(self, (dr, dc): Offset) -> Offset {
        match self {
            Reflection::AcrossRows => (-dr, dc),
            Reflection::AcrossColumns => (dr, -dc),
        }
    }

    #[inline]
    const fn orientation(self, orientation: Orientation) -> Orientation {
        match self {
            Reflection::AcrossRows => orientation.flipped(),
            Reflection::AcrossColumns => orientation,
        }
    }
}

/// Mirrors a footprint whose `(0, 0)` cell has orientation `anchor`.
///
/// Returns the normalized offsets together with the orientation of the cell
/// that ends up at `(0, 0)`.
pub fn reflect(
    offsets: &[Offset],
    anchor: Orientation,
    reflection: Reflection,
) -> (Vec<Offset>, Orientation) {
    let mirrored = offsets.iter().map(|&offset| reflection.apply(offset)).collect();
    normalize_to_anchor(mirrored, reflection.orientation(anchor))
}

/// Translates offsets so the smallest one (by row, then column) is `(0, 0)`.
///
/// `orientation` is the orientation of the current `(0, 0)` position; the
/// returned orientation belongs to the new `(0, 0)` cell. Offsets come back
/// sorted, which makes two translations of the same footprint compare equal.
pub fn normalize_to_anchor(
    mut offsets: Vec<Offset>,
    orientation: Orientation,
) -> (Vec<Offset>, Orientation) {
    let Some(&min) = offsets.iter().min() else {
        return (offsets, orientation);
    };

    for (dr, dc) in &mut offsets {
        *dr -= min.0;
        *dc -= min.1;
    }
    offsets.sort_unstable();

    (offsets, orientation.shifted(min))
}
