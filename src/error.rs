//! Error type shared by every puzzle operation.

use thiserror::Error;

use crate::geometry::Cell;
use crate::pieces::PieceId;

/// Errors produced while building, generating or manipulating a puzzle.
///
/// Search exhaustion is not an error: the solver reports it as
/// [`SolverEvent::NoSolutionFound`](crate::solver::SolverEvent::NoSolutionFound).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    /// A side length or generator setting that cannot describe a puzzle.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },
    /// Every decomposition attempt left a piece below the minimum size.
    #[error("no valid decomposition found after {attempts} attempts")]
    GenerationFailed { attempts: usize },
    /// A shape that violates the piece invariants.
    #[error("invalid shape: {reason}")]
    InvalidShape { reason: String },
    #[error("unknown piece {0}")]
    UnknownPiece(PieceId),
    #[error("piece {0} is already placed")]
    PieceAlreadyPlaced(PieceId),
    #[error("piece {0} is not placed")]
    PieceNotPlaced(PieceId),
    /// Some target cell is outside the hexagon or already occupied.
    #[error("piece {piece} does not fit at ({}, {})", .anchor.0, .anchor.1)]
    PlacementBlocked { piece: PieceId, anchor: Cell },
    /// The anchor cell points the other way from the piece's anchor triangle.
    #[error("piece {piece} cannot be anchored at ({}, {}): orientation mismatch", .anchor.0, .anchor.1)]
    OrientationMismatch { piece: PieceId, anchor: Cell },
    #[error("an automatic solve is in progress")]
    SolverRunning,
}

pub type Result<T> = std::result::Result<T, PuzzleError>;
