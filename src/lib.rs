//! Triangular Hexagon Puzzle Library
//!
//! A hexagon of unit triangles is cut into irregular pieces, and the puzzle
//! is to put them back by translation alone. This crate provides the engine:
//! the cell lattice, the random cutter, placement legality, and a
//! step-at-a-time backtracking solver that a front end can animate.

pub mod error;
pub mod generator;
pub mod geometry;
pub mod grid;
pub mod pieces;
pub mod puzzle;
pub mod solver;
pub mod topology;

pub use error::{PuzzleError, Result};
pub use generator::{generate_pieces, generate_pieces_with, GeneratorConfig};
pub use geometry::{Cell, Offset, Orientation, Reflection};
pub use grid::{format_grid, Grid};
pub use pieces::{Color, Piece, PieceId, Shape};
pub use puzzle::Puzzle;
pub use solver::{Solver, SolverEvent};
pub use topology::Topology;
