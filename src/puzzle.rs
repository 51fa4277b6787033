//! A puzzle session: one grid, its piece set, and an optional running solve.
//!
//! This is the surface a front end drives. Manual play (placing, picking up
//! and mirroring pieces) and automatic solving share the same grid, so
//! manual moves are refused while a solve is in progress.

use rand::Rng;

use crate::error::{PuzzleError, Result};
use crate::generator::{generate_pieces_with, GeneratorConfig};
use crate::geometry::{Cell, Reflection};
use crate::grid::Grid;
use crate::pieces::{Piece, PieceId};
use crate::solver::{Solver, SolverEvent};
use crate::topology::Topology;

/// Side length used when none is configured.
pub const DEFAULT_SIDE: usize = 3;

/// Exclusive owner of one puzzle's mutable state.
#[derive(Debug, Clone)]
pub struct Puzzle {
    grid: Grid,
    pieces: Vec<Piece>,
    solver: Option<Solver>,
}

impl Puzzle {
    /// Builds the hexagon and a random piece set for it.
    pub fn generate<R: Rng>(side: usize, config: &GeneratorConfig, rng: &mut R) -> Result<Self> {
        let topology = Topology::build(side)?;
        let pieces = generate_pieces_with(&topology, config, rng)?;
        Ok(Self {
            grid: Grid::new(topology),
            pieces,
            solver: None,
        })
    }

    /// Wraps an externally supplied piece set.
    ///
    /// Pieces are renumbered by position and taken off the grid. Such a set
    /// may have no covering; solving then ends in
    /// [`SolverEvent::NoSolutionFound`].
    pub fn with_pieces(topology: Topology, pieces: impl IntoIterator<Item = Piece>) -> Self {
        let pieces = pieces
            .into_iter()
            .enumerate()
            .map(|(index, piece)| Piece::new(PieceId(index), piece.shape().clone()))
            .collect();
        Self {
            grid: Grid::new(topology),
            pieces,
            solver: None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn topology(&self) -> &Topology {
        self.grid.topology()
    }

    /// Pieces in their fixed order.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, id: PieceId) -> Result<&Piece> {
        self.pieces
            .get(id.index())
            .ok_or(PuzzleError::UnknownPiece(id))
    }

    /// The active solve, if one has been started.
    pub fn solver(&self) -> Option<&Solver> {
        self.solver.as_ref()
    }

    pub fn is_solved(&self) -> bool {
        self.grid.is_full()
    }

    /// True while a started solve has not reported a terminal event.
    pub fn is_solving(&self) -> bool {
        self.solver
            .as_ref()
            .is_some_and(|solver| solver.outcome().is_none())
    }

    /// Empties the grid, returns every piece to the tray and drops any solve.
    pub fn reset(&mut self) {
        self.grid.clear_all();
        for piece in &mut self.pieces {
            piece.anchor = None;
        }
        self.solver = None;
    }

    /// Resets and starts an automatic solve from the empty grid.
    pub fn start_solving(&mut self) {
        self.reset();
        self.solver = Some(Solver::new());
    }

    /// Stops the active solve, leaving the grid as it is.
    pub fn stop_solving(&mut self) {
        self.solver = None;
    }

    /// Advances the active solve by one step; `None` when no solve exists.
    ///
    /// The solve ends with the terminal event it reports, so later steps
    /// return `None` until the next [`start_solving`](Self::start_solving).
    pub fn step(&mut self) -> Option<SolverEvent> {
        let event = self
            .solver
            .as_mut()?
            .step(&mut self.grid, &mut self.pieces);
        if event.is_terminal() {
            self.solver = None;
        }
        Some(event)
    }

    /// Manually places a piece so its anchor triangle lands on `anchor`.
    pub fn place(&mut self, id: PieceId, anchor: Cell) -> Result<()> {
        self.ensure_idle()?;
        let piece = self
            .pieces
            .get_mut(id.index())
            .ok_or(PuzzleError::UnknownPiece(id))?;
        self.grid.place_matching(piece, anchor)
    }

    /// Lifts a placed piece off the grid, returning where it was anchored.
    pub fn pick_up(&mut self, id: PieceId) -> Result<Cell> {
        self.ensure_idle()?;
        let piece = self
            .pieces
            .get_mut(id.index())
            .ok_or(PuzzleError::UnknownPiece(id))?;
        self.grid.remove(piece)
    }

    /// Mirrors an unplaced piece.
    pub fn reflect(&mut self, id: PieceId, reflection: Reflection) -> Result<()> {
        self.ensure_idle()?;
        let piece = self.piece_mut(id)?;
        if piece.is_placed() {
            return Err(PuzzleError::PieceAlreadyPlaced(id));
        }
        piece.reflect(reflection);
        Ok(())
    }

    fn piece_mut(&mut self, id: PieceId) -> Result<&mut Piece> {
        self.pieces
            .get_mut(id.index())
            .ok_or(PuzzleError::UnknownPiece(id))
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.is_solving() {
            Err(PuzzleError::SolverRunning)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::geometry::Orientation;
    use crate::pieces::{pieces_from_shapes, Shape};

    fn seeded(side: usize, seed: u64) -> Puzzle {
        Puzzle::generate(side, &GeneratorConfig::default(), &mut StdRng::seed_from_u64(seed))
            .unwrap()
    }

    fn strips() -> Puzzle {
        let strip = |orientation| Shape::new(vec![(0, 0), (0, 1), (0, 2)], orientation).unwrap();
        Puzzle::with_pieces(
            Topology::build(1).unwrap(),
            pieces_from_shapes([strip(Orientation::Up), strip(Orientation::Down)]),
        )
    }

    #[test]
    fn test_generate_starts_empty() {
        let puzzle = seeded(3, 1);
        assert_eq!(puzzle.grid().filled(), 0);
        assert!(puzzle.pieces().iter().all(|piece| !piece.is_placed()));
        assert!(puzzle.solver().is_none());
        assert!(!puzzle.is_solved());
    }

    #[test]
    fn test_invalid_side_is_reported() {
        let result = Puzzle::generate(0, &GeneratorConfig::default(), &mut StdRng::seed_from_u64(0));
        assert!(matches!(
            result,
            Err(PuzzleError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_solve_session_to_completion() {
        let mut puzzle = seeded(2, 4);
        assert_eq!(puzzle.step(), None);

        puzzle.start_solving();
        let mut last = None;
        while puzzle.is_solving() {
            last = puzzle.step();
        }
        // the final placement is reported before the terminal event
        assert!(matches!(last, Some(SolverEvent::Placed { .. })));
        assert_eq!(puzzle.step(), Some(SolverEvent::Solved));
        assert!(puzzle.is_solved());
        assert!(puzzle.pieces().iter().all(Piece::is_placed));
        assert!(puzzle.solver().is_none());
        assert_eq!(puzzle.step(), None);
    }

    #[test]
    fn test_step_after_manual_change_is_idle() {
        let mut puzzle = seeded(2, 4);
        puzzle.start_solving();
        while puzzle.step() != Some(SolverEvent::Solved) {}

        puzzle.pick_up(PieceId(0)).unwrap();
        assert_eq!(puzzle.step(), None);
        assert!(!puzzle.is_solved());
    }

    #[test]
    fn test_no_solution_ends_the_session() {
        let strip = Shape::new(vec![(0, 0), (0, 1), (0, 2)], Orientation::Up).unwrap();
        let mut puzzle =
            Puzzle::with_pieces(Topology::build(1).unwrap(), pieces_from_shapes([strip]));
        puzzle.start_solving();
        let mut last = None;
        while let Some(event) = puzzle.step() {
            last = Some(event);
        }
        assert_eq!(last, Some(SolverEvent::NoSolutionFound));
        assert!(!puzzle.is_solving());
        puzzle.place(PieceId(0), (0, 0)).unwrap();
    }

    #[test]
    fn test_place_far_outside_is_blocked() {
        let mut puzzle = strips();
        assert_eq!(
            puzzle.place(PieceId(0), (i32::MAX, 1)),
            Err(PuzzleError::PlacementBlocked {
                piece: PieceId(0),
                anchor: (i32::MAX, 1)
            })
        );
    }

    #[test]
    fn test_manual_play() {
        let mut puzzle = strips();
        assert!(matches!(
            puzzle.place(PieceId(0), (1, 0)),
            Err(PuzzleError::OrientationMismatch { .. })
        ));
        puzzle.place(PieceId(0), (0, 0)).unwrap();
        assert_eq!(
            puzzle.place(PieceId(1), (0, 1)),
            Err(PuzzleError::PlacementBlocked {
                piece: PieceId(1),
                anchor: (0, 1)
            })
        );
        puzzle.place(PieceId(1), (1, 0)).unwrap();
        assert!(puzzle.is_solved());

        assert_eq!(puzzle.pick_up(PieceId(0)), Ok((0, 0)));
        assert!(!puzzle.is_solved());
        assert_eq!(
            puzzle.pick_up(PieceId(0)),
            Err(PuzzleError::PieceNotPlaced(PieceId(0)))
        );
        assert_eq!(
            puzzle.place(PieceId(7), (0, 0)),
            Err(PuzzleError::UnknownPiece(PieceId(7)))
        );
    }

    #[test]
    fn test_reflect_only_off_grid() {
        let mut puzzle = strips();
        puzzle.reflect(PieceId(0), Reflection::AcrossRows).unwrap();
        assert_eq!(puzzle.pieces()[0].anchor_orientation(), Orientation::Down);
        // now it fits the lower row instead
        puzzle.place(PieceId(0), (1, 0)).unwrap();
        assert_eq!(
            puzzle.reflect(PieceId(0), Reflection::AcrossColumns),
            Err(PuzzleError::PieceAlreadyPlaced(PieceId(0)))
        );
    }

    #[test]
    fn test_manual_moves_refused_while_solving() {
        let mut puzzle = seeded(2, 8);
        puzzle.start_solving();
        puzzle.step();
        assert_eq!(
            puzzle.place(PieceId(0), (0, 1)),
            Err(PuzzleError::SolverRunning)
        );
        assert_eq!(
            puzzle.reflect(PieceId(0), Reflection::AcrossRows),
            Err(PuzzleError::SolverRunning)
        );

        puzzle.stop_solving();
        assert!(puzzle.grid().filled() > 0);
        puzzle.reset();
        assert_eq!(puzzle.grid().filled(), 0);
        assert!(puzzle.pieces().iter().all(|piece| !piece.is_placed()));
    }

    #[test]
    fn test_start_solving_discards_manual_progress() {
        let mut puzzle = strips();
        puzzle.place(PieceId(1), (1, 0)).unwrap();
        puzzle.start_solving();
        assert_eq!(puzzle.grid().filled(), 0);
        assert_eq!(
            puzzle.step(),
            Some(SolverEvent::Placed {
                piece: PieceId(0),
                anchor: (0, 0)
            })
        );
    }
}
