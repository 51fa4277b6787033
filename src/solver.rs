//! Stepwise backtracking search for an exact covering.
//!
//! The search always fills the first empty cell in scan order, trying the
//! unplaced pieces in list order with their anchor on that cell. Since a
//! normalized shape's anchor is its smallest cell, some piece of any tiling
//! must be anchored on the first empty cell, so exhausting these candidates
//! exhausts the search.
//!
//! Recursion is replaced by an explicit frame stack. Each call to
//! [`Solver::step`] performs exactly one placement or one removal, or reports
//! a terminal result; the host may stop calling at any point and the grid is
//! always consistent.

use crate::geometry::Cell;
use crate::grid::Grid;
use crate::pieces::{Piece, PieceId};

/// What a single solver step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverEvent {
    /// A piece was anchored on the first empty cell.
    Placed { piece: PieceId, anchor: Cell },
    /// A placement was undone while backtracking.
    Removed { piece: PieceId, anchor: Cell },
    /// The grid is fully covered.
    Solved,
    /// Every branch failed; the grid is back in its starting state.
    NoSolutionFound,
}

impl SolverEvent {
    /// True for the results that end the search.
    pub fn is_terminal(self) -> bool {
        matches!(self, SolverEvent::Solved | SolverEvent::NoSolutionFound)
    }
}

/// One level of the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    /// Scan index of the cell this level fills.
    cell: usize,
    /// Index of the next piece to try.
    next_piece: usize,
    /// Piece this level currently has anchored on `cell`.
    placed: Option<usize>,
}

impl Frame {
    fn new(cell: usize) -> Self {
        Self {
            cell,
            next_piece: 0,
            placed: None,
        }
    }
}

/// Resumable search state.
///
/// The solver does not own the grid or the pieces; the same `grid` and
/// `pieces` must be passed to every step, unmodified in between.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Solver {
    stack: Vec<Frame>,
    started: bool,
    outcome: Option<SolverEvent>,
    steps: usize,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Performs one placement or removal.
    ///
    /// Once the search has ended every further call returns the same
    /// terminal event without touching the grid.
    pub fn step(&mut self, grid: &mut Grid, pieces: &mut [Piece]) -> SolverEvent {
        if let Some(outcome) = self.outcome {
            return outcome;
        }

        if !self.started {
            self.started = true;
            match grid.first_empty() {
                Some(cell) => self.stack.push(Frame::new(cell)),
                None => return self.finish(SolverEvent::Solved),
            }
        }

        while let Some(frame) = self.stack.last_mut() {
            let anchor = grid.topology().cell(frame.cell);
            let candidate = (frame.next_piece..pieces.len()).find(|&index| {
                !pieces[index].is_placed() && grid.can_place(pieces[index].shape(), anchor)
            });

            if let Some(index) = candidate {
                frame.next_piece = index + 1;
                frame.placed = Some(index);
                grid.fill(&mut pieces[index], anchor);
                self.descend(grid);
                return self.record(SolverEvent::Placed {
                    piece: pieces[index].id(),
                    anchor,
                });
            }

            // nothing fits here: this level fails and its parent backtracks
            self.stack.pop();
            let Some(parent) = self.stack.last_mut() else {
                break;
            };
            if let Some(index) = parent.placed.take() {
                let anchor = grid.topology().cell(parent.cell);
                grid.clear(&mut pieces[index], anchor);
                return self.record(SolverEvent::Removed {
                    piece: pieces[index].id(),
                    anchor,
                });
            }
        }

        self.finish(SolverEvent::NoSolutionFound)
    }

    /// Steps until the search ends or `max_steps` placements and removals
    /// have been made. Returns the terminal event, if reached.
    pub fn run(
        &mut self,
        grid: &mut Grid,
        pieces: &mut [Piece],
        max_steps: Option<usize>,
    ) -> Option<SolverEvent> {
        loop {
            if max_steps.is_some_and(|limit| self.steps >= limit) && self.outcome.is_none() {
                return None;
            }
            let event = self.step(grid, pieces);
            if event.is_terminal() {
                return Some(event);
            }
        }
    }

    /// Placements and removals made so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Number of open search levels.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The terminal event, once the search has ended.
    pub fn outcome(&self) -> Option<SolverEvent> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Opens the next level after a placement, or ends the search when the
    /// grid is full. The terminal event is reported by the following step.
    fn descend(&mut self, grid: &Grid) {
        match grid.first_empty() {
            Some(cell) => self.stack.push(Frame::new(cell)),
            None => {
                log::info!("grid covered after {} steps", self.steps + 1);
                self.outcome = Some(SolverEvent::Solved);
            }
        }
    }

    fn record(&mut self, event: SolverEvent) -> SolverEvent {
        self.steps += 1;
        log::trace!("step {}: {event:?} (depth {})", self.steps, self.stack.len());
        event
    }

    fn finish(&mut self, event: SolverEvent) -> SolverEvent {
        log::info!("search ended after {} steps: {event:?}", self.steps);
        self.outcome = Some(event);
        event
    }
}
