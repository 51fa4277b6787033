//! Random decomposition of the hexagon into connected pieces.
//!
//! Each attempt shuffles the cells, then repeatedly seeds a piece at the
//! next unassigned cell and grows it one random frontier cell at a time
//! until it reaches a random target size or runs out of room. An attempt
//! that strands a piece below the minimum size is thrown away whole, so
//! the returned pieces always tile the hexagon exactly.

use std::ops::RangeInclusive;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{PuzzleError, Result};
use crate::pieces::{Piece, PieceId, Shape, MAX_PIECE_SIZE, MIN_PIECE_SIZE};
use crate::topology::Topology;

/// Attempts made before giving up, unless configured otherwise.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Tuning knobs for [`generate_pieces_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Sizes a piece tries to grow to, picked uniformly per piece.
    pub target_sizes: RangeInclusive<usize>,
    /// Pieces smaller than this invalidate the attempt.
    pub min_piece_size: usize,
    /// Full restarts allowed before reporting failure.
    pub max_attempts: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            target_sizes: 6..=MAX_PIECE_SIZE,
            min_piece_size: MIN_PIECE_SIZE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl GeneratorConfig {
    fn validate(&self) -> Result<()> {
        let (low, high) = (*self.target_sizes.start(), *self.target_sizes.end());
        let reason = if low > high {
            Some(format!("empty target size range {low}..={high}"))
        } else if low < MIN_PIECE_SIZE || high > MAX_PIECE_SIZE {
            Some(format!(
                "target sizes {low}..={high} outside {MIN_PIECE_SIZE}..={MAX_PIECE_SIZE}"
            ))
        } else if !(MIN_PIECE_SIZE..=low).contains(&self.min_piece_size) {
            Some(format!(
                "minimum piece size {} outside {MIN_PIECE_SIZE}..={low}",
                self.min_piece_size
            ))
        } else if self.max_attempts == 0 {
            Some("at least one attempt is required".to_string())
        } else {
            None
        };

        match reason {
            Some(reason) => Err(PuzzleError::InvalidConfiguration { reason }),
            None => Ok(()),
        }
    }
}

/// Decomposes `topology` with the default configuration.
pub fn generate_pieces<R: Rng>(topology: &Topology, rng: &mut R) -> Result<Vec<Piece>> {
    generate_pieces_with(topology, &GeneratorConfig::default(), rng)
}

/// Decomposes `topology` into connected pieces that tile it exactly.
///
/// Pieces are numbered in creation order. Each piece remembers the anchor
/// it held in the decomposition as its [`origin`](Piece::origin), but none
/// is placed.
pub fn generate_pieces_with<R: Rng>(
    topology: &Topology,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<Vec<Piece>> {
    config.validate()?;

    for attempt in 1..=config.max_attempts {
        match try_decompose(topology, config, rng) {
            Some(pieces) => {
                log::info!(
                    "decomposed {} cells into {} pieces (attempt {attempt})",
                    topology.len(),
                    pieces.len()
                );
                return Ok(pieces);
            }
            None => log::debug!("decomposition attempt {attempt} stranded a small piece"),
        }
    }

    log::warn!(
        "no decomposition of side {} after {} attempts",
        topology.side(),
        config.max_attempts
    );
    Err(PuzzleError::GenerationFailed {
        attempts: config.max_attempts,
    })
}

/// Scratch state of one decomposition attempt.
struct Growth {
    assigned: Vec<bool>,
    in_frontier: Vec<bool>,
    claimed: Vec<usize>,
    frontier: Vec<usize>,
}

impl Growth {
    fn new(cell_count: usize) -> Self {
        Self {
            assigned: vec![false; cell_count],
            in_frontier: vec![false; cell_count],
            claimed: Vec::with_capacity(MAX_PIECE_SIZE),
            frontier: Vec::new(),
        }
    }

    /// Starts a new piece at `seed`.
    fn seed(&mut self, topology: &Topology, seed: usize) {
        for &cell in &self.frontier {
            self.in_frontier[cell] = false;
        }
        self.claimed.clear();
        self.frontier.clear();
        self.claim(topology, seed);
    }

    fn claim(&mut self, topology: &Topology, cell: usize) {
        self.assigned[cell] = true;
        self.claimed.push(cell);
        for neighbor in topology.neighbor_indices(cell) {
            if !self.assigned[neighbor] && !self.in_frontier[neighbor] {
                self.in_frontier[neighbor] = true;
                self.frontier.push(neighbor);
            }
        }
    }

    /// Claims random frontier cells until the piece has `target_size` cells
    /// or the frontier runs dry.
    fn grow<R: Rng>(&mut self, topology: &Topology, target_size: usize, rng: &mut R) {
        while self.claimed.len() < target_size && !self.frontier.is_empty() {
            let pick = self.frontier.swap_remove(rng.gen_range(0..self.frontier.len()));
            self.in_frontier[pick] = false;
            if !self.assigned[pick] {
                self.claim(topology, pick);
            }
        }
    }
}

/// One decomposition attempt. `None` when a piece ends up too small.
fn try_decompose<R: Rng>(
    topology: &Topology,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Option<Vec<Piece>> {
    let mut growth = Growth::new(topology.len());
    let mut seeds: Vec<usize> = (0..topology.len()).collect();
    seeds.shuffle(rng);

    let mut pieces = Vec::new();
    while let Some(seed) = seeds.pop() {
        if growth.assigned[seed] {
            continue;
        }

        let target_size = rng.gen_range(config.target_sizes.clone());
        growth.seed(topology, seed);
        growth.grow(topology, target_size, rng);

        if growth.claimed.len() < config.min_piece_size {
            return None;
        }

        let cells: Vec<_> = growth
            .claimed
            .iter()
            .map(|&index| topology.cell(index))
            .collect();
        let (shape, origin) = Shape::from_cells(&cells);
        pieces.push(Piece::with_origin(PieceId(pieces.len()), shape, origin));
    }

    Some(pieces)
}
