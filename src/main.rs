//! Triangular Hexagon Puzzle
//!
//! Cuts a hexagon of triangles into random pieces and reassembles it with a
//! stepwise backtracking solver, printing the board as text. The solver is
//! paced by this loop, one step per tick.

use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use hexed::generator::DEFAULT_MAX_ATTEMPTS;
use hexed::grid::format_grid;
use hexed::pieces::format_shape;
use hexed::puzzle::DEFAULT_SIDE;
use hexed::{GeneratorConfig, Grid, Puzzle, PuzzleError, SolverEvent, Topology};

/// Generates and solves triangular hexagon tiling puzzles.
#[derive(Parser)]
#[command(name = "hexed")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    options: PuzzleOptions,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args)]
struct PuzzleOptions {
    /// Side length of the hexagon, in triangles.
    #[arg(long, global = true, default_value_t = DEFAULT_SIDE)]
    side: usize,
    /// Seed for the piece cutter; a random one is drawn and printed if absent.
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Full restarts the cutter may make before giving up.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: usize,
}

#[derive(Subcommand)]
enum Command {
    /// Print the empty hexagon.
    Show,
    /// Cut the hexagon and print the pieces.
    Generate,
    /// Cut the hexagon, then reassemble it step by step.
    Solve(SolveArgs),
}

#[derive(Args, Default)]
struct SolveArgs {
    /// Milliseconds between solver steps.
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,
    /// Print every placement and removal.
    #[arg(long)]
    trace: bool,
    /// Give up after this many steps.
    #[arg(long)]
    max_steps: Option<usize>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Command::Show) => run_show(&cli.options),
        Some(Command::Generate) => run_generate(&cli.options),
        Some(Command::Solve(args)) => run_solve(&cli.options, &args),
        None => run_solve(&cli.options, &SolveArgs::default()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Prints the empty hexagon and its cell count.
fn run_show(options: &PuzzleOptions) -> Result<(), PuzzleError> {
    let topology = Topology::build(options.side)?;
    println!("{} cells", topology.len());
    print!("{}", format_grid(&Grid::new(topology)));
    Ok(())
}

/// Cuts the hexagon and prints the decomposition and every piece.
fn run_generate(options: &PuzzleOptions) -> Result<(), PuzzleError> {
    let puzzle = generate(options)?;
    print!("{}", format_decomposition(&puzzle)?);
    println!();
    print!("{}", format_pieces(&puzzle));
    Ok(())
}

/// Drives the solver one step per tick until it reaches a terminal result.
fn run_solve(options: &PuzzleOptions, args: &SolveArgs) -> Result<(), PuzzleError> {
    let mut puzzle = generate(options)?;
    let delay = Duration::from_millis(args.delay_ms);
    let started = Instant::now();

    puzzle.start_solving();
    let mut steps = 0usize;
    let outcome = loop {
        let Some(event) = puzzle.step() else {
            break None;
        };
        if event.is_terminal() {
            break Some(event);
        }

        steps += 1;
        if args.trace {
            println!("{}", describe(event));
        }
        if args.max_steps.is_some_and(|limit| steps >= limit) {
            break None;
        }
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    };

    print!("{}", format_grid(puzzle.grid()));
    match outcome {
        Some(SolverEvent::Solved) => println!(
            "Solved in {} steps ({:.2}s)",
            steps,
            started.elapsed().as_secs_f64()
        ),
        Some(_) => println!("No solution found after {steps} steps"),
        None => println!("Stopped after {steps} steps"),
    }
    Ok(())
}

/// Builds a puzzle from the command-line options, announcing the seed.
fn generate(options: &PuzzleOptions) -> Result<Puzzle, PuzzleError> {
    let seed = options.seed.unwrap_or_else(rand::random);
    println!("Side {} seed {}", options.side, seed);

    let config = GeneratorConfig {
        max_attempts: options.max_attempts,
        ..GeneratorConfig::default()
    };
    let puzzle = Puzzle::generate(options.side, &config, &mut StdRng::seed_from_u64(seed))?;
    println!("{} pieces", puzzle.pieces().len());
    Ok(puzzle)
}

/// Formats the pieces laid out where the cutter took them from.
fn format_decomposition(puzzle: &Puzzle) -> Result<String, PuzzleError> {
    let mut grid = Grid::new(puzzle.topology().clone());
    let mut pieces = puzzle.pieces().to_vec();
    for piece in &mut pieces {
        if let Some(origin) = piece.origin() {
            grid.place(piece, origin)?;
        }
    }
    Ok(format_grid(&grid))
}

/// Formats every piece shape under its label.
fn format_pieces(puzzle: &Puzzle) -> String {
    let mut output = String::new();
    for piece in puzzle.pieces() {
        output.push_str(&format!(
            "Piece {} ({} cells):\n",
            piece.id().label(),
            piece.len()
        ));
        output.push_str(&format_shape(piece.shape()));
    }
    output
}

fn describe(event: SolverEvent) -> String {
    match event {
        SolverEvent::Placed { piece, anchor } => {
            format!("place {} at ({}, {})", piece.label(), anchor.0, anchor.1)
        }
        SolverEvent::Removed { piece, anchor } => {
            format!("remove {} from ({}, {})", piece.label(), anchor.0, anchor.1)
        }
        SolverEvent::Solved => "solved".to_string(),
        SolverEvent::NoSolutionFound => "no solution".to_string(),
    }
}
