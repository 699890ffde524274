use clap::Parser;
use fifteen_solver::heuristics::Heuristic;
use fifteen_solver::solver::{solution_path, solve_with, SolveOutcome, SolverConfig, UnsolvableReason};
use fifteen_solver::{BoardConfig, PuzzleError, PuzzleState};
use std::process::ExitCode;
use std::time::Instant;
use tracing::Level;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Solve a sliding-tile puzzle", long_about = None)]
struct Args {
    /// Board tokens in row-major order, e.g. "13 9 4 5 10 3 7 14 12 2 11 x 1 8 6 15".
    /// Anything that is not a number or the empty marker is ignored.
    #[clap(required_unless_present = "scramble")]
    board: Vec<String>,

    /// Generate the board by walking this many random moves from the goal
    #[clap(long, conflicts_with = "board")]
    scramble: Option<usize>,

    /// Seed for --scramble
    #[clap(long, default_value_t = 514514)]
    seed: u64,

    /// Board width
    #[clap(short, long, default_value_t = 4)]
    width: usize,

    /// Literal used for the empty cell
    #[clap(long, default_value = "x")]
    empty_marker: String,

    /// Heuristic used to order the search
    #[clap(long, value_enum, default_value_t = Heuristic::Manhattan)]
    heuristic: Heuristic,

    /// Give up after expanding this many states
    #[clap(long)]
    node_limit: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

fn load_board(args: &Args) -> Result<PuzzleState, PuzzleError> {
    let config = BoardConfig::new(args.width, args.empty_marker.as_str())?;
    match args.scramble {
        Some(moves) => Ok(PuzzleState::scrambled(&config, moves, args.seed)),
        None => PuzzleState::from_text_with(&args.board.join(" "), &config),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let initial = match load_board(&args) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Failed to read board: {}", e);
            return ExitCode::from(2);
        }
    };
    println!("Initial board state:\n{}\n", initial);

    let config = SolverConfig {
        heuristic: args.heuristic,
        node_limit: args.node_limit,
        ..SolverConfig::default()
    };

    let start = Instant::now();
    let outcome = solve_with(initial, &config);
    let elapsed = start.elapsed();

    let code = match &outcome {
        SolveOutcome::Solved { goal, .. } => {
            let path = solution_path(goal);
            for (i, state) in path.iter().enumerate() {
                match state.last_move() {
                    Some(mv) => println!("Move {}: {}", i, mv),
                    None => println!("Start:"),
                }
                println!("{}\n", state);
            }
            println!("Solved in {} moves", path.len() - 1);
            ExitCode::SUCCESS
        }
        SolveOutcome::Unsolvable { reason, .. } => {
            match reason {
                UnsolvableReason::Parity => println!("Puzzle not solvable!"),
                UnsolvableReason::Exhausted => println!("Puzzle not solvable! (search space exhausted)"),
            }
            ExitCode::from(1)
        }
        SolveOutcome::LimitReached { stats } => {
            println!("No solution found within {} expanded states.", stats.expanded);
            ExitCode::from(1)
        }
    };

    let stats = outcome.stats();
    println!(
        "Expanded {} states ({} generated, {} already visited, peak frontier {})",
        stats.expanded, stats.generated, stats.skipped_visited, stats.max_frontier
    );
    println!("Elapsed: {:?}", elapsed);
    code
}
