//! # Fifteen Solver Library
//!
//! This library solves the sliding-tile (15-)puzzle with a heuristic-guided
//! best-first search over board states.
//!
//! It is used by the `solve_puzzle` binary, which takes a board description
//! (or a scramble seed), runs the search and prints every state on the path
//! to the goal.
//!
//! ## Modules
//! - `engine`: the board model (`PuzzleState`, `Tile`, `Move`, `BoardConfig`),
//!   move generation, goal test and the solvability pre-check.
//! - `heap`: the binary-heap `PriorityQueue` used as the open set.
//! - `heuristics`: the Manhattan and Hamming estimators.
//! - `solver`: the search driver (`solve`, `solve_with`) and path reconstruction.
//! - `utils`: text tokenizing and permutation checks behind board parsing.
//! - `error`: the `PuzzleError` type.

pub mod engine;
pub mod error;
pub mod heap;
pub mod heuristics;
pub mod solver;
pub mod utils;

pub use crate::engine::{BoardConfig, Move, PuzzleState, Tile};
pub use crate::error::{InvalidBoardReason, PuzzleError};
pub use crate::solver::{solution_path, solve, solve_with, SolveOutcome, SolverConfig};
