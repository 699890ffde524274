use crate::engine::{PuzzleState, Tile};

/// Heuristic estimators available to the solver.
///
/// Only `Manhattan` is used by default; `Hamming` is weaker but cheaper.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Heuristic {
    #[default]
    Manhattan,
    Hamming,
}

impl Heuristic {
    /// Scores `state` with this estimator. Lower is closer to the goal.
    pub fn evaluate(&self, state: &PuzzleState) -> usize {
        match self {
            Heuristic::Manhattan => manhattan(state),
            Heuristic::Hamming => hamming(state),
        }
    }
}

/// Calculates the Manhattan distance of a board to the goal.
///
/// Sums, over every non-empty cell, the absolute row and column offsets
/// between where the tile sits and where its label belongs (label `L` belongs
/// at index `L - 1`). The goal board scores 0.
///
/// # Examples
/// ```
/// use fifteen_solver::engine::PuzzleState;
/// use fifteen_solver::heuristics::manhattan;
///
/// let board = PuzzleState::from_text("5 1 14 3 11 10 6 15 2 8 4 7 9 x 13 12").unwrap();
/// assert_eq!(manhattan(&board), 30);
/// ```
pub fn manhattan(state: &PuzzleState) -> usize {
    let width = state.width();
    state
        .cells()
        .iter()
        .enumerate()
        .filter_map(|(index, tile)| tile.label().map(|label| (index, label as usize - 1)))
        .map(|(index, goal)| {
            let (row, col) = (index / width, index % width);
            let (goal_row, goal_col) = (goal / width, goal % width);
            row.abs_diff(goal_row) + col.abs_diff(goal_col)
        })
        .sum()
}

/// Counts the tiles that are not on their goal cell.
///
/// The empty cell is never counted.
pub fn hamming(state: &PuzzleState) -> usize {
    state
        .cells()
        .iter()
        .enumerate()
        .filter(|(index, tile)| match tile {
            Tile::Empty => false,
            Tile::Label(label) => *label as usize != index + 1,
        })
        .count()
}
