//! Best-first search driver.
//!
//! The open set is a [`PriorityQueue`] keyed by the heuristic value of each
//! state alone. No path cost is added to the key, so the search is greedy
//! best-first: it terminates and returns a correct goal state, but the path
//! is not guaranteed to be the shortest one.
use crate::engine::PuzzleState;
use crate::heap::{HeapDirection, PriorityQueue};
use crate::heuristics::Heuristic;
use std::collections::HashSet;
use std::rc::Rc;
use tracing::{debug, info, trace, warn};

/// Tunables of a single search run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    /// Estimator used as the queue priority.
    pub heuristic: Heuristic,
    /// Stop with [`SolveOutcome::LimitReached`] after this many expansions.
    /// `None` runs the search to completion.
    pub node_limit: Option<usize>,
    /// Reject parity-unsolvable boards before searching. When disabled, such
    /// boards are reported only after the reachable space is exhausted.
    pub check_parity: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            heuristic: Heuristic::Manhattan,
            node_limit: None,
            check_parity: true,
        }
    }
}

/// Counters collected during one search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States popped from the queue and expanded.
    pub expanded: usize,
    /// Successors produced by move generation.
    pub generated: usize,
    /// Successors dropped because they were already visited.
    pub skipped_visited: usize,
    /// Largest number of entries the queue held at once.
    pub max_frontier: usize,
}

/// Why a search ended without reaching the goal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnsolvableReason {
    /// The solvability pre-check failed; no search was attempted.
    Parity,
    /// The queue ran dry without a goal state being popped.
    Exhausted,
}

/// Terminal result of a search.
#[derive(Debug)]
pub enum SolveOutcome {
    /// A goal state was reached; walk its parents for the path.
    Solved {
        goal: Rc<PuzzleState>,
        stats: SearchStats,
    },
    /// The board is well-formed but cannot be solved.
    Unsolvable {
        reason: UnsolvableReason,
        stats: SearchStats,
    },
    /// The configured node limit was hit first.
    LimitReached { stats: SearchStats },
}

impl SolveOutcome {
    pub fn stats(&self) -> &SearchStats {
        match self {
            SolveOutcome::Solved { stats, .. }
            | SolveOutcome::Unsolvable { stats, .. }
            | SolveOutcome::LimitReached { stats } => stats,
        }
    }

    /// The goal state, if the search succeeded.
    pub fn goal(&self) -> Option<&Rc<PuzzleState>> {
        match self {
            SolveOutcome::Solved { goal, .. } => Some(goal),
            _ => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, SolveOutcome::Solved { .. })
    }

    /// Number of moves from the initial state to the goal.
    pub fn move_count(&self) -> Option<usize> {
        self.goal().map(|goal| goal.ancestors().count() - 1)
    }
}

/// Solves `initial` with the default configuration (Manhattan heuristic, no
/// node limit).
///
/// # Examples
/// ```
/// use fifteen_solver::engine::PuzzleState;
/// use fifteen_solver::solver::{solve, solution_path, SolveOutcome, UnsolvableReason};
///
/// let board = PuzzleState::from_text("1 2 3 4 5 6 7 8 9 10 11 12 x 13 14 15").unwrap();
/// let outcome = solve(board);
/// let goal = outcome.goal().unwrap();
/// assert!(goal.is_final());
/// assert_eq!(solution_path(goal).len(), 4);
///
/// let swapped = PuzzleState::from_text("2 1 3 4 5 6 7 8 9 10 11 12 x 13 14 15").unwrap();
/// assert!(matches!(
///     solve(swapped),
///     SolveOutcome::Unsolvable { reason: UnsolvableReason::Parity, .. }
/// ));
/// ```
pub fn solve(initial: impl Into<Rc<PuzzleState>>) -> SolveOutcome {
    solve_with(initial, &SolverConfig::default())
}

/// Solves `initial` using the given configuration.
///
/// 1. Unless disabled, a failed parity check ends the run immediately.
/// 2. The best state is popped; a goal state ends the run.
/// 3. Otherwise the state is marked visited and every unvisited successor
///    is queued under its own heuristic value.
///
/// Duplicates may sit in the queue more than once; only successors are
/// filtered against the visited set.
pub fn solve_with(initial: impl Into<Rc<PuzzleState>>, config: &SolverConfig) -> SolveOutcome {
    let initial = initial.into();
    let mut stats = SearchStats::default();

    if config.check_parity && !initial.is_solvable() {
        info!(inversions = initial.inversions(), "puzzle not solvable");
        return SolveOutcome::Unsolvable {
            reason: UnsolvableReason::Parity,
            stats,
        };
    }

    let heuristic = config.heuristic;
    debug!(
        width = initial.width(),
        heuristic = ?heuristic,
        estimate = heuristic.evaluate(&initial),
        "starting search"
    );

    let mut queue = PriorityQueue::new(HeapDirection::Ascending);
    queue.insert(heuristic.evaluate(&initial), initial);
    stats.max_frontier = 1;

    let mut visited: HashSet<Rc<PuzzleState>> = HashSet::new();

    // An empty queue is the exhaustion branch, not a failure.
    while let Ok((priority, current)) = queue.extract() {
        if current.is_final() {
            info!(
                expanded = stats.expanded,
                generated = stats.generated,
                visited = visited.len(),
                "puzzle solved"
            );
            return SolveOutcome::Solved {
                goal: current,
                stats,
            };
        }

        if config.node_limit.is_some_and(|limit| stats.expanded >= limit) {
            warn!(expanded = stats.expanded, "node limit reached, aborting search");
            return SolveOutcome::LimitReached { stats };
        }

        trace!(priority, frontier = queue.len(), "expanding state");
        stats.expanded += 1;
        visited.insert(Rc::clone(&current));

        for next in current.generate_next_moves() {
            stats.generated += 1;
            if visited.contains(&next) {
                stats.skipped_visited += 1;
                continue;
            }
            queue.insert(heuristic.evaluate(&next), next);
        }
        stats.max_frontier = stats.max_frontier.max(queue.len());
    }

    info!(expanded = stats.expanded, "search space exhausted");
    SolveOutcome::Unsolvable {
        reason: UnsolvableReason::Exhausted,
        stats,
    }
}

/// Reconstructs the path from the initial state to `goal`.
///
/// Walks back-references from `goal` and reverses them, so the first element
/// is the state without a parent and the last is `goal` itself.
pub fn solution_path(goal: &PuzzleState) -> Vec<&PuzzleState> {
    let mut path: Vec<&PuzzleState> = goal.ancestors().collect();
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{BoardConfig, Move};

    fn state(text: &str) -> PuzzleState {
        PuzzleState::from_text(text).unwrap()
    }

    fn assert_valid_path(path: &[&PuzzleState]) {
        assert!(path[0].parent().is_none(), "path must start at the initial state");
        assert!(path.last().unwrap().is_final(), "path must end at the goal");

        for pair in path.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let mv = to.last_move().expect("every later state records its move");
            let differing = from
                .cells()
                .iter()
                .zip(to.cells())
                .filter(|(a, b)| a != b)
                .count();
            assert_eq!(differing, 2, "consecutive states differ by one swap");
            assert_eq!(to.cells()[from.empty_index()], from.cells()[to.empty_index()]);

            let width = from.width() as isize;
            let delta = to.empty_index() as isize - from.empty_index() as isize;
            let expected = match mv {
                Move::Left => -1,
                Move::Right => 1,
                Move::Up => -width,
                Move::Down => width,
            };
            assert_eq!(delta, expected, "recorded move {} does not match the swap", mv);
        }
    }

    #[test]
    fn test_solve_already_final() {
        let outcome = solve(state("1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 x"));
        assert!(outcome.is_solved());
        assert_eq!(outcome.move_count(), Some(0));
        assert_eq!(outcome.stats().expanded, 0);
    }

    #[test]
    fn test_solve_three_moves() {
        let outcome = solve(state("1 2 3 4 5 6 7 8 9 10 11 12 x 13 14 15"));
        let goal = outcome.goal().expect("board is solvable");
        let path = solution_path(goal);

        assert_valid_path(&path);
        assert_eq!(path.len(), 4);
        assert_eq!(outcome.move_count(), Some(3));
        assert_eq!(
            path.iter().skip(1).map(|s| s.last_move().unwrap()).collect::<Vec<_>>(),
            vec![Move::Right, Move::Right, Move::Right]
        );
    }

    #[test]
    fn test_unsolvable_reported_without_search() {
        let outcome = solve(state("2 1 3 4 5 6 7 8 9 10 11 12 x 13 14 15"));
        assert!(matches!(
            outcome,
            SolveOutcome::Unsolvable {
                reason: UnsolvableReason::Parity,
                ..
            }
        ));
        assert_eq!(*outcome.stats(), SearchStats::default());
        assert_eq!(outcome.move_count(), None);
    }

    #[test]
    fn test_exhausted_when_parity_check_disabled() {
        // A 2x2 board has 12 reachable states per parity class.
        let config = BoardConfig::new(2, "x").unwrap();
        let board = PuzzleState::from_text_with("2 1 3 x", &config).unwrap();
        assert!(!board.is_solvable());

        let solver_config = SolverConfig {
            check_parity: false,
            ..SolverConfig::default()
        };
        let outcome = solve_with(board, &solver_config);
        assert!(matches!(
            outcome,
            SolveOutcome::Unsolvable {
                reason: UnsolvableReason::Exhausted,
                ..
            }
        ));
        assert!(outcome.stats().expanded >= 12);
    }

    #[test]
    fn test_scrambled_boards_are_solved() {
        let config = BoardConfig::default();
        for seed in 0..8 {
            let k = 12;
            let board = PuzzleState::scrambled(&config, k, seed);
            let outcome = solve(board);
            let goal = outcome
                .goal()
                .unwrap_or_else(|| panic!("seed {} should be solvable", seed));
            assert!(goal.is_final());
            assert_valid_path(&solution_path(goal));
        }
    }

    #[test]
    fn test_move_count_is_at_least_distance() {
        // Reachable in exactly 5 moves, and its Manhattan distance is 5 too.
        let board = state("1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 x");
        let root = Rc::new(board);
        let mut current = Rc::clone(&root);
        for mv in [Move::Left, Move::Left, Move::Up, Move::Right, Move::Right] {
            let next = current
                .generate_next_moves()
                .into_iter()
                .find(|s| s.last_move() == Some(mv))
                .unwrap();
            current = next;
        }
        let start = PuzzleState::from_cells(current.cells().to_vec()).unwrap();
        let lower_bound = start.manhattan();

        let outcome = solve(start);
        let moves = outcome.move_count().unwrap();
        assert!(moves >= lower_bound);
        assert!(moves % 2 == 1, "parity of the move count is fixed by the board");
    }

    #[test]
    fn test_hamming_heuristic_solves_small_board() {
        let config = BoardConfig::new(3, "x").unwrap();
        let board = PuzzleState::scrambled(&config, 20, 99);
        let solver_config = SolverConfig {
            heuristic: Heuristic::Hamming,
            ..SolverConfig::default()
        };

        let outcome = solve_with(board, &solver_config);
        let goal = outcome.goal().expect("scrambled boards are solvable");
        assert_valid_path(&solution_path(goal));
    }

    #[test]
    fn test_node_limit_stops_search() {
        let board = state("13 9 4 5 10 3 7 14 12 2 11 x 1 8 6 15");
        assert!(board.is_solvable());
        let solver_config = SolverConfig {
            node_limit: Some(3),
            ..SolverConfig::default()
        };

        let outcome = solve_with(board, &solver_config);
        assert!(matches!(outcome, SolveOutcome::LimitReached { .. }));
        assert_eq!(outcome.stats().expanded, 3);
    }

    #[test]
    fn test_stats_are_consistent() {
        let board = PuzzleState::scrambled(&BoardConfig::default(), 20, 3);
        let outcome = solve(board);
        let stats = outcome.stats();
        assert!(outcome.is_solved());
        assert!(stats.generated >= 2 * stats.expanded);
        assert!(stats.generated <= 4 * stats.expanded);
        assert!(stats.skipped_visited <= stats.generated);
        assert!(stats.max_frontier >= 1);
    }
}
