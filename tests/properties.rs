//! Property-based tests for the priority queue, the board model and the
//! search driver.
//!
//! # Queue
//! - Repeated extraction yields priorities in sorted order for both directions
//! - Size tracks inserts minus extracts; an empty queue always refuses extraction
//!
//! # Board
//! - Scrambled boards are solvable and well-formed
//! - Successor counts depend only on where the empty cell sits
//!
//! # Search
//! - Every solvable scramble ends in a final state reached by legal moves

use fifteen_solver::heap::{HeapDirection, PriorityQueue};
use fifteen_solver::solver::{solution_path, solve};
use fifteen_solver::{BoardConfig, PuzzleError, PuzzleState};
use proptest::prelude::*;
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::Once;

static INIT_LOGGING: Once = Once::new();

fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_test_writer()
            .with_ansi(false)
            .try_init();
    });
}

#[derive(Debug, Clone)]
enum QueueOp {
    Insert(u32),
    Extract,
}

fn queue_op() -> impl Strategy<Value = QueueOp> {
    prop_oneof![
        3 => (0u32..1000).prop_map(QueueOp::Insert),
        1 => Just(QueueOp::Extract),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn heap_extracts_in_sorted_order(
        priorities in prop::collection::vec(0u32..500, 0..200),
        descending in any::<bool>(),
    ) {
        let direction = if descending { HeapDirection::Descending } else { HeapDirection::Ascending };
        let mut queue = PriorityQueue::new(direction);
        for (i, &priority) in priorities.iter().enumerate() {
            queue.insert(priority, i);
        }

        let mut extracted = Vec::new();
        while !queue.is_empty() {
            let (priority, payload) = queue.extract().unwrap();
            prop_assert_eq!(priorities[payload], priority);
            extracted.push(priority);
        }

        let mut expected = priorities.clone();
        expected.sort_unstable();
        if descending {
            expected.reverse();
        }
        prop_assert_eq!(extracted, expected);
        prop_assert_eq!(queue.extract(), Err(PuzzleError::EmptyQueue));
    }

    #[test]
    fn heap_size_tracks_operations(ops in prop::collection::vec(queue_op(), 0..300)) {
        let mut queue = PriorityQueue::new(HeapDirection::Ascending);
        let mut model: Vec<u32> = Vec::new();

        for op in ops {
            match op {
                QueueOp::Insert(priority) => {
                    queue.insert(priority, ());
                    model.push(priority);
                }
                QueueOp::Extract => {
                    let result = queue.extract();
                    if model.is_empty() {
                        prop_assert_eq!(result, Err(PuzzleError::EmptyQueue));
                    } else {
                        let min_index = model
                            .iter()
                            .enumerate()
                            .min_by_key(|&(_, p)| *p)
                            .map(|(i, _)| i)
                            .unwrap();
                        let expected = model.swap_remove(min_index);
                        prop_assert_eq!(result.unwrap().0, expected);
                    }
                }
            }
            prop_assert_eq!(queue.len(), model.len());
            prop_assert_eq!(queue.is_empty(), model.is_empty());
        }
    }

    #[test]
    fn scrambled_boards_are_valid_and_solvable(
        width in 2usize..=5,
        moves in 0usize..80,
        seed in any::<u64>(),
    ) {
        let config = BoardConfig::new(width, "x").unwrap();
        let board = PuzzleState::scrambled(&config, moves, seed);

        prop_assert!(board.is_solvable());
        // Round-trip through the text parser validates the permutation.
        let reparsed = PuzzleState::from_text_with(&board.to_string(), &config).unwrap();
        prop_assert_eq!(&reparsed, &board);
    }

    #[test]
    fn successor_count_depends_on_empty_position(seed in any::<u64>(), moves in 0usize..40) {
        let config = BoardConfig::default();
        let board = Rc::new(PuzzleState::scrambled(&config, moves, seed));
        let width = board.width();
        let (row, col) = (board.empty_index() / width, board.empty_index() % width);

        let on_row_edge = row == 0 || row == width - 1;
        let on_col_edge = col == 0 || col == width - 1;
        let expected = match (on_row_edge, on_col_edge) {
            (true, true) => 2,
            (true, false) | (false, true) => 3,
            (false, false) => 4,
        };

        let successors = board.generate_next_moves();
        prop_assert_eq!(successors.len(), expected);

        let distinct: HashSet<_> = successors.iter().cloned().collect();
        prop_assert_eq!(distinct.len(), successors.len());
        for successor in &successors {
            prop_assert!(Rc::ptr_eq(successor.parent().unwrap(), &board));
            prop_assert_eq!(successor.is_solvable(), board.is_solvable());
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn short_scrambles_are_solved(width in 3usize..=4, moves in 0usize..20, seed in any::<u64>()) {
        init_test_logging();
        let config = BoardConfig::new(width, "x").unwrap();
        let board = PuzzleState::scrambled(&config, moves, seed);
        let lower_bound = board.manhattan();

        let outcome = solve(board);
        let goal = outcome.goal().expect("scrambled boards are solvable");
        prop_assert!(goal.is_final());

        let path = solution_path(goal);
        prop_assert!(path[0].parent().is_none());
        prop_assert!(path.len() - 1 >= lower_bound);
        prop_assert_eq!(outcome.move_count(), Some(path.len() - 1));
    }
}
