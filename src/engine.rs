//! Puzzle-state model for the sliding-tile puzzle.
//!
//! This module defines:
//! - `Tile`: a single cell, either the empty slot or a numbered tile.
//! - `Move`: the four directions the empty slot can travel.
//! - `BoardConfig`: construction-time board width and empty-marker literal.
//! - `PuzzleState`: an immutable board snapshot with a back-reference to the
//!   state it was generated from, plus move generation, goal test and the
//!   solvability pre-check.
//!
//! Equality and hashing of `PuzzleState` only look at the cell sequence, so
//! the same permutation reached along different paths collapses to one entry
//! in a visited set.
use crate::error::{InvalidBoardReason, PuzzleError};
use crate::heuristics;
use crate::utils::{cells_from_tokens, tokenize, validate_cells};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Board width used when no explicit [`BoardConfig`] is given.
pub const DEFAULT_WIDTH: usize = 4;

/// Literal representing the empty cell when no explicit [`BoardConfig`] is given.
pub const EMPTY_MARKER: &str = "x";

/// Largest supported width; labels must fit into a `u16`.
pub const MAX_WIDTH: usize = 256;

/// One cell of the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    /// The blank slot.
    Empty,
    /// A numbered tile, `1..=width*width-1`.
    Label(u16),
}

impl Tile {
    /// Returns the tile's number, or `None` for the blank.
    pub fn label(&self) -> Option<u16> {
        match self {
            Tile::Empty => None,
            Tile::Label(label) => Some(*label),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Tile::Empty)
    }
}

/// Direction in which the empty cell travels during one move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Left,
    Up,
    Right,
    Down,
}

impl Move {
    /// All moves in the order successors are generated.
    pub const ALL: [Move; 4] = [Move::Left, Move::Up, Move::Right, Move::Down];

    /// The move that undoes this one.
    pub fn opposite(&self) -> Self {
        match self {
            Move::Left => Move::Right,
            Move::Up => Move::Down,
            Move::Right => Move::Left,
            Move::Down => Move::Up,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Move::Left => "Left",
            Move::Up => "Up",
            Move::Right => "Right",
            Move::Down => "Down",
        };
        write!(f, "{}", s)
    }
}

/// Construction-time board configuration.
///
/// # Examples
/// ```
/// use fifteen_solver::engine::BoardConfig;
///
/// let config = BoardConfig::default();
/// assert_eq!(config.width(), 4);
/// assert_eq!(config.empty_marker(), "x");
///
/// assert!(BoardConfig::new(1, "x").is_err());
/// assert!(BoardConfig::new(3, "").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardConfig {
    width: usize,
    empty_marker: String,
}

impl BoardConfig {
    /// Creates a configuration for a `width` x `width` board.
    ///
    /// # Errors
    /// `InvalidBoard` if `width` is outside `2..=MAX_WIDTH`, or if the marker
    /// is empty or contains a decimal digit (it would be indistinguishable
    /// from a label when scanning text).
    pub fn new(width: usize, empty_marker: impl Into<String>) -> Result<Self, PuzzleError> {
        if !(2..=MAX_WIDTH).contains(&width) {
            return Err(InvalidBoardReason::InvalidWidth { width }.into());
        }
        let empty_marker = empty_marker.into();
        if empty_marker.is_empty() || empty_marker.chars().any(|c| c.is_ascii_digit()) {
            return Err(InvalidBoardReason::UnparsableToken {
                token: empty_marker,
            }
            .into());
        }
        Ok(BoardConfig {
            width,
            empty_marker,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn empty_marker(&self) -> &str {
        &self.empty_marker
    }

    /// Number of cells on the board (`width * width`).
    pub fn cell_count(&self) -> usize {
        self.width * self.width
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            width: DEFAULT_WIDTH,
            empty_marker: EMPTY_MARKER.to_string(),
        }
    }
}

/// An immutable board configuration plus the state it was reached from.
///
/// States are handed around as `Rc<PuzzleState>`: successors hold a shared
/// handle to their parent, so a solution path stays alive as long as its
/// final state does.
pub struct PuzzleState {
    cells: Vec<Tile>,
    empty: usize,
    config: Rc<BoardConfig>,
    parent: Option<Rc<PuzzleState>>,
    last_move: Option<Move>,
}

impl PuzzleState {
    /// Builds an initial state (no parent) from an explicit cell sequence on
    /// the default 4x4 board.
    ///
    /// # Errors
    /// `InvalidBoard` if `cells` is not a permutation of `1..=15` plus one
    /// empty cell.
    pub fn from_cells(cells: Vec<Tile>) -> Result<Self, PuzzleError> {
        Self::from_cells_with(cells, &BoardConfig::default())
    }

    /// Like [`PuzzleState::from_cells`] but for an explicit configuration.
    pub fn from_cells_with(cells: Vec<Tile>, config: &BoardConfig) -> Result<Self, PuzzleError> {
        let empty = validate_cells(&cells, config.width())?;
        Ok(PuzzleState {
            cells,
            empty,
            config: Rc::new(config.clone()),
            parent: None,
            last_move: None,
        })
    }

    /// Builds an initial state by scanning free-form text on the default
    /// 4x4 board.
    ///
    /// Decimal digit runs and the empty-marker literal are taken in order
    /// of appearance; every other character is ignored.
    ///
    /// # Examples
    /// ```
    /// use fifteen_solver::engine::PuzzleState;
    ///
    /// let a = PuzzleState::from_text("1 2 3 4 5 6 7 8 9 10 11 12 x 13 14 15").unwrap();
    /// let b = PuzzleState::from_text("1s2s3 4 5 asdf 6\n7\n8s9 10asdf11\t12 x 13 14 15").unwrap();
    /// assert_eq!(a, b);
    ///
    /// assert!(PuzzleState::from_text("1 2 3").is_err());
    /// ```
    ///
    /// # Errors
    /// `InvalidBoard` on a wrong token count or a board that is not a valid
    /// permutation.
    pub fn from_text(text: &str) -> Result<Self, PuzzleError> {
        Self::from_text_with(text, &BoardConfig::default())
    }

    /// Like [`PuzzleState::from_text`] but for an explicit configuration.
    pub fn from_text_with(text: &str, config: &BoardConfig) -> Result<Self, PuzzleError> {
        let tokens = tokenize(text, config.empty_marker());
        let cells = cells_from_tokens(&tokens, config)?;
        Self::from_cells_with(cells, config)
    }

    /// The solved board: labels in row-major order, empty cell last.
    pub fn goal(config: &BoardConfig) -> Self {
        let count = config.cell_count();
        let mut cells: Vec<Tile> = (1..count).map(|label| Tile::Label(label as u16)).collect();
        cells.push(Tile::Empty);
        PuzzleState {
            cells,
            empty: count - 1,
            config: Rc::new(config.clone()),
            parent: None,
            last_move: None,
        }
    }

    /// Produces a board by walking `moves` random steps away from the goal.
    ///
    /// The walk never immediately undoes its previous step. The same `seed`
    /// always yields the same board, and the result is always solvable since
    /// it is reachable from the goal. The returned state has no parent.
    pub fn scrambled(config: &BoardConfig, moves: usize, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut state = Self::goal(config);
        let mut previous: Option<Move> = None;

        for _ in 0..moves {
            let candidates: Vec<(Move, usize)> = Move::ALL
                .iter()
                .filter(|mv| previous.map_or(true, |p| **mv != p.opposite()))
                .filter_map(|&mv| state.neighbor(mv).map(|target| (mv, target)))
                .collect();

            // Every cell has at least two neighbours, so excluding one move
            // always leaves a candidate.
            if let Some(&(mv, target)) = candidates.choose(&mut rng) {
                state.cells.swap(state.empty, target);
                state.empty = target;
                previous = Some(mv);
            }
        }
        state
    }

    /// The cell sequence in row-major order.
    pub fn cells(&self) -> &[Tile] {
        &self.cells
    }

    pub fn width(&self) -> usize {
        self.config.width()
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Index of the empty cell.
    pub fn empty_index(&self) -> usize {
        self.empty
    }

    /// The state this one was generated from, if any.
    pub fn parent(&self) -> Option<&Rc<PuzzleState>> {
        self.parent.as_ref()
    }

    /// The move that turned the parent into this state.
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Returns `true` if cell `i` holds label `i + 1` for every cell but the
    /// last, and the last cell is empty.
    pub fn is_final(&self) -> bool {
        let last = self.cells.len() - 1;
        self.cells.iter().enumerate().all(|(index, tile)| match tile {
            Tile::Empty => index == last,
            Tile::Label(label) => *label as usize == index + 1,
        })
    }

    /// Number of pairs `i < j` of non-empty cells with `cell[i] > cell[j]`.
    pub fn inversions(&self) -> usize {
        let labels: Vec<u16> = self.cells.iter().filter_map(Tile::label).collect();
        labels
            .iter()
            .enumerate()
            .map(|(i, &label)| labels[i + 1..].iter().filter(|&&next| next < label).count())
            .sum()
    }

    /// Parity check deciding whether the goal is reachable at all.
    ///
    /// - Odd width: solvable iff the inversion count is even.
    /// - Even width: solvable iff the parity of the empty cell's row, counted
    ///   from the bottom starting at 0, equals the parity of the inversion
    ///   count.
    pub fn is_solvable(&self) -> bool {
        let width = self.width();
        let inversions = self.inversions();

        if width % 2 == 1 {
            inversions % 2 == 0
        } else {
            let row_from_bottom = width - 1 - self.empty / width;
            row_from_bottom % 2 == inversions % 2
        }
    }

    /// Sum of row and column offsets of every tile from its goal cell.
    pub fn manhattan(&self) -> usize {
        heuristics::manhattan(self)
    }

    /// Number of tiles not sitting on their goal cell.
    pub fn hamming(&self) -> usize {
        heuristics::hamming(self)
    }

    /// Index of the cell the empty slot would swap with for `mv`, or `None`
    /// if that would leave the grid.
    fn neighbor(&self, mv: Move) -> Option<usize> {
        let width = self.width();
        let row = self.empty / width;
        let col = self.empty % width;

        match mv {
            Move::Left if col > 0 => Some(self.empty - 1),
            Move::Up if row > 0 => Some(self.empty - width),
            Move::Right if col < width - 1 => Some(self.empty + 1),
            Move::Down if row < width - 1 => Some(self.empty + width),
            _ => None,
        }
    }

    /// Generates every state reachable with one move.
    ///
    /// Successors are emitted in the order left, up, right, down (direction
    /// of the empty cell), each tagged with `self` as parent. A corner yields
    /// 2 successors, a non-corner edge 3 and an interior cell 4.
    ///
    /// # Examples
    /// ```
    /// use std::rc::Rc;
    /// use fifteen_solver::engine::PuzzleState;
    ///
    /// let corner = Rc::new(PuzzleState::from_text("x 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15").unwrap());
    /// assert_eq!(corner.generate_next_moves().len(), 2);
    /// ```
    pub fn generate_next_moves(self: &Rc<Self>) -> Vec<Rc<PuzzleState>> {
        Move::ALL
            .iter()
            .filter_map(|&mv| {
                let target = self.neighbor(mv)?;
                let mut cells = self.cells.clone();
                cells.swap(self.empty, target);
                Some(Rc::new(PuzzleState {
                    cells,
                    empty: target,
                    config: Rc::clone(&self.config),
                    parent: Some(Rc::clone(self)),
                    last_move: Some(mv),
                }))
            })
            .collect()
    }

    /// Walks back-references from this state to the initial one, starting
    /// with `self`.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { next: Some(self) }
    }

    /// Renders the board as a grid using `marker` for the empty cell.
    ///
    /// Tokens are right-aligned to the widest token; rows are separated by
    /// newlines with no trailing newline.
    pub fn to_grid_string(&self, marker: &str) -> String {
        let tokens: Vec<String> = self
            .cells
            .iter()
            .map(|tile| match tile {
                Tile::Empty => marker.to_string(),
                Tile::Label(label) => label.to_string(),
            })
            .collect();
        let cell_width = tokens.iter().map(|t| t.chars().count()).max().unwrap_or(1);

        tokens
            .chunks(self.width())
            .map(|row| {
                row.iter()
                    .map(|t| format!("{:>w$}", t, w = cell_width))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl PartialEq for PuzzleState {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
    }
}

impl Eq for PuzzleState {}

impl Hash for PuzzleState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cells.hash(state);
    }
}

// Only the link to the parent is shown; printing the whole chain would walk
// the entire path.
impl fmt::Debug for PuzzleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PuzzleState")
            .field("cells", &self.cells)
            .field("width", &self.width())
            .field("last_move", &self.last_move)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

impl fmt::Display for PuzzleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_grid_string(self.config.empty_marker()))
    }
}

impl Drop for PuzzleState {
    // Unlinks the parent chain one state at a time so that dropping the end
    // of a long path does not recurse once per ancestor.
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(parent) = next {
            match Rc::try_unwrap(parent) {
                Ok(mut owned) => next = owned.parent.take(),
                Err(_) => break,
            }
        }
    }
}

/// Iterator over a state and its ancestors, newest first.
#[derive(Clone, Debug)]
pub struct Ancestors<'a> {
    next: Option<&'a PuzzleState>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a PuzzleState;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent.as_deref();
        Some(current)
    }
}
