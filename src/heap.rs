//! Array-backed binary heap used as the open set of the search.
//!
//! The tree is addressed with 1-based *positions* (root at position 1, the
//! children of `p` at `2p` and `2p + 1`, the parent of `p` at `p / 2`). A
//! position `p` lives in slot `p - 1` of the backing `Vec`, so no sentinel
//! element is stored.
//!
//! Entries with equal priorities come out in no particular order.

use crate::error::PuzzleError;

/// Selects which extreme of the priorities [`PriorityQueue::extract`] returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeapDirection {
    /// Smallest priority first (min-heap).
    Ascending,
    /// Largest priority first (max-heap).
    Descending,
}

/// A priority paired with the payload it was inserted with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeapEntry<P, V> {
    pub priority: P,
    pub payload: V,
}

impl<P, V> HeapEntry<P, V> {
    fn into_pair(self) -> (P, V) {
        (self.priority, self.payload)
    }
}

/// Ordering relation of a heap: returns `true` when `a` must sit above `b`.
pub type Precedes<P> = fn(&P, &P) -> bool;

fn ascending<P: PartialOrd>(a: &P, b: &P) -> bool {
    a < b
}

fn descending<P: PartialOrd>(a: &P, b: &P) -> bool {
    a > b
}

/// A priority queue mapping priorities to opaque payloads.
///
/// # Time Complexity
///
/// | [insert]      | [extract]     | [peek] |
/// |---------------|---------------|--------|
/// | *O*(log(*n*)) | *O*(log(*n*)) | *O*(1) |
///
/// [insert]: PriorityQueue::insert
/// [extract]: PriorityQueue::extract
/// [peek]: PriorityQueue::peek
///
/// # Examples
/// ```
/// use fifteen_solver::heap::{HeapDirection, PriorityQueue};
///
/// let mut queue = PriorityQueue::new(HeapDirection::Ascending);
/// queue.insert(5, "five");
/// queue.insert(1, "one");
/// queue.insert(3, "three");
///
/// assert_eq!(queue.extract().unwrap(), (1, "one"));
/// assert_eq!(queue.extract().unwrap(), (3, "three"));
/// assert_eq!(queue.len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct PriorityQueue<P, V> {
    entries: Vec<HeapEntry<P, V>>,
    precedes: Precedes<P>,
}

impl<P: PartialOrd, V> PriorityQueue<P, V> {
    /// Creates an empty queue ordered by the natural ordering of `P`.
    pub fn new(direction: HeapDirection) -> Self {
        let precedes: Precedes<P> = match direction {
            HeapDirection::Ascending => ascending::<P>,
            HeapDirection::Descending => descending::<P>,
        };
        Self::with_comparator(precedes)
    }
}

impl<P, V> PriorityQueue<P, V> {
    /// Creates an empty queue ordered by an explicit relation.
    ///
    /// `precedes(a, b)` must return `true` iff an entry with priority `a`
    /// has to be extracted before one with priority `b`. It must be a strict
    /// ordering: `precedes(a, a)` is `false`.
    pub fn with_comparator(precedes: Precedes<P>) -> Self {
        PriorityQueue {
            entries: Vec::new(),
            precedes,
        }
    }

    /// Number of entries currently stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the queue holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts `payload` with the given `priority`.
    ///
    /// The entry is appended at the next free leaf and sifted upward until
    /// its parent precedes it or it becomes the root.
    pub fn insert(&mut self, priority: P, payload: V) {
        self.entries.push(HeapEntry { priority, payload });
        let last = self.entries.len();
        self.sift_up(last);
    }

    /// Returns the root entry without removing it.
    ///
    /// # Errors
    /// [`PuzzleError::EmptyQueue`] if the queue is empty.
    pub fn peek(&self) -> Result<(&P, &V), PuzzleError> {
        self.entries
            .first()
            .map(|entry| (&entry.priority, &entry.payload))
            .ok_or(PuzzleError::EmptyQueue)
    }

    /// Removes and returns the root entry.
    ///
    /// The last leaf replaces the root and is sifted downward.
    ///
    /// # Errors
    /// [`PuzzleError::EmptyQueue`] if the queue is empty.
    pub fn extract(&mut self) -> Result<(P, V), PuzzleError> {
        if self.entries.is_empty() {
            return Err(PuzzleError::EmptyQueue);
        }
        // swap_remove moves the last leaf into slot 0 (position 1).
        let root = self.entries.swap_remove(0);
        if !self.entries.is_empty() {
            self.sift_down(1);
        }
        Ok(root.into_pair())
    }

    /// Compares the entries at two 1-based positions.
    #[inline]
    fn precedes_at(&self, a: usize, b: usize) -> bool {
        (self.precedes)(&self.entries[a - 1].priority, &self.entries[b - 1].priority)
    }

    #[inline]
    fn swap_positions(&mut self, a: usize, b: usize) {
        self.entries.swap(a - 1, b - 1);
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 1 {
            let parent = pos / 2;
            if !self.precedes_at(pos, parent) {
                break;
            }
            self.swap_positions(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * pos;
            if left > len {
                // Leaf reached.
                break;
            }
            let right = left + 1;
            let child = if right <= len && self.precedes_at(right, left) {
                right
            } else {
                left
            };

            if !self.precedes_at(child, pos) {
                break;
            }
            self.swap_positions(pos, child);
            pos = child;
        }
    }
}
