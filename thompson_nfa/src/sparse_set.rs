//! Sparse set of state IDs.
//!
//! Based on: https://research.swtch.com/sparse
//!
//! Insertion order is preserved, membership and insertion are O(1), and
//! clearing is O(1). The simulation keeps two of these and swaps them after
//! every input character, so no allocation happens while scanning a line.

use crate::nfa::StateId;

/// A set of state IDs below a fixed capacity.
#[derive(Clone, Debug)]
pub struct SparseSet {
    /// Number of elements currently in the set.
    len: usize,
    /// IDs in insertion order.
    dense: Vec<StateId>,
    /// Maps an ID to its position in `dense`.
    /// An ID is in the set iff sparse[id] < len && dense[sparse[id]] == id.
    sparse: Vec<usize>,
}

impl SparseSet {
    /// Create an empty set able to hold IDs in `[0, capacity)`.
    #[inline]
    pub fn new(capacity: usize) -> Self {
        SparseSet {
            len: 0,
            dense: vec![0; capacity],
            sparse: vec![0; capacity],
        }
    }

    /// Returns the capacity of this set.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.dense.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert an ID. Returns true if the ID was not already present.
    ///
    /// Panics if `id >= capacity`.
    #[inline]
    pub fn insert(&mut self, id: StateId) -> bool {
        if self.contains(id) {
            return false;
        }
        debug_assert!(
            self.len < self.capacity(),
            "SparseSet overflow: len={}, capacity={}",
            self.len,
            self.capacity()
        );
        self.dense[self.len] = id;
        self.sparse[id] = self.len;
        self.len += 1;
        true
    }

    /// Panics if `id >= capacity`.
    #[inline]
    pub fn contains(&self, id: StateId) -> bool {
        let idx = self.sparse[id];
        idx < self.len && self.dense[idx] == id
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Iterate over elements in insertion order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.dense[..self.len].iter().copied()
    }
}

/// The current and next state sets of a simulation.
#[derive(Clone, Debug)]
pub(crate) struct SparseSets {
    pub(crate) curr: SparseSet,
    pub(crate) next: SparseSet,
}

impl SparseSets {
    pub(crate) fn new(capacity: usize) -> Self {
        SparseSets {
            curr: SparseSet::new(capacity),
            next: SparseSet::new(capacity),
        }
    }

    pub(crate) fn swap(&mut self) {
        std::mem::swap(&mut self.curr, &mut self.next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_contains() {
        let mut set = SparseSet::new(10);
        assert!(set.is_empty());
        assert_eq!(set.capacity(), 10);

        assert!(set.insert(3));
        assert!(set.insert(7));
        assert!(set.insert(1));

        assert_eq!(set.len(), 3);
        assert!(set.contains(3));
        assert!(set.contains(7));
        assert!(set.contains(1));
        assert!(!set.contains(0));

        // Duplicate insert is refused
        assert!(!set.insert(3));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_insertion_order() {
        let mut set = SparseSet::new(10);
        for id in [5, 2, 8, 1] {
            set.insert(id);
        }
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![5, 2, 8, 1]);
    }

    #[test]
    fn test_clear_then_reuse() {
        let mut set = SparseSet::new(4);
        set.insert(1);
        set.insert(2);
        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains(1));

        set.insert(2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_swap() {
        let mut sets = SparseSets::new(4);
        sets.curr.insert(1);
        sets.next.insert(3);
        sets.swap();
        assert!(sets.curr.contains(3));
        assert!(sets.next.contains(1));
    }
}
