//! Union-find (disjoint set union) over dense indices.
//!
//! Both clustering strategies build equivalence classes as the transitive
//! closure of pairwise merge decisions, and the greedy local search
//! additionally uses union-find to compute the transitive reduction of its
//! positive-pair graph. Callers map concept ids to dense indices before
//! constructing the structure.

/// Disjoint-set structure with path compression and union by rank.
///
/// Only set identity matters to the callers, so the choice of canonical
/// representative is unspecified beyond being stable between mutations.
///
/// # Examples
/// ```
/// use kartta_core::UnionFind;
///
/// let mut sets = UnionFind::new(4);
/// sets.union(0, 1);
/// sets.union(1, 2);
/// assert!(sets.same_set(0, 2));
/// assert!(!sets.same_set(0, 3));
/// ```
#[derive(Clone, Debug)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    /// Creates `n` singleton sets over the indices `0..n`.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    /// Returns the number of elements the structure was created with.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Returns `true` when the structure tracks no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Returns the canonical representative of the set containing `node`.
    ///
    /// # Panics
    /// Panics when `node` is out of bounds.
    pub fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        while self.parent[node] != node {
            let parent = self.parent[node];
            self.parent[node] = root;
            node = parent;
        }

        root
    }

    /// Merges the sets containing `left` and `right`; returns the new root.
    ///
    /// # Panics
    /// Panics when either index is out of bounds.
    pub fn union(&mut self, left: usize, right: usize) -> usize {
        let mut left = self.find(left);
        let mut right = self.find(right);
        if left == right {
            return left;
        }
        let left_rank = self.rank[left];
        let right_rank = self.rank[right];
        if left_rank < right_rank {
            std::mem::swap(&mut left, &mut right);
        }
        self.parent[right] = left;
        if left_rank == right_rank {
            self.rank[left] = left_rank.saturating_add(1);
        }
        left
    }

    /// Returns `true` when `left` and `right` are currently in the same set.
    ///
    /// # Panics
    /// Panics when either index is out of bounds.
    pub fn same_set(&mut self, left: usize, right: usize) -> bool {
        self.find(left) == self.find(right)
    }

    /// Extracts the current sets as sorted member lists.
    ///
    /// Sets are ordered by their smallest member, and members within each set
    /// are sorted ascending, so the output is deterministic regardless of the
    /// union order that produced it.
    #[must_use]
    pub fn sets(&mut self) -> Vec<Vec<usize>> {
        let mut by_root: Vec<Vec<usize>> = vec![Vec::new(); self.parent.len()];
        for node in 0..self.parent.len() {
            let root = self.find(node);
            if let Some(set) = by_root.get_mut(root) {
                set.push(node);
            }
        }
        let mut sets: Vec<Vec<usize>> = by_root.into_iter().filter(|set| !set.is_empty()).collect();
        // Members are pushed in ascending order, so the first member is the
        // smallest and gives a stable sort key.
        sets.sort_by_key(|set| set.first().copied());
        sets
    }
}
