use super::node::Node;
use super::{NodeView, Step, TreeIter};
use crate::config::IndexConfig;
use crate::error::Result;
use crate::trace::{Lookup, Outcome, Tracer};
use crate::OrderedIndex;
use std::fmt;
use std::mem;
use tracing::debug;

/// B-tree of minimum degree `t` over a set of unique keys.
/// Every node but the root holds between `t-1` and `2t-1` keys and all leaves sit at the same depth
#[derive(Clone)]
pub struct BTree<K> {
    pub(super) root: Node<K>,
    len: usize,
    min_degree: usize,
    trace: bool,
}

impl<K: Ord + Clone> BTree<K> {
    /// Create a new empty tree with the given minimum degree, which must be at least 2
    pub fn new(min_degree: usize) -> Result<Self> {
        BTree::with_config(IndexConfig::with_min_degree(min_degree))
    }

    pub fn with_config(config: IndexConfig) -> Result<Self> {
        config.validate()?;
        Ok(BTree {
            root: Node::new(),
            len: 0,
            min_degree: config.min_degree,
            trace: config.trace,
        })
    }

    /// Enable or disable the recording of traces for the next operations
    pub fn set_trace(&mut self, enabled: bool) {
        self.trace = enabled;
    }

    pub fn min_degree(&self) -> usize {
        self.min_degree
    }

    /// Insert a key, splitting every full node met on the way down.
    /// Inserting a key already present changes nothing, not even the node layout
    pub fn insert(&mut self, key: K) -> Outcome<Step<K>> {
        let mut tracer = Tracer::new(self.trace);
        if self.contains(&key) {
            tracer.record(|| Step::Duplicate { key });
            return tracer.outcome(false);
        }

        let t = self.min_degree;
        if self.root.is_full(t) {
            // The only place where the tree grows in height
            tracer.record(|| Step::GrowRoot);
            let old_root = mem::replace(&mut self.root, Node::new());
            self.root = Node::above(old_root);
            self.root.split_child(0, t, &mut tracer);
            debug!(height = self.height(), "grew root");
        }

        let inserted = self.root.insert_non_full(key, t, &mut tracer);
        if inserted {
            self.len += 1;
        }
        tracer.outcome(inserted)
    }

    /// Remove a key, topping up every minimal node met on the way down.
    /// Removing a missing key changes nothing
    pub fn delete(&mut self, key: &K) -> Outcome<Step<K>> {
        let mut tracer = Tracer::new(self.trace);
        if !self.contains(key) {
            tracer.record(|| Step::NotFound { key: key.clone() });
            return tracer.outcome(false);
        }

        let removed = self.root.delete(key, self.min_degree, &mut tracer);
        if removed {
            self.len -= 1;
        }
        if self.root.shrink() {
            // The only place where the tree loses height
            tracer.record(|| Step::ShrinkRoot);
            debug!(height = self.height(), "shrank root");
        }
        tracer.outcome(removed)
    }

    pub fn search(&self, key: &K) -> Lookup<Step<K>> {
        let mut tracer = Tracer::new(self.trace);
        let found = self.root.search(key, &mut tracer).is_some();
        tracer.lookup(found)
    }

    /// Return the keys of the node holding `key`, if any
    pub fn search_node(&self, key: &K) -> Option<&[K]> {
        let node = self.root.search(key, &mut Tracer::new(false))?;
        Some(node.keys())
    }

    /// Untraced membership test
    pub fn contains(&self, key: &K) -> bool {
        self.root.search(key, &mut Tracer::new(false)).is_some()
    }

    /// Return the total number of keys present in the tree
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of node levels (0 for an empty tree)
    pub fn height(&self) -> usize {
        if self.len == 0 {
            0
        } else {
            self.root.depth()
        }
    }

    /// Return a sorted iterator over references to keys in the tree
    pub fn iter(&self) -> TreeIter<K> {
        TreeIter::new(self)
    }

    /// Read-only copy of the tree shape, `None` when empty
    pub fn snapshot(&self) -> Option<NodeView<K>> {
        if self.len == 0 {
            None
        } else {
            Some(self.root.view())
        }
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self)
    where
        K: fmt::Debug,
    {
        self.root.assert_invariants(self.min_degree, true, None, None);
        assert_eq!(self.iter().count(), self.len);
    }
}

impl<K: Ord + Clone> OrderedIndex<K> for BTree<K> {
    type Step = Step<K>;
    type View = NodeView<K>;

    fn insert(&mut self, key: K) -> Outcome<Step<K>> {
        BTree::insert(self, key)
    }

    fn delete(&mut self, key: &K) -> Outcome<Step<K>> {
        BTree::delete(self, key)
    }

    fn search(&self, key: &K) -> Lookup<Step<K>> {
        BTree::search(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        BTree::contains(self, key)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn height(&self) -> usize {
        BTree::height(self)
    }

    fn snapshot(&self) -> Option<NodeView<K>> {
        BTree::snapshot(self)
    }

    fn sorted_keys(&self) -> Vec<&K> {
        self.iter().collect()
    }
}

impl<K: Ord + Clone> Default for BTree<K> {
    /// Minimum degree 2, a 2-3-4 tree
    fn default() -> Self {
        BTree {
            root: Node::new(),
            len: 0,
            min_degree: IndexConfig::default().min_degree,
            trace: true,
        }
    }
}

impl<K: Ord + Clone + fmt::Debug> fmt::Debug for BTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: Ord + Clone> Extend<K> for BTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        let trace = self.trace;
        self.trace = false;
        for key in iter {
            self.insert(key);
        }
        self.trace = trace;
    }
}

impl<K: Ord + Clone> std::iter::FromIterator<K> for BTree<K> {
    /// Create a tree of the default minimum degree from an iterator
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = BTree::default();
        tree.extend(iter);
        tree
    }
}

impl<'a, K: Ord + Clone> IntoIterator for &'a BTree<K> {
    type Item = &'a K;
    type IntoIter = TreeIter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ConfigError;

    fn build(t: usize, keys: &[i32]) -> BTree<i32> {
        let mut tree = BTree::new(t).unwrap();
        tree.extend(keys.iter().cloned());
        tree
    }

    #[test]
    fn reject_small_degree() {
        assert_eq!(
            BTree::<i32>::new(1).unwrap_err(),
            ConfigError::MinDegreeTooSmall { min_degree: 1 }
        );
        assert!(BTree::<i32>::new(0).is_err());
        assert_eq!(BTree::<i32>::new(2).unwrap().min_degree(), 2);
    }

    #[test]
    fn reject_huge_degree() {
        let t = usize::MAX / 2 + 1;
        assert_eq!(
            BTree::<i32>::new(t).unwrap_err(),
            ConfigError::MinDegreeTooLarge { min_degree: t }
        );

        // Largest accepted degree: nodes never fill up, the tree stays a single leaf
        let mut tree = BTree::new(usize::MAX / 2).unwrap();
        for key in 0..10 {
            assert!(tree.insert(key).changed);
        }
        assert!(tree.delete(&3).changed);
        assert_eq!(tree.height(), 1);
        tree.assert_invariants();
    }

    #[test]
    fn test_new_root() {
        // Fill root
        let mut tree = build(2, &[1, 2, 3]);
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.root.len(), 3);

        // Split at insert
        let outcome = tree.insert(4);
        assert!(outcome.changed);
        assert_eq!(outcome.trace[0], Step::GrowRoot);
        assert_eq!(tree.height(), 2);
        assert_eq!(
            tree.snapshot(),
            Some(NodeView {
                keys: vec![2],
                children: vec![
                    NodeView {
                        keys: vec![1],
                        children: vec![]
                    },
                    NodeView {
                        keys: vec![3, 4],
                        children: vec![]
                    },
                ]
            })
        );
    }

    #[test]
    fn seeded_degree_two() {
        let mut tree = BTree::new(2).unwrap();
        for key in vec![10, 20, 5, 6, 12, 30, 7, 17] {
            assert!(tree.insert(key).changed);
            tree.assert_invariants();
        }
        assert_eq!(tree.len(), 8);
        assert!(tree.search(&17).found);
        assert!(!tree.search(&99).found);
        assert_eq!(
            tree.iter().cloned().collect::<Vec<_>>(),
            vec![5, 6, 7, 10, 12, 17, 20, 30]
        );
        assert_eq!(tree.search_node(&17), Some(&[12, 17][..]));
        assert_eq!(tree.search_node(&99), None);
    }

    #[test]
    fn duplicate_insert_keeps_layout() {
        // Root is full: a naive insert would split it before noticing the duplicate
        let mut tree = build(2, &[1, 2, 3]);
        let before = tree.snapshot();
        let outcome = tree.insert(2);
        assert!(!outcome.changed);
        assert_eq!(outcome.trace, vec![Step::Duplicate { key: 2 }]);
        assert_eq!(tree.snapshot(), before);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn delete_missing_keeps_layout() {
        let mut tree = build(2, &(0..20).collect::<Vec<_>>());
        let before = tree.snapshot();
        let outcome = tree.delete(&100);
        assert!(!outcome.changed);
        assert_eq!(outcome.trace, vec![Step::NotFound { key: 100 }]);
        assert_eq!(tree.snapshot(), before);
    }

    #[test]
    fn delete_shrinks_root() {
        let mut tree = build(2, &[1, 2, 3, 4]);
        assert_eq!(tree.height(), 2);
        let outcome = tree.delete(&4);
        assert!(outcome.changed);
        // [2] over [1] [3]: both children are minimal, deleting 3 merges them
        let outcome = tree.delete(&3);
        assert!(outcome.changed);
        assert_eq!(outcome.trace.last(), Some(&Step::ShrinkRoot));
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.iter().cloned().collect::<Vec<_>>(), vec![1, 2]);
        tree.assert_invariants();
    }

    #[test]
    fn delete_everything() {
        for &t in &[2, 3, 5] {
            let mut tree = build(t, &(0..200).collect::<Vec<_>>());
            tree.assert_invariants();
            for key in (0..200).filter(|k| k % 3 == 0) {
                assert!(tree.delete(&key).changed, "t={} key={}", t, key);
                tree.assert_invariants();
            }
            for key in (0..200).filter(|k| k % 3 != 0).rev() {
                assert!(tree.delete(&key).changed, "t={} key={}", t, key);
                tree.assert_invariants();
            }
            assert!(tree.is_empty());
            assert_eq!(tree.height(), 0);
            assert_eq!(tree.snapshot(), None);
        }
    }

    #[test]
    fn trace_can_be_disabled() {
        let mut tree = BTree::with_config(IndexConfig::with_min_degree(3).without_trace()).unwrap();
        for key in 0..50 {
            assert!(tree.insert(key).trace.is_empty());
        }
        assert!(tree.delete(&25).trace.is_empty());
        assert!(tree.search(&26).trace.is_empty());
        tree.set_trace(true);
        assert!(!tree.search(&26).trace.is_empty());
    }

    #[test]
    fn debug_and_collect() {
        let tree: BTree<i32> = vec![3, 1, 2, 3].into_iter().collect();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.min_degree(), 2);
        assert_eq!(format!("{:?}", tree), "{1, 2, 3}");
    }
}
