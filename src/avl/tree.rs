use super::node::{self, Link};
use super::{Iter, NodeView, Step, Traversal};
use crate::config::IndexConfig;
use crate::trace::{Lookup, Outcome, Tracer};
use crate::OrderedIndex;
use std::fmt;

/// Height-balanced binary search tree over a set of unique keys
#[derive(Clone)]
pub struct AvlTree<K> {
    root: Link<K>,
    len: usize,
    trace: bool,
}

impl<K: Ord + Clone> AvlTree<K> {
    /// Create a new empty tree that records a trace for every operation
    pub fn new() -> Self {
        AvlTree::with_config(IndexConfig::default())
    }

    /// Only `config.trace` applies to this tree
    pub fn with_config(config: IndexConfig) -> Self {
        AvlTree {
            root: None,
            len: 0,
            trace: config.trace,
        }
    }

    /// Enable or disable the recording of traces for the next operations
    pub fn set_trace(&mut self, enabled: bool) {
        self.trace = enabled;
    }

    /// Insert a key, rebalancing every ancestor on the way back up.
    /// Inserting a key already present changes nothing
    pub fn insert(&mut self, key: K) -> Outcome<Step<K>> {
        let mut tracer = Tracer::new(self.trace);
        let (root, inserted) = node::insert(self.root.take(), &key, &mut tracer);
        self.root = Some(root);
        if inserted {
            self.len += 1;
        }
        tracer.outcome(inserted)
    }

    /// Remove a key, rebalancing every ancestor on the way back up
    pub fn delete(&mut self, key: &K) -> Outcome<Step<K>> {
        let mut tracer = Tracer::new(self.trace);
        let (root, removed) = node::delete(self.root.take(), key, &mut tracer);
        self.root = root;
        if removed {
            self.len -= 1;
        }
        tracer.outcome(removed)
    }

    pub fn search(&self, key: &K) -> Lookup<Step<K>> {
        let mut tracer = Tracer::new(self.trace);
        let found = node::search(&self.root, key, &mut tracer).is_some();
        tracer.lookup(found)
    }

    /// Untraced membership test
    pub fn contains(&self, key: &K) -> bool {
        node::search(&self.root, key, &mut Tracer::new(false)).is_some()
    }

    /// Return the number of keys in the tree
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes on the longest root-to-leaf path (0 for an empty tree)
    pub fn height(&self) -> u32 {
        node::height(&self.root)
    }

    pub fn min(&self) -> Option<&K> {
        self.root.as_ref().map(|root| root.min_key())
    }

    pub fn max(&self) -> Option<&K> {
        self.root.as_ref().map(|root| root.max_key())
    }

    /// Return a sorted iterator over references to the keys
    pub fn iter(&self) -> Iter<K> {
        Iter::new(self)
    }

    /// Collect references to all keys in the given visiting order
    pub fn keys(&self, order: Traversal) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.len);
        match order {
            Traversal::InOrder => keys.extend(self.iter()),
            Traversal::PreOrder => node::pre_order(&self.root, &mut keys),
            Traversal::PostOrder => node::post_order(&self.root, &mut keys),
            Traversal::LevelOrder => node::level_order(&self.root, &mut keys),
        }
        keys
    }

    /// Read-only copy of the tree shape, `None` when empty
    pub fn snapshot(&self) -> Option<NodeView<K>> {
        self.root.as_ref().map(|root| root.view())
    }

    pub(super) fn root(&self) -> &Link<K> {
        &self.root
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self)
    where
        K: fmt::Debug,
    {
        node::assert_invariants(&self.root, None, None);
        assert_eq!(self.iter().count(), self.len);
    }
}

impl<K: Ord + Clone> OrderedIndex<K> for AvlTree<K> {
    type Step = Step<K>;
    type View = NodeView<K>;

    fn insert(&mut self, key: K) -> Outcome<Step<K>> {
        AvlTree::insert(self, key)
    }

    fn delete(&mut self, key: &K) -> Outcome<Step<K>> {
        AvlTree::delete(self, key)
    }

    fn search(&self, key: &K) -> Lookup<Step<K>> {
        AvlTree::search(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        AvlTree::contains(self, key)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn height(&self) -> usize {
        AvlTree::height(self) as usize
    }

    fn snapshot(&self) -> Option<NodeView<K>> {
        AvlTree::snapshot(self)
    }

    fn sorted_keys(&self) -> Vec<&K> {
        self.iter().collect()
    }
}

impl<K: Ord + Clone> Default for AvlTree<K> {
    fn default() -> Self {
        AvlTree::new()
    }
}

impl<K: Ord + Clone + fmt::Debug> fmt::Debug for AvlTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: Ord + Clone> Extend<K> for AvlTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        let trace = self.trace;
        self.trace = false;
        for key in iter {
            self.insert(key);
        }
        self.trace = trace;
    }
}

impl<K: Ord + Clone> std::iter::FromIterator<K> for AvlTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = AvlTree::new();
        tree.extend(iter);
        tree
    }
}

impl<'a, K: Ord + Clone> IntoIterator for &'a AvlTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
