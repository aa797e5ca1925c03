use super::{NodeView, Step};
use crate::trace::Tracer;
use std::cmp::Ordering;
use std::mem;
use tracing::trace;

#[derive(Debug, Clone)]
pub(super) struct Node<K> {
    keys: Vec<K>,
    /// Empty for a leaf, otherwise exactly one more than `keys`
    children: Vec<Box<Node<K>>>,
}

impl<K: Ord + Clone> Node<K> {
    /// Build an empty leaf
    pub(super) fn new() -> Self {
        Node {
            keys: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Build a key-less node whose only child is `child`.
    /// This is only a valid node once that child is split
    pub(super) fn above(child: Node<K>) -> Self {
        Node {
            keys: Vec::new(),
            children: vec![Box::new(child)],
        }
    }

    /// Return the total number of keys in this node
    pub(super) fn len(&self) -> usize {
        self.keys.len()
    }

    pub(super) fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Return whether the node is a leaf
    pub(super) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether this node holds the maximum of `2t-1` keys
    pub(super) fn is_full(&self, t: usize) -> bool {
        self.keys.len() == 2 * t - 1
    }

    /// Return the key at the given index.
    /// Panics if out-of-bounds
    pub(super) fn get_element(&self, index: usize) -> &K {
        &self.keys[index]
    }

    /// Return the child at the given index.
    /// Panics if it is a leaf node or out-of-bounds access
    pub(super) fn get_child(&self, index: usize) -> &Node<K> {
        &self.children[index]
    }

    pub(super) fn view(&self) -> NodeView<K> {
        NodeView {
            keys: self.keys.clone(),
            children: self.children.iter().map(|child| child.view()).collect(),
        }
    }

    /// Walk down from this node and return the node holding `key`, if any
    pub(super) fn search<'a>(&'a self, key: &K, tracer: &mut Tracer<Step<K>>) -> Option<&'a Self> {
        let mut node = self;
        loop {
            match node.keys.binary_search(key) {
                Ok(_) => {
                    tracer.record(|| Step::Found {
                        node: node.keys.clone(),
                    });
                    return Some(node);
                }
                Err(_) if node.is_leaf() => {
                    tracer.record(|| Step::NotFound { key: key.clone() });
                    return None;
                }
                Err(index) => {
                    tracer.record(|| Step::Descend {
                        node: node.keys.clone(),
                        child: index,
                    });
                    node = &node.children[index];
                }
            }
        }
    }

    /// Insert `key` into the subtree rooted at this non-full node.
    /// Full children are split before the walk enters them, so the leaf that
    /// finally receives the key always has room for it
    pub(super) fn insert_non_full(
        &mut self,
        key: K,
        t: usize,
        tracer: &mut Tracer<Step<K>>,
    ) -> bool {
        let mut index = match self.keys.binary_search(&key) {
            Ok(_) => {
                tracer.record(|| Step::Duplicate { key });
                return false;
            }
            Err(index) => index,
        };

        if self.is_leaf() {
            self.keys.insert(index, key);
            tracer.record(|| Step::InsertedIntoLeaf {
                key: self.keys[index].clone(),
                node: self.keys.clone(),
            });
            return true;
        }

        tracer.record(|| Step::Descend {
            node: self.keys.clone(),
            child: index,
        });
        if self.children[index].is_full(t) {
            self.split_child(index, t, tracer);
            // The promoted median now separates the two halves
            match key.cmp(&self.keys[index]) {
                Ordering::Less => {}
                Ordering::Greater => index += 1,
                Ordering::Equal => {
                    tracer.record(|| Step::Duplicate { key });
                    return false;
                }
            }
        }
        self.children[index].insert_non_full(key, t, tracer)
    }

    /// Split the full child at `index` into two nodes of `t-1` keys each and move
    /// its median up into this node, between them
    pub(super) fn split_child(&mut self, index: usize, t: usize, tracer: &mut Tracer<Step<K>>) {
        let child = &mut self.children[index];
        assert!(child.is_full(t), "only full nodes can be split");
        tracer.record(|| Step::Split {
            node: child.keys.clone(),
            median: child.keys[t - 1].clone(),
        });

        let right_keys = child.keys.split_off(t);
        let median = child.keys.remove(t - 1);
        let right_children = if child.is_leaf() {
            Vec::new()
        } else {
            child.children.split_off(t)
        };
        trace!(index, keys = right_keys.len(), "split node");

        self.keys.insert(index, median);
        self.children.insert(
            index + 1,
            Box::new(Node {
                keys: right_keys,
                children: right_children,
            }),
        );
    }

    /// Remove `key` from the subtree rooted at this node.
    /// Every child is topped up to at least `t` keys before the walk enters it,
    /// so taking one key out of it never leaves it under `t-1`
    pub(super) fn delete(&mut self, key: &K, t: usize, tracer: &mut Tracer<Step<K>>) -> bool {
        match self.keys.binary_search(key) {
            Ok(index) if self.is_leaf() => {
                let key = self.keys.remove(index);
                tracer.record(|| Step::RemovedFromLeaf {
                    key,
                    node: self.keys.clone(),
                });
                true
            }
            Ok(index) => self.delete_internal(index, t, tracer),
            Err(_) if self.is_leaf() => {
                tracer.record(|| Step::NotFound { key: key.clone() });
                false
            }
            Err(index) => {
                tracer.record(|| Step::Descend {
                    node: self.keys.clone(),
                    child: index,
                });
                let index = if self.children[index].len() < t {
                    self.fill_child(index, t, tracer)
                } else {
                    index
                };
                self.children[index].delete(key, t, tracer)
            }
        }
    }

    /// Remove the key at `index` of this internal node
    fn delete_internal(&mut self, index: usize, t: usize, tracer: &mut Tracer<Step<K>>) -> bool {
        if self.children[index].len() >= t {
            let predecessor = self.children[index].max_key().clone();
            tracer.record(|| Step::ReplacedWithPredecessor {
                key: self.keys[index].clone(),
                predecessor: predecessor.clone(),
            });
            let removed = self.children[index].delete(&predecessor, t, tracer);
            self.keys[index] = predecessor;
            removed
        } else if self.children[index + 1].len() >= t {
            let successor = self.children[index + 1].min_key().clone();
            tracer.record(|| Step::ReplacedWithSuccessor {
                key: self.keys[index].clone(),
                successor: successor.clone(),
            });
            let removed = self.children[index + 1].delete(&successor, t, tracer);
            self.keys[index] = successor;
            removed
        } else {
            // Both neighbours are minimal: push the key down into their union
            let key = self.keys[index].clone();
            self.merge_children(index, tracer);
            self.children[index].delete(&key, t, tracer)
        }
    }

    /// Bring the child at `index` (holding `t-1` keys) up to `t` keys, by borrowing
    /// from a sibling or merging with one.
    /// Return the index of the child that now covers the original key range
    fn fill_child(&mut self, index: usize, t: usize, tracer: &mut Tracer<Step<K>>) -> usize {
        if index > 0 && self.children[index - 1].len() >= t {
            self.borrow_from_left(index, tracer);
            index
        } else if index < self.keys.len() && self.children[index + 1].len() >= t {
            self.borrow_from_right(index, tracer);
            index
        } else if index < self.keys.len() {
            self.merge_children(index, tracer);
            index
        } else {
            self.merge_children(index - 1, tracer);
            index - 1
        }
    }

    /// Rotate one key from the left sibling through this node into the child at `index`
    fn borrow_from_left(&mut self, index: usize, tracer: &mut Tracer<Step<K>>) {
        let (before, after) = self.children.split_at_mut(index);
        let left = &mut before[index - 1];
        let child = &mut after[0];

        let separator = match left.keys.pop() {
            Some(key) => mem::replace(&mut self.keys[index - 1], key),
            None => return,
        };
        child.keys.insert(0, separator);
        if let Some(grandchild) = left.children.pop() {
            child.children.insert(0, grandchild);
        }

        tracer.record(|| Step::BorrowFromLeft {
            child: index,
            key: self.keys[index - 1].clone(),
        });
        trace!(index, "borrowed from left sibling");
    }

    /// Rotate one key from the right sibling through this node into the child at `index`
    fn borrow_from_right(&mut self, index: usize, tracer: &mut Tracer<Step<K>>) {
        let (before, after) = self.children.split_at_mut(index + 1);
        let child = &mut before[index];
        let right = &mut after[0];

        if right.keys.is_empty() {
            return;
        }
        let separator = mem::replace(&mut self.keys[index], right.keys.remove(0));
        child.keys.push(separator);
        if !right.is_leaf() {
            child.children.push(right.children.remove(0));
        }

        tracer.record(|| Step::BorrowFromRight {
            child: index,
            key: self.keys[index].clone(),
        });
        trace!(index, "borrowed from right sibling");
    }

    /// Fuse the children at `index` and `index + 1` together with the key separating them
    fn merge_children(&mut self, index: usize, tracer: &mut Tracer<Step<K>>) {
        let separator = self.keys.remove(index);
        let mut right = self.children.remove(index + 1);
        let child = &mut self.children[index];
        child.keys.push(separator);
        child.keys.append(&mut right.keys);
        child.children.append(&mut right.children);

        tracer.record(|| Step::Merge {
            node: child.keys.clone(),
        });
        trace!(index, keys = child.keys.len(), "merged siblings");
    }

    /// Replace this key-less node by its only child.
    /// Return whether that happened
    pub(super) fn shrink(&mut self) -> bool {
        if !self.keys.is_empty() || self.children.len() != 1 {
            return false;
        }
        match self.children.pop() {
            Some(child) => {
                *self = *child;
                true
            }
            None => false,
        }
    }

    /// Largest key of the subtree rooted at this non-empty node
    fn max_key(&self) -> &K {
        let mut node = self;
        while let Some(child) = node.children.last() {
            node = child;
        }
        &node.keys[node.keys.len() - 1]
    }

    /// Smallest key of the subtree rooted at this non-empty node
    fn min_key(&self) -> &K {
        let mut node = self;
        while let Some(child) = node.children.first() {
            node = child;
        }
        &node.keys[0]
    }

    /// Number of levels from this node down to the leaves
    pub(super) fn depth(&self) -> usize {
        let mut node = self;
        let mut depth = 1;
        while let Some(child) = node.children.first() {
            node = child;
            depth += 1;
        }
        depth
    }

    /// Check key bounds, ordering, fill and leaf depth below this node.
    /// Return the number of levels below it, this node included
    #[cfg(test)]
    pub(super) fn assert_invariants(
        &self,
        t: usize,
        is_root: bool,
        lower: Option<&K>,
        upper: Option<&K>,
    ) -> usize
    where
        K: std::fmt::Debug,
    {
        assert!(self.keys.len() <= 2 * t - 1, "overfull {:?}", self.keys);
        if !is_root {
            assert!(self.keys.len() >= t - 1, "underfull {:?}", self.keys);
        }
        for pair in self.keys.windows(2) {
            assert!(pair[0] < pair[1], "unordered {:?}", self.keys);
        }
        if let (Some(lower), Some(first)) = (lower, self.keys.first()) {
            assert!(first > lower, "{:?} not above {:?}", self.keys, lower);
        }
        if let (Some(upper), Some(last)) = (upper, self.keys.last()) {
            assert!(last < upper, "{:?} not below {:?}", self.keys, upper);
        }
        if self.is_leaf() {
            return 1;
        }

        assert_eq!(self.children.len(), self.keys.len() + 1);
        let depths: Vec<usize> = self
            .children
            .iter()
            .enumerate()
            .map(|(i, child)| {
                let lower = if i == 0 { lower } else { self.keys.get(i - 1) };
                let upper = self.keys.get(i).or(upper);
                child.assert_invariants(t, false, lower, upper)
            })
            .collect();
        assert!(
            depths.iter().all(|&depth| depth == depths[0]),
            "leaves at different depths under {:?}",
            self.keys
        );
        depths[0] + 1
    }
}
