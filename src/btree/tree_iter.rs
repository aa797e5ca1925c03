use super::node::Node;
use super::BTree;

struct TreeIterState<'a, K> {
    node: &'a Node<K>,
    pos: usize,
}

// Derives would require `K: Copy`
impl<'a, K> Clone for TreeIterState<'a, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K> Copy for TreeIterState<'a, K> {}

/// Sorted iterator over the keys of a `BTree`
pub struct TreeIter<'a, K> {
    /// List of parent nodes and current child position in them
    tail_states: Vec<TreeIterState<'a, K>>,
    /// The current node and the next key position to return
    head_state: TreeIterState<'a, K>,
    len: usize,
}

impl<'a, K: Ord + Clone> TreeIter<'a, K> {
    pub(super) fn new(tree: &'a BTree<K>) -> Self {
        // Create initial state, by recursing into child at the bottom
        let mut iter = TreeIter {
            tail_states: Vec::with_capacity(tree.height()),
            head_state: TreeIterState {
                node: &tree.root,
                pos: 0,
            },
            len: tree.len(),
        };
        iter.prepare_state_from(&tree.root);
        iter
    }

    fn prepare_state_from(&mut self, mut node: &'a Node<K>) {
        self.head_state = TreeIterState { node, pos: 0 };
        while !node.is_leaf() {
            node = node.get_child(0);
            let next_state = TreeIterState { node, pos: 0 };
            self.tail_states
                .push(std::mem::replace(&mut self.head_state, next_state));
        }
    }
}

impl<'a, K: Ord + Clone> Iterator for TreeIter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let TreeIterState { node, pos } = self.head_state;
            if pos < node.len() {
                // Iterate in node
                let key = node.get_element(pos);
                self.head_state.pos += 1;
                if !node.is_leaf() {
                    self.tail_states.push(self.head_state);
                    self.prepare_state_from(node.get_child(pos + 1));
                }
                self.len -= 1;
                return Some(key);
            }

            // Walk back up the chain
            self.head_state = self.tail_states.pop()?;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, K: Ord + Clone> ExactSizeIterator for TreeIter<'a, K> {}
impl<'a, K: Ord + Clone> std::iter::FusedIterator for TreeIter<'a, K> {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn iter() {
        fn check(t: usize, mut keys: Vec<i32>) {
            let mut tree = BTree::new(t).unwrap();
            for key in keys.iter() {
                tree.insert(*key);
            }

            keys.sort();
            keys.dedup();
            let iter = tree.iter();
            assert_eq!(iter.len(), keys.len());
            assert_eq!(iter.cloned().collect::<Vec<_>>(), keys);
        }

        check(2, vec![]);
        // Leaf tree
        check(3, (0..5).collect());
        // Tree with two levels
        check(3, (0..20).collect());
        // Tree with several levels
        check(2, (0..500).rev().collect());
        // Digits of pi, with repetitions
        check(
            2,
            vec![
                31, 41, 59, 26, 53, 58, 97, 93, 23, 84, 62, 64, 33, 83, 27, 95, 2, 88, 41, 97, 16,
                93, 99, 37, 51, 5, 82, 9, 74, 94, 45, 92, 30, 78, 16, 40, 62, 86, 20, 89, 98, 62,
                80, 34, 82, 53, 42, 11, 70, 67, 98, 21, 48, 8, 65, 13, 28, 23, 6, 64, 70, 93, 84,
                46, 9, 55, 5, 82, 23, 17, 25, 35, 94, 8, 12, 84, 81, 11, 74, 50, 28, 41, 2, 70, 19,
            ],
        );
    }
}
