use super::node::{Link, Node};
use super::AvlTree;

/// Sorted iterator over the keys of an `AvlTree`
pub struct Iter<'a, K> {
    /// Nodes whose key was not yielded yet, the next one on top
    stack: Vec<&'a Node<K>>,
    len: usize,
}

impl<'a, K: Ord + Clone> Iter<'a, K> {
    pub(super) fn new(tree: &'a AvlTree<K>) -> Self {
        let mut iter = Iter {
            stack: Vec::with_capacity(tree.height() as usize),
            len: tree.len(),
        };
        iter.push_left_spine(tree.root());
        iter
    }
}

impl<'a, K> Iter<'a, K> {
    fn push_left_spine(&mut self, mut link: &'a Link<K>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = &node.left;
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(&node.right);
        self.len -= 1;
        Some(&node.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, K> ExactSizeIterator for Iter<'a, K> {}
impl<'a, K> std::iter::FusedIterator for Iter<'a, K> {}
