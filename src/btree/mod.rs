mod node;
mod tree;
mod tree_iter;

pub use tree::BTree;
pub use tree_iter::TreeIter;

use serde::Serialize;

/// One step taken by a `BTree` operation.
/// Nodes are identified by a copy of their keys at the time of the step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Step<K> {
    /// The key is not in `node` and the walk continues in child number `child`
    Descend { node: Vec<K>, child: usize },
    Found { node: Vec<K> },
    NotFound { key: K },
    Duplicate { key: K },
    /// The root was full: an empty root was placed above it before splitting it
    GrowRoot,
    /// A full node was split in two halves and `median` moved up into the parent
    Split { node: Vec<K>, median: K },
    InsertedIntoLeaf { key: K, node: Vec<K> },
    RemovedFromLeaf { key: K, node: Vec<K> },
    /// An internal key was overwritten by the largest key of its left subtree
    ReplacedWithPredecessor { key: K, predecessor: K },
    /// An internal key was overwritten by the smallest key of its right subtree
    ReplacedWithSuccessor { key: K, successor: K },
    /// Two sibling nodes and their separator were fused into `node`
    Merge { node: Vec<K> },
    /// Child `child` received a key from its left sibling, `key` moved up into the parent
    BorrowFromLeft { child: usize, key: K },
    /// Child `child` received a key from its right sibling, `key` moved up into the parent
    BorrowFromRight { child: usize, key: K },
    /// The root ran out of keys and its only child took its place
    ShrinkRoot,
}

/// Read-only projection of a node, for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeView<K> {
    pub keys: Vec<K>,
    /// Empty for leaves
    pub children: Vec<NodeView<K>>,
}
