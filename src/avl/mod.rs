mod iter;
mod node;
mod tree;

pub use iter::Iter;
pub use tree::AvlTree;

use serde::Serialize;

/// Side of a binary node
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum Direction {
    Left,
    Right,
}

/// The four classic imbalance shapes, named after the path from the unbalanced node
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum RotationCase {
    /// Fixed by a right rotation
    LeftLeft,
    /// Fixed by a left rotation on the left child, then a right rotation
    LeftRight,
    /// Fixed by a left rotation
    RightRight,
    /// Fixed by a right rotation on the right child, then a left rotation
    RightLeft,
}

/// One step taken by an `AvlTree` operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Step<K> {
    /// The key was compared with `at` and the walk continued on `direction`
    Descend { at: K, direction: Direction },
    /// A new leaf was created
    Inserted { key: K },
    Duplicate { key: K },
    Found { key: K },
    NotFound { key: K },
    /// The node holding `key` was unlinked
    Removed { key: K },
    /// A node with two children took the key of its in-order successor
    Successor { of: K, successor: K },
    /// Balance factor after the height of `at` was recomputed
    Balance { at: K, balance: i32 },
    Rebalance { at: K, case: RotationCase },
    /// `pivot` moved down on `direction` and `new_root` took its place
    Rotated {
        direction: Direction,
        pivot: K,
        new_root: K,
    },
}

/// Order in which `AvlTree::keys` visits the nodes
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Traversal {
    PreOrder,
    InOrder,
    PostOrder,
    LevelOrder,
}

/// Read-only projection of a node, for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeView<K> {
    pub key: K,
    pub height: u32,
    pub balance: i32,
    pub left: Option<Box<NodeView<K>>>,
    pub right: Option<Box<NodeView<K>>>,
}
