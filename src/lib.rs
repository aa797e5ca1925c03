//! Self-balancing ordered indexes over a set of unique keys.
//!
//! - [`avl::AvlTree`]: height-balanced binary search tree, rebalanced by rotations
//! - [`btree::BTree`]: multiway tree of minimum degree `t`, rebalanced by splits, borrows
//!   and merges
//!
//! Every operation can report the steps it took (comparisons, rotations, splits...) as a
//! [`trace`] returned alongside its result, so that an external layer can replay them.


pub mod avl;
pub mod btree;
pub mod config;
pub mod error;
#[cfg(feature = "key-generator")]
pub mod key_generator;
pub mod trace;

pub use avl::AvlTree;
pub use btree::BTree;
pub use config::IndexConfig;
pub use error::{ConfigError, Result};
pub use trace::{Lookup, Outcome};

/// Ordered key set with logarithmic search, insert and delete
pub trait OrderedIndex<K: Ord + Clone> {
    /// One recorded step of an operation
    type Step;
    /// Read-only projection of a node
    type View;

    /// Insert a key. Inserting a key already present is a no-op reported with `changed = false`
    fn insert(&mut self, key: K) -> Outcome<Self::Step>;

    /// Remove a key. Removing a missing key is a no-op reported with `changed = false`
    fn delete(&mut self, key: &K) -> Outcome<Self::Step>;

    fn search(&self, key: &K) -> Lookup<Self::Step>;

    /// Same as `search`, without recording a trace
    fn contains(&self, key: &K) -> bool;

    /// Number of keys present
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of node levels (0 for an empty index)
    fn height(&self) -> usize;

    /// Shape of the whole index, `None` when empty
    fn snapshot(&self) -> Option<Self::View>;

    /// All keys in ascending order
    fn sorted_keys(&self) -> Vec<&K>;
}
