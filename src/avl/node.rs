use super::{Direction, NodeView, RotationCase, Step};
use crate::trace::Tracer;
use std::cmp::{self, Ordering};
use std::collections::VecDeque;
use tracing::{debug, trace};

pub(super) type Link<K> = Option<Box<Node<K>>>;

#[derive(Debug, Clone)]
pub(super) struct Node<K> {
    pub(super) key: K,
    pub(super) height: u32,
    pub(super) left: Link<K>,
    pub(super) right: Link<K>,
}

/// Height of a possibly missing subtree
pub(super) fn height<K>(link: &Link<K>) -> u32 {
    link.as_ref().map_or(0, |node| node.height)
}

impl<K: Ord + Clone> Node<K> {
    fn leaf(key: K) -> Box<Self> {
        Box::new(Node {
            key,
            height: 1,
            left: None,
            right: None,
        })
    }

    /// Left height minus right height
    pub(super) fn balance(&self) -> i32 {
        height(&self.left) as i32 - height(&self.right) as i32
    }

    fn update_height(&mut self) {
        self.height = 1 + cmp::max(height(&self.left), height(&self.right));
    }

    pub(super) fn min_key(&self) -> &K {
        let mut node = self;
        while let Some(left) = &node.left {
            node = left;
        }
        &node.key
    }

    pub(super) fn max_key(&self) -> &K {
        let mut node = self;
        while let Some(right) = &node.right {
            node = right;
        }
        &node.key
    }

    pub(super) fn view(&self) -> NodeView<K> {
        NodeView {
            key: self.key.clone(),
            height: self.height,
            balance: self.balance(),
            left: self.left.as_ref().map(|left| Box::new(left.view())),
            right: self.right.as_ref().map(|right| Box::new(right.view())),
        }
    }
}

/// Recursive implementation of `AvlTree::insert`.
/// Return the (possibly new) root of this subtree and whether a node was created
pub(super) fn insert<K: Ord + Clone>(
    link: Link<K>,
    key: &K,
    tracer: &mut Tracer<Step<K>>,
) -> (Box<Node<K>>, bool) {
    let mut node = match link {
        None => {
            tracer.record(|| Step::Inserted { key: key.clone() });
            return (Node::leaf(key.clone()), true);
        }
        Some(node) => node,
    };

    let direction = match key.cmp(&node.key) {
        Ordering::Equal => {
            tracer.record(|| Step::Duplicate { key: key.clone() });
            return (node, false);
        }
        Ordering::Less => Direction::Left,
        Ordering::Greater => Direction::Right,
    };
    tracer.record(|| Step::Descend {
        at: node.key.clone(),
        direction,
    });

    let inserted = match direction {
        Direction::Left => {
            let (left, inserted) = insert(node.left.take(), key, tracer);
            node.left = Some(left);
            inserted
        }
        Direction::Right => {
            let (right, inserted) = insert(node.right.take(), key, tracer);
            node.right = Some(right);
            inserted
        }
    };
    if !inserted {
        return (node, false);
    }

    node.update_height();
    let balance = node.balance();
    tracer.record(|| Step::Balance {
        at: node.key.clone(),
        balance,
    });

    // The inserted key tells on which side of the child the new leaf hangs
    let case = if balance > 1 {
        node.left.as_ref().map(|left| {
            if *key < left.key {
                RotationCase::LeftLeft
            } else {
                RotationCase::LeftRight
            }
        })
    } else if balance < -1 {
        node.right.as_ref().map(|right| {
            if *key > right.key {
                RotationCase::RightRight
            } else {
                RotationCase::RightLeft
            }
        })
    } else {
        None
    };

    match case {
        Some(case) => (rebalance(node, case, tracer), true),
        None => (node, true),
    }
}

/// Recursive implementation of `AvlTree::delete`.
/// Return the (possibly empty) new root of this subtree and whether a key was removed
pub(super) fn delete<K: Ord + Clone>(
    link: Link<K>,
    key: &K,
    tracer: &mut Tracer<Step<K>>,
) -> (Link<K>, bool) {
    let mut node = match link {
        None => {
            tracer.record(|| Step::NotFound { key: key.clone() });
            return (None, false);
        }
        Some(node) => node,
    };

    let removed = match key.cmp(&node.key) {
        Ordering::Less => {
            tracer.record(|| Step::Descend {
                at: node.key.clone(),
                direction: Direction::Left,
            });
            let (left, removed) = delete(node.left.take(), key, tracer);
            node.left = left;
            removed
        }
        Ordering::Greater => {
            tracer.record(|| Step::Descend {
                at: node.key.clone(),
                direction: Direction::Right,
            });
            let (right, removed) = delete(node.right.take(), key, tracer);
            node.right = right;
            removed
        }
        Ordering::Equal => {
            tracer.record(|| Step::Found { key: key.clone() });
            match (node.left.take(), node.right.take()) {
                (None, child) | (child, None) => {
                    tracer.record(|| Step::Removed {
                        key: node.key.clone(),
                    });
                    return (child, true);
                }
                (Some(left), Some(right)) => {
                    // Copy the successor key here and remove it from the right subtree,
                    // where it sits in a node with at most one child
                    let successor = right.min_key().clone();
                    tracer.record(|| Step::Successor {
                        of: node.key.clone(),
                        successor: successor.clone(),
                    });
                    node.key = successor;
                    node.left = Some(left);
                    let (right, _) = delete(Some(right), &node.key, tracer);
                    node.right = right;
                    true
                }
            }
        }
    };
    if !removed {
        return (Some(node), false);
    }

    node.update_height();
    let balance = node.balance();
    tracer.record(|| Step::Balance {
        at: node.key.clone(),
        balance,
    });

    // No inserted key drives the choice here: look at the child's own balance instead
    let case = if balance > 1 {
        let left_balance = node.left.as_ref().map_or(0, |left| left.balance());
        Some(if left_balance >= 0 {
            RotationCase::LeftLeft
        } else {
            RotationCase::LeftRight
        })
    } else if balance < -1 {
        let right_balance = node.right.as_ref().map_or(0, |right| right.balance());
        Some(if right_balance <= 0 {
            RotationCase::RightRight
        } else {
            RotationCase::RightLeft
        })
    } else {
        None
    };

    match case {
        Some(case) => (Some(rebalance(node, case, tracer)), true),
        None => (Some(node), true),
    }
}

/// Apply the single or double rotation that fixes `case` at `node`
fn rebalance<K: Ord + Clone>(
    mut node: Box<Node<K>>,
    case: RotationCase,
    tracer: &mut Tracer<Step<K>>,
) -> Box<Node<K>> {
    tracer.record(|| Step::Rebalance {
        at: node.key.clone(),
        case,
    });
    debug!(?case, height = node.height, "rebalancing");

    match case {
        RotationCase::LeftLeft => rotate_right(node, tracer),
        RotationCase::RightRight => rotate_left(node, tracer),
        RotationCase::LeftRight => {
            node.left = node.left.take().map(|left| rotate_left(left, tracer));
            rotate_right(node, tracer)
        }
        RotationCase::RightLeft => {
            node.right = node.right.take().map(|right| rotate_right(right, tracer));
            rotate_left(node, tracer)
        }
    }
}

/// Move `z` down to the left: its right child `y` becomes the subtree root and
/// `y`'s left subtree is reparented under `z`.
/// A node without a right child is returned untouched
pub(super) fn rotate_left<K: Ord + Clone>(
    mut z: Box<Node<K>>,
    tracer: &mut Tracer<Step<K>>,
) -> Box<Node<K>> {
    let mut y = match z.right.take() {
        Some(y) => y,
        None => return z,
    };
    tracer.record(|| Step::Rotated {
        direction: Direction::Left,
        pivot: z.key.clone(),
        new_root: y.key.clone(),
    });

    z.right = y.left.take();
    z.update_height();
    y.left = Some(z);
    y.update_height();
    trace!(height = y.height, "rotated left");
    y
}

/// Mirror of `rotate_left`
pub(super) fn rotate_right<K: Ord + Clone>(
    mut z: Box<Node<K>>,
    tracer: &mut Tracer<Step<K>>,
) -> Box<Node<K>> {
    let mut y = match z.left.take() {
        Some(y) => y,
        None => return z,
    };
    tracer.record(|| Step::Rotated {
        direction: Direction::Right,
        pivot: z.key.clone(),
        new_root: y.key.clone(),
    });

    z.left = y.right.take();
    z.update_height();
    y.right = Some(z);
    y.update_height();
    trace!(height = y.height, "rotated right");
    y
}

pub(super) fn search<'a, K: Ord + Clone>(
    mut link: &'a Link<K>,
    key: &K,
    tracer: &mut Tracer<Step<K>>,
) -> Option<&'a K> {
    while let Some(node) = link {
        link = match key.cmp(&node.key) {
            Ordering::Equal => {
                tracer.record(|| Step::Found { key: key.clone() });
                return Some(&node.key);
            }
            Ordering::Less => {
                tracer.record(|| Step::Descend {
                    at: node.key.clone(),
                    direction: Direction::Left,
                });
                &node.left
            }
            Ordering::Greater => {
                tracer.record(|| Step::Descend {
                    at: node.key.clone(),
                    direction: Direction::Right,
                });
                &node.right
            }
        };
    }
    tracer.record(|| Step::NotFound { key: key.clone() });
    None
}

pub(super) fn pre_order<'a, K>(link: &'a Link<K>, keys: &mut Vec<&'a K>) {
    if let Some(node) = link {
        keys.push(&node.key);
        pre_order(&node.left, keys);
        pre_order(&node.right, keys);
    }
}

pub(super) fn post_order<'a, K>(link: &'a Link<K>, keys: &mut Vec<&'a K>) {
    if let Some(node) = link {
        post_order(&node.left, keys);
        post_order(&node.right, keys);
        keys.push(&node.key);
    }
}

pub(super) fn level_order<'a, K>(link: &'a Link<K>, keys: &mut Vec<&'a K>) {
    let mut queue: VecDeque<&'a Node<K>> = link.iter().map(|node| &**node).collect();
    while let Some(node) = queue.pop_front() {
        keys.push(&node.key);
        queue.extend(node.left.as_deref());
        queue.extend(node.right.as_deref());
    }
}

/// Check heights, balance factors and strict ordering below `link`, with keys bounded
/// by the open interval (`lower`, `upper`). Return the subtree height
#[cfg(test)]
pub(super) fn assert_invariants<K: Ord + Clone + std::fmt::Debug>(
    link: &Link<K>,
    lower: Option<&K>,
    upper: Option<&K>,
) -> u32 {
    match link {
        None => 0,
        Some(node) => {
            if let Some(lower) = lower {
                assert!(node.key > *lower, "{:?} not above {:?}", node.key, lower);
            }
            if let Some(upper) = upper {
                assert!(node.key < *upper, "{:?} not below {:?}", node.key, upper);
            }
            let left = assert_invariants(&node.left, lower, Some(&node.key));
            let right = assert_invariants(&node.right, Some(&node.key), upper);
            assert_eq!(node.height, 1 + cmp::max(left, right), "at {:?}", node.key);
            assert!(
                (left as i32 - right as i32).abs() <= 1,
                "unbalanced at {:?}",
                node.key
            );
            node.height
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn build(keys: &[i32]) -> Link<i32> {
        let mut root = None;
        for key in keys {
            let mut tracer = Tracer::new(false);
            root = Some(insert(root, key, &mut tracer).0);
        }
        root
    }

    fn insert_traced(root: Link<i32>, key: i32) -> (Link<i32>, Vec<Step<i32>>) {
        let mut tracer = Tracer::new(true);
        let (root, inserted) = insert(root, &key, &mut tracer);
        assert!(inserted);
        (Some(root), tracer.outcome(true).trace)
    }

    fn shape(link: &Link<i32>) -> String {
        match link {
            None => "-".to_string(),
            Some(node) if node.left.is_none() && node.right.is_none() => node.key.to_string(),
            Some(node) => format!(
                "{}({} {})",
                node.key,
                shape(&node.left),
                shape(&node.right)
            ),
        }
    }

    fn rebalance_cases(trace: &[Step<i32>]) -> Vec<RotationCase> {
        trace
            .iter()
            .filter_map(|step| match step {
                Step::Rebalance { case, .. } => Some(*case),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn rotations() {
        let mut tracer = Tracer::new(true);
        let root = Box::new(Node {
            key: 1,
            height: 3,
            left: None,
            right: Some(Box::new(Node {
                key: 2,
                height: 2,
                left: None,
                right: Some(Node::leaf(3)),
            })),
        });

        let root = rotate_left(root, &mut tracer);
        assert_eq!(shape(&Some(root.clone())), "2(1 3)");
        assert_eq!(root.height, 2);

        let root = rotate_right(root, &mut tracer);
        assert_eq!(shape(&Some(root.clone())), "1(- 2(- 3))");
        assert_eq!(root.height, 3);
        assert_eq!(
            tracer.outcome(true).trace,
            vec![
                Step::Rotated {
                    direction: Direction::Left,
                    pivot: 1,
                    new_root: 2
                },
                Step::Rotated {
                    direction: Direction::Right,
                    pivot: 2,
                    new_root: 1
                },
            ]
        );
    }

    #[test]
    fn rotation_without_child_is_noop() {
        let mut tracer = Tracer::new(true);
        let root = rotate_left(Node::leaf(5), &mut tracer);
        let root = rotate_right(root, &mut tracer);
        assert_eq!(root.key, 5);
        assert!(tracer.outcome(false).trace.is_empty());
    }

    #[test]
    fn insert_cases() {
        let (root, trace) = insert_traced(build(&[30, 20]), 10);
        assert_eq!(shape(&root), "20(10 30)");
        assert_eq!(rebalance_cases(&trace), vec![RotationCase::LeftLeft]);

        let (root, trace) = insert_traced(build(&[30, 10]), 20);
        assert_eq!(shape(&root), "20(10 30)");
        assert_eq!(rebalance_cases(&trace), vec![RotationCase::LeftRight]);

        let (root, trace) = insert_traced(build(&[10, 20]), 30);
        assert_eq!(shape(&root), "20(10 30)");
        assert_eq!(rebalance_cases(&trace), vec![RotationCase::RightRight]);

        let (root, trace) = insert_traced(build(&[10, 30]), 20);
        assert_eq!(shape(&root), "20(10 30)");
        assert_eq!(rebalance_cases(&trace), vec![RotationCase::RightLeft]);
    }

    #[test]
    fn insert_trace() {
        let (_, trace) = insert_traced(build(&[20, 10]), 15);
        assert_eq!(
            trace,
            vec![
                Step::Descend {
                    at: 20,
                    direction: Direction::Left
                },
                Step::Descend {
                    at: 10,
                    direction: Direction::Right
                },
                Step::Inserted { key: 15 },
                Step::Balance { at: 10, balance: -1 },
                Step::Balance { at: 20, balance: 2 },
                Step::Rebalance {
                    at: 20,
                    case: RotationCase::LeftRight
                },
                Step::Rotated {
                    direction: Direction::Left,
                    pivot: 10,
                    new_root: 15
                },
                Step::Rotated {
                    direction: Direction::Right,
                    pivot: 20,
                    new_root: 15
                },
            ]
        );
    }

    #[test]
    fn duplicate_leaves_node_untouched() {
        let root = build(&[2, 1, 3]);
        let mut tracer = Tracer::new(true);
        let (root, inserted) = insert(root, &1, &mut tracer);
        assert!(!inserted);
        assert_eq!(shape(&Some(root)), "2(1 3)");
        assert_eq!(
            tracer.outcome(false).trace.last(),
            Some(&Step::Duplicate { key: 1 })
        );
    }

    #[test]
    fn delete_cases() {
        let mut tracer = Tracer::new(true);

        // Left child balanced: single rotation suffices
        let (root, removed) = delete(build(&[20, 10, 30, 5, 15]), &30, &mut tracer);
        assert!(removed);
        assert_eq!(shape(&root), "10(5 20(15 -))");

        // Left child leaning right: double rotation
        let (root, _) = delete(build(&[20, 10, 30, 15]), &30, &mut tracer);
        assert_eq!(shape(&root), "15(10 20)");

        let (root, _) = delete(build(&[10, 5, 20, 15, 25]), &5, &mut tracer);
        assert_eq!(shape(&root), "20(10(- 15) 25)");

        let (root, _) = delete(build(&[10, 5, 20, 15]), &5, &mut tracer);
        assert_eq!(shape(&root), "15(10 20)");

        assert_eq!(
            rebalance_cases(&tracer.outcome(true).trace),
            vec![
                RotationCase::LeftLeft,
                RotationCase::LeftRight,
                RotationCase::RightRight,
                RotationCase::RightLeft
            ]
        );
    }

    #[test]
    fn delete_with_two_children_copies_successor() {
        let mut tracer = Tracer::new(true);
        let (root, removed) = delete(build(&[50, 30, 70, 20, 40, 60, 80]), &50, &mut tracer);
        assert!(removed);
        assert_eq!(shape(&root), "60(30(20 40) 70(- 80))");
        assert!(tracer.outcome(true).trace.contains(&Step::Successor {
            of: 50,
            successor: 60
        }));
    }

    #[test]
    fn delete_missing() {
        let mut tracer = Tracer::new(true);
        let (root, removed) = delete(build(&[2, 1, 3]), &4, &mut tracer);
        assert!(!removed);
        assert_eq!(shape(&root), "2(1 3)");

        let (root, removed) = delete(None, &4, &mut tracer);
        assert!(!removed);
        assert!(root.is_none());
    }

    #[test]
    fn traversals() {
        fn collect(
            root: &Link<i32>,
            walk: for<'a> fn(&'a Link<i32>, &mut Vec<&'a i32>),
        ) -> Vec<i32> {
            let mut keys = Vec::new();
            walk(root, &mut keys);
            keys.into_iter().cloned().collect()
        }

        let root = build(&[4, 2, 6, 1, 3, 5, 7]);
        assert_eq!(collect(&root, pre_order), vec![4, 2, 1, 3, 6, 5, 7]);
        assert_eq!(collect(&root, post_order), vec![1, 3, 2, 5, 7, 6, 4]);
        assert_eq!(collect(&root, level_order), vec![4, 2, 6, 1, 3, 5, 7]);
    }
}
