//! The word multiset: insert, search and delete over an AVL tree.

use std::cmp::Ordering;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::{Promotion, TreeConfig};
use crate::node::{rebalance, Link, Node};
use crate::tokenize::validate_key;
use crate::{Error, Result};

/// How a deletion treats a key that is present more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Cancel a single insertion; the node goes away only when its count reaches zero.
    Decrement,
    /// Excise the node regardless of its count.
    ForceRemove,
}

/// Result of a successful deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    /// One instance was cancelled and `remaining` are still present.
    Decremented { remaining: usize },
    /// The key no longer exists in the tree.
    Removed,
}

/// A multiset of words kept in a height-balanced binary search tree.
///
/// `R` is the randomness source consulted when a node with two children is
/// removed under [`Promotion::Random`].
pub struct WordTree<R = StdRng> {
    pub(crate) root: Link,
    /// Distinct keys (nodes).
    pub(crate) len: usize,
    /// Sum of every node's count.
    pub(crate) total: usize,
    promotion: Promotion,
    rng: R,
}

impl WordTree<StdRng> {
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    pub fn with_config(config: TreeConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config.promotion, rng)
    }
}

impl<R> WordTree<R> {
    /// Build an empty tree around a caller-supplied randomness source.
    pub fn with_rng(promotion: Promotion, rng: R) -> Self {
        Self {
            root: None,
            len: 0,
            total: 0,
            promotion,
            rng,
        }
    }

    /// Number of distinct keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of insertions not yet cancelled, across all keys.
    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the whole tree, `0` when empty.
    #[inline]
    pub fn height(&self) -> u32 {
        crate::node::height(&self.root)
    }

    #[inline]
    pub fn root(&self) -> Option<&Node> {
        self.root.as_deref()
    }

    pub fn promotion(&self) -> Promotion {
        self.promotion
    }

    pub fn set_promotion(&mut self, promotion: Promotion) {
        self.promotion = promotion;
    }

    /// Find the node holding `key`.
    pub fn search(&self, key: &str) -> Option<&Node> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(node.key()) {
                Ordering::Greater => node.right(),
                Ordering::Less => node.left(),
                Ordering::Equal => return Some(node),
            };
        }
        None
    }

    /// Occurrence count of `key`, if present.
    pub fn count(&self, key: &str) -> Option<usize> {
        self.search(key).map(Node::count)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.search(key).is_some()
    }

    /// The minimum key.
    pub fn smallest(&self) -> Option<&Node> {
        self.root.as_deref().map(smallest_in)
    }

    /// The maximum key.
    pub fn largest(&self) -> Option<&Node> {
        self.root.as_deref().map(largest_in)
    }

    /// Insert one occurrence of `key`, returning its count afterwards.
    pub fn insert(&mut self, key: &str) -> Result<usize> {
        validate_key(key)?;
        let mut owned = String::new();
        owned
            .try_reserve_exact(key.len())
            .map_err(|_| Error::AllocationFailed { bytes: key.len() })?;
        owned.push_str(key);
        Ok(self.insert_validated(owned))
    }

    /// Like [`insert`](Self::insert) but reuses the caller's buffer as the node key.
    pub fn insert_owned(&mut self, key: String) -> Result<usize> {
        validate_key(&key)?;
        Ok(self.insert_validated(key))
    }

    fn insert_validated(&mut self, key: String) -> usize {
        let (root, count) = insert_node(self.root.take(), key);
        self.root = Some(root);
        if count == 1 {
            self.len += 1;
        }
        self.total += 1;
        count
    }

    /// Release every node. The tree stays usable.
    pub fn clear(&mut self) {
        // Iterative so that dropping never recurses through the nodes.
        let mut stack: Vec<Box<Node>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
        self.len = 0;
        self.total = 0;
    }
}

impl<R: Rng> WordTree<R> {
    /// Cancel one insertion of `key`.
    pub fn delete(&mut self, key: &str) -> Result<Deletion> {
        self.delete_with(key, DeleteMode::Decrement)
    }

    pub fn delete_with(&mut self, key: &str, mode: DeleteMode) -> Result<Deletion> {
        let Some(count) = self.count(key) else {
            return Err(Error::NotFound {
                key: key.to_owned(),
            });
        };

        let mut remover = Remover {
            promotion: self.promotion,
            rng: &mut self.rng,
            outcome: None,
        };
        self.root = remover.remove(self.root.take(), key, mode);

        let outcome = remover.outcome.unwrap_or(Deletion::Removed);
        match outcome {
            Deletion::Decremented { .. } => self.total -= 1,
            Deletion::Removed => {
                self.len -= 1;
                self.total -= count;
            }
        }
        Ok(outcome)
    }
}

// =============================================================================
// Insert
// =============================================================================

/// Insert `key` under `link`, returning the new subtree root and the key's count.
fn insert_node(link: Link, key: String) -> (Box<Node>, usize) {
    let Some(mut node) = link else {
        return (Node::leaf(key), 1);
    };

    let count = match key.as_str().cmp(node.key()) {
        Ordering::Greater => {
            let (child, count) = insert_node(node.right.take(), key);
            node.right = Some(child);
            count
        }
        Ordering::Less => {
            let (child, count) = insert_node(node.left.take(), key);
            node.left = Some(child);
            count
        }
        Ordering::Equal => {
            node.count += 1;
            node.count
        }
    };

    node.update_height();
    (rebalance(node), count)
}

// =============================================================================
// Delete
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Successor,
    Predecessor,
}

struct Remover<'a, R> {
    promotion: Promotion,
    rng: &'a mut R,
    /// Set by the first match only; the forced removal of a promoted
    /// neighbour must not overwrite it.
    outcome: Option<Deletion>,
}

impl<R: Rng> Remover<'_, R> {
    fn choose(&mut self) -> Side {
        match self.promotion {
            Promotion::Successor => Side::Successor,
            Promotion::Predecessor => Side::Predecessor,
            Promotion::Random => {
                if self.rng.gen_bool(0.5) {
                    Side::Successor
                } else {
                    Side::Predecessor
                }
            }
        }
    }

    fn record(&mut self, outcome: Deletion) {
        if self.outcome.is_none() {
            self.outcome = Some(outcome);
        }
    }

    fn remove(&mut self, link: Link, key: &str, mode: DeleteMode) -> Link {
        let mut node = link?;

        match key.cmp(node.key()) {
            Ordering::Greater => node.right = self.remove(node.right.take(), key, mode),
            Ordering::Less => node.left = self.remove(node.left.take(), key, mode),
            Ordering::Equal => {
                if node.count > 1 && mode == DeleteMode::Decrement {
                    node.count -= 1;
                    self.record(Deletion::Decremented {
                        remaining: node.count,
                    });
                    return Some(node);
                }
                self.record(Deletion::Removed);

                match (node.left.take(), node.right.take()) {
                    (None, None) => return None,
                    (Some(child), None) | (None, Some(child)) => return Some(child),
                    (Some(left), Some(right)) => {
                        node.left = Some(left);
                        node.right = Some(right);
                        self.promote(&mut node);
                    }
                }
            }
        }

        node.update_height();
        Some(rebalance(node))
    }

    /// Replace `node`'s data with a neighbour's, then excise that neighbour.
    fn promote(&mut self, node: &mut Node) {
        let side = self.choose();
        let donor = match side {
            Side::Successor => node.right.as_deref().map(smallest_in),
            Side::Predecessor => node.left.as_deref().map(largest_in),
        };
        let Some(donor) = donor else {
            return;
        };
        let (key, count) = (donor.key.clone(), donor.count);
        debug!(strategy = ?side, removed = %node.key, promoted = %key, "promoting neighbour");

        node.key = key;
        node.count = count;
        match side {
            Side::Successor => {
                let right = node.right.take();
                node.right = self.remove(right, &node.key, DeleteMode::ForceRemove);
            }
            Side::Predecessor => {
                let left = node.left.take();
                node.left = self.remove(left, &node.key, DeleteMode::ForceRemove);
            }
        }
    }
}

fn smallest_in(mut node: &Node) -> &Node {
    while let Some(left) = node.left() {
        node = left;
    }
    node
}

fn largest_in(mut node: &Node) -> &Node {
    while let Some(right) = node.right() {
        node = right;
    }
    node
}

// =============================================================================
// Trait impls
// =============================================================================

impl Default for WordTree<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Drop for WordTree<R> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<R: Clone> Clone for WordTree<R> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            len: self.len,
            total: self.total,
            promotion: self.promotion,
            rng: self.rng.clone(),
        }
    }
}

impl<R> fmt::Debug for WordTree<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
