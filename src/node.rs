//! Tree nodes and the AVL balancing primitives.
//!
//! Every mutating operation on [`WordTree`](crate::WordTree) funnels through the
//! helpers here: null-safe height lookup, balance factors, the two single
//! rotations, and the rebalance dispatcher that picks one of the four classic
//! repair patterns.

use tracing::debug;

/// An owned, possibly empty subtree.
pub(crate) type Link = Option<Box<Node>>;

/// One distinct key in the tree along with how many times it is present.
#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) key: String,
    pub(crate) count: usize,
    pub(crate) left: Link,
    pub(crate) right: Link,
    pub(crate) height: u32,
}

impl Node {
    /// A fresh leaf: count 1, height 1.
    pub(crate) fn leaf(key: String) -> Box<Self> {
        Box::new(Self {
            key,
            count: 1,
            left: None,
            right: None,
            height: 1,
        })
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Number of insertions of this key not yet cancelled by deletions.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Cached subtree height; a leaf has height 1.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn left(&self) -> Option<&Node> {
        self.left.as_deref()
    }

    #[inline]
    pub fn right(&self) -> Option<&Node> {
        self.right.as_deref()
    }

    /// `height(left) - height(right)`.
    #[inline]
    pub fn balance(&self) -> i32 {
        height(&self.left) as i32 - height(&self.right) as i32
    }

    #[inline]
    pub(crate) fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }
}

// =============================================================================
// Height & balance
// =============================================================================

/// Height of a subtree, `0` when empty.
#[inline]
pub(crate) fn height(link: &Link) -> u32 {
    link.as_ref().map_or(0, |node| node.height)
}

/// Balance factor of a subtree, `0` when empty.
#[inline]
pub(crate) fn balance(link: &Link) -> i32 {
    link.as_ref().map_or(0, |node| node.balance())
}

// =============================================================================
// Rotations
// =============================================================================

/// Rotate `x` left around its right child.
///
/// ```text
///    x             y
///   / \           / \
///  T1  y   -->   x  T3
///     / \       / \
///    T2 T3     T1 T2
/// ```
///
/// `x.right` must be present; without it the subtree is returned unchanged.
pub(crate) fn rotate_left(mut x: Box<Node>) -> Box<Node> {
    let Some(mut y) = x.right.take() else {
        debug_assert!(false, "rotate_left requires a right child");
        return x;
    };
    x.right = y.left.take();
    x.update_height();
    y.left = Some(x);
    y.update_height();
    y
}

/// Mirror image of [`rotate_left`]; `x.left` must be present.
pub(crate) fn rotate_right(mut x: Box<Node>) -> Box<Node> {
    let Some(mut y) = x.left.take() else {
        debug_assert!(false, "rotate_right requires a left child");
        return x;
    };
    x.left = y.right.take();
    x.update_height();
    y.right = Some(x);
    y.update_height();
    y
}

// =============================================================================
// Rebalance dispatch
// =============================================================================

/// The four shapes an AVL node can fall into after a single leaf-level change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Imbalance {
    LeftLeft,
    LeftRight,
    RightRight,
    RightLeft,
}

impl Imbalance {
    fn as_str(self) -> &'static str {
        match self {
            Imbalance::LeftLeft => "left-left",
            Imbalance::LeftRight => "left-right",
            Imbalance::RightRight => "right-right",
            Imbalance::RightLeft => "right-left",
        }
    }
}

/// Classify `node`, whose children already carry correct heights.
///
/// A heavy child with balance exactly 0 counts as the same-direction case.
pub(crate) fn classify(node: &Node) -> Option<Imbalance> {
    let balance = node.balance();
    if balance > 1 {
        if self::balance(&node.left) >= 0 {
            Some(Imbalance::LeftLeft)
        } else {
            Some(Imbalance::LeftRight)
        }
    } else if balance < -1 {
        if self::balance(&node.right) <= 0 {
            Some(Imbalance::RightRight)
        } else {
            Some(Imbalance::RightLeft)
        }
    } else {
        None
    }
}

/// Restore the AVL property at `node` and return the new subtree root.
pub(crate) fn rebalance(mut node: Box<Node>) -> Box<Node> {
    let Some(case) = classify(&node) else {
        return node;
    };
    debug!(case = case.as_str(), key = %node.key, "rebalancing");

    match case {
        Imbalance::LeftLeft => rotate_right(node),
        Imbalance::LeftRight => {
            node.left = node.left.take().map(rotate_left);
            rotate_right(node)
        }
        Imbalance::RightRight => rotate_left(node),
        Imbalance::RightLeft => {
            node.right = node.right.take().map(rotate_right);
            rotate_left(node)
        }
    }
}
