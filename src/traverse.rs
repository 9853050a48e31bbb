//! Non-mutating walks over a [`WordTree`].

use crate::node::Node;
use crate::WordTree;

/// One node as seen by [`WordTree::traverse`].
#[derive(Clone, Copy, Debug)]
pub struct Visit<'a> {
    pub node: &'a Node,
    /// Distance from the root; the root is at depth 0.
    pub depth: usize,
}

impl<'a> Visit<'a> {
    #[inline]
    pub fn key(&self) -> &'a str {
        self.node.key()
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.node.count()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.node.height()
    }

    #[inline]
    pub fn balance(&self) -> i32 {
        self.node.balance()
    }
}

/// Reverse in-order walk: right subtree, node, left subtree.
pub struct Traverse<'a> {
    stack: Vec<(&'a Node, usize)>,
}

impl<'a> Traverse<'a> {
    fn new(root: Option<&'a Node>) -> Self {
        let mut walk = Self { stack: Vec::new() };
        walk.push_right_spine(root, 0);
        walk
    }

    fn push_right_spine(&mut self, mut link: Option<&'a Node>, mut depth: usize) {
        while let Some(node) = link {
            self.stack.push((node, depth));
            link = node.right();
            depth += 1;
        }
    }
}

impl<'a> Iterator for Traverse<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        self.push_right_spine(node.left(), depth + 1);
        Some(Visit { node, depth })
    }
}

/// Ascending `(key, count)` iterator.
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iter<'a> {
    fn new(root: Option<&'a Node>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut link: Option<&'a Node>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = node.left();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right());
        Some((node.key(), node.count()))
    }
}

impl<R> WordTree<R> {
    /// Visit every node in descending key order along with its depth.
    ///
    /// Each call starts a fresh walk.
    pub fn traverse(&self) -> Traverse<'_> {
        Traverse::new(self.root())
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.root())
    }
}

impl<'a, R> IntoIterator for &'a WordTree<R> {
    type Item = (&'a str, usize);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
