//! Display printers and integrity checks.

use std::fmt::{self, Write};

use crate::config::Verbosity;
use crate::node::Node;
use crate::WordTree;

const LINE_SEP: &str = "-----------------------";

fn tabs(out: &mut impl Write, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        out.write_char('\t')?;
    }
    Ok(())
}

fn addr(node: Option<&Node>) -> String {
    match node {
        Some(node) => format!("{:p}", node),
        None => "null".to_owned(),
    }
}

impl<R> WordTree<R> {
    /// Render the tree sideways: the root on the left, larger keys above.
    pub fn render(&self, verbosity: Verbosity) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_view(&mut out, verbosity);
        out
    }

    pub fn write_view<W: Write>(&self, out: &mut W, verbosity: Verbosity) -> fmt::Result {
        match verbosity {
            Verbosity::Simple => self.write_simple(out),
            Verbosity::Verbose => self.write_verbose(out),
        }
    }

    fn write_simple<W: Write>(&self, out: &mut W) -> fmt::Result {
        if self.is_empty() {
            return writeln!(out, "Empty.");
        }
        for visit in self.traverse() {
            tabs(out, visit.depth)?;
            writeln!(out, "{}({})", visit.key(), visit.count())?;
        }
        Ok(())
    }

    fn write_verbose<W: Write>(&self, out: &mut W) -> fmt::Result {
        writeln!(out, "Tree is at {:p}", self)?;
        writeln!(out, "Tree's root is at {}", addr(self.root()))?;
        writeln!(
            out,
            "A Tree has size {} bytes | A Node has size {} bytes",
            std::mem::size_of::<Self>(),
            std::mem::size_of::<Node>()
        )?;
        writeln!(out, "{LINE_SEP}")?;

        let Some(root) = self.root() else {
            return writeln!(out, "Empty.");
        };

        for visit in self.traverse() {
            let node = visit.node;
            tabs(out, visit.depth)?;
            writeln!(
                out,
                "|Node[word={},count={},height={},balanceFactor={}]",
                node.key(),
                node.count(),
                node.height(),
                node.balance()
            )?;
            tabs(out, visit.depth)?;
            writeln!(out, "|Node is at {:p}", node)?;
            tabs(out, visit.depth)?;
            writeln!(out, "|Left child is at {}", addr(node.left()))?;
            tabs(out, visit.depth)?;
            writeln!(out, "|Right child is at {}", addr(node.right()))?;
        }
        writeln!(out, "{LINE_SEP}")?;

        let single = root.left().is_none() && root.right().is_none();
        write!(out, "In order, {}:", if single { "word is" } else { "words are" })?;
        for (key, _) in self.iter() {
            write!(out, " {key}")?;
        }
        writeln!(out)
    }

    /// Every broken invariant, one message each. Empty when the tree is sound.
    pub fn verify_integrity(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let mut nodes = 0usize;
        let mut total = 0usize;
        verify_node(
            self.root(),
            None,
            None,
            &mut issues,
            &mut nodes,
            &mut total,
        );
        if nodes != self.len {
            issues.push(format!("len is {} but {} nodes are reachable", self.len, nodes));
        }
        if total != self.total {
            issues.push(format!("total is {} but counts sum to {}", self.total, total));
        }
        issues
    }
}

/// Returns the actual height of the subtree under `link`.
fn verify_node(
    link: Option<&Node>,
    lower: Option<&str>,
    upper: Option<&str>,
    issues: &mut Vec<String>,
    nodes: &mut usize,
    total: &mut usize,
) -> u32 {
    let Some(node) = link else {
        return 0;
    };
    *nodes += 1;
    *total += node.count();

    if node.count() == 0 {
        issues.push(format!("'{}' has count 0", node.key()));
    }
    if lower.is_some_and(|lo| node.key() <= lo) || upper.is_some_and(|hi| node.key() >= hi) {
        issues.push(format!(
            "'{}' is out of order (bounds {:?}..{:?})",
            node.key(),
            lower,
            upper
        ));
    }

    let left = verify_node(node.left(), lower, Some(node.key()), issues, nodes, total);
    let right = verify_node(node.right(), Some(node.key()), upper, issues, nodes, total);

    let actual = 1 + left.max(right);
    if node.height() != actual {
        issues.push(format!(
            "'{}' caches height {} but has height {}",
            node.key(),
            node.height(),
            actual
        ));
    }
    let balance = left as i64 - right as i64;
    if balance.abs() > 1 {
        issues.push(format!("'{}' has balance factor {}", node.key(), balance));
    }
    actual
}
