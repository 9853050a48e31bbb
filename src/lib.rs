//! # avl-words
//!
//! A multiset of words with occurrence counts, kept in a height-balanced
//! (AVL) binary search tree so that insert, search and delete all run in
//! logarithmic time.
//!
//! ## Example
//!
//! ```rust
//! use avl_words::{Deletion, WordTree};
//!
//! let mut tree = WordTree::new();
//! tree.insert("cat").unwrap();
//! tree.insert("cat").unwrap();
//! tree.insert("dog").unwrap();
//!
//! assert_eq!(tree.count("cat"), Some(2));
//! assert_eq!(tree.delete("cat").unwrap(), Deletion::Decremented { remaining: 1 });
//! assert_eq!(tree.delete("cat").unwrap(), Deletion::Removed);
//! assert!(tree.delete("cat").is_err());
//!
//! let words: Vec<_> = tree.iter().collect();
//! assert_eq!(words, [("dog", 1)]);
//! ```

#![forbid(unsafe_code)]

pub mod browser;
pub mod config;
mod debug;
mod error;
pub mod import;
mod node;
pub mod shell;
pub mod tokenize;
mod traverse;
mod tree;

pub use config::{Promotion, TreeConfig, Verbosity};
pub use error::{Error, Result};
pub use node::Node;
pub use traverse::{Iter, Traverse, Visit};
pub use tree::{DeleteMode, Deletion, WordTree};

#[cfg(test)]
mod proptests;
