//! Key-token sources.
//!
//! Two flavours feed the tree: [`Words`] splits bulk text into alphabetic
//! runs for file import, and [`first_word`] pulls a single whitespace-delimited
//! token out of an interactive line.

use std::collections::VecDeque;
use std::io::{self, BufRead};

use crate::{Error, Result};

/// Reject keys the tree does not accept: empty, or containing whitespace or
/// control characters.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::EmptyKey);
    }
    if key.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(Error::InvalidKey {
            key: key.to_owned(),
        });
    }
    Ok(())
}

/// First whitespace-delimited token of `line`.
pub fn first_word(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}

/// Maximal runs of alphabetic characters read from `reader`.
///
/// Every non-alphabetic character, including digits and punctuation, is a
/// delimiter. Case is preserved.
pub fn words<R: BufRead>(reader: R) -> Words<R> {
    Words {
        reader,
        line: String::new(),
        pending: VecDeque::new(),
    }
}

pub struct Words<R> {
    reader: R,
    line: String,
    pending: VecDeque<String>,
}

impl<R: BufRead> Iterator for Words<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(word) = self.pending.pop_front() {
                return Some(Ok(word));
            }

            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return None,
                Ok(_) => self.pending.extend(
                    self.line
                        .split(|c: char| !c.is_alphabetic())
                        .filter(|w| !w.is_empty())
                        .map(str::to_owned),
                ),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
