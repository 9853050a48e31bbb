//! Bulk import of text into a tree.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{info, trace};

use crate::tokenize::words;
use crate::{Result, WordTree};

/// What an import added to the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Tokens inserted
    pub words: usize,
    /// Tokens that created a new node
    pub added: usize,
}

/// Insert every alphabetic word of `reader` into `tree`.
///
/// On a read error the words inserted so far stay in the tree.
pub fn import_reader<R: BufRead, G>(tree: &mut WordTree<G>, reader: R) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();
    for word in words(reader) {
        let word = word?;
        trace!(word = %word, "importing");
        if tree.insert_owned(word)? == 1 {
            summary.added += 1;
        }
        summary.words += 1;
    }
    Ok(summary)
}

pub fn import_path<G>(tree: &mut WordTree<G>, path: impl AsRef<Path>) -> Result<ImportSummary> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let summary = import_reader(tree, BufReader::new(file))?;
    info!(
        path = %path.display(),
        words = summary.words,
        added = summary.added,
        "import finished"
    );
    Ok(summary)
}
