use thiserror::Error;

/// Errors surfaced by tree operations and their input collaborators.
#[derive(Error, Debug)]
pub enum Error {
    /// Search or delete on a key that is not in the tree
    #[error("'{key}' not found")]
    NotFound { key: String },

    /// Empty keys are rejected before reaching the tree
    #[error("key must not be empty")]
    EmptyKey,

    /// Keys are printable text with no whitespace or control characters
    #[error("invalid key {key:?}: whitespace and control characters are not allowed")]
    InvalidKey { key: String },

    /// The buffer for a new node's key could not be reserved
    #[error("not enough memory to store a {bytes}-byte key")]
    AllocationFailed { bytes: usize },

    #[error("unknown {name} '{value}'")]
    InvalidSetting { name: &'static str, value: String },

    #[error("'{name}' is not a directory in the current listing")]
    NotADirectory { name: String },

    #[error("'{name}' is not a *.txt file in the current listing")]
    NotATextFile { name: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
