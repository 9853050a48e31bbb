//! Tree and display configuration.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Which neighbour replaces a node with two children when it is removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Promotion {
    /// Fair coin flip between successor and predecessor on every removal.
    #[default]
    Random,
    /// Minimum key of the right subtree.
    Successor,
    /// Maximum key of the left subtree.
    Predecessor,
}

impl FromStr for Promotion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "successor" => Ok(Self::Successor),
            "predecessor" => Ok(Self::Predecessor),
            _ => Err(Error::InvalidSetting {
                name: "promotion",
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Random => "random",
            Self::Successor => "successor",
            Self::Predecessor => "predecessor",
        })
    }
}

/// How much the display printers reveal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// `word(count)` per node, indented by depth.
    #[default]
    Simple,
    /// Heights, balance factors and node addresses as well.
    Verbose,
}

impl FromStr for Verbosity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "verbose" => Ok(Self::Verbose),
            _ => Err(Error::InvalidSetting {
                name: "view",
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Simple => "simple",
            Self::Verbose => "verbose",
        })
    }
}

/// Configuration for a [`WordTree`](crate::WordTree).
#[derive(Debug, Clone, Default)]
pub struct TreeConfig {
    /// Two-child removal strategy
    pub promotion: Promotion,
    /// Seed for the generator behind [`Promotion::Random`]; `None` draws from entropy
    pub seed: Option<u64>,
}

impl TreeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn promotion(mut self, promotion: Promotion) -> Self {
        self.promotion = promotion;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
