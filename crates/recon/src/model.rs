use std::fmt;

use serde::{Deserialize, Serialize};

/// A single channel mapping: `destination` takes its value from `source`.
///
/// Both fields are opaque hierarchical path identifiers owned by the target
/// system; the engine never looks inside them. One source may feed many
/// destinations, but a destination is bound to at most one source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mapping {
    pub source: String,
    pub destination: String,
}

impl Mapping {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.destination)
    }
}
