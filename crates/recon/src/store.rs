//! Store capability interface.
//!
//! The mapping store is an external, stateful service of record. The engine
//! addresses it through this narrow trait so the reconciliation logic stays
//! independent of the store's representation and tests can substitute an
//! in-memory fake.

use std::collections::HashSet;
use std::fmt;

use crate::model::Mapping;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Store-side validation failure; the batch continues past it.
    InvalidInput(String),
    /// Anything else. After one of these the engine can no longer assume
    /// its index agrees with the store, so the batch aborts.
    Other(i32),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::Other(code) => write!(f, "store error (code {code})"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Capabilities the engine needs from a mapping store.
///
/// Calls are blocking, bounded-time local calls; the engine drives them
/// from a single sequential actor and never interleaves operations.
pub trait MappingStore {
    /// Full current mapping set, in the store's own order.
    fn list_mappings(&self) -> Result<Vec<Mapping>, StoreError>;

    /// Add a single source→destination pair.
    fn add_mapping(&mut self, source: &str, destination: &str) -> Result<(), StoreError>;

    /// Remove every mapping whose destination appears in `destinations`.
    fn delete_mappings(&mut self, destinations: &[String]) -> Result<(), StoreError>;

    /// Remove every mapping the store holds.
    fn clear_all_mappings(&mut self) -> Result<(), StoreError>;
}

/// In-memory store. Stand-in for the real service in tests and dry runs;
/// applies the same destination-uniqueness rule a real store enforces.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    mappings: Vec<Mapping>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<S, D>(pairs: impl IntoIterator<Item = (S, D)>) -> Self
    where
        S: Into<String>,
        D: Into<String>,
    {
        Self {
            mappings: pairs
                .into_iter()
                .map(|(s, d)| Mapping::new(s, d))
                .collect(),
        }
    }

    /// Direct view of the held mappings, for assertions.
    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }
}

impl MappingStore for MemoryStore {
    fn list_mappings(&self) -> Result<Vec<Mapping>, StoreError> {
        Ok(self.mappings.clone())
    }

    fn add_mapping(&mut self, source: &str, destination: &str) -> Result<(), StoreError> {
        if source.is_empty() || destination.is_empty() {
            return Err(StoreError::InvalidInput("empty channel path".into()));
        }
        if self.mappings.iter().any(|m| m.destination == destination) {
            return Err(StoreError::InvalidInput(format!(
                "destination already mapped: {destination}"
            )));
        }
        self.mappings.push(Mapping::new(source, destination));
        Ok(())
    }

    fn delete_mappings(&mut self, destinations: &[String]) -> Result<(), StoreError> {
        let doomed: HashSet<&str> = destinations.iter().map(String::as_str).collect();
        self.mappings.retain(|m| !doomed.contains(m.destination.as_str()));
        Ok(())
    }

    fn clear_all_mappings(&mut self) -> Result<(), StoreError> {
        self.mappings.clear();
        Ok(())
    }
}
