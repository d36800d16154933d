use std::collections::HashMap;

use crate::model::Mapping;
use crate::store::{MappingStore, StoreError};

/// Destination-keyed view of the store's current mappings.
///
/// Ephemeral: built at the start of one merge or prune call and discarded
/// with it. The store is the record of truth and may be mutated by other
/// actors between calls, so an index is never reused across top-level
/// invocations.
#[derive(Debug, Default)]
pub struct MappingIndex {
    by_destination: HashMap<String, String>,
}

impl MappingIndex {
    /// Snapshot the store's full mapping set, keyed by destination.
    pub fn build(store: &dyn MappingStore) -> Result<Self, StoreError> {
        Ok(Self::from_mappings(store.list_mappings()?))
    }

    pub fn from_mappings(mappings: impl IntoIterator<Item = Mapping>) -> Self {
        let by_destination = mappings
            .into_iter()
            .map(|m| (m.destination, m.source))
            .collect();
        Self { by_destination }
    }

    /// Source currently bound to `destination`, if any.
    pub fn lookup(&self, destination: &str) -> Option<&str> {
        self.by_destination.get(destination).map(String::as_str)
    }

    /// Record an accepted mutation so later records in the same batch
    /// observe it without re-querying the store.
    pub fn bind(&mut self, source: &str, destination: &str) {
        self.by_destination
            .insert(destination.to_string(), source.to_string());
    }

    pub fn len(&self) -> usize {
        self.by_destination.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_destination.is_empty()
    }
}
