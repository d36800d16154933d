//! Prune engine and full reset.

use std::collections::HashSet;

use crate::model::Mapping;
use crate::report::{PruneReport, ReportMeta};
use crate::store::{MappingStore, StoreError};

/// Remove the exact-match intersection of `mappings` and the store.
///
/// A pair is removed only when both source and destination match verbatim:
/// a destination rebound to a different source since the file was written
/// is left alone. Pairs in the file but absent from the store are silently
/// ignored. Matching destinations are collected in file order and removed
/// with a single bulk request.
pub fn prune(
    store: &mut dyn MappingStore,
    mappings: &[Mapping],
) -> Result<PruneReport, StoreError> {
    let current: HashSet<Mapping> = store.list_mappings()?.into_iter().collect();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut destinations = Vec::new();
    for mapping in mappings {
        if current.contains(mapping) && seen.insert(mapping.destination.as_str()) {
            destinations.push(mapping.destination.clone());
        }
    }

    if !destinations.is_empty() {
        store.delete_mappings(&destinations)?;
    }

    Ok(PruneReport {
        meta: ReportMeta::now(),
        removed: destinations.len(),
        destinations,
    })
}

/// Unconditionally remove every mapping the store holds.
///
/// Pure delegation, no index. Irreversible; callers own the confirmation
/// step.
pub fn clear_all(store: &mut dyn MappingStore) -> Result<(), StoreError> {
    store.clear_all_mappings()
}
