//! Merge engine: apply a mapping set against the store.

use crate::index::MappingIndex;
use crate::model::Mapping;
use crate::report::{MergeReport, RecordOutcome, RecordReport};
use crate::store::{MappingStore, StoreError};

/// Apply `mappings` to the store in input order.
///
/// The index is consulted before every mutation and updated after every
/// accepted one, so a batch observes its own writes immediately: the first
/// record to claim a destination wins and later claimants report as
/// conflicts. An identical pair already present is a no-op duplicate and
/// never reaches the store. Store-rejected records are reported and the
/// batch continues; any unrecognized store error aborts the batch.
pub fn apply(
    store: &mut dyn MappingStore,
    mappings: &[Mapping],
) -> Result<MergeReport, StoreError> {
    let mut index = MappingIndex::build(store)?;
    let mut records = Vec::with_capacity(mappings.len());

    for mapping in mappings {
        let outcome = match index.lookup(&mapping.destination) {
            Some(bound) if bound != mapping.source.as_str() => RecordOutcome::Conflict {
                bound_source: bound.to_string(),
            },
            Some(_) => RecordOutcome::Duplicate,
            None => match store.add_mapping(&mapping.source, &mapping.destination) {
                Ok(()) => {
                    index.bind(&mapping.source, &mapping.destination);
                    RecordOutcome::Applied
                }
                Err(StoreError::InvalidInput(message)) => RecordOutcome::Rejected { message },
                Err(err) => return Err(err),
            },
        };

        records.push(RecordReport {
            source: mapping.source.clone(),
            destination: mapping.destination.clone(),
            outcome,
        });
    }

    Ok(MergeReport::new(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn pair(source: &str, destination: &str) -> Mapping {
        Mapping::new(source, destination)
    }

    /// Wraps a MemoryStore and counts mutation calls.
    struct CountingStore {
        inner: MemoryStore,
        adds: usize,
    }

    impl CountingStore {
        fn new(inner: MemoryStore) -> Self {
            Self { inner, adds: 0 }
        }
    }

    impl MappingStore for CountingStore {
        fn list_mappings(&self) -> Result<Vec<Mapping>, StoreError> {
            self.inner.list_mappings()
        }

        fn add_mapping(&mut self, source: &str, destination: &str) -> Result<(), StoreError> {
            self.adds += 1;
            self.inner.add_mapping(source, destination)
        }

        fn delete_mappings(&mut self, destinations: &[String]) -> Result<(), StoreError> {
            self.inner.delete_mappings(destinations)
        }

        fn clear_all_mappings(&mut self) -> Result<(), StoreError> {
            self.inner.clear_all_mappings()
        }
    }

    /// Lists a fixed mapping set and fails every mutation with `Other`.
    struct BrokenStore;

    impl MappingStore for BrokenStore {
        fn list_mappings(&self) -> Result<Vec<Mapping>, StoreError> {
            Ok(Vec::new())
        }

        fn add_mapping(&mut self, _source: &str, _destination: &str) -> Result<(), StoreError> {
            Err(StoreError::Other(5))
        }

        fn delete_mappings(&mut self, _destinations: &[String]) -> Result<(), StoreError> {
            Err(StoreError::Other(5))
        }

        fn clear_all_mappings(&mut self) -> Result<(), StoreError> {
            Err(StoreError::Other(5))
        }
    }

    #[test]
    fn applies_new_mappings_in_file_order() {
        let mut store = MemoryStore::new();
        let report = apply(
            &mut store,
            &[pair("eng/rpm", "dash/rpm"), pair("eng/temp", "dash/temp")],
        )
        .unwrap();

        assert_eq!(report.summary.applied, 2);
        assert!(report.is_clean());
        assert_eq!(
            store.mappings(),
            &[pair("eng/rpm", "dash/rpm"), pair("eng/temp", "dash/temp")]
        );
    }

    #[test]
    fn first_record_wins_within_a_batch() {
        let mut store = MemoryStore::new();
        let report = apply(
            &mut store,
            &[pair("eng/rpm", "dash/rpm"), pair("sim/rpm", "dash/rpm")],
        )
        .unwrap();

        assert_eq!(store.mappings(), &[pair("eng/rpm", "dash/rpm")]);
        assert_eq!(report.summary.applied, 1);
        assert_eq!(report.summary.conflicts, 1);
        assert_eq!(
            report.records[1].outcome,
            RecordOutcome::Conflict { bound_source: "eng/rpm".into() }
        );
    }

    #[test]
    fn conflict_leaves_existing_binding_untouched() {
        let mut store = MemoryStore::from_pairs([("eng/rpm", "dash/rpm")]);
        let report = apply(&mut store, &[pair("sim/rpm", "dash/rpm")]).unwrap();

        assert_eq!(report.summary.conflicts, 1);
        assert_eq!(store.mappings(), &[pair("eng/rpm", "dash/rpm")]);
    }

    #[test]
    fn identical_duplicate_never_reaches_the_store() {
        let mut store =
            CountingStore::new(MemoryStore::from_pairs([("eng/rpm", "dash/rpm")]));
        let report = apply(&mut store, &[pair("eng/rpm", "dash/rpm")]).unwrap();

        assert_eq!(report.summary.duplicates, 1);
        assert_eq!(store.adds, 0);
    }

    #[test]
    fn store_rejection_is_reported_and_batch_continues() {
        let mut store = MemoryStore::new();
        let report = apply(
            &mut store,
            &[pair("", "dash/rpm"), pair("eng/temp", "dash/temp")],
        )
        .unwrap();

        assert_eq!(report.summary.rejected, 1);
        assert_eq!(report.summary.applied, 1);
        assert!(matches!(
            report.records[0].outcome,
            RecordOutcome::Rejected { .. }
        ));
        assert_eq!(store.mappings(), &[pair("eng/temp", "dash/temp")]);
    }

    #[test]
    fn unknown_store_error_aborts_the_batch() {
        let mut store = BrokenStore;
        let err = apply(
            &mut store,
            &[pair("eng/rpm", "dash/rpm"), pair("eng/temp", "dash/temp")],
        )
        .unwrap_err();

        assert_eq!(err, StoreError::Other(5));
    }

    #[test]
    fn second_run_is_all_no_ops() {
        let set = vec![pair("eng/rpm", "dash/rpm"), pair("eng/temp", "dash/temp")];
        let mut store = MemoryStore::new();

        apply(&mut store, &set).unwrap();
        let before = store.mappings().to_vec();

        let second = apply(&mut store, &set).unwrap();
        assert_eq!(second.summary.applied, 0);
        assert_eq!(second.summary.duplicates, 2);
        assert_eq!(store.mappings(), before.as_slice());
    }
}
