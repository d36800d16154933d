//! `chanmap-recon` — channel-mapping reconciliation engine.
//!
//! Pure engine crate: receives parsed mapping records and reconciles them
//! against a store addressed through the [`store::MappingStore`] capability
//! trait. No CLI or file-system dependencies.

pub mod index;
pub mod merge;
pub mod model;
pub mod prune;
pub mod report;
pub mod store;

pub use index::MappingIndex;
pub use merge::apply;
pub use model::Mapping;
pub use prune::{clear_all, prune};
pub use report::{MergeReport, PruneReport, RecordOutcome, RecordReport};
pub use store::{MappingStore, MemoryStore, StoreError};
