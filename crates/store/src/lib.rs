//! `chanmap-store` — SQLite-backed implementation of the mapping store.
//!
//! The engine only ever sees the `MappingStore` trait; this crate gives the
//! CLI a concrete, persistent store to hand it.

mod sqlite;

pub use sqlite::SqliteStore;
