// Mapping store on SQLite

use std::path::Path;

use rusqlite::{params, Connection};

use chanmap_recon::{Mapping, MappingStore, StoreError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS mappings (
    destination TEXT PRIMARY KEY,
    source TEXT NOT NULL
);
"#;

/// Mapping store persisted in a single SQLite file.
///
/// `rowid` ordering preserves insertion order for `list_mappings`, so an
/// export reads back in the order mappings were applied.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the store at `path`, creating it if absent.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(store_err)?;
        conn.execute_batch(SCHEMA).map_err(store_err)?;
        Ok(Self { conn })
    }

    /// Private in-memory store, handy in tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(store_err)?;
        conn.execute_batch(SCHEMA).map_err(store_err)?;
        Ok(Self { conn })
    }
}

/// Channel paths travel through tab-delimited files; a tab or newline in
/// one would corrupt that contract, so the store rejects them outright.
fn validate(what: &str, value: &str) -> Result<(), StoreError> {
    if value.is_empty() {
        return Err(StoreError::InvalidInput(format!("empty {what} path")));
    }
    if value.contains(['\t', '\n', '\r']) {
        return Err(StoreError::InvalidInput(format!(
            "{what} path contains control characters: {value:?}"
        )));
    }
    Ok(())
}

fn store_err(e: rusqlite::Error) -> StoreError {
    match e {
        rusqlite::Error::SqliteFailure(f, _) => StoreError::Other(f.extended_code),
        _ => StoreError::Other(-1),
    }
}

impl MappingStore for SqliteStore {
    fn list_mappings(&self) -> Result<Vec<Mapping>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT source, destination FROM mappings ORDER BY rowid")
            .map_err(store_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Mapping::new(
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                ))
            })
            .map_err(store_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(store_err)
    }

    fn add_mapping(&mut self, source: &str, destination: &str) -> Result<(), StoreError> {
        validate("source", source)?;
        validate("destination", destination)?;

        self.conn
            .execute(
                "INSERT INTO mappings (destination, source) VALUES (?1, ?2)",
                params![destination, source],
            )
            .map(|_| ())
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(f, _)
                    if f.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    StoreError::InvalidInput(format!(
                        "destination already mapped: {destination}"
                    ))
                }
                other => store_err(other),
            })
    }

    fn delete_mappings(&mut self, destinations: &[String]) -> Result<(), StoreError> {
        let tx = self.conn.transaction().map_err(store_err)?;
        {
            let mut stmt = tx
                .prepare("DELETE FROM mappings WHERE destination = ?1")
                .map_err(store_err)?;
            for destination in destinations {
                stmt.execute(params![destination]).map_err(store_err)?;
            }
        }
        tx.commit().map_err(store_err)
    }

    fn clear_all_mappings(&mut self) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM mappings", [])
            .map(|_| ())
            .map_err(store_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_list_preserves_insertion_order() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.add_mapping("eng/rpm", "dash/rpm").unwrap();
        store.add_mapping("eng/temp", "dash/temp").unwrap();

        let listed = store.list_mappings().unwrap();
        assert_eq!(
            listed,
            vec![
                Mapping::new("eng/rpm", "dash/rpm"),
                Mapping::new("eng/temp", "dash/temp"),
            ]
        );
    }

    #[test]
    fn rebinding_a_destination_is_invalid_input() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.add_mapping("eng/rpm", "dash/rpm").unwrap();

        let err = store.add_mapping("sim/rpm", "dash/rpm").unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));
        assert_eq!(store.list_mappings().unwrap().len(), 1);
    }

    #[test]
    fn paths_with_tabs_or_newlines_are_rejected() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert!(store.add_mapping("eng\trpm", "dash/rpm").is_err());
        assert!(store.add_mapping("eng/rpm", "dash\nrpm").is_err());
        assert!(store.add_mapping("", "dash/rpm").is_err());
    }

    #[test]
    fn delete_removes_only_named_destinations() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.add_mapping("a", "x").unwrap();
        store.add_mapping("b", "y").unwrap();
        store.add_mapping("c", "z").unwrap();

        store.delete_mappings(&["x".into(), "z".into()]).unwrap();
        assert_eq!(store.list_mappings().unwrap(), vec![Mapping::new("b", "y")]);
    }

    #[test]
    fn clear_empties_the_table() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.add_mapping("a", "x").unwrap();
        store.clear_all_mappings().unwrap();
        assert!(store.list_mappings().unwrap().is_empty());
    }

    #[test]
    fn mappings_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("store.db");

        {
            let mut store = SqliteStore::open(&db).unwrap();
            store.add_mapping("eng/rpm", "dash/rpm").unwrap();
        }

        let store = SqliteStore::open(&db).unwrap();
        assert_eq!(
            store.list_mappings().unwrap(),
            vec![Mapping::new("eng/rpm", "dash/rpm")]
        );
    }
}
