//! File-set resolution: a path argument names either one mapping file or a
//! directory of them.

use std::path::{Path, PathBuf};

use crate::error::IoError;

/// Expand `path` into the list of mapping files to parse.
///
/// A directory contributes every file entry, non-recursive. Directory
/// listing order is filesystem-defined, so callers must not depend on
/// cross-file ordering for conflict resolution; entries are sorted by name
/// to keep repeated runs deterministic. Subdirectory entries are skipped.
pub fn resolve_files(path: &Path) -> Result<Vec<PathBuf>, IoError> {
    let read_err = |e: std::io::Error| IoError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    if path.is_dir() {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(path).map_err(read_err)? {
            let entry_path = entry.map_err(read_err)?.path();
            if entry_path.is_file() {
                files.push(entry_path);
            }
        }
        files.sort();
        Ok(files)
    } else if path.is_file() {
        Ok(vec![path.to_path_buf()])
    } else {
        Err(IoError::NotFound {
            path: path.to_path_buf(),
        })
    }
}
