//! Command implementations for the `chanmap` binary.
//!
//! Human-readable reporting goes to stderr; `--json` emits the structured
//! per-file reports on stdout.

use std::path::{Path, PathBuf};

use serde::Serialize;

use chanmap_io::{read_mapping_file, resolve_files, IoError};
use chanmap_recon::{apply, clear_all, prune, Mapping, MappingStore, MergeReport, PruneReport, RecordOutcome};
use chanmap_store::SqliteStore;

use crate::exit_codes::{EXIT_IO, EXIT_PARSE, EXIT_SKIPPED, EXIT_STORE, EXIT_USAGE};

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self { code: EXIT_PARSE, message: msg.into(), hint: None }
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self { code: EXIT_STORE, message: msg.into(), hint: None }
    }

    /// Non-zero exit with nothing further to print (the summary already
    /// went to stderr).
    fn silent(code: u8) -> Self {
        Self { code, message: String::new(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn io_err(e: IoError) -> CliError {
    match e {
        IoError::BadRecord { .. } => CliError::parse(e.to_string()),
        _ => CliError::io(e.to_string()),
    }
}

fn open_store(path: &Path) -> Result<SqliteStore, CliError> {
    SqliteStore::open(path)
        .map_err(|e| CliError::store(format!("cannot open store {}: {e}", path.display())))
}

/// One parsed mapping file, ready to reconcile.
struct FileSet {
    path: PathBuf,
    mappings: Vec<Mapping>,
}

/// Resolve and parse every mapping file under `path`.
///
/// All files are parsed before anything touches the store: a malformed
/// file aborts the whole invocation with no partial application.
fn load_file_sets(path: &Path) -> Result<Vec<FileSet>, CliError> {
    let files = resolve_files(path).map_err(io_err)?;
    let mut sets = Vec::with_capacity(files.len());
    for file in files {
        let mappings = read_mapping_file(&file).map_err(io_err)?;
        sets.push(FileSet { path: file, mappings });
    }
    Ok(sets)
}

// ---------------------------------------------------------------------------
// import
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct FileMergeReport {
    file: String,
    #[serde(flatten)]
    report: MergeReport,
}

pub fn cmd_import(store_path: &Path, path: &Path, json: bool) -> Result<(), CliError> {
    let sets = load_file_sets(path)?;
    let mut store = open_store(store_path)?;

    let mut reports = Vec::with_capacity(sets.len());
    for set in &sets {
        eprintln!("importing mappings from {}", set.path.display());
        let report = apply(&mut store, &set.mappings)
            .map_err(|e| CliError::store(format!("{}: {e}", set.path.display())))?;

        for record in report.skipped() {
            match &record.outcome {
                RecordOutcome::Conflict { bound_source } => eprintln!(
                    "conflict: {} already mapped from {} (file wants {})",
                    record.destination, bound_source, record.source
                ),
                RecordOutcome::Rejected { message } => eprintln!(
                    "rejected: {} -> {}: {message}",
                    record.source, record.destination
                ),
                _ => {}
            }
        }

        let s = &report.summary;
        eprintln!(
            "{}: {} records — {} applied, {} duplicates, {} conflicts, {} rejected",
            set.path.display(),
            s.total,
            s.applied,
            s.duplicates,
            s.conflicts,
            s.rejected,
        );

        reports.push(FileMergeReport {
            file: set.path.display().to_string(),
            report,
        });
    }

    if json {
        let json_str = serde_json::to_string_pretty(&reports)
            .map_err(|e| CliError::store(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    if reports.iter().all(|r| r.report.is_clean()) {
        Ok(())
    } else {
        Err(CliError::silent(EXIT_SKIPPED))
    }
}

// ---------------------------------------------------------------------------
// delete
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct FilePruneReport {
    file: String,
    #[serde(flatten)]
    report: PruneReport,
}

pub fn cmd_delete(store_path: &Path, path: &Path, json: bool) -> Result<(), CliError> {
    let sets = load_file_sets(path)?;
    let mut store = open_store(store_path)?;

    let mut reports = Vec::with_capacity(sets.len());
    for set in &sets {
        let report = prune(&mut store, &set.mappings)
            .map_err(|e| CliError::store(format!("{}: {e}", set.path.display())))?;
        eprintln!(
            "deleted {} mappings listed in {}",
            report.removed,
            set.path.display()
        );
        reports.push(FilePruneReport {
            file: set.path.display().to_string(),
            report,
        });
    }

    if json {
        let json_str = serde_json::to_string_pretty(&reports)
            .map_err(|e| CliError::store(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// clear
// ---------------------------------------------------------------------------

pub fn cmd_clear(store_path: &Path, yes: bool) -> Result<(), CliError> {
    if !yes {
        return Err(CliError::usage("clear removes every mapping in the store")
            .with_hint("re-run with --yes to confirm"));
    }

    let mut store = open_store(store_path)?;
    clear_all(&mut store).map_err(|e| CliError::store(e.to_string()))?;
    eprintln!("store cleared");
    Ok(())
}

// ---------------------------------------------------------------------------
// export
// ---------------------------------------------------------------------------

pub fn cmd_export(store_path: &Path, output: Option<&Path>) -> Result<(), CliError> {
    let store = open_store(store_path)?;
    let mappings = store
        .list_mappings()
        .map_err(|e| CliError::store(e.to_string()))?;

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(Vec::new());
    for mapping in &mappings {
        writer
            .write_record([mapping.source.as_str(), mapping.destination.as_str()])
            .map_err(|e| CliError::io(e.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| CliError::io(e.to_string()))?;

    match output {
        Some(path) => {
            std::fs::write(path, &bytes)
                .map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))?;
            eprintln!("wrote {} mappings to {}", mappings.len(), path.display());
        }
        None => {
            use std::io::Write;
            std::io::stdout()
                .write_all(&bytes)
                .map_err(|e| CliError::io(e.to_string()))?;
        }
    }

    Ok(())
}
