use serde::Serialize;

// ---------------------------------------------------------------------------
// Per-record outcomes
// ---------------------------------------------------------------------------

/// What happened to one record of a merge batch.
///
/// Skips are data, not errors: conflicts and rejections ride along in the
/// report so every one can be surfaced with enough context for an operator
/// to fix the input file and re-run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecordOutcome {
    /// Pair added to the store.
    Applied,
    /// Identical pair already present; nothing was sent to the store.
    Duplicate,
    /// Destination already bound to a different source; store untouched.
    Conflict { bound_source: String },
    /// Store-side validation rejected the pair.
    Rejected { message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordReport {
    pub source: String,
    pub destination: String,
    #[serde(flatten)]
    pub outcome: RecordOutcome,
}

// ---------------------------------------------------------------------------
// Batch reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub engine_version: String,
    pub run_at: String,
}

impl ReportMeta {
    pub(crate) fn now() -> Self {
        Self {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeSummary {
    pub total: usize,
    pub applied: usize,
    pub duplicates: usize,
    pub conflicts: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeReport {
    pub meta: ReportMeta,
    pub summary: MergeSummary,
    pub records: Vec<RecordReport>,
}

impl MergeReport {
    pub(crate) fn new(records: Vec<RecordReport>) -> Self {
        let mut summary = MergeSummary {
            total: records.len(),
            ..Default::default()
        };
        for record in &records {
            match record.outcome {
                RecordOutcome::Applied => summary.applied += 1,
                RecordOutcome::Duplicate => summary.duplicates += 1,
                RecordOutcome::Conflict { .. } => summary.conflicts += 1,
                RecordOutcome::Rejected { .. } => summary.rejected += 1,
            }
        }
        Self {
            meta: ReportMeta::now(),
            summary,
            records,
        }
    }

    /// True when every record applied or was a no-op duplicate.
    pub fn is_clean(&self) -> bool {
        self.summary.conflicts == 0 && self.summary.rejected == 0
    }

    /// Records that were skipped, for per-record operator reporting.
    pub fn skipped(&self) -> impl Iterator<Item = &RecordReport> {
        self.records.iter().filter(|r| {
            matches!(
                r.outcome,
                RecordOutcome::Conflict { .. } | RecordOutcome::Rejected { .. }
            )
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PruneReport {
    pub meta: ReportMeta,
    /// Count of mappings removed from the store.
    pub removed: usize,
    /// Destinations of the removed mappings, in file order.
    pub destinations: Vec<String>,
}
