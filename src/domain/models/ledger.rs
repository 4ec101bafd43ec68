//! The durable per-PR progress ledger.
//!
//! The ledger is what makes repeated invocations idempotent: a comment
//! identifier recorded as addressed or ignored is never eligible again, and the
//! mutation API is append-only so the sets can only grow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Durable record for one (owner, repo, PR-number) tuple.
///
/// Loaded at the start of every invocation and persisted after every
/// state-changing step. Unknown or malformed persisted fields load as empty
/// rather than failing, so newer binaries can always open older ledgers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    /// Comment ids whose fix has been committed and pushed.
    #[serde(default)]
    pub addressed: BTreeSet<u64>,

    /// Comment ids dismissed as invalid by the classifier.
    #[serde(default)]
    pub ignored: BTreeSet<u64>,

    /// Append-only history of completed cycles.
    #[serde(default)]
    pub runs: Vec<RunRecord>,

    #[serde(default)]
    pub last_run_at: Option<DateTime<Utc>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this id has already been handled, in either direction.
    ///
    /// An id present in both sets (possible in historical data) is simply
    /// processed; no attempt is made to reconcile the overlap.
    pub fn is_processed(&self, id: u64) -> bool {
        self.addressed.contains(&id) || self.ignored.contains(&id)
    }

    /// Record ids as addressed. Append-only: existing entries are kept.
    pub fn mark_addressed(&mut self, ids: impl IntoIterator<Item = u64>) {
        self.addressed.extend(ids);
    }

    /// Record ids as ignored. Append-only: existing entries are kept.
    pub fn mark_ignored(&mut self, ids: impl IntoIterator<Item = u64>) {
        self.ignored.extend(ids);
    }

    /// Append a run record and bump the last-run timestamp.
    pub fn record_run(&mut self, record: RunRecord) {
        self.last_run_at = Some(record.started_at);
        self.runs.push(record);
    }
}

/// Immutable summary of one completed reconciliation cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub started_at: DateTime<Utc>,
    pub eligible_count: u64,
    pub addressed_count: u64,
    pub commit_sha: Option<String>,
}
