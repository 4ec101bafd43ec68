use crate::domain::models::{Ledger, PrRef, RunRecord};
use crate::domain::ports::errors::DatabaseError;
use async_trait::async_trait;

/// Repository port for ledger persistence.
///
/// Every method is a durable checkpoint: once it returns `Ok`, a crash must
/// not lose the recorded state. Implementations only ever add identifiers and
/// append run records; nothing is removed.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Load the ledger for a PR, creating an empty one on first encounter.
    async fn load(&self, pr: &PrRef) -> Result<Ledger, DatabaseError>;

    /// Add ids to the addressed set.
    async fn mark_addressed(&self, pr: &PrRef, ids: &[u64]) -> Result<(), DatabaseError>;

    /// Add ids to the ignored set.
    async fn mark_ignored(&self, pr: &PrRef, ids: &[u64]) -> Result<(), DatabaseError>;

    /// Append a run record and update the last-run timestamp.
    async fn append_run(&self, pr: &PrRef, record: &RunRecord) -> Result<(), DatabaseError>;
}
