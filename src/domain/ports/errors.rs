//! Engine and persistence error taxonomies.

use thiserror::Error;

/// Database error types for the ledger repository
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Query failed: {0}")]
    QueryFailed(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    MigrationFailed(#[from] sqlx::migrate::MigrateError),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Failure taxonomy of the reconciliation engine.
///
/// Nothing here is retried within a cycle; the retry unit is the next
/// scheduled cycle (or the next invocation).
#[derive(Error, Debug)]
pub enum EngineError {
    /// The comment source could not be queried (network, auth, rate limit).
    /// Aborts the current cycle with the ledger preserved as-is.
    #[error("comment source unavailable: {0}")]
    SourceUnavailable(String),

    /// The external actor exited abnormally or produced unusable output.
    /// Aborts the cycle before any ledger mutation for the batch.
    #[error("action failed: {0}")]
    ActionFailed(String),

    /// Structured-output extraction failed. Callers fail open per component
    /// policy (classifier: valid, resolution checker: not addressed).
    #[error("structured output parse failure: {0}")]
    ParseFailure(String),

    /// A ledger write failed. Fatal: the process must not proceed with an
    /// unpersisted state change believed to have happened.
    #[error("ledger persistence failed: {0}")]
    Persistence(#[from] DatabaseError),

    /// A git/checkout operation failed (push rejection included).
    #[error("workspace operation failed: {0}")]
    Workspace(String),
}
