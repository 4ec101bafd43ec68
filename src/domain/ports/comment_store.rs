use crate::domain::models::{Comment, PrRef};
use crate::domain::ports::errors::EngineError;
use async_trait::async_trait;

/// Port for the review-comment source system.
///
/// `fetch` returns exactly one [`Comment`] per open review thread on the PR:
/// the thread's originating remark, annotated with the thread's current
/// resolved status. Failures surface as
/// [`EngineError::SourceUnavailable`] and are never retried here.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Fetch the current full set of review-thread comments for a PR.
    async fn fetch(&self, pr: &PrRef) -> Result<Vec<Comment>, EngineError>;

    /// Post a reply on a review thread.
    async fn reply(&self, thread_id: &str, body: &str) -> Result<(), EngineError>;

    /// Mark a review thread resolved.
    async fn resolve(&self, thread_id: &str) -> Result<(), EngineError>;
}
