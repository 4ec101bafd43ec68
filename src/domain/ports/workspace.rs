use crate::domain::models::PrRef;
use crate::domain::ports::errors::EngineError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Port for the version-control working tree.
#[async_trait]
pub trait Workspace: Send + Sync {
    /// Root of the working tree handed to the actor.
    fn root(&self) -> &Path;

    /// Leave the working tree on the PR's head branch.
    async fn checkout(&self, pr: &PrRef) -> Result<(), EngineError>;

    /// Stage everything, commit and push.
    ///
    /// Returns the new commit sha, or `None` when there was nothing to commit.
    /// Push rejection fails loudly as [`EngineError::Workspace`].
    async fn commit_and_push(
        &self,
        message: &str,
        sign: bool,
    ) -> Result<Option<String>, EngineError>;

    /// Current content of a file, `None` when it no longer exists.
    async fn file_content(&self, path: &str) -> Result<Option<String>, EngineError>;

    /// One-line summaries of commits touching `path` since `since`.
    async fn commits_touching(
        &self,
        path: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<String>, EngineError>;
}
