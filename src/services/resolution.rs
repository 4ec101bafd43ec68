//! Resolution mode: close out comments overtaken by subsequent changes.
//!
//! Instead of fixing, this mode asks the actor whether each still-open,
//! trust-filtered comment has already been addressed by commits made after it
//! was written. Nothing is recorded in the local ledger: resolution status
//! lives in the comment source itself, so a failed resolve is simply retried
//! on a future invocation.

use crate::domain::models::{Comment, PrRef, ResolveResult};
use crate::domain::ports::{Actor, CommentStore, EngineError, Workspace};
use crate::services::{extraction, prompts};
use tracing::{info, warn};

/// Outcome summary of one resolution pass, for CLI reporting.
#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct ResolutionReport {
    pub checked: usize,
    pub resolved: usize,
    pub left_open: usize,
    pub failed: usize,
}

pub struct ResolutionChecker<'a> {
    store: &'a dyn CommentStore,
    actor: &'a dyn Actor,
    workspace: &'a dyn Workspace,
    dry_run: bool,
}

impl<'a> ResolutionChecker<'a> {
    pub fn new(
        store: &'a dyn CommentStore,
        actor: &'a dyn Actor,
        workspace: &'a dyn Workspace,
        dry_run: bool,
    ) -> Self {
        Self {
            store,
            actor,
            workspace,
            dry_run,
        }
    }

    /// Judge a single comment against the current tree and history.
    ///
    /// Parse failures fail closed: an unverifiable thread stays open.
    pub async fn check(&self, comment: &Comment) -> Result<ResolveResult, EngineError> {
        let content = self.workspace.file_content(&comment.path).await?;
        let commits = self
            .workspace
            .commits_touching(&comment.path, comment.created_at)
            .await?;
        let prompt = prompts::resolve_prompt(comment, content.as_deref(), &commits);
        let transcript = self.actor.invoke(&prompt, self.workspace.root()).await?;

        match extraction::extract_last_fragment::<ResolveResult>(&transcript) {
            Ok(result) => Ok(result),
            Err(err) => {
                warn!(
                    comment_id = comment.id,
                    "resolution transcript unparsable, leaving thread open"
                );
                Ok(ResolveResult::not_addressed(&err.to_string()))
            }
        }
    }

    /// Run resolution over a pre-filtered set of comments.
    ///
    /// The working tree is put on the PR's head branch first; judging file
    /// content and history from some other branch could close threads that
    /// are still open on the PR.
    ///
    /// Reply and resolve are one logical action: when the reply lands but the
    /// resolve fails, the thread stays unresolved and a future invocation
    /// retries the pair.
    pub async fn run(
        &self,
        pr: &PrRef,
        comments: &[Comment],
    ) -> Result<ResolutionReport, EngineError> {
        self.workspace.checkout(pr).await?;

        let mut report = ResolutionReport::default();

        for comment in comments {
            report.checked += 1;
            let result = self.check(comment).await?;

            if !result.addressed {
                info!(
                    comment_id = comment.id,
                    explanation = %result.explanation,
                    "comment not yet addressed"
                );
                report.left_open += 1;
                continue;
            }

            let body = match &result.commit_sha {
                Some(sha) => format!(
                    "Addressed in {sha}: {} (closed automatically)",
                    result.explanation
                ),
                None => format!("{} (closed automatically)", result.explanation),
            };

            if self.dry_run {
                info!(
                    pr = %pr,
                    comment_id = comment.id,
                    reply = %body,
                    "dry-run: would reply and resolve"
                );
                report.resolved += 1;
                continue;
            }

            self.store.reply(&comment.thread_id, &body).await?;
            match self.store.resolve(&comment.thread_id).await {
                Ok(()) => {
                    info!(pr = %pr, comment_id = comment.id, "thread resolved");
                    report.resolved += 1;
                }
                Err(err) => {
                    // Reply landed but the thread stays open; retried later.
                    warn!(
                        pr = %pr,
                        comment_id = comment.id,
                        error = %err,
                        "reply posted but resolve failed, thread left open"
                    );
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}
