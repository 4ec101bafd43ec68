//! Action executor: hands a cycle's eligible comments to the actor.

use crate::domain::models::Comment;
use crate::domain::ports::{Actor, EngineError};
use crate::services::prompts;
use std::path::Path;
use tracing::info;

/// Drives the external actor to fix a batch of comments.
///
/// One invocation per cycle: all comments go into a single instruction
/// payload, grouped by file. The executor never touches the ledger; marking
/// comments addressed is the caller's job and only happens after a successful
/// push.
pub struct FixExecutor<'a> {
    actor: &'a dyn Actor,
}

impl<'a> FixExecutor<'a> {
    pub fn new(actor: &'a dyn Actor) -> Self {
        Self { actor }
    }

    /// Run the actor over the batch, returning the raw transcript.
    pub async fn fix(
        &self,
        comments: &[Comment],
        workdir: &Path,
    ) -> Result<String, EngineError> {
        let prompt = prompts::fix_prompt(comments);
        info!(
            actor = self.actor.name(),
            comments = comments.len(),
            files = {
                let mut paths: Vec<&str> = comments.iter().map(|c| c.path.as_str()).collect();
                paths.sort_unstable();
                paths.dedup();
                paths.len()
            },
            "invoking actor to fix comment batch"
        );
        self.actor.invoke(&prompt, workdir).await
    }
}
