//! Validity classification of eligible comments.

use crate::domain::models::{Comment, Verdict};
use crate::domain::ports::{Actor, EngineError};
use crate::services::{extraction, prompts};
use std::path::Path;
use tracing::{debug, warn};

/// Asks the actor whether a comment is worth acting on.
///
/// Parse failures fail open: an unparsable transcript classifies the comment
/// as valid so a real bug is never lost to a parsing glitch. Actor process
/// failures propagate and abort the cycle.
pub struct ValidityClassifier<'a> {
    actor: &'a dyn Actor,
    verbose: bool,
}

impl<'a> ValidityClassifier<'a> {
    pub fn new(actor: &'a dyn Actor, verbose: bool) -> Self {
        Self { actor, verbose }
    }

    pub async fn classify(
        &self,
        comment: &Comment,
        workdir: &Path,
    ) -> Result<Verdict, EngineError> {
        let prompt = prompts::classify_prompt(comment);
        let transcript = self.actor.invoke(&prompt, workdir).await?;

        match extraction::extract_last_fragment::<Verdict>(&transcript) {
            Ok(verdict) => {
                debug!(
                    comment_id = comment.id,
                    valid = verdict.valid,
                    reason = %verdict.reason,
                    "classified comment"
                );
                Ok(verdict)
            }
            Err(err) => {
                if self.verbose {
                    warn!(
                        comment_id = comment.id,
                        transcript = %transcript,
                        "classifier transcript unparsable, failing open"
                    );
                } else {
                    warn!(
                        comment_id = comment.id,
                        "classifier transcript unparsable, failing open"
                    );
                }
                Ok(Verdict::fail_open(&err.to_string()))
            }
        }
    }
}
