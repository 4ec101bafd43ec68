use crate::domain::ports::errors::EngineError;
use async_trait::async_trait;
use std::path::Path;

/// Port for the external AI coding actor.
///
/// The actor is a black box invoked with a single text instruction and a
/// working directory; it runs to completion or failure. Its combined output
/// may interleave diagnostic preamble, tool-call traces and thinking text with
/// the answer, so consumers that expect structure go through
/// [`crate::services::extraction`] rather than trusting the raw transcript.
#[async_trait]
pub trait Actor: Send + Sync {
    /// Stable name for logs (e.g. `claude-code`).
    fn name(&self) -> &str;

    /// Run the actor to completion with the given instruction payload.
    ///
    /// Returns the raw combined transcript. Abnormal exit maps to
    /// [`EngineError::ActionFailed`].
    async fn invoke(&self, prompt: &str, workdir: &Path) -> Result<String, EngineError>;
}
