//! Subprocess actor adapter.
//!
//! Shells out to an AI coding agent CLI (Claude Code by default). The CLI must
//! be installed and authenticated separately; the prompt goes in on stdin and
//! the combined transcript comes back from stdout.

use crate::domain::models::ActorConfig;
use crate::domain::ports::{Actor, EngineError};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::debug;

pub struct SubprocessActor {
    config: ActorConfig,
}

impl SubprocessActor {
    pub fn new(config: ActorConfig) -> Self {
        Self { config }
    }

    /// Check that the configured executable is runnable.
    pub async fn is_available(&self) -> bool {
        Command::new(&self.config.command)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

#[async_trait]
impl Actor for SubprocessActor {
    fn name(&self) -> &str {
        &self.config.command
    }

    async fn invoke(&self, prompt: &str, workdir: &Path) -> Result<String, EngineError> {
        debug!(
            command = %self.config.command,
            workdir = %workdir.display(),
            prompt_chars = prompt.len(),
            "spawning actor"
        );

        let mut child = Command::new(&self.config.command)
            .args(&self.config.args)
            .current_dir(workdir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                EngineError::ActionFailed(format!(
                    "failed to spawn {}: {e}",
                    self.config.command
                ))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::ActionFailed("no stdin handle".to_string()))?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::ActionFailed("no stdout handle".to_string()))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| EngineError::ActionFailed("no stderr handle".to_string()))?;

        let wait = timeout(Duration::from_secs(self.config.timeout_secs), async {
            // Feed stdin and drain both output pipes concurrently. Draining
            // sequentially can deadlock once the child fills a pipe buffer
            // the parent is not yet reading.
            let feed = async {
                stdin.write_all(prompt.as_bytes()).await.map_err(|e| {
                    EngineError::ActionFailed(format!("failed to write prompt: {e}"))
                })?;
                // Close stdin to signal end of input.
                drop(stdin);
                Ok::<_, EngineError>(())
            };
            let drain_out = async {
                let mut output = String::new();
                stdout.read_to_string(&mut output).await.map_err(|e| {
                    EngineError::ActionFailed(format!("failed to read output: {e}"))
                })?;
                Ok::<_, EngineError>(output)
            };
            let drain_err = async {
                let mut errors = String::new();
                stderr.read_to_string(&mut errors).await.map_err(|e| {
                    EngineError::ActionFailed(format!("failed to read stderr: {e}"))
                })?;
                Ok::<_, EngineError>(errors)
            };
            let ((), output, errors) = tokio::try_join!(feed, drain_out, drain_err)?;

            let status = child
                .wait()
                .await
                .map_err(|e| EngineError::ActionFailed(format!("failed to wait: {e}")))?;

            Ok::<_, EngineError>((output, errors, status))
        })
        .await;

        match wait {
            Ok(Ok((output, errors, status))) => {
                if !status.success() {
                    return Err(EngineError::ActionFailed(format!(
                        "{} exited with {:?}: {}",
                        self.config.command,
                        status.code(),
                        errors.trim()
                    )));
                }
                Ok(output)
            }
            Ok(Err(err)) => Err(err),
            Err(_) => {
                let _ = child.kill().await;
                Err(EngineError::ActionFailed(format!(
                    "{} timed out after {}s",
                    self.config.command, self.config.timeout_secs
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(command: &str, args: Vec<String>) -> SubprocessActor {
        SubprocessActor::new(ActorConfig {
            command: command.to_string(),
            args,
            timeout_secs: 5,
        })
    }

    #[tokio::test]
    async fn captures_stdout_of_successful_process() {
        let subject = actor("cat", vec![]);
        let output = subject.invoke("echo back", Path::new(".")).await.unwrap();
        assert_eq!(output, "echo back");
    }

    #[tokio::test]
    async fn large_stderr_does_not_stall_the_child() {
        // Floods stderr past the pipe buffer before echoing stdin; only
        // concurrent draining lets this finish inside the timeout.
        let subject = actor(
            "sh",
            vec![
                "-c".to_string(),
                "head -c 200000 /dev/zero | tr '\\0' e >&2; cat".to_string(),
            ],
        );
        let output = subject.invoke("still here", Path::new(".")).await.unwrap();
        assert_eq!(output, "still here");
    }

    #[tokio::test]
    async fn large_prompt_is_fed_while_output_streams() {
        let prompt = "x".repeat(200_000);
        let subject = actor("cat", vec![]);
        let output = subject.invoke(&prompt, Path::new(".")).await.unwrap();
        assert_eq!(output.len(), prompt.len());
    }

    #[tokio::test]
    async fn nonzero_exit_is_an_action_failure() {
        let subject = actor("false", vec![]);
        let err = subject.invoke("irrelevant", Path::new(".")).await.unwrap_err();
        assert!(matches!(err, EngineError::ActionFailed(_)));
    }

    #[tokio::test]
    async fn missing_executable_is_an_action_failure() {
        let subject = actor("definitely-not-installed-anywhere", vec![]);
        let err = subject.invoke("irrelevant", Path::new(".")).await.unwrap_err();
        assert!(matches!(err, EngineError::ActionFailed(_)));
    }
}
