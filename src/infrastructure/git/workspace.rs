//! Git working-tree adapter, shelling out to `git` and `gh`.

use crate::domain::models::PrRef;
use crate::domain::ports::{EngineError, Workspace};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// Working tree rooted at a local clone of the PR's repository.
pub struct GitWorkspace {
    root: PathBuf,
    git_path: String,
    gh_path: String,
}

impl GitWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            git_path: "git".to_string(),
            gh_path: "gh".to_string(),
        }
    }

    async fn run(&self, program: &str, args: &[&str]) -> Result<String, EngineError> {
        let output = Command::new(program)
            .args(args)
            .current_dir(&self.root)
            .output()
            .await
            .map_err(|e| EngineError::Workspace(format!("failed to spawn {program}: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::Workspace(format!(
                "{program} {} exited with {:?}: {}",
                args.join(" "),
                output.status.code(),
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl Workspace for GitWorkspace {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn checkout(&self, pr: &PrRef) -> Result<(), EngineError> {
        let repo = format!("{}/{}", pr.owner, pr.repo);
        let number = pr.number.to_string();
        info!(pr = %pr, "checking out PR head branch");
        self.run(&self.gh_path, &["pr", "checkout", &number, "--repo", &repo])
            .await?;
        Ok(())
    }

    async fn commit_and_push(
        &self,
        message: &str,
        sign: bool,
    ) -> Result<Option<String>, EngineError> {
        self.run(&self.git_path, &["add", "-A"]).await?;

        let status = self.run(&self.git_path, &["status", "--porcelain"]).await?;
        if status.trim().is_empty() {
            debug!("nothing to commit");
            return Ok(None);
        }

        let mut args = vec!["commit"];
        if sign {
            args.push("-S");
        }
        args.extend(["-m", message]);
        self.run(&self.git_path, &args).await?;

        // Push rejection must surface, never pass silently.
        self.run(&self.git_path, &["push"]).await?;

        let sha = self.run(&self.git_path, &["rev-parse", "HEAD"]).await?;
        let sha = sha.trim().to_string();
        info!(commit = %sha, "pushed fix commit");
        Ok(Some(sha))
    }

    async fn file_content(&self, path: &str) -> Result<Option<String>, EngineError> {
        match tokio::fs::read_to_string(self.root.join(path)).await {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(EngineError::Workspace(format!("reading {path}: {err}"))),
        }
    }

    async fn commits_touching(
        &self,
        path: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<String>, EngineError> {
        let since = since.to_rfc3339();
        let log = self
            .run(
                &self.git_path,
                &[
                    "log",
                    "--format=%h %s",
                    &format!("--since={since}"),
                    "--",
                    path,
                ],
            )
            .await?;
        Ok(log.lines().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_content_reports_missing_files_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = GitWorkspace::new(dir.path());
        assert!(workspace
            .file_content("does/not/exist.rs")
            .await
            .unwrap()
            .is_none());

        tokio::fs::write(dir.path().join("present.rs"), "fn x() {}")
            .await
            .unwrap();
        assert_eq!(
            workspace.file_content("present.rs").await.unwrap().as_deref(),
            Some("fn x() {}")
        );
    }

    #[tokio::test]
    async fn failed_commands_surface_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = GitWorkspace::new(dir.path());
        // Not a git repository, so rev-parse fails loudly.
        let err = workspace
            .run("git", &["rev-parse", "HEAD"])
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Workspace(_)));
    }
}
