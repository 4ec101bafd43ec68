//! Implementation of the `prmend resolve` command.

use anyhow::{Context, Result};

use crate::cli::output::{output, CommandOutput};
use crate::cli::types::ResolveArgs;
use crate::domain::ports::CommentStore;
use crate::infrastructure::actor::SubprocessActor;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::git::GitWorkspace;
use crate::infrastructure::github::GithubCommentStore;
use crate::services::ResolutionChecker;

#[derive(Debug, serde::Serialize)]
pub struct ResolveOutput {
    pub pr: String,
    pub dry_run: bool,
    pub checked: usize,
    pub resolved: usize,
    pub left_open: usize,
    pub failed: usize,
}

impl CommandOutput for ResolveOutput {
    fn to_human(&self) -> String {
        let verb = if self.dry_run { "would resolve" } else { "resolved" };
        format!(
            "{}: checked {} open thread(s), {verb} {}, left open {}, failed {}",
            self.pr, self.checked, self.resolved, self.left_open, self.failed
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: ResolveArgs, json_mode: bool) -> Result<()> {
    let mut config = ConfigLoader::load()?;
    if let Some(actor) = &args.actor {
        config.actor.command = actor.clone();
    }
    if !args.trusted_authors.is_empty() {
        config.run.trusted_authors = args.trusted_authors.clone();
    }
    ConfigLoader::validate(&config)?;

    let pr = super::parse_pr(&args.pr, args.repo.as_deref(), &config)?;

    let store = GithubCommentStore::new(&config.github)?;
    let actor = SubprocessActor::new(config.actor.clone());
    if !actor.is_available().await {
        anyhow::bail!(
            "actor '{}' is not runnable; install it or adjust actor.command",
            config.actor.command
        );
    }
    let root = std::env::current_dir().context("failed to get current directory")?;
    let workspace = GitWorkspace::new(root);

    // Resolution judges open threads against the PR head (the checker does
    // the checkout); it does not consult the ledger, the thread state on the
    // source is the record.
    let comments = store.fetch(&pr).await?;
    let candidates: Vec<_> = comments
        .into_iter()
        .filter(|c| !c.resolved)
        .filter(|c| {
            config.run.trusted_authors.is_empty()
                || config.run.trusted_authors.contains(&c.author)
        })
        .collect();

    let checker = ResolutionChecker::new(&store, &actor, &workspace, args.dry_run);
    let report = checker.run(&pr, &candidates).await?;

    let output_data = ResolveOutput {
        pr: pr.to_string(),
        dry_run: args.dry_run,
        checked: report.checked,
        resolved: report.resolved,
        left_open: report.left_open,
        failed: report.failed,
    };
    output(&output_data, json_mode);
    Ok(())
}
