//! Implementation of the `prmend run` command.

use anyhow::{Context, Result};
use std::time::Duration;

use crate::application::{LoopReport, LoopSettings, ReconciliationLoop, WaitStrategy};
use crate::cli::output::{output, preview_table, run_history_table, CommandOutput};
use crate::cli::types::RunArgs;
use crate::domain::ports::Workspace;
use crate::infrastructure::actor::SubprocessActor;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::git::GitWorkspace;
use crate::infrastructure::github::GithubCommentStore;

#[derive(Debug, serde::Serialize)]
pub struct RunOutput {
    pub pr: String,
    pub dry_run: bool,
    #[serde(flatten)]
    pub report: LoopReport,
}

impl CommandOutput for RunOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![];
        if self.dry_run {
            lines.push(format!(
                "Dry run against {}: {} comment(s) would be fixed",
                self.pr,
                self.report.dry_run_preview.len()
            ));
            if !self.report.dry_run_preview.is_empty() {
                lines.push(preview_table(&self.report.dry_run_preview));
            }
        } else {
            lines.push(format!(
                "{}: {} cycle(s), {} comment(s) addressed, {} dismissed",
                self.pr, self.report.cycles, self.report.addressed, self.report.ignored
            ));
            if !self.report.runs.is_empty() {
                lines.push(run_history_table(&self.report.runs));
            }
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: RunArgs, json_mode: bool) -> Result<()> {
    let mut config = ConfigLoader::load()?;

    // CLI flags override file and environment configuration.
    if let Some(interval) = args.interval {
        config.run.interval_secs = interval;
    }
    if let Some(max_iterations) = args.max_iterations {
        config.run.max_iterations = max_iterations;
    }
    if let Some(actor) = &args.actor {
        config.actor.command = actor.clone();
    }
    if args.validate {
        config.run.validate = true;
    }
    if args.sign {
        config.run.sign_commits = true;
    }
    if !args.trusted_authors.is_empty() {
        config.run.trusted_authors = args.trusted_authors.clone();
    }
    if let Some(bot) = &args.wait_for_bot {
        config.run.wait_for_bot = Some(bot.clone());
    }
    if let Some(timeout) = args.bot_timeout {
        config.run.bot_timeout_secs = timeout;
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
    let ledgers = super::open_ledgers(&config).await?;

    workspace.checkout(&pr).await?;

    let wait = match &config.run.wait_for_bot {
        Some(login) => WaitStrategy::AwaitBot {
            login: login.clone(),
            poll_interval: Duration::from_secs(config.run.bot_poll_secs),
            timeout: Duration::from_secs(config.run.bot_timeout_secs),
        },
        None => WaitStrategy::FixedInterval(Duration::from_secs(config.run.interval_secs)),
    };
    let settings = LoopSettings {
        max_iterations: config.run.max_iterations,
        validate: config.run.validate,
        dry_run: args.dry_run,
        trusted_authors: if config.run.trusted_authors.is_empty() {
            None
        } else {
            Some(config.run.trusted_authors.clone())
        },
        sign_commits: config.run.sign_commits,
        verbose: args.verbose,
        wait,
    };

    let runner = ReconciliationLoop::new(&store, &actor, &workspace, &ledgers, settings);
    let report = runner.run(&pr).await?;

    let output_data = RunOutput {
        pr: pr.to_string(),
        dry_run: args.dry_run,
        report,
    };
    output(&output_data, json_mode);
    Ok(())
}
