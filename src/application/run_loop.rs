//! The reconciliation loop: fetch, filter, classify, act, persist, wait.
//!
//! One invocation runs at most `max_iterations` cycles, strictly sequentially.
//! The iteration budget guarantees termination even if new comments keep
//! appearing; bounded runtime is favored over exhaustive convergence. The
//! ledger is persisted at named checkpoints (classifier dismissals, addressed
//! ids after a push, run records) and never mid-step, so a crash resumes
//! cleanly from the last checkpoint.

use crate::domain::models::{Comment, Ledger, PrRef, RunRecord};
use crate::domain::ports::{Actor, CommentStore, EngineError, LedgerRepository, Workspace};
use crate::services::{eligibility, FixExecutor, ValidityClassifier};
use chrono::Utc;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// How the loop suspends between cycles.
#[derive(Debug, Clone)]
pub enum WaitStrategy {
    /// Sleep for a fixed interval.
    FixedInterval(Duration),

    /// Poll for a new comment from a review bot, giving up after `timeout`
    /// and continuing anyway. A timeout here is a missed optimization to
    /// re-check sooner, never a failure.
    AwaitBot {
        login: String,
        poll_interval: Duration,
        timeout: Duration,
    },
}

/// Invocation-scoped knobs for the loop.
#[derive(Debug, Clone)]
pub struct LoopSettings {
    pub max_iterations: u32,
    /// Run the validity classification stage before acting.
    pub validate: bool,
    /// Report what would happen without acting or mutating the ledger.
    pub dry_run: bool,
    /// Author allow-list; `None` means no restriction.
    pub trusted_authors: Option<Vec<String>>,
    pub sign_commits: bool,
    /// Log raw actor transcripts on extraction failures.
    pub verbose: bool,
    pub wait: WaitStrategy,
}

/// Loop phases, used for transition logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Fetching,
    Filtering,
    Classifying,
    Acting,
    Committing,
    Persisting,
    Waiting,
    Done,
    Aborted,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Fetching => "fetching",
            Phase::Filtering => "filtering",
            Phase::Classifying => "classifying",
            Phase::Acting => "acting",
            Phase::Committing => "committing",
            Phase::Persisting => "persisting",
            Phase::Waiting => "waiting",
            Phase::Done => "done",
            Phase::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Final summary of one invocation, for CLI reporting.
#[derive(Debug, Default, Clone, Serialize)]
pub struct LoopReport {
    pub cycles: u32,
    pub addressed: u64,
    pub ignored: u64,
    pub runs: Vec<RunRecord>,
    /// Eligible comments of the last cycle; populated in dry-run mode.
    pub dry_run_preview: Vec<Comment>,
}

enum CycleOutcome {
    /// Nothing eligible (possibly after classification dismissed everything).
    Idle,
    /// A batch was acted on and the cycle completed.
    Acted {
        record: RunRecord,
        ignored: u64,
    },
    /// Classification dismissed comments but nothing was left to fix.
    ClassifiedOnly {
        record: RunRecord,
        ignored: u64,
    },
    /// Dry run: report only.
    Preview {
        eligible: Vec<Comment>,
    },
}

/// Orchestrates repeated reconciliation cycles against one PR.
pub struct ReconciliationLoop<'a> {
    store: &'a dyn CommentStore,
    actor: &'a dyn Actor,
    workspace: &'a dyn Workspace,
    ledgers: &'a dyn LedgerRepository,
    settings: LoopSettings,
}

impl<'a> ReconciliationLoop<'a> {
    pub fn new(
        store: &'a dyn CommentStore,
        actor: &'a dyn Actor,
        workspace: &'a dyn Workspace,
        ledgers: &'a dyn LedgerRepository,
        settings: LoopSettings,
    ) -> Self {
        Self {
            store,
            actor,
            workspace,
            ledgers,
            settings,
        }
    }

    /// Run the loop to completion.
    ///
    /// Returns `Err` only from the Aborted state: a fetch, action, commit or
    /// persistence failure. The ledger is never advanced past the last
    /// successful checkpoint.
    pub async fn run(&self, pr: &PrRef) -> Result<LoopReport, EngineError> {
        let loop_id = Uuid::new_v4();
        info!(
            %loop_id,
            pr = %pr,
            max_iterations = self.settings.max_iterations,
            validate = self.settings.validate,
            dry_run = self.settings.dry_run,
            "starting reconciliation loop"
        );

        let mut ledger = self.ledgers.load(pr).await?;
        let mut report = LoopReport::default();

        for iteration in 0..self.settings.max_iterations {
            debug!(%loop_id, iteration, "starting cycle");
            let outcome = self.cycle(pr, &mut ledger).await.inspect_err(|err| {
                warn!(%loop_id, iteration, phase = %Phase::Aborted, error = %err, "cycle aborted");
            })?;
            report.cycles = iteration + 1;

            match outcome {
                CycleOutcome::Idle => {
                    debug!(%loop_id, iteration, "no eligible comments");
                }
                CycleOutcome::Acted { record, ignored } => {
                    report.addressed += record.addressed_count;
                    report.ignored += ignored;
                    report.runs.push(record);
                }
                CycleOutcome::ClassifiedOnly { record, ignored } => {
                    report.ignored += ignored;
                    report.runs.push(record);
                }
                CycleOutcome::Preview { eligible } => {
                    report.dry_run_preview = eligible;
                    // A dry run reports once; looping would report the same
                    // set again since nothing was persisted.
                    break;
                }
            }

            let iterations_remain = iteration + 1 < self.settings.max_iterations;
            if iterations_remain {
                debug!(%loop_id, iteration, phase = %Phase::Waiting, "cycle complete");
                self.wait_between_cycles(pr).await;
            }
        }

        info!(
            %loop_id,
            pr = %pr,
            phase = %Phase::Done,
            cycles = report.cycles,
            addressed = report.addressed,
            ignored = report.ignored,
            "reconciliation loop finished"
        );
        Ok(report)
    }

    async fn cycle(
        &self,
        pr: &PrRef,
        ledger: &mut Ledger,
    ) -> Result<CycleOutcome, EngineError> {
        let started_at = Utc::now();

        debug!(phase = %Phase::Fetching, pr = %pr, "fetching review threads");
        let comments = self.store.fetch(pr).await?;

        debug!(phase = %Phase::Filtering, fetched = comments.len(), "filtering");
        let eligible =
            eligibility::eligible(&comments, ledger, self.settings.trusted_authors.as_deref());
        if eligible.is_empty() {
            return Ok(CycleOutcome::Idle);
        }
        info!(pr = %pr, eligible = eligible.len(), "eligible comments this cycle");

        let eligible_count = eligible.len() as u64;
        let mut ignored_this_cycle = 0u64;

        let to_fix = if self.settings.validate {
            debug!(phase = %Phase::Classifying, "classifying eligible comments");
            let classifier = ValidityClassifier::new(self.actor, self.settings.verbose);
            let mut valid = Vec::new();
            for comment in &eligible {
                let verdict = classifier.classify(comment, self.workspace.root()).await?;
                if verdict.valid {
                    valid.push(comment.clone());
                } else if self.settings.dry_run {
                    info!(
                        comment_id = comment.id,
                        reason = %verdict.reason,
                        "dry-run: would dismiss comment"
                    );
                    ignored_this_cycle += 1;
                } else {
                    // Checkpoint each dismissal immediately so a crash later
                    // in the batch does not lose classification work.
                    self.ledgers.mark_ignored(pr, &[comment.id]).await?;
                    ledger.mark_ignored([comment.id]);
                    ignored_this_cycle += 1;
                    info!(
                        comment_id = comment.id,
                        reason = %verdict.reason,
                        "comment dismissed as invalid"
                    );
                }
            }
            valid
        } else {
            eligible.clone()
        };

        if self.settings.dry_run {
            return Ok(CycleOutcome::Preview { eligible: to_fix });
        }

        if to_fix.is_empty() {
            let record = RunRecord {
                started_at,
                eligible_count,
                addressed_count: 0,
                commit_sha: None,
            };
            self.ledgers.append_run(pr, &record).await?;
            ledger.record_run(record.clone());
            return Ok(CycleOutcome::ClassifiedOnly {
                record,
                ignored: ignored_this_cycle,
            });
        }

        debug!(phase = %Phase::Acting, batch = to_fix.len(), "delegating fixes to actor");
        let executor = FixExecutor::new(self.actor);
        executor.fix(&to_fix, self.workspace.root()).await?;

        debug!(phase = %Phase::Committing, "committing and pushing");
        let message = commit_message(&to_fix);
        let sha = self
            .workspace
            .commit_and_push(&message, self.settings.sign_commits)
            .await?;

        debug!(phase = %Phase::Persisting, commit = ?sha, "recording outcome");
        let addressed_count = if let Some(sha) = &sha {
            // Only a durably pushed change makes a comment addressed; a crash
            // between actor success and push must leave it eligible.
            let ids: Vec<u64> = to_fix.iter().map(|c| c.id).collect();
            self.ledgers.mark_addressed(pr, &ids).await?;
            ledger.mark_addressed(ids.iter().copied());
            info!(pr = %pr, commit = %sha, addressed = ids.len(), "comments addressed");
            ids.len() as u64
        } else {
            // The fix did not verify or apply; comments stay eligible and the
            // next cycle retries them.
            warn!(
                pr = %pr,
                batch = to_fix.len(),
                "actor produced no changes, comments left eligible"
            );
            0
        };

        let record = RunRecord {
            started_at,
            eligible_count,
            addressed_count,
            commit_sha: sha,
        };
        self.ledgers.append_run(pr, &record).await?;
        ledger.record_run(record.clone());

        Ok(CycleOutcome::Acted {
            record,
            ignored: ignored_this_cycle,
        })
    }

    async fn wait_between_cycles(&self, pr: &PrRef) {
        match &self.settings.wait {
            WaitStrategy::FixedInterval(interval) => {
                debug!(interval_secs = interval.as_secs(), "sleeping between cycles");
                sleep(*interval).await;
            }
            WaitStrategy::AwaitBot {
                login,
                poll_interval,
                timeout,
            } => {
                let since = Utc::now();
                let deadline = Instant::now() + *timeout;
                debug!(bot = %login, timeout_secs = timeout.as_secs(), "waiting for review bot");

                loop {
                    sleep(*poll_interval).await;
                    match self.store.fetch(pr).await {
                        Ok(comments) => {
                            let bot_spoke = comments
                                .iter()
                                .any(|c| &c.author == login && c.created_at > since);
                            if bot_spoke {
                                debug!(bot = %login, "review bot commented, resuming");
                                return;
                            }
                        }
                        Err(err) => {
                            // Not fatal here: the poll is an optimization.
                            warn!(error = %err, "bot poll failed, will retry");
                        }
                    }
                    if Instant::now() >= deadline {
                        debug!(bot = %login, "bot wait timed out, continuing anyway");
                        return;
                    }
                }
            }
        }
    }
}

/// Commit message for one cycle's batch.
fn commit_message(comments: &[Comment]) -> String {
    let mut message = format!(
        "Address {} review comment{}\n",
        comments.len(),
        if comments.len() == 1 { "" } else { "s" }
    );
    for comment in comments {
        message.push_str(&format!("\n- {} ({})", comment.location(), comment.id));
    }
    message
}
