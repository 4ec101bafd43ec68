//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "prmend")]
#[command(about = "prmend - automated PR review comment resolution", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize prmend configuration and database
    Init(InitArgs),

    /// Run the reconciliation loop against a pull request
    Run(RunArgs),

    /// Close out comment threads already addressed by later commits
    Resolve(ResolveArgs),

    /// Show the progress ledger and run history for a pull request
    Status(StatusArgs),
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force reinitialization even if already initialized
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Pull request: a number, `owner/repo#number`, or a GitHub URL
    pub pr: String,

    /// Repository (`owner/repo`) used when only a number is given
    #[arg(short, long)]
    pub repo: Option<String>,

    /// Seconds to sleep between cycles
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Maximum number of cycles for this invocation
    #[arg(short, long)]
    pub max_iterations: Option<u32>,

    /// Report what would happen without acting or mutating the ledger
    #[arg(long)]
    pub dry_run: bool,

    /// Classify comment validity before fixing
    #[arg(long)]
    pub validate: bool,

    /// Only act on comments from this author (repeatable)
    #[arg(long = "trusted-author")]
    pub trusted_authors: Vec<String>,

    /// Override the actor executable
    #[arg(long)]
    pub actor: Option<String>,

    /// Sign commits with `git commit -S`
    #[arg(long)]
    pub sign: bool,

    /// Between cycles, poll for a new comment from this bot login
    /// instead of sleeping a fixed interval
    #[arg(long)]
    pub wait_for_bot: Option<String>,

    /// Seconds to wait for the bot before continuing anyway
    #[arg(long)]
    pub bot_timeout: Option<u64>,

    /// Log raw actor transcripts when extraction fails
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Pull request: a number, `owner/repo#number`, or a GitHub URL
    pub pr: String,

    /// Repository (`owner/repo`) used when only a number is given
    #[arg(short, long)]
    pub repo: Option<String>,

    /// Report judgments without replying or resolving
    #[arg(long)]
    pub dry_run: bool,

    /// Only consider comments from this author (repeatable)
    #[arg(long = "trusted-author")]
    pub trusted_authors: Vec<String>,

    /// Override the actor executable
    #[arg(long)]
    pub actor: Option<String>,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Pull request: a number, `owner/repo#number`, or a GitHub URL
    pub pr: String,

    /// Repository (`owner/repo`) used when only a number is given
    #[arg(short, long)]
    pub repo: Option<String>,
}
