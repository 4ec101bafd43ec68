//! Implementation of the `prmend status` command.

use anyhow::Result;

use crate::cli::output::{output, run_history_table, CommandOutput};
use crate::cli::types::StatusArgs;
use crate::domain::models::RunRecord;
use crate::domain::ports::LedgerRepository;
use crate::infrastructure::config::ConfigLoader;

#[derive(Debug, serde::Serialize)]
pub struct StatusOutput {
    pub pr: String,
    pub addressed: Vec<u64>,
    pub ignored: Vec<u64>,
    pub last_run_at: Option<String>,
    pub runs: Vec<RunRecord>,
}

impl CommandOutput for StatusOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "{}: {} addressed, {} dismissed",
            self.pr,
            self.addressed.len(),
            self.ignored.len()
        )];
        if let Some(last) = &self.last_run_at {
            lines.push(format!("Last run: {last}"));
        }
        if self.runs.is_empty() {
            lines.push("No runs recorded.".to_string());
        } else {
            lines.push(run_history_table(&self.runs));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: StatusArgs, json_mode: bool) -> Result<()> {
    let config = ConfigLoader::load()?;
    let pr = super::parse_pr(&args.pr, args.repo.as_deref(), &config)?;

    let ledgers = super::open_ledgers(&config).await?;
    let ledger = ledgers.load(&pr).await?;

    let output_data = StatusOutput {
        pr: pr.to_string(),
        addressed: ledger.addressed.iter().copied().collect(),
        ignored: ledger.ignored.iter().copied().collect(),
        last_run_at: ledger.last_run_at.map(|t| t.to_rfc3339()),
        runs: ledger.runs,
    };
    output(&output_data, json_mode);
    Ok(())
}
