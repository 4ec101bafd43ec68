pub mod init;
pub mod resolve;
pub mod run;
pub mod status;

use crate::domain::models::{Config, PrRef};
use crate::infrastructure::database::{DatabaseConnection, SqliteLedgerRepository};
use anyhow::{Context, Result};
use std::path::Path;

/// Resolve a PR reference from the positional argument, the `--repo` flag
/// and the configured default repository, in that order of precedence.
pub(crate) fn parse_pr(
    input: &str,
    repo_flag: Option<&str>,
    config: &Config,
) -> Result<PrRef> {
    let default_repo = repo_flag.or(config.repository.as_deref());
    PrRef::parse(input, default_repo).context("could not determine which pull request to target")
}

/// Open the ledger database, creating its parent directory and running
/// migrations so every command sees a current schema.
pub(crate) async fn open_ledgers(config: &Config) -> Result<SqliteLedgerRepository> {
    if let Some(parent) = Path::new(&config.database.path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    let url = format!("sqlite:{}", config.database.path);
    let db = DatabaseConnection::new(&url)
        .await
        .context("failed to open ledger database")?;
    db.migrate().await.context("failed to run migrations")?;
    Ok(SqliteLedgerRepository::new(db.pool().clone()))
}
