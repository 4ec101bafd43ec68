use crate::domain::models::{Ledger, PrRef, RunRecord};
use crate::domain::ports::{DatabaseError, LedgerRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use std::collections::BTreeSet;

/// SQLite implementation of `LedgerRepository`
///
/// Ledger sets are stored as JSON arrays of comment ids. Updates are
/// read-modify-write unions, so ids only ever accumulate. Run records go
/// into their own append-only table.
pub struct SqliteLedgerRepository {
    pool: SqlitePool,
}

impl SqliteLedgerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Parse a stored JSON id array, treating malformed or missing data as
    /// an empty set so older or hand-edited rows still load.
    fn parse_ids(raw: &str) -> BTreeSet<u64> {
        serde_json::from_str(raw).unwrap_or_default()
    }

    async fn ensure_row(&self, pr: &PrRef) -> Result<(), DatabaseError> {
        let number = i64::try_from(pr.number).unwrap_or(i64::MAX);
        sqlx::query(
            "INSERT OR IGNORE INTO ledgers (owner, repo, pr_number) VALUES (?, ?, ?)",
        )
        .bind(&pr.owner)
        .bind(&pr.repo)
        .bind(number)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn extend_column(
        &self,
        pr: &PrRef,
        column: &str,
        ids: &[u64],
    ) -> Result<(), DatabaseError> {
        self.ensure_row(pr).await?;
        let number = i64::try_from(pr.number).unwrap_or(i64::MAX);

        let query = format!(
            "SELECT {column} FROM ledgers WHERE owner = ? AND repo = ? AND pr_number = ?"
        );
        let row = sqlx::query(&query)
            .bind(&pr.owner)
            .bind(&pr.repo)
            .bind(number)
            .fetch_one(&self.pool)
            .await?;
        let raw: String = row.try_get(column)?;

        let mut set = Self::parse_ids(&raw);
        set.extend(ids.iter().copied());
        let updated = serde_json::to_string(&set)?;

        let query = format!(
            "UPDATE ledgers SET {column} = ? WHERE owner = ? AND repo = ? AND pr_number = ?"
        );
        sqlx::query(&query)
            .bind(&updated)
            .bind(&pr.owner)
            .bind(&pr.repo)
            .bind(number)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl LedgerRepository for SqliteLedgerRepository {
    async fn load(&self, pr: &PrRef) -> Result<Ledger, DatabaseError> {
        let number = i64::try_from(pr.number).unwrap_or(i64::MAX);
        let row = sqlx::query(
            "SELECT addressed, ignored, last_run_at FROM ledgers \
             WHERE owner = ? AND repo = ? AND pr_number = ?",
        )
        .bind(&pr.owner)
        .bind(&pr.repo)
        .bind(number)
        .fetch_optional(&self.pool)
        .await?;

        let mut ledger = Ledger::default();
        if let Some(row) = row {
            let addressed: String = row.try_get("addressed")?;
            let ignored: String = row.try_get("ignored")?;
            ledger.addressed = Self::parse_ids(&addressed);
            ledger.ignored = Self::parse_ids(&ignored);
            let last_run_at: Option<String> = row.try_get("last_run_at")?;
            ledger.last_run_at = last_run_at
                .as_deref()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.with_timezone(&Utc));
        }

        let rows = sqlx::query(
            "SELECT started_at, eligible_count, addressed_count, commit_sha \
             FROM run_records \
             WHERE owner = ? AND repo = ? AND pr_number = ? \
             ORDER BY id ASC",
        )
        .bind(&pr.owner)
        .bind(&pr.repo)
        .bind(number)
        .fetch_all(&self.pool)
        .await?;

        for row in rows {
            let started_at: String = row.try_get("started_at")?;
            let eligible_count: i64 = row.try_get("eligible_count")?;
            let addressed_count: i64 = row.try_get("addressed_count")?;
            let commit_sha: Option<String> = row.try_get("commit_sha")?;
            let started_at = DateTime::parse_from_rfc3339(&started_at)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now());
            ledger.runs.push(RunRecord {
                started_at,
                eligible_count: eligible_count.max(0) as u64,
                addressed_count: addressed_count.max(0) as u64,
                commit_sha,
            });
        }

        Ok(ledger)
    }

    async fn mark_addressed(&self, pr: &PrRef, ids: &[u64]) -> Result<(), DatabaseError> {
        if ids.is_empty() {
            return Ok(());
        }
        self.extend_column(pr, "addressed", ids).await
    }

    async fn mark_ignored(&self, pr: &PrRef, ids: &[u64]) -> Result<(), DatabaseError> {
        if ids.is_empty() {
            return Ok(());
        }
        self.extend_column(pr, "ignored", ids).await
    }

    async fn append_run(&self, pr: &PrRef, record: &RunRecord) -> Result<(), DatabaseError> {
        self.ensure_row(pr).await?;
        let number = i64::try_from(pr.number).unwrap_or(i64::MAX);
        let started_at = record.started_at.to_rfc3339();
        let eligible = i64::try_from(record.eligible_count).unwrap_or(i64::MAX);
        let addressed = i64::try_from(record.addressed_count).unwrap_or(i64::MAX);

        sqlx::query(
            "INSERT INTO run_records \
             (owner, repo, pr_number, started_at, eligible_count, addressed_count, commit_sha) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&pr.owner)
        .bind(&pr.repo)
        .bind(number)
        .bind(&started_at)
        .bind(eligible)
        .bind(addressed)
        .bind(&record.commit_sha)
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "UPDATE ledgers SET last_run_at = ? WHERE owner = ? AND repo = ? AND pr_number = ?",
        )
        .bind(&started_at)
        .bind(&pr.owner)
        .bind(&pr.repo)
        .bind(number)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
