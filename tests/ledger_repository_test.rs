use chrono::Utc;
use prmend::domain::models::{PrRef, RunRecord};
use prmend::domain::ports::LedgerRepository;
use prmend::infrastructure::database::SqliteLedgerRepository;
use sqlx::SqlitePool;

async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("failed to create test database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");

    pool
}

fn pr() -> PrRef {
    PrRef::new("octo", "widgets", 7)
}

#[tokio::test]
async fn test_load_unknown_pr_returns_empty_ledger() {
    let pool = setup_test_db().await;
    let repo = SqliteLedgerRepository::new(pool.clone());

    let ledger = repo.load(&pr()).await.expect("failed to load ledger");

    assert!(ledger.addressed.is_empty());
    assert!(ledger.ignored.is_empty());
    assert!(ledger.runs.is_empty());
    assert!(ledger.last_run_at.is_none());

    pool.close().await;
}

#[tokio::test]
async fn test_marks_accumulate_across_calls() {
    let pool = setup_test_db().await;
    let repo = SqliteLedgerRepository::new(pool.clone());

    repo.mark_addressed(&pr(), &[1, 2])
        .await
        .expect("failed to mark addressed");
    repo.mark_addressed(&pr(), &[2, 3])
        .await
        .expect("failed to mark addressed");
    repo.mark_ignored(&pr(), &[10])
        .await
        .expect("failed to mark ignored");

    let ledger = repo.load(&pr()).await.expect("failed to load ledger");
    let addressed: Vec<u64> = ledger.addressed.iter().copied().collect();
    assert_eq!(addressed, vec![1, 2, 3]);
    assert!(ledger.ignored.contains(&10));

    pool.close().await;
}

#[tokio::test]
async fn test_same_id_in_both_sets_is_tolerated() {
    let pool = setup_test_db().await;
    let repo = SqliteLedgerRepository::new(pool.clone());

    repo.mark_ignored(&pr(), &[5]).await.expect("mark ignored");
    repo.mark_addressed(&pr(), &[5]).await.expect("mark addressed");

    let ledger = repo.load(&pr()).await.expect("failed to load ledger");
    assert!(ledger.addressed.contains(&5));
    assert!(ledger.ignored.contains(&5));
    // Either membership makes the comment processed.
    assert!(ledger.is_processed(5));

    pool.close().await;
}

#[tokio::test]
async fn test_run_records_keep_insertion_order() {
    let pool = setup_test_db().await;
    let repo = SqliteLedgerRepository::new(pool.clone());

    let first = RunRecord {
        started_at: Utc::now(),
        eligible_count: 3,
        addressed_count: 2,
        commit_sha: Some("aaa111".into()),
    };
    let second = RunRecord {
        started_at: Utc::now(),
        eligible_count: 1,
        addressed_count: 0,
        commit_sha: None,
    };

    repo.append_run(&pr(), &first).await.expect("append run");
    repo.append_run(&pr(), &second).await.expect("append run");

    let ledger = repo.load(&pr()).await.expect("failed to load ledger");
    assert_eq!(ledger.runs.len(), 2);
    assert_eq!(ledger.runs[0].commit_sha.as_deref(), Some("aaa111"));
    assert_eq!(ledger.runs[1].addressed_count, 0);
    assert!(ledger.last_run_at.is_some());

    pool.close().await;
}

#[tokio::test]
async fn test_prs_have_independent_ledgers() {
    let pool = setup_test_db().await;
    let repo = SqliteLedgerRepository::new(pool.clone());

    let other = PrRef::new("octo", "widgets", 8);
    repo.mark_addressed(&pr(), &[1]).await.expect("mark");
    repo.mark_addressed(&other, &[2]).await.expect("mark");

    let ledger = repo.load(&pr()).await.expect("load");
    assert!(ledger.addressed.contains(&1));
    assert!(!ledger.addressed.contains(&2));

    pool.close().await;
}

#[tokio::test]
async fn test_malformed_stored_sets_load_as_empty() {
    let pool = setup_test_db().await;
    let repo = SqliteLedgerRepository::new(pool.clone());

    sqlx::query(
        "INSERT INTO ledgers (owner, repo, pr_number, addressed, ignored) \
         VALUES ('octo', 'widgets', 7, 'not json', '[')",
    )
    .execute(&pool)
    .await
    .expect("failed to seed row");

    let ledger = repo.load(&pr()).await.expect("failed to load ledger");
    assert!(ledger.addressed.is_empty());
    assert!(ledger.ignored.is_empty());

    // The row is still writable afterwards.
    repo.mark_addressed(&pr(), &[1]).await.expect("mark");
    let ledger = repo.load(&pr()).await.expect("load");
    assert!(ledger.addressed.contains(&1));

    pool.close().await;
}
