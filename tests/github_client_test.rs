use prmend::domain::models::{GithubConfig, PrRef};
use prmend::domain::ports::{CommentStore, EngineError};
use prmend::infrastructure::github::GithubCommentStore;

fn store_for(server: &mockito::ServerGuard) -> GithubCommentStore {
    let config = GithubConfig {
        token: Some("test-token".into()),
        graphql_url: server.url(),
    };
    GithubCommentStore::new(&config).expect("failed to build store")
}

fn pr() -> PrRef {
    PrRef::new("octo", "widgets", 42)
}

fn thread_page(threads: &str, has_next: bool, cursor: &str) -> String {
    format!(
        r#"{{"data": {{"repository": {{"pullRequest": {{"reviewThreads": {{
            "pageInfo": {{"hasNextPage": {has_next}, "endCursor": "{cursor}"}},
            "nodes": [{threads}]
        }}}}}}}}}}"#
    )
}

fn thread_node(id: u64, resolved: bool) -> String {
    format!(
        r#"{{"id": "THREAD{id}", "isResolved": {resolved}, "path": "src/lib.rs", "line": 10,
            "comments": {{"nodes": [{{
                "databaseId": {id},
                "body": "fix this",
                "author": {{"login": "reviewer"}},
                "url": "https://github.com/octo/widgets/pull/42#discussion_r{id}",
                "createdAt": "2026-08-01T12:00:00Z"
            }}]}}}}"#
    )
}

#[tokio::test]
async fn fetch_maps_threads_to_comments() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_body(thread_page(
            &format!("{}, {}", thread_node(101, false), thread_node(102, true)),
            false,
            "",
        ))
        .create_async()
        .await;

    let store = store_for(&server);
    let comments = store.fetch(&pr()).await.expect("fetch failed");

    mock.assert_async().await;
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].id, 101);
    assert_eq!(comments[0].thread_id, "THREAD101");
    assert_eq!(comments[0].author, "reviewer");
    assert!(!comments[0].resolved);
    assert!(comments[1].resolved);
}

#[tokio::test]
async fn fetch_follows_pagination() {
    let mut server = mockito::Server::new_async().await;
    let first = server
        .mock("POST", "/")
        .match_body(mockito::Matcher::PartialJsonString(
            r#"{"variables": {"cursor": null}}"#.to_string(),
        ))
        .with_status(200)
        .with_body(thread_page(&thread_node(1, false), true, "CURSOR1"))
        .create_async()
        .await;
    let second = server
        .mock("POST", "/")
        .match_body(mockito::Matcher::PartialJsonString(
            r#"{"variables": {"cursor": "CURSOR1"}}"#.to_string(),
        ))
        .with_status(200)
        .with_body(thread_page(&thread_node(2, false), false, ""))
        .create_async()
        .await;

    let store = store_for(&server);
    let comments = store.fetch(&pr()).await.expect("fetch failed");

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[1].id, 2);
}

#[tokio::test]
async fn threads_without_a_stable_id_are_skipped() {
    let mut server = mockito::Server::new_async().await;
    let node = r#"{"id": "THREADX", "isResolved": false, "path": "a.rs", "line": null,
        "comments": {"nodes": [{
            "databaseId": null, "body": "x", "author": null,
            "url": "", "createdAt": "2026-08-01T12:00:00Z"
        }]}}"#;
    server
        .mock("POST", "/")
        .with_status(200)
        .with_body(thread_page(node, false, ""))
        .create_async()
        .await;

    let store = store_for(&server);
    let comments = store.fetch(&pr()).await.expect("fetch failed");
    assert!(comments.is_empty());
}

#[tokio::test]
async fn deleted_authors_become_ghost() {
    let mut server = mockito::Server::new_async().await;
    let node = r#"{"id": "THREADY", "isResolved": false, "path": "a.rs", "line": 3,
        "comments": {"nodes": [{
            "databaseId": 7, "body": "x", "author": null,
            "url": "", "createdAt": "2026-08-01T12:00:00Z"
        }]}}"#;
    server
        .mock("POST", "/")
        .with_status(200)
        .with_body(thread_page(node, false, ""))
        .create_async()
        .await;

    let store = store_for(&server);
    let comments = store.fetch(&pr()).await.expect("fetch failed");
    assert_eq!(comments[0].author, "ghost");
}

#[tokio::test]
async fn missing_pull_request_is_source_unavailable() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(200)
        .with_body(r#"{"data": {"repository": {"pullRequest": null}}}"#)
        .create_async()
        .await;

    let store = store_for(&server);
    let err = store.fetch(&pr()).await.unwrap_err();
    assert!(matches!(err, EngineError::SourceUnavailable(_)));
}

#[tokio::test]
async fn graphql_errors_are_source_unavailable() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(200)
        .with_body(r#"{"errors": [{"message": "rate limited"}]}"#)
        .create_async()
        .await;

    let store = store_for(&server);
    let err = store.fetch(&pr()).await.unwrap_err();
    match err {
        EngineError::SourceUnavailable(msg) => assert!(msg.contains("rate limited")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn http_failure_is_source_unavailable() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(502)
        .with_body("bad gateway")
        .create_async()
        .await;

    let store = store_for(&server);
    let err = store.fetch(&pr()).await.unwrap_err();
    assert!(matches!(err, EngineError::SourceUnavailable(_)));
}

#[tokio::test]
async fn reply_and_resolve_post_mutations() {
    let mut server = mockito::Server::new_async().await;
    let reply = server
        .mock("POST", "/")
        .match_body(mockito::Matcher::PartialJsonString(
            r#"{"variables": {"threadId": "THREAD1", "body": "done"}}"#.to_string(),
        ))
        .with_status(200)
        .with_body(r#"{"data": {"addPullRequestReviewThreadReply": {"comment": {"id": "C1"}}}}"#)
        .create_async()
        .await;

    let store = store_for(&server);
    store.reply("THREAD1", "done").await.expect("reply failed");
    reply.assert_async().await;

    let resolve = server
        .mock("POST", "/")
        .match_body(mockito::Matcher::PartialJsonString(
            r#"{"variables": {"threadId": "THREAD1"}}"#.to_string(),
        ))
        .with_status(200)
        .with_body(
            r#"{"data": {"resolveReviewThread": {"thread": {"id": "THREAD1", "isResolved": true}}}}"#,
        )
        .create_async()
        .await;

    store.resolve("THREAD1").await.expect("resolve failed");
    resolve.assert_async().await;
}
