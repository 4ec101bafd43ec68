//! GitHub GraphQL adapter for the comment-store port.

use crate::domain::models::{Comment, GithubConfig, PrRef};
use crate::domain::ports::{CommentStore, EngineError};
use crate::infrastructure::github::types::{GraphQlResponse, ThreadQueryData};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

const THREADS_QUERY: &str = r"
query($owner: String!, $name: String!, $number: Int!, $cursor: String) {
  repository(owner: $owner, name: $name) {
    pullRequest(number: $number) {
      reviewThreads(first: 100, after: $cursor) {
        pageInfo { hasNextPage endCursor }
        nodes {
          id
          isResolved
          path
          line
          comments(first: 1) {
            nodes {
              databaseId
              body
              author { login }
              url
              createdAt
            }
          }
        }
      }
    }
  }
}";

const REPLY_MUTATION: &str = r"
mutation($threadId: ID!, $body: String!) {
  addPullRequestReviewThreadReply(input: {pullRequestReviewThreadId: $threadId, body: $body}) {
    comment { id }
  }
}";

const RESOLVE_MUTATION: &str = r"
mutation($threadId: ID!) {
  resolveReviewThread(input: {threadId: $threadId}) {
    thread { id isResolved }
  }
}";

/// Comment store backed by the GitHub GraphQL API.
pub struct GithubCommentStore {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl GithubCommentStore {
    pub fn new(config: &GithubConfig) -> Result<Self, EngineError> {
        let token = config.resolved_token().ok_or_else(|| {
            EngineError::SourceUnavailable(
                "no GitHub token (set github.token or GITHUB_TOKEN)".to_string(),
            )
        })?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("prmend/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| EngineError::SourceUnavailable(format!("http client: {e}")))?;

        Ok(Self {
            http,
            endpoint: config.graphql_url.clone(),
            token,
        })
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, EngineError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| EngineError::SourceUnavailable(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::SourceUnavailable(format!(
                "GitHub API returned {status}: {body}"
            )));
        }

        let envelope: GraphQlResponse<T> = response
            .json()
            .await
            .map_err(|e| EngineError::SourceUnavailable(format!("malformed response: {e}")))?;

        if let Some(error) = envelope.errors.first() {
            return Err(EngineError::SourceUnavailable(format!(
                "GraphQL error: {}",
                error.message
            )));
        }
        envelope
            .data
            .ok_or_else(|| EngineError::SourceUnavailable("response had no data".to_string()))
    }
}

#[async_trait]
impl CommentStore for GithubCommentStore {
    async fn fetch(&self, pr: &PrRef) -> Result<Vec<Comment>, EngineError> {
        let mut comments = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let variables = json!({
                "owner": pr.owner,
                "name": pr.repo,
                "number": pr.number,
                "cursor": cursor,
            });
            let data: ThreadQueryData = self.post(THREADS_QUERY, variables).await?;

            let threads = data
                .repository
                .and_then(|r| r.pull_request)
                .ok_or_else(|| {
                    EngineError::SourceUnavailable(format!("pull request {pr} not found"))
                })?
                .review_threads;

            for thread in threads.nodes {
                // The thread's originating remark is the first comment; a
                // thread with no comments or no stable id is unusable.
                let Some(first) = thread.comments.nodes.into_iter().next() else {
                    continue;
                };
                let Some(id) = first.database_id else {
                    continue;
                };
                comments.push(Comment {
                    id,
                    thread_id: thread.id,
                    path: thread.path.unwrap_or_default(),
                    line: thread.line,
                    body: first.body,
                    author: first.author.map_or_else(|| "ghost".to_string(), |a| a.login),
                    url: first.url,
                    created_at: first.created_at,
                    resolved: thread.is_resolved,
                });
            }

            if threads.page_info.has_next_page {
                cursor = threads.page_info.end_cursor;
            } else {
                break;
            }
        }

        debug!(pr = %pr, threads = comments.len(), "fetched review threads");
        Ok(comments)
    }

    async fn reply(&self, thread_id: &str, body: &str) -> Result<(), EngineError> {
        let variables = json!({ "threadId": thread_id, "body": body });
        self.post::<Value>(REPLY_MUTATION, variables).await?;
        Ok(())
    }

    async fn resolve(&self, thread_id: &str) -> Result<(), EngineError> {
        let variables = json!({ "threadId": thread_id });
        self.post::<Value>(RESOLVE_MUTATION, variables).await?;
        Ok(())
    }
}
