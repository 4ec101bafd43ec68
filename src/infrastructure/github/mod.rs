//! GitHub GraphQL integration.

pub mod client;
pub mod types;

pub use client::GithubCommentStore;
