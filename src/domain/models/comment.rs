//! Review comment and pull-request reference models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A pull request identified by owner, repository and number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl PrRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            number,
        }
    }

    /// Parse a PR reference from any of the accepted forms:
    ///
    /// - `owner/repo#123`
    /// - `https://github.com/owner/repo/pull/123`
    /// - `123` combined with a `default_repo` of the form `owner/repo`
    pub fn parse(input: &str, default_repo: Option<&str>) -> Result<Self, PrRefParseError> {
        let input = input.trim();

        if let Some(rest) = input
            .strip_prefix("https://github.com/")
            .or_else(|| input.strip_prefix("http://github.com/"))
        {
            let mut parts = rest.split('/');
            let owner = parts.next().unwrap_or_default();
            let repo = parts.next().unwrap_or_default();
            let pull = parts.next().unwrap_or_default();
            let number = parts.next().unwrap_or_default();
            if owner.is_empty() || repo.is_empty() || pull != "pull" {
                return Err(PrRefParseError(input.to_string()));
            }
            let number: u64 = number
                .trim_end_matches('/')
                .parse()
                .map_err(|_| PrRefParseError(input.to_string()))?;
            return Ok(Self::new(owner, repo, number));
        }

        if let Some((repo_part, number_part)) = input.split_once('#') {
            let (owner, repo) = repo_part
                .split_once('/')
                .ok_or_else(|| PrRefParseError(input.to_string()))?;
            let number: u64 = number_part
                .parse()
                .map_err(|_| PrRefParseError(input.to_string()))?;
            if owner.is_empty() || repo.is_empty() {
                return Err(PrRefParseError(input.to_string()));
            }
            return Ok(Self::new(owner, repo, number));
        }

        if let Ok(number) = u64::from_str(input) {
            if let Some((owner, repo)) = default_repo.and_then(|r| r.split_once('/')) {
                return Ok(Self::new(owner, repo, number));
            }
            return Err(PrRefParseError(format!(
                "{input} (bare PR number needs a configured repository)"
            )));
        }

        Err(PrRefParseError(input.to_string()))
    }
}

impl fmt::Display for PrRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// Failed to parse a PR reference.
#[derive(Debug, thiserror::Error)]
#[error("unrecognized pull request reference: {0}")]
pub struct PrRefParseError(pub String);

/// One review remark anchored to a file/line, representing the originating
/// comment of a review thread.
///
/// `id` is the stable numeric identifier assigned by the comment source; it is
/// immutable and unique within a PR's comment set across fetches. Everything
/// except the thread's resolved flag is read-only to this tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    /// Opaque identifier of the review thread this comment opens.
    pub thread_id: String,
    pub path: String,
    pub line: Option<u64>,
    pub body: String,
    pub author: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    /// Current resolved status of the thread, as reported by the source.
    pub resolved: bool,
}

impl Comment {
    /// Short excerpt of the body for logs and tables.
    pub fn excerpt(&self, max_chars: usize) -> String {
        let flat = self.body.replace('\n', " ");
        if flat.chars().count() <= max_chars {
            flat
        } else {
            let mut out: String = flat.chars().take(max_chars).collect();
            out.push('…');
            out
        }
    }

    /// `path:line` location label, `path` alone when the line is unknown.
    pub fn location(&self) -> String {
        match self.line {
            Some(line) => format!("{}:{line}", self.path),
            None => self.path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_owner_repo_number_form() {
        let pr = PrRef::parse("octo/widgets#42", None).unwrap();
        assert_eq!(pr.owner, "octo");
        assert_eq!(pr.repo, "widgets");
        assert_eq!(pr.number, 42);
    }

    #[test]
    fn parses_github_url() {
        let pr = PrRef::parse("https://github.com/octo/widgets/pull/7", None).unwrap();
        assert_eq!(pr, PrRef::new("octo", "widgets", 7));
    }

    #[test]
    fn parses_bare_number_with_default_repo() {
        let pr = PrRef::parse("99", Some("octo/widgets")).unwrap();
        assert_eq!(pr, PrRef::new("octo", "widgets", 99));
    }

    #[test]
    fn rejects_bare_number_without_default_repo() {
        assert!(PrRef::parse("99", None).is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(PrRef::parse("not-a-pr", None).is_err());
        assert!(PrRef::parse("octo/widgets#notanumber", None).is_err());
        assert!(PrRef::parse("https://github.com/octo/widgets/issues/7", None).is_err());
    }

    #[test]
    fn excerpt_truncates_long_bodies() {
        let comment = Comment {
            id: 1,
            thread_id: "T1".into(),
            path: "src/lib.rs".into(),
            line: Some(10),
            body: "a".repeat(100),
            author: "reviewer".into(),
            url: String::new(),
            created_at: Utc::now(),
            resolved: false,
        };
        assert_eq!(comment.excerpt(10).chars().count(), 11); // 10 + ellipsis
        assert_eq!(comment.location(), "src/lib.rs:10");
    }
}
