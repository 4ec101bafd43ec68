//! Structured records extracted from actor transcripts.

use serde::{Deserialize, Serialize};

/// Classifier output for a single comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub valid: bool,
    #[serde(default)]
    pub reason: String,
}

impl Verdict {
    /// The fail-open verdict used when the classifier transcript cannot be
    /// parsed: a real bug must never be dropped because of a parsing glitch.
    pub fn fail_open(detail: &str) -> Self {
        Self {
            valid: true,
            reason: format!("classifier output unparsable, assuming valid: {detail}"),
        }
    }
}

/// Resolution-mode judgment: has this comment been overtaken by later changes?
///
/// Consumed immediately to drive a reply-and-resolve action; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveResult {
    pub addressed: bool,
    #[serde(default, rename = "commitSha")]
    pub commit_sha: Option<String>,
    #[serde(default)]
    pub explanation: String,
}

impl ResolveResult {
    /// The fail-closed result used when the transcript cannot be parsed: an
    /// unverifiable thread stays open and is retried on a later invocation.
    pub fn not_addressed(detail: &str) -> Self {
        Self {
            addressed: false,
            commit_sha: None,
            explanation: format!("resolution check unparsable, leaving open: {detail}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_reason_defaults_to_empty() {
        let verdict: Verdict = serde_json::from_str(r#"{"valid":false}"#).unwrap();
        assert!(!verdict.valid);
        assert!(verdict.reason.is_empty());
    }

    #[test]
    fn resolve_result_uses_camel_case_sha() {
        let result: ResolveResult =
            serde_json::from_str(r#"{"addressed":true,"commitSha":"abc123","explanation":"done"}"#)
                .unwrap();
        assert!(result.addressed);
        assert_eq!(result.commit_sha.as_deref(), Some("abc123"));
    }
}
