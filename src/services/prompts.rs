//! Instruction payloads handed to the external actor.

use crate::domain::models::Comment;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Build the fix instruction for one cycle.
///
/// All eligible comments go into a single payload, grouped by file path so the
/// actor sees related remarks together.
pub fn fix_prompt(comments: &[Comment]) -> String {
    let mut by_path: BTreeMap<&str, Vec<&Comment>> = BTreeMap::new();
    for comment in comments {
        by_path.entry(comment.path.as_str()).or_default().push(comment);
    }

    let mut prompt = String::from(
        "You are resolving code-review comments on the current branch of this \
         repository. Apply the smallest correct change for each comment. Edit \
         files in place; do not commit. If a comment is already satisfied by \
         the current code, leave the file untouched.\n",
    );

    for (path, group) in &by_path {
        let _ = writeln!(prompt, "\n## {path}");
        for comment in group {
            match comment.line {
                Some(line) => {
                    let _ = writeln!(prompt, "- (line {line}, {}) {}", comment.author, comment.body);
                }
                None => {
                    let _ = writeln!(prompt, "- ({}) {}", comment.author, comment.body);
                }
            }
        }
    }

    prompt
}

/// Build the validity-classification instruction for one comment.
///
/// The rubric is fixed; the answer must be a single JSON record with `valid`
/// and `reason` fields, which we extract from the transcript afterwards.
pub fn classify_prompt(comment: &Comment) -> String {
    format!(
        "Judge whether this code-review comment is worth acting on in this \
         repository.\n\
         \n\
         Comment on {location}:\n{body}\n\
         \n\
         Treat it as INVALID if it is: a false positive, a style nitpick \
         outside the project's guide, something that would break \
         functionality, a remark about already-fixed or non-existent code, a \
         duplicate, or trivial. Treat it as VALID if it points at a real bug, \
         a genuine quality problem, a meaningful improvement, or a security \
         or performance issue.\n\
         \n\
         Answer with exactly one JSON object:\n\
         {{\"valid\": true|false, \"reason\": \"<one sentence>\"}}",
        location = comment.location(),
        body = comment.body,
    )
}

/// Build the resolution-mode instruction for one comment.
pub fn resolve_prompt(
    comment: &Comment,
    current_content: Option<&str>,
    subsequent_commits: &[String],
) -> String {
    let content_section = match current_content {
        Some(content) => format!("Current content of {}:\n```\n{content}\n```", comment.path),
        None => format!("The file {} no longer exists.", comment.path),
    };
    let commits_section = if subsequent_commits.is_empty() {
        "No commits have touched the file since the comment was made.".to_string()
    } else {
        format!(
            "Commits touching the file since the comment:\n{}",
            subsequent_commits.join("\n")
        )
    };

    format!(
        "A review comment was left on {location} at {created}:\n{body}\n\
         \n\
         {content_section}\n\
         \n\
         {commits_section}\n\
         \n\
         Has the concern been addressed by the subsequent changes? Answer \
         with exactly one JSON object:\n\
         {{\"addressed\": true|false, \"commitSha\": \"<sha or null>\", \
         \"explanation\": \"<one sentence>\"}}",
        location = comment.location(),
        created = comment.created_at.to_rfc3339(),
        body = comment.body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn comment(id: u64, path: &str, body: &str) -> Comment {
        Comment {
            id,
            thread_id: format!("T{id}"),
            path: path.into(),
            line: Some(3),
            body: body.into(),
            author: "reviewer".into(),
            url: String::new(),
            created_at: Utc::now(),
            resolved: false,
        }
    }

    #[test]
    fn fix_prompt_groups_by_file() {
        let comments = vec![
            comment(1, "src/b.rs", "rename this"),
            comment(2, "src/a.rs", "missing error check"),
            comment(3, "src/b.rs", "off by one"),
        ];
        let prompt = fix_prompt(&comments);

        let a = prompt.find("## src/a.rs").unwrap();
        let b = prompt.find("## src/b.rs").unwrap();
        assert!(a < b);
        // Both b.rs remarks sit under the single b.rs heading.
        assert_eq!(prompt.matches("## src/b.rs").count(), 1);
        assert!(prompt.contains("rename this"));
        assert!(prompt.contains("off by one"));
    }

    #[test]
    fn classify_prompt_embeds_rubric_and_shape() {
        let prompt = classify_prompt(&comment(1, "src/a.rs", "unwrap can panic"));
        assert!(prompt.contains("unwrap can panic"));
        assert!(prompt.contains("false positive"));
        assert!(prompt.contains(r#"{"valid": true|false"#));
    }

    #[test]
    fn resolve_prompt_reports_deleted_files() {
        let prompt = resolve_prompt(&comment(1, "gone.rs", "tidy this"), None, &[]);
        assert!(prompt.contains("no longer exists"));
        assert!(prompt.contains("No commits have touched"));
    }
}
