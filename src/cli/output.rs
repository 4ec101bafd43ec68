//! Output formatting utilities for the CLI.

use crate::domain::models::{Comment, RunRecord};
use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};
use serde::Serialize;

pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;
    fn to_json(&self) -> serde_json::Value;
}

pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&result.to_json()).unwrap_or_default()
        );
    } else {
        println!("{}", result.to_human());
    }
}

/// Truncate a string to a maximum number of characters, appending "..." if
/// truncated. Counts chars, not bytes, so multibyte text never splits.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Format run history as a table.
pub fn run_history_table(runs: &[RunRecord]) -> String {
    let mut table = base_table();
    table.set_header(vec![
        Cell::new("Started").add_attribute(Attribute::Bold),
        Cell::new("Eligible").add_attribute(Attribute::Bold),
        Cell::new("Addressed").add_attribute(Attribute::Bold),
        Cell::new("Commit").add_attribute(Attribute::Bold),
    ]);

    for run in runs {
        table.add_row(vec![
            Cell::new(run.started_at.format("%Y-%m-%d %H:%M:%S").to_string()),
            Cell::new(run.eligible_count.to_string()),
            Cell::new(run.addressed_count.to_string()),
            Cell::new(run.commit_sha.as_deref().unwrap_or("-")),
        ]);
    }

    table.to_string()
}

/// Format a dry-run preview of eligible comments as a table.
pub fn preview_table(comments: &[Comment]) -> String {
    let mut table = base_table();
    table.set_header(vec![
        Cell::new("ID").add_attribute(Attribute::Bold),
        Cell::new("Location").add_attribute(Attribute::Bold),
        Cell::new("Author").add_attribute(Attribute::Bold),
        Cell::new("Comment").add_attribute(Attribute::Bold),
    ]);

    for comment in comments {
        table.add_row(vec![
            Cell::new(comment.id.to_string()),
            Cell::new(truncate(&comment.location(), 40)),
            Cell::new(&comment.author),
            Cell::new(comment.excerpt(60)),
        ]);
    }

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn truncate_short_strings_untouched() {
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn truncate_long_strings_get_ellipsis() {
        assert_eq!(truncate("a very long string", 10), "a very ...");
    }

    #[test]
    fn truncate_cuts_multibyte_text_on_char_boundaries() {
        let body = "é".repeat(80);
        let out = truncate(&body, 60);
        assert_eq!(out.chars().count(), 60);
        assert!(out.ends_with("..."));

        assert_eq!(truncate("日本語のコメント", 60), "日本語のコメント");
    }

    #[test]
    fn preview_table_renders_multibyte_bodies() {
        let comment = Comment {
            id: 1,
            thread_id: "T1".into(),
            path: "src/lib.rs".into(),
            line: Some(3),
            body: "変数名をもっと説明的にしてください。".repeat(10),
            author: "reviewer".into(),
            url: String::new(),
            created_at: Utc::now(),
            resolved: false,
        };
        let rendered = preview_table(&[comment]);
        assert!(rendered.contains("変数名"));
    }

    #[test]
    fn run_history_table_includes_counts() {
        let runs = vec![RunRecord {
            started_at: Utc::now(),
            eligible_count: 3,
            addressed_count: 2,
            commit_sha: Some("abc123".into()),
        }];
        let rendered = run_history_table(&runs);
        assert!(rendered.contains("abc123"));
        assert!(rendered.contains("Addressed"));
    }
}
