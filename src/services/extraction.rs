//! Structured-output extraction from actor transcripts.
//!
//! Actor transcripts interleave diagnostic preamble, tool-call traces and
//! thinking text with the answer. The answer is the *last* well-formed JSON
//! fragment that deserializes into the expected shape. The scan is
//! non-greedy: each candidate is the shortest balanced object from its opening
//! brace, so a span can never stretch from the first `{` of a tool-call echo
//! to the last `}` of the transcript.

use crate::domain::ports::EngineError;
use serde::de::DeserializeOwned;

/// Extract the last JSON fragment in `transcript` that deserializes to `T`.
pub fn extract_last_fragment<T: DeserializeOwned>(transcript: &str) -> Result<T, EngineError> {
    let mut found: Option<T> = None;
    let mut pos = 0;

    while let Some(offset) = transcript[pos..].find('{') {
        let start = pos + offset;
        match balanced_object_end(&transcript[start..]) {
            Some(len) => {
                let candidate = &transcript[start..start + len];
                match serde_json::from_str::<T>(candidate) {
                    Ok(value) => {
                        found = Some(value);
                        // Skip the whole fragment; later fragments win.
                        pos = start + len;
                    }
                    // Balanced but not our shape: step inside, the intended
                    // record may be nested in a larger echo.
                    Err(_) => pos = start + 1,
                }
            }
            None => pos = start + 1,
        }
    }

    found.ok_or_else(|| {
        EngineError::ParseFailure(format!(
            "no well-formed structured fragment in {} chars of transcript",
            transcript.len()
        ))
    })
}

/// Length of the shortest balanced `{...}` span at the start of `s`, honoring
/// string literals and escapes. `None` when the object never closes.
fn balanced_object_end(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in s.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + ch.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}
