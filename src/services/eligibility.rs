//! Eligibility filter: which fetched comments get acted on this cycle.
//!
//! Pure function, no hidden state: the same fetched set and ledger always
//! yield the same eligible set.

use crate::domain::models::{Comment, Ledger};

/// Compute the subset of `comments` eligible for action this cycle.
///
/// Strict narrowing, in order:
///
/// 1. Drop comments whose thread is already resolved. A thread a human or tool
///    closed is never re-considered, even if it is not in the ledger.
/// 2. If an allow-list is supplied, keep only exact (case-sensitive) author
///    matches. This is the trust boundary against prompt injection via
///    untrusted commenters and must run before any comment body reaches the
///    external actor.
/// 3. Drop ids already recorded in the ledger (addressed or ignored).
pub fn eligible(
    comments: &[Comment],
    ledger: &Ledger,
    trusted_authors: Option<&[String]>,
) -> Vec<Comment> {
    comments
        .iter()
        .filter(|c| !c.resolved)
        .filter(|c| match trusted_authors {
            Some(trusted) => trusted.iter().any(|a| a == &c.author),
            None => true,
        })
        .filter(|c| !ledger.is_processed(c.id))
        .cloned()
        .collect()
}
