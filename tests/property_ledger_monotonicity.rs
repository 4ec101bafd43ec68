use chrono::Utc;
use prmend::domain::models::{Comment, Ledger};
use prmend::services::eligibility;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn comment(id: u64, resolved: bool) -> Comment {
    Comment {
        id,
        thread_id: format!("T{id}"),
        path: "src/lib.rs".into(),
        line: None,
        body: "fix".into(),
        author: "reviewer".into(),
        url: String::new(),
        created_at: Utc::now(),
        resolved,
    }
}

proptest! {
    /// Property: marking ids can only grow the ledger's sets.
    #[test]
    fn prop_marks_never_shrink(
        initial in proptest::collection::btree_set(0u64..1000, 0..30),
        added in proptest::collection::vec(0u64..1000, 0..30),
    ) {
        let mut ledger = Ledger::new();
        ledger.mark_addressed(initial.iter().copied());
        let before = ledger.addressed.clone();

        ledger.mark_addressed(added.iter().copied());

        prop_assert!(ledger.addressed.is_superset(&before));
        let expected: BTreeSet<u64> =
            before.union(&added.iter().copied().collect()).copied().collect();
        prop_assert_eq!(&ledger.addressed, &expected);
    }

    /// Property: a processed id is never eligible again, whatever else
    /// the comment feed contains.
    #[test]
    fn prop_processed_ids_stay_excluded(
        processed in proptest::collection::btree_set(0u64..100, 1..20),
        feed in proptest::collection::vec((0u64..100, any::<bool>()), 0..40),
    ) {
        let mut ledger = Ledger::new();
        for (i, id) in processed.iter().enumerate() {
            if i % 2 == 0 {
                ledger.mark_addressed([*id]);
            } else {
                ledger.mark_ignored([*id]);
            }
        }

        let comments: Vec<Comment> = feed
            .iter()
            .map(|(id, resolved)| comment(*id, *resolved))
            .collect();
        let eligible = eligibility::eligible(&comments, &ledger, None);

        for c in &eligible {
            prop_assert!(!processed.contains(&c.id));
            prop_assert!(!c.resolved);
        }
    }

    /// Property: filtering is idempotent. Re-filtering the eligible set
    /// against the same ledger changes nothing.
    #[test]
    fn prop_eligibility_is_idempotent(
        feed in proptest::collection::vec((0u64..100, any::<bool>()), 0..40),
        processed in proptest::collection::btree_set(0u64..100, 0..20),
    ) {
        let mut ledger = Ledger::new();
        ledger.mark_addressed(processed.iter().copied());

        let comments: Vec<Comment> = feed
            .iter()
            .map(|(id, resolved)| comment(*id, *resolved))
            .collect();
        let once = eligibility::eligible(&comments, &ledger, None);
        let twice = eligibility::eligible(&once, &ledger, None);

        prop_assert_eq!(once.len(), twice.len());
    }
}
