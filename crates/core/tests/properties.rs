// crates/core/tests/properties.rs
//! Property tests for the totality/idempotence/range contracts.

use std::collections::BTreeSet;

use proptest::prelude::*;
use queryscope_core::{clean_sql, cohesion, extract, FragmentSet};

fn fragment_set_strategy() -> impl Strategy<Value = FragmentSet> {
    let names = proptest::collection::btree_set("[a-z]{1,6}", 0..5);
    (names.clone(), names.clone(), names).prop_map(|(projections, selections, tables)| {
        FragmentSet {
            projections,
            selections,
            clauses: BTreeSet::new(),
            aggregations: BTreeSet::new(),
            tables,
        }
    })
}

proptest! {
    #[test]
    fn extract_is_total(input in ".*") {
        // Any string, including invalid SQL: no panic, no error.
        let _ = extract(&input);
    }

    #[test]
    fn extract_is_idempotent(input in ".*") {
        prop_assert_eq!(extract(&input), extract(&input));
    }

    #[test]
    fn clean_sql_is_total_and_idempotent(input in ".*") {
        let once = clean_sql(&input);
        prop_assert_eq!(clean_sql(&once), once.clone());
        // Canonical form is single-line.
        prop_assert!(!once.contains('\n'));
    }

    #[test]
    fn extract_of_clean_sql_is_stable(input in ".*") {
        // Re-extracting from the canonical re-serialization yields the
        // same fragments as extracting the canonical form again.
        let canonical = clean_sql(&input);
        prop_assert_eq!(extract(&canonical), extract(&clean_sql(&canonical)));
    }

    #[test]
    fn cohesion_metrics_stay_in_unit_range(
        session in proptest::collection::vec(fragment_set_strategy(), 0..8)
    ) {
        let m = cohesion(&session);
        for value in [
            m.edit_index,
            m.jaccard_index,
            m.cosine_index,
            m.common_fragments_index,
            m.common_tables_index,
        ] {
            prop_assert!((0.0..=1.0).contains(&value), "out of range: {}", value);
        }
    }

    #[test]
    fn cohesion_of_short_sessions_is_zero(fragments in fragment_set_strategy()) {
        prop_assert_eq!(cohesion(&[]), queryscope_core::CohesionMetrics::ZERO);
        prop_assert_eq!(cohesion(&[fragments]), queryscope_core::CohesionMetrics::ZERO);
    }

    #[test]
    fn constant_sessions_are_maximally_cohesive(
        fragments in fragment_set_strategy(),
        len in 2usize..6
    ) {
        let session = vec![fragments; len];
        let m = cohesion(&session);
        prop_assert!((m.edit_index - 1.0).abs() < 1e-12);
        prop_assert!((m.jaccard_index - 1.0).abs() < 1e-12);
        prop_assert!((m.cosine_index - 1.0).abs() < 1e-12);
    }
}
