//! Property tests for the group comparison and summaries.

use proptest::prelude::*;

use pqip_report::stats::GroupSample;
use pqip_report::{StatsStatus, compare_groups, median};

fn sample(label: &'static str) -> impl Strategy<Value = GroupSample> {
    prop::collection::vec((0i32..60).prop_map(f64::from), 1..12).prop_map(move |values| {
        GroupSample {
            label: label.to_string(),
            values,
        }
    })
}

proptest! {
    #[test]
    fn p_values_are_probabilities(
        a in sample("a"),
        b in sample("b"),
        c in sample("c"),
        three in any::<bool>(),
    ) {
        let groups = if three { vec![a, b, c] } else { vec![a, b] };
        let result = compare_groups(&groups);
        prop_assert_eq!(result.group_count, groups.len());
        if result.status == StatsStatus::Completed {
            let p = result.p_value.unwrap();
            prop_assert!((0.0..=1.0).contains(&p), "p = {p}");
            prop_assert_eq!(result.significant, p < 0.05);
        } else {
            prop_assert_eq!(result.status, StatsStatus::Error);
        }
    }

    #[test]
    fn two_group_test_ignores_group_order(a in sample("a"), b in sample("b")) {
        let forward = compare_groups(&[a.clone(), b.clone()]);
        let backward = compare_groups(&[b, a]);
        prop_assert_eq!(forward.status, backward.status);
        if let (Some(p1), Some(p2)) = (forward.p_value, backward.p_value) {
            prop_assert!((p1 - p2).abs() < 1e-9, "{p1} vs {p2}");
        }
    }

    #[test]
    fn median_lies_within_range(values in prop::collection::vec(-500.0f64..500.0, 1..50)) {
        let m = median(&values).unwrap();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(min <= m && m <= max);
    }
}
