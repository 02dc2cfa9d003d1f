//! Property tests for the derivation invariants.

use polars::prelude::*;
use proptest::prelude::*;

use pqip_model::PainScore;
use pqip_model::columns::{A1_TO_PS2_MINS, PS2_TO_A1_MINS, TIMESTAMP_COLUMNS};
use pqip_transform::datetime::datetime_column;
use pqip_transform::{ComplianceRecord, build_funnel, derive_intervals};

fn pain() -> impl Strategy<Value = Option<PainScore>> {
    prop_oneof![
        Just(None),
        Just(Some(PainScore::NoPain)),
        Just(Some(PainScore::Mild)),
        Just(Some(PainScore::Moderate)),
        Just(Some(PainScore::Severe)),
    ]
}

fn minutes() -> impl Strategy<Value = Option<f64>> {
    prop::option::of(-60i32..120).prop_map(|m| m.map(f64::from))
}

fn record() -> impl Strategy<Value = ComplianceRecord> {
    (pain(), minutes(), minutes(), minutes()).prop_map(
        |(first_pain, time_to_ps1, time_to_a1, a1_to_ps2)| ComplianceRecord {
            first_pain,
            time_to_ps1,
            time_to_a1,
            a1_to_ps2,
        },
    )
}

proptest! {
    #[test]
    fn funnel_is_additive_and_monotone(records in prop::collection::vec(record(), 0..200)) {
        let funnel = build_funnel(&records).unwrap();
        prop_assert!(funnel.verify().is_ok());
        prop_assert_eq!(funnel.total_patients, records.len());
        prop_assert_eq!(
            funnel.best_practice_yes + funnel.best_practice_no,
            funnel.total_patients
        );
    }

    #[test]
    fn reversed_interval_is_exact_negation(
        offsets in prop::collection::vec(
            prop::array::uniform5(prop::option::of(0i64..100_000)),
            1..50,
        )
    ) {
        let base = 1_704_067_200_000i64;
        let columns: Vec<Column> = TIMESTAMP_COLUMNS
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let millis = offsets
                    .iter()
                    .map(|row| row[idx].map(|minutes| base + minutes * 60_000))
                    .collect();
                datetime_column(name, millis).unwrap()
            })
            .collect();
        let df = DataFrame::new(columns).unwrap();
        let df = derive_intervals(df, "%d-%b-%y %H:%M").unwrap().data;

        let forward = df.column(A1_TO_PS2_MINS).unwrap().f64().unwrap();
        let reverse = df.column(PS2_TO_A1_MINS).unwrap().f64().unwrap();
        for (a, b) in forward.into_iter().zip(reverse.into_iter()) {
            match (a, b) {
                (Some(a), Some(b)) => prop_assert_eq!(a.to_bits(), (-b).to_bits()),
                (None, None) => {}
                other => prop_assert!(false, "null mismatch: {:?}", other),
            }
        }
    }
}
