use meet_core::ranking::{rank, EstimateTable, FairnessLabel, SortPreference, TravelEstimate, TravelTime};
use meet_core::test_helpers::{origin, venue};
use meet_core::{Candidate, CandidateId, ParticipantId, ResolvedOrigin, TravelMode};
use proptest::prelude::*;

fn two_origins() -> Vec<ResolvedOrigin> {
    vec![
        origin("a", 52.50, 13.40, TravelMode::Driving),
        origin("b", 52.54, 13.42, TravelMode::Transit),
    ]
}

fn estimates(rows: &[(&str, &str, Option<u64>)]) -> EstimateTable {
    rows.iter()
        .map(|(o, c, secs)| {
            TravelEstimate::new(
                ParticipantId::new(*o),
                CandidateId::new(*c),
                secs.map_or(TravelTime::Unreachable, TravelTime::Seconds),
            )
        })
        .collect()
}

fn ids(results: &[meet_core::RankedResult]) -> Vec<String> {
    results.iter().map(|r| r.candidate.id.to_string()).collect()
}

#[test]
fn identical_legs_are_very_fair() {
    let results = rank(
        &two_origins(),
        &[venue("x", 52.52, 13.41)],
        &estimates(&[("a", "x", Some(300)), ("b", "x", Some(300))]),
        SortPreference::Fairness,
    )
    .expect("rank");

    let x = &results[0];
    assert!(x.valid);
    assert_eq!(x.total_time_secs, 600);
    assert_eq!(x.time_spread_secs, 0.0);
    assert_eq!(x.fairness, Some(FairnessLabel::VeryFair));
}

#[test]
fn unreachable_leg_sorts_after_every_valid_venue() {
    let candidates = vec![
        venue("broken", 52.52, 13.41),
        venue("slow", 52.52, 13.41),
        venue("fast", 52.52, 13.41),
    ];
    let table = estimates(&[
        ("a", "broken", Some(10)),
        ("b", "broken", None),
        ("a", "slow", Some(3000)),
        ("b", "slow", Some(3600)),
        ("a", "fast", Some(600)),
        ("b", "fast", Some(700)),
    ]);

    for pref in [SortPreference::Fairness, SortPreference::Speed] {
        let results = rank(&two_origins(), &candidates, &table, pref).expect("rank");
        assert_eq!(results.last().map(|r| r.candidate.id.as_str()), Some("broken"));
        assert!(!results[2].valid);
        assert_eq!(results[2].fairness, None);
    }
}

#[test]
fn speed_prefers_smaller_total() {
    // P: 400 + 600 (total 1000, spread 200); Q: 200 + 700 (total 900, spread 500)
    let table = estimates(&[
        ("a", "p", Some(400)),
        ("b", "p", Some(600)),
        ("a", "q", Some(200)),
        ("b", "q", Some(700)),
    ]);
    let candidates = vec![venue("p", 52.52, 13.41), venue("q", 52.52, 13.41)];

    let by_speed = rank(&two_origins(), &candidates, &table, SortPreference::Speed).expect("rank");
    assert_eq!(ids(&by_speed), vec!["q", "p"]);

    let by_fairness =
        rank(&two_origins(), &candidates, &table, SortPreference::Fairness).expect("rank");
    assert_eq!(ids(&by_fairness), vec!["p", "q"]);
}

#[test]
fn invalid_venues_keep_their_input_order() {
    let candidates = vec![
        venue("z", 52.52, 13.41),
        venue("y", 52.52, 13.41),
        venue("x", 52.52, 13.41),
        venue("w", 52.52, 13.41),
    ];
    let table = estimates(&[
        ("a", "z", None),
        ("b", "z", Some(100)),
        ("a", "y", Some(900)),
        ("b", "y", Some(900)),
        ("a", "x", Some(50)),
        ("b", "x", None),
        ("a", "w", Some(300)),
        ("b", "w", Some(300)),
    ]);

    for pref in [SortPreference::Fairness, SortPreference::Speed] {
        let results = rank(&two_origins(), &candidates, &table, pref).expect("rank");
        assert_eq!(ids(&results), vec!["w", "y", "z", "x"]);
    }
}

#[test]
fn missing_estimates_read_as_unreachable() {
    let table = estimates(&[("a", "x", Some(100))]);
    let results = rank(&two_origins(), &[venue("x", 0.0, 0.0)], &table, SortPreference::Speed)
        .expect("rank");
    assert!(!results[0].valid);
    assert_eq!(
        results[0].time_for(&ParticipantId::new("b")),
        Some(TravelTime::Unreachable)
    );
}

// ---------------------------------------------------------------------------
// Ordering properties
// ---------------------------------------------------------------------------

fn leg() -> impl Strategy<Value = Option<u64>> {
    prop_oneof![
        9 => (0u64..7_200).prop_map(Some),
        1 => Just(None),
    ]
}

fn scenario() -> impl Strategy<Value = (Vec<Candidate>, EstimateTable)> {
    prop::collection::vec((leg(), leg()), 1..12).prop_map(|legs| {
        let mut table = EstimateTable::new();
        let mut candidates = Vec::new();
        for (i, (a, b)) in legs.into_iter().enumerate() {
            let id = format!("v{i}");
            candidates.push(venue(&id, 52.52, 13.41));
            for (origin, secs) in [("a", a), ("b", b)] {
                table.insert(TravelEstimate::new(
                    ParticipantId::new(origin),
                    CandidateId::new(id.as_str()),
                    secs.map_or(TravelTime::Unreachable, TravelTime::Seconds),
                ));
            }
        }
        (candidates, table)
    })
}

fn preference() -> impl Strategy<Value = SortPreference> {
    prop_oneof![Just(SortPreference::Fairness), Just(SortPreference::Speed)]
}

proptest! {
    #[test]
    fn ranking_is_idempotent((candidates, table) in scenario(), pref in preference()) {
        let origins = two_origins();
        let first = rank(&origins, &candidates, &table, pref).expect("rank");
        let second = rank(&origins, &candidates, &table, pref).expect("rank");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn ranked_order_is_a_fixed_point((candidates, table) in scenario(), pref in preference()) {
        let origins = two_origins();
        let first = rank(&origins, &candidates, &table, pref).expect("rank");
        let reordered: Vec<Candidate> = first.iter().map(|r| r.candidate.clone()).collect();
        let second = rank(&origins, &reordered, &table, pref).expect("rank");
        prop_assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn invalid_results_follow_valid_ones((candidates, table) in scenario(), pref in preference()) {
        let origins = two_origins();
        let results = rank(&origins, &candidates, &table, pref).expect("rank");
        let first_invalid = results.iter().position(|r| !r.valid).unwrap_or(results.len());
        prop_assert!(results[first_invalid..].iter().all(|r| !r.valid));

        let invalid_in_input_order: Vec<String> = candidates
            .iter()
            .filter(|c| {
                origins
                    .iter()
                    .any(|o| !table.get(o.id(), &c.id).is_reachable())
            })
            .map(|c| c.id.to_string())
            .collect();
        prop_assert_eq!(ids(&results[first_invalid..]), invalid_in_input_order);
    }

    #[test]
    fn equal_keys_keep_input_order(secs in 0u64..3_600, copies in 2usize..6, pref in preference()) {
        let candidates: Vec<Candidate> =
            (0..copies).map(|i| venue(&format!("v{i}"), 52.52, 13.41)).collect();
        let table: EstimateTable = candidates
            .iter()
            .flat_map(|c| {
                ["a", "b"].into_iter().map(move |o| {
                    TravelEstimate::new(ParticipantId::new(o), c.id.clone(), TravelTime::Seconds(secs))
                })
            })
            .collect();
        let results = rank(&two_origins(), &candidates, &table, pref).expect("rank");
        let expected: Vec<String> = candidates.iter().map(|c| c.id.to_string()).collect();
        prop_assert_eq!(ids(&results), expected);
    }

    #[test]
    fn valid_results_are_sorted_by_preferred_key((candidates, table) in scenario(), pref in preference()) {
        let results = rank(&two_origins(), &candidates, &table, pref).expect("rank");
        let valid: Vec<_> = results.iter().filter(|r| r.valid).collect();
        for pair in valid.windows(2) {
            match pref {
                SortPreference::Speed => prop_assert!(pair[0].total_time_secs <= pair[1].total_time_secs),
                SortPreference::Fairness => prop_assert!(pair[0].time_spread_secs <= pair[1].time_spread_secs),
            }
        }
    }
}
