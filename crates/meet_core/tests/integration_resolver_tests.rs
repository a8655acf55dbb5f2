mod support;

use std::sync::Arc;
use std::time::Duration;

use meet_core::error::GeocodeError;
use meet_core::geo::{haversine_m, MAX_SEARCH_RADIUS_M, MIN_SEARCH_RADIUS_M};
use meet_core::resolver::{GeometryResolver, Resolution};
use meet_core::test_helpers::{coordinate, ScriptedGeocoder};
use meet_core::{Coordinate, Participant, ResolveError, ResolvedOrigin};
use proptest::prelude::*;

use support::fixtures::{alice, bob, geocoder, ALICE, BOB};

fn resolver(geocoder: ScriptedGeocoder) -> GeometryResolver {
    GeometryResolver::new(Arc::new(geocoder), Duration::from_secs(8))
}

#[tokio::test]
async fn equator_pair_centres_between_them() {
    let participants = vec![
        Participant::at_coordinate("a", coordinate(0.0, 0.0)),
        Participant::at_coordinate("b", coordinate(0.0, 2.0)),
    ];
    let resolution = resolver(ScriptedGeocoder::new())
        .resolve(&participants)
        .await
        .expect("resolve");

    assert_eq!(resolution.centroid, coordinate(0.0, 1.0));
    let expected = haversine_m(coordinate(0.0, 0.0), coordinate(0.0, 1.0))
        .clamp(MIN_SEARCH_RADIUS_M, MAX_SEARCH_RADIUS_M);
    assert_eq!(resolution.radius_m, expected);
}

#[tokio::test]
async fn nearby_origins_get_the_minimum_radius() {
    let participants = vec![
        Participant::at_coordinate("a", coordinate(52.52, 13.4050)),
        Participant::at_coordinate("b", coordinate(52.52, 13.4060)),
    ];
    let resolution = resolver(ScriptedGeocoder::new())
        .resolve(&participants)
        .await
        .expect("resolve");
    assert_eq!(resolution.radius_m, MIN_SEARCH_RADIUS_M);
}

#[tokio::test]
async fn addresses_are_geocoded_and_keep_input_order() {
    let participants = vec![bob(), alice()];
    let resolution = resolver(geocoder()).resolve(&participants).await.expect("resolve");

    let coordinates: Vec<Coordinate> = resolution.origins.iter().map(|o| o.coordinate).collect();
    assert_eq!(coordinates, vec![BOB, ALICE]);
    assert_eq!(resolution.origins[0].id().as_str(), "bob");
}

#[tokio::test]
async fn one_of_three_resolving_is_insufficient() {
    let participants = vec![
        alice(),
        Participant::at_address("ghost", "Nowhere Street 0"),
        Participant::at_address("blank", ""),
    ];
    let err = resolver(geocoder())
        .resolve(&participants)
        .await
        .expect_err("only one origin");
    assert_eq!(
        err,
        ResolveError::InsufficientOrigins {
            resolved: 1,
            submitted: 3
        }
    );
}

#[tokio::test]
async fn failed_lookup_is_dropped_when_two_remain() {
    let geocoder = geocoder().with_failure("Broken Road", GeocodeError::Provider("503".into()));
    let participants = vec![alice(), bob(), Participant::at_address("carol", "Broken Road")];
    let resolution = resolver(geocoder).resolve(&participants).await.expect("resolve");
    assert_eq!(resolution.origins.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn slow_geocode_is_dropped_after_timeout() {
    let geocoder = geocoder().with_slow_address(
        "Slow Lane 9",
        coordinate(52.45, 13.30),
        Duration::from_secs(30),
    );
    let participants = vec![alice(), bob(), Participant::at_address("slow", "Slow Lane 9")];
    let resolution = resolver(geocoder).resolve(&participants).await.expect("resolve");

    let ids: Vec<&str> = resolution.origins.iter().map(|o| o.id().as_str()).collect();
    assert_eq!(ids, vec!["alice", "bob"]);
}

#[tokio::test(start_paused = true)]
async fn slow_geocode_within_timeout_is_kept() {
    let geocoder = geocoder().with_slow_address(
        "Slow Lane 9",
        coordinate(52.45, 13.30),
        Duration::from_secs(2),
    );
    let participants = vec![alice(), bob(), Participant::at_address("slow", "Slow Lane 9")];
    let resolution = resolver(geocoder).resolve(&participants).await.expect("resolve");
    assert_eq!(resolution.origins.len(), 3);
}

#[tokio::test]
async fn geocoding_runs_for_every_address() {
    let geocoder = geocoder();
    let calls = geocoder.call_counter();
    let participants = vec![
        alice(),
        bob(),
        Participant::at_coordinate("carol", coordinate(52.5, 13.4)),
    ];
    resolver(geocoder).resolve(&participants).await.expect("resolve");
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
}

fn origin_set() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((-60.0f64..60.0, -170.0f64..170.0), 2..=5)
}

proptest! {
    #[test]
    fn centroid_is_the_mean_and_radius_is_clamped(points in origin_set()) {
        let origins: Vec<ResolvedOrigin> = points
            .iter()
            .enumerate()
            .map(|(i, (lat, lng))| {
                let c = coordinate(*lat, *lng);
                ResolvedOrigin::new(Participant::at_coordinate(format!("p{i}"), c), c)
            })
            .collect();
        let resolution = Resolution::from_origins(origins).expect("resolution");

        let n = points.len() as f64;
        let mean_lat = points.iter().map(|(lat, _)| lat).sum::<f64>() / n;
        let mean_lng = points.iter().map(|(_, lng)| lng).sum::<f64>() / n;
        prop_assert!((resolution.centroid.lat - mean_lat).abs() < 1e-9);
        prop_assert!((resolution.centroid.lng - mean_lng).abs() < 1e-9);
        prop_assert!(resolution.radius_m >= MIN_SEARCH_RADIUS_M);
        prop_assert!(resolution.radius_m <= MAX_SEARCH_RADIUS_M);
    }
}
