use std::sync::Arc;

use meet_core::config::SearchConfig;
use meet_core::ports::{TravelTimeProvider, TravelTimeRequest};
use meet_core::providers::{
    build_travel_time_provider, CachedTravelTimes, EstimatedTravelTimes, GazetteerGeocoder,
    TravelTimeProviderKind, VenueCatalog,
};
use meet_core::test_helpers::coordinate;
use meet_core::{
    Candidate, Coordinate, MeetingSearch, Participant, SearchRequest, TravelMode, TravelTime,
};

fn request(mode: TravelMode) -> TravelTimeRequest {
    TravelTimeRequest {
        origin: coordinate(52.497, 13.403),
        destinations: vec![coordinate(52.52, 13.415), coordinate(52.70, 13.40)],
        mode,
        departure: None,
    }
}

#[tokio::test]
async fn default_kind_builds_estimates() {
    let provider = build_travel_time_provider(&TravelTimeProviderKind::default(), 100);
    let times = provider.travel_times(&request(TravelMode::Driving)).await.expect("times");
    assert_eq!(times.len(), 2);
    assert!(times.iter().all(TravelTime::is_reachable));
    assert!(times[0] < times[1]);
}

#[tokio::test]
async fn walking_far_is_unreachable_but_driving_is_not() {
    let provider = EstimatedTravelTimes::default();
    let walking = provider.travel_times(&request(TravelMode::Walking)).await.expect("walk");
    assert!(walking[0].is_reachable());
    assert_eq!(walking[1], TravelTime::Unreachable);
}

#[tokio::test]
async fn cache_serves_repeat_estimates() {
    let cached = CachedTravelTimes::new(Arc::new(EstimatedTravelTimes::default()), 10);
    let first = cached.travel_times(&request(TravelMode::Transit)).await.expect("first");
    let second = cached.travel_times(&request(TravelMode::Transit)).await.expect("second");
    assert_eq!(first, second);
    assert_eq!(cached.len(), 2);
}

#[tokio::test]
async fn offline_stack_runs_a_full_search() {
    let gazetteer = GazetteerGeocoder::new()
        .with_entry("Oranienstrasse 1, Berlin", Coordinate::new_unchecked(52.4970, 13.4030))
        .with_entry("Kastanienallee 10, Berlin", Coordinate::new_unchecked(52.5390, 13.4240));
    let catalog = VenueCatalog::new([
        Candidate::new("mid", "Mitte Coffee", coordinate(52.5180, 13.4135)).with_category("cafe"),
        Candidate::new("south", "Kreuzberg Coffee", coordinate(52.4980, 13.4040))
            .with_category("cafe"),
        Candidate::new("beer", "Beer Hall", coordinate(52.5180, 13.4135)).with_category("bar"),
    ]);
    let config = SearchConfig::default();
    let search = MeetingSearch::new(
        Arc::new(gazetteer),
        Arc::new(catalog),
        build_travel_time_provider(&config.travel_time_provider, config.cache_capacity),
        config,
    );
    let request = SearchRequest::new(
        vec![
            Participant::at_address("alice", "oranienstrasse 1, berlin"),
            Participant::at_address("bob", "Kastanienallee 10, Berlin"),
        ],
        "coffee",
    );

    let outcome = search.run(&request).await.expect("search");

    let ids: Vec<&str> = outcome.results.iter().map(|r| r.candidate.id.as_str()).collect();
    assert_eq!(ids, vec!["mid", "south"]);
    assert!(outcome.results.iter().all(|r| r.valid));
}
