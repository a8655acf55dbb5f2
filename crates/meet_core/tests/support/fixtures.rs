use std::sync::Arc;

use meet_core::config::SearchConfig;
use meet_core::test_helpers::{coordinate, venue, ScriptedGeocoder, ScriptedTravelTimes, StaticCandidates};
use meet_core::{Candidate, Coordinate, MeetingSearch, Participant, TravelMode};

/// Alice in Kreuzberg, Bob in Prenzlauer Berg.
pub const ALICE: Coordinate = Coordinate::new_unchecked(52.4970, 13.4030);
pub const BOB: Coordinate = Coordinate::new_unchecked(52.5390, 13.4240);

pub fn alice() -> Participant {
    Participant::at_address("alice", "Oranienstrasse 1, Berlin")
}

pub fn bob() -> Participant {
    Participant::at_address("bob", "Kastanienallee 10, Berlin")
}

pub fn geocoder() -> ScriptedGeocoder {
    ScriptedGeocoder::new()
        .with_address("Oranienstrasse 1, Berlin", ALICE)
        .with_address("Kastanienallee 10, Berlin", BOB)
}

/// Three cafes between Alice and Bob, ids `c1..c3`.
pub fn cafes() -> Vec<Candidate> {
    vec![
        venue("c1", 52.5100, 13.4100),
        venue("c2", 52.5200, 13.4150),
        venue("c3", 52.5300, 13.4200),
    ]
}

pub fn cafe_times() -> ScriptedTravelTimes {
    ScriptedTravelTimes::new()
        .with_batch(ALICE, &[Some(300), Some(600), Some(900)])
        .with_batch(BOB, &[Some(900), Some(600), Some(300)])
}

pub struct Fixture {
    pub geocoder: ScriptedGeocoder,
    pub candidates: Vec<Candidate>,
    pub travel_times: ScriptedTravelTimes,
    pub config: SearchConfig,
}

impl Default for Fixture {
    fn default() -> Self {
        Self {
            geocoder: geocoder(),
            candidates: cafes(),
            travel_times: cafe_times(),
            config: SearchConfig::default(),
        }
    }
}

impl Fixture {
    pub fn build(self) -> MeetingSearch {
        MeetingSearch::new(
            Arc::new(self.geocoder),
            Arc::new(StaticCandidates::new(self.candidates)),
            Arc::new(self.travel_times),
            self.config,
        )
    }
}

pub fn driver_at(id: &str, lat: f64, lng: f64) -> Participant {
    Participant::at_coordinate(id, coordinate(lat, lng)).with_mode(TravelMode::Driving)
}
