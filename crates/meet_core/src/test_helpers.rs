//! Test helpers: scripted collaborators and small fixtures.
//!
//! Shared by unit tests, integration tests and benches so each test file does
//! not hand-roll its own fake geocoder or travel-time table.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::candidate::Candidate;
use crate::error::{CandidateSearchError, GeocodeError, TravelTimeError};
use crate::geo::Coordinate;
use crate::participant::{Participant, ResolvedOrigin, TravelMode};
use crate::ports::{CandidateQuery, CandidateSearch, Geocoder, TravelTimeProvider, TravelTimeRequest};
use crate::ranking::TravelTime;

/// Central Berlin, used as a default fixture location.
pub const BERLIN_MITTE: Coordinate = Coordinate::new_unchecked(52.5200, 13.4050);

pub fn coordinate(lat: f64, lng: f64) -> Coordinate {
    Coordinate::new_unchecked(lat, lng)
}

/// A resolved origin at `(lat, lng)` travelling with `mode`.
pub fn origin(id: &str, lat: f64, lng: f64, mode: TravelMode) -> ResolvedOrigin {
    let c = coordinate(lat, lng);
    ResolvedOrigin::new(Participant::at_coordinate(id, c).with_mode(mode), c)
}

/// A venue whose display name is the upper-cased id.
pub fn venue(id: &str, lat: f64, lng: f64) -> Candidate {
    Candidate::new(id, id.to_uppercase(), coordinate(lat, lng))
}

#[derive(Debug, Clone)]
struct GeocodeScript {
    outcome: Result<Coordinate, GeocodeError>,
    delay: Duration,
}

/// Geocoder answering from a fixed script. Unknown addresses are `NotFound`.
#[derive(Debug, Default)]
pub struct ScriptedGeocoder {
    scripts: HashMap<String, GeocodeScript>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_address(self, address: &str, coordinate: Coordinate) -> Self {
        self.with_outcome(address, Ok(coordinate), Duration::ZERO)
    }

    pub fn with_failure(self, address: &str, error: GeocodeError) -> Self {
        self.with_outcome(address, Err(error), Duration::ZERO)
    }

    /// Answer with `coordinate` only after `delay` (tokio time).
    pub fn with_slow_address(self, address: &str, coordinate: Coordinate, delay: Duration) -> Self {
        self.with_outcome(address, Ok(coordinate), delay)
    }

    fn with_outcome(
        mut self,
        address: &str,
        outcome: Result<Coordinate, GeocodeError>,
        delay: Duration,
    ) -> Self {
        self.scripts
            .insert(address.to_string(), GeocodeScript { outcome, delay });
        self
    }

    /// Shared counter of `geocode` calls.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Geocoder for ScriptedGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let Some(script) = self.scripts.get(address) else {
            return Err(GeocodeError::NotFound);
        };
        if !script.delay.is_zero() {
            tokio::time::sleep(script.delay).await;
        }
        script.outcome.clone()
    }
}

#[derive(Debug, Clone)]
enum BatchScript {
    Durations(Vec<TravelTime>),
    Failure(TravelTimeError),
}

/// Travel-time provider answering per origin coordinate from a fixed script.
///
/// Origins without a script fail with a provider error. Every request is
/// recorded so tests can inspect mode and departure forwarding.
#[derive(Debug, Default)]
pub struct ScriptedTravelTimes {
    batches: Vec<(Coordinate, BatchScript, Duration)>,
    requests: Arc<Mutex<Vec<TravelTimeRequest>>>,
}

impl ScriptedTravelTimes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Durations in seconds for `origin`; `None` is unreachable.
    pub fn with_batch(mut self, origin: Coordinate, secs: &[Option<u64>]) -> Self {
        let times = secs
            .iter()
            .map(|s| s.map_or(TravelTime::Unreachable, TravelTime::Seconds))
            .collect();
        self.batches
            .push((origin, BatchScript::Durations(times), Duration::ZERO));
        self
    }

    pub fn with_failure(mut self, origin: Coordinate, error: TravelTimeError) -> Self {
        self.batches
            .push((origin, BatchScript::Failure(error), Duration::ZERO));
        self
    }

    /// Like [`with_batch`](Self::with_batch) but answers after `delay`.
    pub fn with_slow_batch(mut self, origin: Coordinate, secs: &[Option<u64>], delay: Duration) -> Self {
        let times = secs
            .iter()
            .map(|s| s.map_or(TravelTime::Unreachable, TravelTime::Seconds))
            .collect();
        self.batches
            .push((origin, BatchScript::Durations(times), delay));
        self
    }

    pub fn request_log(&self) -> Arc<Mutex<Vec<TravelTimeRequest>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl TravelTimeProvider for ScriptedTravelTimes {
    async fn travel_times(
        &self,
        request: &TravelTimeRequest,
    ) -> Result<Vec<TravelTime>, TravelTimeError> {
        if let Ok(mut log) = self.requests.lock() {
            log.push(request.clone());
        }
        let Some((_, script, delay)) = self.batches.iter().find(|(o, _, _)| *o == request.origin)
        else {
            return Err(TravelTimeError::Provider(format!(
                "no scripted batch for {}",
                request.origin
            )));
        };
        if !delay.is_zero() {
            tokio::time::sleep(*delay).await;
        }
        match script {
            BatchScript::Durations(times) => Ok(times.clone()),
            BatchScript::Failure(err) => Err(err.clone()),
        }
    }
}

/// Candidate search returning a fixed list (truncated to `max_results`).
#[derive(Debug, Default)]
pub struct StaticCandidates {
    candidates: Vec<Candidate>,
    queries: Arc<Mutex<Vec<CandidateQuery>>>,
}

impl StaticCandidates {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self {
            candidates,
            queries: Arc::default(),
        }
    }

    pub fn query_log(&self) -> Arc<Mutex<Vec<CandidateQuery>>> {
        Arc::clone(&self.queries)
    }
}

#[async_trait]
impl CandidateSearch for StaticCandidates {
    async fn search_candidates(
        &self,
        query: &CandidateQuery,
    ) -> Result<Vec<Candidate>, CandidateSearchError> {
        if let Ok(mut log) = self.queries.lock() {
            log.push(query.clone());
        }
        Ok(self
            .candidates
            .iter()
            .take(query.max_results)
            .cloned()
            .collect())
    }
}
