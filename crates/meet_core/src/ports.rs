//! Collaborator interfaces.
//!
//! The search pipeline makes no network calls itself. Geocoding, venue search
//! and travel-time lookup go through these traits so backends can be swapped
//! (see [`crate::providers`]). Implementations must be `Send + Sync` so the
//! pipeline can share them as `Arc<dyn ...>` across concurrent requests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::candidate::{Candidate, CandidateFilters};
use crate::error::{CandidateSearchError, GeocodeError, TravelTimeError};
use crate::geo::Coordinate;
use crate::participant::TravelMode;
use crate::ranking::TravelTime;

/// Default cap on venues returned by a candidate search.
pub const DEFAULT_MAX_RESULTS: usize = 10;

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve free-text `address` to a coordinate.
    async fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError>;
}

/// Soft preference for results near `center`. Not a hard filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationBias {
    pub center: Coordinate,
    pub radius_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateQuery {
    /// Free-text venue type, e.g. `"coffee shop"`.
    pub text: String,
    pub bias: LocationBias,
    pub filters: CandidateFilters,
    pub max_results: usize,
}

#[async_trait]
pub trait CandidateSearch: Send + Sync {
    /// Return at most `query.max_results` venues.
    async fn search_candidates(
        &self,
        query: &CandidateQuery,
    ) -> Result<Vec<Candidate>, CandidateSearchError>;
}

/// One origin against every destination of a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelTimeRequest {
    pub origin: Coordinate,
    pub destinations: Vec<Coordinate>,
    pub mode: TravelMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait TravelTimeProvider: Send + Sync {
    /// Durations from `request.origin` to each destination, in destination
    /// order. Unroutable legs are [`TravelTime::Unreachable`], not errors.
    async fn travel_times(
        &self,
        request: &TravelTimeRequest,
    ) -> Result<Vec<TravelTime>, TravelTimeError>;
}

/// Departure time actually sent to the travel-time provider.
///
/// Transit always departs at some instant (the requested one, else `now`).
/// Driving only forwards a departure that is not in the past, since traffic
/// models reject historic departures. Walking and cycling ignore it.
pub fn effective_departure(
    mode: TravelMode,
    requested: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match mode {
        TravelMode::Transit => Some(requested.unwrap_or(now)),
        TravelMode::Driving => requested.filter(|departure| *departure >= now),
        TravelMode::Walking | TravelMode::Bicycling => None,
    }
}
