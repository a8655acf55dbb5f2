//! End-to-end meeting search.
//!
//! ```text
//! SearchRequest
//!   -> GeometryResolver::resolve       (concurrent geocoding, per-address timeout)
//!   -> CandidateSearch                 (centroid/radius bias, filters, cap)
//!   -> TravelTimeProvider x origins    (concurrent batches, per-batch timeout)
//!   -> BatchFailurePolicy              (degrade or abort on failed batches)
//!   -> rank                            (pure)
//!   -> SearchOutcome + SearchSummary
//! ```
//!
//! Each run returns an owned [`SearchOutcome`]; nothing is kept between runs,
//! so a newer search simply replaces the caller's previous bundle.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn, Instrument};

use crate::candidate::{Candidate, CandidateFilters};
use crate::config::{BatchFailurePolicy, SearchConfig};
use crate::error::{RankError, SearchError, TravelTimeError};
use crate::geo::Coordinate;
use crate::participant::{Participant, ParticipantId, ResolvedOrigin};
use crate::ports::{
    effective_departure, CandidateQuery, CandidateSearch, Geocoder, LocationBias,
    TravelTimeProvider, TravelTimeRequest,
};
use crate::ranking::{rank, EstimateTable, RankedResult, SortPreference, TravelEstimate, TravelTime};
use crate::resolver::{GeometryResolver, Resolution};

/// Venue names kept in a [`SearchSummary`].
pub const SUMMARY_RECOMMENDATIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub participants: Vec<Participant>,
    /// Free-text venue type, e.g. `"coffee shop"`.
    pub query: String,
    #[serde(default)]
    pub filters: CandidateFilters,
    #[serde(default)]
    pub sort_preference: SortPreference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<DateTime<Utc>>,
}

impl SearchRequest {
    pub fn new(participants: Vec<Participant>, query: impl Into<String>) -> Self {
        Self {
            participants,
            query: query.into(),
            filters: CandidateFilters::default(),
            sort_preference: SortPreference::default(),
            departure_time: None,
        }
    }

    pub fn with_filters(mut self, filters: CandidateFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_sort_preference(mut self, sort_preference: SortPreference) -> Self {
        self.sort_preference = sort_preference;
        self
    }

    pub fn with_departure_time(mut self, departure_time: DateTime<Utc>) -> Self {
        self.departure_time = Some(departure_time);
        self
    }
}

/// Compact record of a finished search, suitable for a history list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSummary {
    pub searched_at: DateTime<Utc>,
    pub query: String,
    /// What each participant entered (address text, or `lat,lng`).
    pub addresses: Vec<String>,
    pub top_result: Option<RankedResult>,
    /// Display names of the first few results, in ranked order.
    pub recommendations: Vec<String>,
}

impl SearchSummary {
    fn new(
        request: &SearchRequest,
        results: &[RankedResult],
        searched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            searched_at,
            query: request.query.trim().to_string(),
            addresses: request
                .participants
                .iter()
                .map(|p| p.location.display_text())
                .collect(),
            top_result: results.first().cloned(),
            recommendations: results
                .iter()
                .take(SUMMARY_RECOMMENDATIONS)
                .map(|r| r.candidate.display_name.clone())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub resolution: Resolution,
    /// Venues returned by the candidate search, in search order.
    pub candidates: Vec<Candidate>,
    pub results: Vec<RankedResult>,
    pub sort_preference: SortPreference,
    /// Origins whose whole travel-time batch failed and were marked unreachable.
    pub degraded_origins: Vec<ParticipantId>,
    pub summary: SearchSummary,
}

impl SearchOutcome {
    /// Re-rank the same venues and travel times under another preference,
    /// without querying any collaborator again.
    pub fn reranked(&self, sort_preference: SortPreference) -> Result<Vec<RankedResult>, RankError> {
        let estimates: EstimateTable = self
            .results
            .iter()
            .flat_map(|r| r.per_origin_times.iter().cloned())
            .collect();
        rank(&self.resolution.origins, &self.candidates, &estimates, sort_preference)
    }
}

pub struct MeetingSearch {
    resolver: GeometryResolver,
    candidates: Arc<dyn CandidateSearch>,
    travel_times: Arc<dyn TravelTimeProvider>,
    config: SearchConfig,
}

impl MeetingSearch {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        candidates: Arc<dyn CandidateSearch>,
        travel_times: Arc<dyn TravelTimeProvider>,
        config: SearchConfig,
    ) -> Self {
        Self {
            resolver: GeometryResolver::new(geocoder, config.geocode_timeout()),
            candidates,
            travel_times,
            config,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub async fn run(&self, request: &SearchRequest) -> Result<SearchOutcome, SearchError> {
        self.run_at(request, Utc::now()).await
    }

    /// Run with an explicit "now", which drives the departure-time policy and
    /// the summary timestamp.
    pub async fn run_at(
        &self,
        request: &SearchRequest,
        now: DateTime<Utc>,
    ) -> Result<SearchOutcome, SearchError> {
        let span = info_span!(
            "meeting_search",
            query = %request.query.trim(),
            participants = request.participants.len()
        );
        self.execute(request, now).instrument(span).await
    }

    async fn execute(
        &self,
        request: &SearchRequest,
        now: DateTime<Utc>,
    ) -> Result<SearchOutcome, SearchError> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let resolution = self.resolver.resolve(&request.participants).await?;

        let candidate_query = CandidateQuery {
            text: query.to_string(),
            bias: LocationBias {
                center: resolution.centroid,
                radius_m: resolution.radius_m,
            },
            filters: request.filters,
            max_results: self.config.max_candidates,
        };
        let candidates = dedup_candidates(self.candidates.search_candidates(&candidate_query).await?);
        let candidates: Vec<Candidate> = candidates
            .into_iter()
            .take(self.config.max_candidates)
            .collect();
        if candidates.is_empty() {
            info!("candidate search returned no venues");
            return Err(SearchError::NoCandidates);
        }

        let (estimates, degraded_origins) = self
            .fetch_travel_times(&resolution.origins, &candidates, request.departure_time, now)
            .await?;

        let results = rank(
            &resolution.origins,
            &candidates,
            &estimates,
            request.sort_preference,
        )?;
        info!(
            candidates = candidates.len(),
            valid = results.iter().filter(|r| r.valid).count(),
            degraded = degraded_origins.len(),
            "search complete"
        );

        let summary = SearchSummary::new(request, &results, now);
        Ok(SearchOutcome {
            resolution,
            candidates,
            results,
            sort_preference: request.sort_preference,
            degraded_origins,
            summary,
        })
    }

    /// One batch per origin, all settled before the failure policy applies.
    async fn fetch_travel_times(
        &self,
        origins: &[ResolvedOrigin],
        candidates: &[Candidate],
        departure: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<(EstimateTable, Vec<ParticipantId>), SearchError> {
        let destinations: Vec<Coordinate> = candidates.iter().map(|c| c.coordinate).collect();

        let batches = origins.iter().map(|origin| {
            let mode = origin.travel_mode();
            let request = TravelTimeRequest {
                origin: origin.coordinate,
                destinations: destinations.clone(),
                mode,
                departure: effective_departure(mode, departure, now),
            };
            async move { self.fetch_batch(&request).await }
        });
        let settled = join_all(batches).await;

        let mut estimates = EstimateTable::new();
        let mut degraded = Vec::new();
        for (origin, outcome) in origins.iter().zip(settled) {
            let times = match outcome {
                Ok(times) => times,
                Err(err) => match self.config.batch_failure {
                    BatchFailurePolicy::Abort => {
                        warn!(origin = %origin.id(), error = %err, "travel-time batch failed, aborting search");
                        return Err(SearchError::TravelTimeFailure {
                            origin: origin.id().clone(),
                            source: err,
                        });
                    }
                    BatchFailurePolicy::Degrade => {
                        warn!(origin = %origin.id(), error = %err, "travel-time batch failed, marking legs unreachable");
                        degraded.push(origin.id().clone());
                        vec![TravelTime::Unreachable; candidates.len()]
                    }
                },
            };
            estimates.extend(candidates.iter().zip(times).map(|(candidate, duration)| {
                TravelEstimate::new(origin.id().clone(), candidate.id.clone(), duration)
            }));
        }
        Ok((estimates, degraded))
    }

    async fn fetch_batch(
        &self,
        request: &TravelTimeRequest,
    ) -> Result<Vec<TravelTime>, TravelTimeError> {
        let times = tokio::time::timeout(
            self.config.travel_time_timeout(),
            self.travel_times.travel_times(request),
        )
        .await
        .map_err(|_| TravelTimeError::Timeout)??;
        if times.len() != request.destinations.len() {
            return Err(TravelTimeError::LengthMismatch {
                expected: request.destinations.len(),
                got: times.len(),
            });
        }
        debug!(origin = %request.origin, mode = %request.mode, legs = times.len(), "travel-time batch settled");
        Ok(times)
    }
}

/// Drop repeated venue ids, keeping the first occurrence.
fn dedup_candidates(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen = HashSet::with_capacity(candidates.len());
    candidates
        .into_iter()
        .filter(|c| {
            let fresh = seen.insert(c.id.clone());
            if !fresh {
                debug!(venue = %c.id, "dropping duplicate venue");
            }
            fresh
        })
        .collect()
}
