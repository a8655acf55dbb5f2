//! Fairness ranking engine.
//!
//! Given resolved origins, candidate venues and a table of per-origin travel
//! times, [`rank`] derives each venue's total travel time, the spread between
//! the slowest and fastest participant, a validity flag and an explanatory
//! fairness label, then orders the venues by the caller's [`SortPreference`].
//!
//! The ordering is a stable total order:
//!
//! 1. valid venues before venues with any unreachable leg;
//! 2. among valid venues, the preferred key then the other key, ascending;
//! 3. remaining ties keep their input order.
//!
//! This is a pure function of its inputs: no I/O, no hidden state.

pub mod fairness;
pub mod metrics;
pub mod order;
pub mod types;

use crate::candidate::Candidate;
use crate::error::RankError;
use crate::participant::ResolvedOrigin;

pub use fairness::{classify, time_ratio, FairnessLabel};
pub use metrics::LegMetrics;
pub use order::SortPreference;
pub use types::{EstimateTable, RankedResult, TravelEstimate, TravelTime};

/// Rank `candidates` for `origins` using the travel times in `estimates`.
///
/// Missing `(origin, candidate)` estimates are treated as unreachable.
///
/// # Errors
///
/// - [`RankError::NoOrigins`] when fewer than two origins are supplied.
/// - [`RankError::NoCandidates`] when `candidates` is empty.
pub fn rank(
    origins: &[ResolvedOrigin],
    candidates: &[Candidate],
    estimates: &EstimateTable,
    sort_preference: SortPreference,
) -> Result<Vec<RankedResult>, RankError> {
    if origins.len() < 2 {
        return Err(RankError::NoOrigins(origins.len()));
    }
    if candidates.is_empty() {
        return Err(RankError::NoCandidates);
    }

    let mut results: Vec<RankedResult> = candidates
        .iter()
        .map(|candidate| score_candidate(origins, candidate, estimates))
        .collect();

    // `sort_by` is stable, which the tie rules rely on.
    results.sort_by(|a, b| sort_preference.compare(a, b));
    Ok(results)
}

fn score_candidate(
    origins: &[ResolvedOrigin],
    candidate: &Candidate,
    estimates: &EstimateTable,
) -> RankedResult {
    let per_origin_times: Vec<TravelEstimate> = origins
        .iter()
        .map(|origin| {
            TravelEstimate::new(
                origin.id().clone(),
                candidate.id.clone(),
                estimates.get(origin.id(), &candidate.id),
            )
        })
        .collect();

    let metrics = LegMetrics::from_times(per_origin_times.iter().map(|e| e.duration));

    RankedResult {
        candidate: candidate.clone(),
        per_origin_times,
        total_time_secs: metrics.total_secs,
        time_spread_secs: metrics.spread_secs,
        valid: metrics.valid,
        fairness: classify(&metrics),
    }
}
