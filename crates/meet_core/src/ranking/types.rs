use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::candidate::{Candidate, CandidateId};
use crate::participant::ParticipantId;

use super::fairness::FairnessLabel;

/// Travel duration of one origin-to-venue leg.
///
/// `Unreachable` orders after every finite duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelTime {
    Seconds(u64),
    Unreachable,
}

impl TravelTime {
    /// Rounds to whole seconds. Negative, non-finite or unrepresentably large
    /// input is unreachable.
    pub fn from_secs_f64(secs: f64) -> Self {
        if secs.is_finite() && secs >= 0.0 && secs.round() < u64::MAX as f64 {
            TravelTime::Seconds(secs.round() as u64)
        } else {
            TravelTime::Unreachable
        }
    }

    pub fn seconds(&self) -> Option<u64> {
        match self {
            TravelTime::Seconds(s) => Some(*s),
            TravelTime::Unreachable => None,
        }
    }

    pub fn is_reachable(&self) -> bool {
        matches!(self, TravelTime::Seconds(_))
    }
}

/// Human-readable duration, e.g. `"1 hour 5 mins"`, or `"No route"`.
impl fmt::Display for TravelTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = match self {
            TravelTime::Seconds(s) => *s,
            TravelTime::Unreachable => return f.write_str("No route"),
        };
        let total_mins = (secs.saturating_add(30) / 60).max(1);
        let (hours, mins) = (total_mins / 60, total_mins % 60);
        let plural = |n: u64, one: &'static str, many: &'static str| if n == 1 { one } else { many };
        match (hours, mins) {
            (0, m) => write!(f, "{} {}", m, plural(m, "min", "mins")),
            (h, 0) => write!(f, "{} {}", h, plural(h, "hour", "hours")),
            (h, m) => write!(
                f,
                "{} {} {} {}",
                h,
                plural(h, "hour", "hours"),
                m,
                plural(m, "min", "mins")
            ),
        }
    }
}

/// One origin's travel time to one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelEstimate {
    pub origin_id: ParticipantId,
    pub candidate_id: CandidateId,
    pub duration: TravelTime,
}

impl TravelEstimate {
    pub fn new(origin_id: ParticipantId, candidate_id: CandidateId, duration: TravelTime) -> Self {
        Self {
            origin_id,
            candidate_id,
            duration,
        }
    }
}

/// Estimates keyed by `(origin, candidate)`. Missing pairs read as unreachable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EstimateTable {
    entries: HashMap<ParticipantId, HashMap<CandidateId, TravelTime>>,
}

impl EstimateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later inserts for the same pair replace earlier ones.
    pub fn insert(&mut self, estimate: TravelEstimate) {
        self.entries
            .entry(estimate.origin_id)
            .or_default()
            .insert(estimate.candidate_id, estimate.duration);
    }

    pub fn get(&self, origin: &ParticipantId, candidate: &CandidateId) -> TravelTime {
        self.entries
            .get(origin)
            .and_then(|by_candidate| by_candidate.get(candidate))
            .copied()
            .unwrap_or(TravelTime::Unreachable)
    }

    pub fn contains(&self, origin: &ParticipantId, candidate: &CandidateId) -> bool {
        self.entries
            .get(origin)
            .is_some_and(|by_candidate| by_candidate.contains_key(candidate))
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<TravelEstimate> for EstimateTable {
    fn from_iter<I: IntoIterator<Item = TravelEstimate>>(iter: I) -> Self {
        let mut table = EstimateTable::new();
        table.extend(iter);
        table
    }
}

impl Extend<TravelEstimate> for EstimateTable {
    fn extend<I: IntoIterator<Item = TravelEstimate>>(&mut self, iter: I) {
        for estimate in iter {
            self.insert(estimate);
        }
    }
}

/// A candidate with its per-origin travel times and derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub candidate: Candidate,
    /// One entry per origin, in origin order.
    pub per_origin_times: Vec<TravelEstimate>,
    /// Sum of reachable legs; unreachable legs contribute nothing.
    pub total_time_secs: u64,
    /// Max minus min over reachable legs; infinite when no leg is reachable.
    pub time_spread_secs: f64,
    /// False when any leg is unreachable.
    pub valid: bool,
    pub fairness: Option<FairnessLabel>,
}

impl RankedResult {
    pub fn time_for(&self, origin: &ParticipantId) -> Option<TravelTime> {
        self.per_origin_times
            .iter()
            .find(|e| &e.origin_id == origin)
            .map(|e| e.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_orders_last() {
        assert!(TravelTime::Seconds(u64::MAX) < TravelTime::Unreachable);
        assert!(TravelTime::Seconds(1) < TravelTime::Seconds(2));
    }

    #[test]
    fn from_secs_rounds_and_rejects_garbage() {
        assert_eq!(TravelTime::from_secs_f64(299.6), TravelTime::Seconds(300));
        assert_eq!(TravelTime::from_secs_f64(f64::INFINITY), TravelTime::Unreachable);
        assert_eq!(TravelTime::from_secs_f64(-1.0), TravelTime::Unreachable);
        assert_eq!(TravelTime::from_secs_f64(1e300), TravelTime::Unreachable);
        assert_eq!(TravelTime::from_secs_f64(u64::MAX as f64), TravelTime::Unreachable);
    }

    #[test]
    fn formats_the_largest_duration_without_overflow() {
        assert_eq!(
            TravelTime::Seconds(u64::MAX).to_string(),
            "5124095576030431 hours"
        );
    }

    #[test]
    fn formats_like_a_directions_service() {
        assert_eq!(TravelTime::Seconds(10).to_string(), "1 min");
        assert_eq!(TravelTime::Seconds(720).to_string(), "12 mins");
        assert_eq!(TravelTime::Seconds(3600).to_string(), "1 hour");
        assert_eq!(TravelTime::Seconds(3900).to_string(), "1 hour 5 mins");
        assert_eq!(TravelTime::Seconds(7260).to_string(), "2 hours 1 min");
        assert_eq!(TravelTime::Unreachable.to_string(), "No route");
    }

    #[test]
    fn missing_estimates_read_as_unreachable() {
        let a = ParticipantId::new("a");
        let x = CandidateId::new("x");
        let mut table = EstimateTable::new();
        assert_eq!(table.get(&a, &x), TravelTime::Unreachable);
        assert!(!table.contains(&a, &x));

        table.insert(TravelEstimate::new(a.clone(), x.clone(), TravelTime::Seconds(60)));
        assert_eq!(table.get(&a, &x), TravelTime::Seconds(60));
        assert_eq!(table.len(), 1);
    }
}
