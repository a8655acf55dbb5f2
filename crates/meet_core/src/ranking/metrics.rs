use super::types::TravelTime;

/// Aggregate of one candidate's legs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegMetrics {
    pub total_secs: u64,
    pub spread_secs: f64,
    pub min_secs: Option<u64>,
    pub max_secs: Option<u64>,
    pub valid: bool,
}

impl LegMetrics {
    /// Unreachable legs are excluded from the sum and the spread but make the
    /// result invalid.
    pub fn from_times<I>(times: I) -> Self
    where
        I: IntoIterator<Item = TravelTime>,
    {
        let mut total_secs = 0_u64;
        let mut min_secs: Option<u64> = None;
        let mut max_secs: Option<u64> = None;
        let mut valid = true;

        for time in times {
            match time {
                TravelTime::Seconds(secs) => {
                    total_secs = total_secs.saturating_add(secs);
                    min_secs = Some(min_secs.map_or(secs, |m| m.min(secs)));
                    max_secs = Some(max_secs.map_or(secs, |m| m.max(secs)));
                }
                TravelTime::Unreachable => valid = false,
            }
        }

        let spread_secs = match (min_secs, max_secs) {
            (Some(min), Some(max)) => (max - min) as f64,
            _ => f64::INFINITY,
        };

        Self {
            total_secs,
            spread_secs,
            min_secs,
            max_secs,
            valid,
        }
    }
}
