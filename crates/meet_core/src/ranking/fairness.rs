//! Explanatory fairness labels. Labels never influence the sort order.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::metrics::LegMetrics;

/// Spread ceiling for "Very Fair" (7 minutes).
pub const VERY_FAIR_MAX_SPREAD_SECS: f64 = 420.0;
pub const VERY_FAIR_MAX_RATIO: f64 = 1.25;
/// Spread ceiling for "Fair" (15 minutes).
pub const FAIR_MAX_SPREAD_SECS: f64 = 900.0;
pub const FAIR_MAX_RATIO: f64 = 1.5;
/// Spreads strictly above 20 minutes are flagged.
pub const LARGE_DIFFERENCE_MIN_SPREAD_SECS: f64 = 1200.0;
/// Floor on the shortest leg when computing the max/min ratio, so a 10-second
/// trip does not blow the ratio up.
pub const RATIO_FLOOR_SECS: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FairnessLabel {
    VeryFair,
    Fair,
    LargeDifference,
}

impl FairnessLabel {
    pub fn explanation(&self) -> &'static str {
        match self {
            FairnessLabel::VeryFair => "Travel times are similar.",
            FairnessLabel::Fair => "Travel times are reasonably close.",
            FairnessLabel::LargeDifference => "Large difference in travel times.",
        }
    }
}

impl fmt::Display for FairnessLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FairnessLabel::VeryFair => "Very Fair",
            FairnessLabel::Fair => "Fair",
            FairnessLabel::LargeDifference => "Large difference",
        })
    }
}

/// `max / max(min, 60s)` over reachable legs.
pub fn time_ratio(metrics: &LegMetrics) -> Option<f64> {
    let (min, max) = (metrics.min_secs?, metrics.max_secs?);
    Some(max as f64 / (min as f64).max(RATIO_FLOOR_SECS))
}

/// Label for a candidate. Invalid candidates (any unreachable leg) get none.
pub fn classify(metrics: &LegMetrics) -> Option<FairnessLabel> {
    if !metrics.valid {
        return None;
    }
    let ratio = time_ratio(metrics)?;
    let spread = metrics.spread_secs;

    if spread <= VERY_FAIR_MAX_SPREAD_SECS && ratio <= VERY_FAIR_MAX_RATIO {
        Some(FairnessLabel::VeryFair)
    } else if spread <= FAIR_MAX_SPREAD_SECS && ratio <= FAIR_MAX_RATIO {
        Some(FairnessLabel::Fair)
    } else if spread > LARGE_DIFFERENCE_MIN_SPREAD_SECS {
        Some(FairnessLabel::LargeDifference)
    } else {
        None
    }
}
