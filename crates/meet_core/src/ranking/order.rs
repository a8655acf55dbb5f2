use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

use super::types::RankedResult;

/// Which key leads the ordering of valid results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortPreference {
    /// Smallest spread first, then smallest total.
    #[default]
    Fairness,
    /// Smallest total first, then smallest spread.
    Speed,
}

impl SortPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortPreference::Fairness => "FAIRNESS",
            SortPreference::Speed => "SPEED",
        }
    }

    /// Valid results precede invalid ones; invalid results compare equal so a
    /// stable sort keeps their input order.
    pub fn compare(&self, a: &RankedResult, b: &RankedResult) -> Ordering {
        match (a.valid, b.valid) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => Ordering::Equal,
            (true, true) => {
                let total = a.total_time_secs.cmp(&b.total_time_secs);
                let spread = a.time_spread_secs.total_cmp(&b.time_spread_secs);
                match self {
                    SortPreference::Speed => total.then(spread),
                    SortPreference::Fairness => spread.then(total),
                }
            }
        }
    }
}

impl fmt::Display for SortPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortPreference {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        [SortPreference::Fairness, SortPreference::Speed]
            .into_iter()
            .find(|pref| pref.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseError::UnknownSortPreference(trimmed.to_string()))
    }
}
