use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

impl CandidateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A venue returned by the candidate search collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub display_name: String,
    pub coordinate: Coordinate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_rating_count: Option<u32>,
    /// 0 (free) to 4 (very expensive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Candidate {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id: CandidateId::new(id),
            display_name: display_name.into(),
            coordinate,
            rating: None,
            user_rating_count: None,
            price_level: None,
            formatted_address: None,
            category: None,
        }
    }

    pub fn with_rating(mut self, rating: f64, count: u32) -> Self {
        self.rating = Some(rating);
        self.user_rating_count = Some(count);
        self
    }

    pub fn with_price_level(mut self, level: u8) -> Self {
        self.price_level = Some(level);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.formatted_address = Some(address.into());
        self
    }
}

/// Optional venue filters forwarded to the candidate search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price_level: Option<u8>,
}

impl CandidateFilters {
    /// Unrated venues fail a minimum-rating filter; venues without a price
    /// level pass a price filter.
    pub fn accepts(&self, candidate: &Candidate) -> bool {
        let rating_ok = match self.min_rating {
            Some(min) => candidate.rating.is_some_and(|r| r >= min),
            None => true,
        };
        let price_ok = match (self.max_price_level, candidate.price_level) {
            (Some(max), Some(level)) => level <= max,
            _ => true,
        };
        rating_ok && price_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venue() -> Candidate {
        Candidate::new("v1", "Cafe", Coordinate::new_unchecked(0.0, 0.0))
    }

    #[test]
    fn empty_filters_accept_everything() {
        assert!(CandidateFilters::default().accepts(&venue()));
    }

    #[test]
    fn min_rating_rejects_unrated_and_low_rated() {
        let filters = CandidateFilters {
            min_rating: Some(4.0),
            max_price_level: None,
        };
        assert!(!filters.accepts(&venue()));
        assert!(!filters.accepts(&venue().with_rating(3.9, 10)));
        assert!(filters.accepts(&venue().with_rating(4.0, 10)));
    }

    #[test]
    fn max_price_ignores_unknown_price() {
        let filters = CandidateFilters {
            min_rating: None,
            max_price_level: Some(2),
        };
        assert!(filters.accepts(&venue()));
        assert!(filters.accepts(&venue().with_price_level(2)));
        assert!(!filters.accepts(&venue().with_price_level(3)));
    }
}
