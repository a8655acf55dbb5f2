//! Error taxonomy for meeting searches.
//!
//! - [`ResolveError`]: the participant set cannot produce at least two origins.
//!   Surfaced to the user as a validation failure; never retried.
//! - [`GeocodeError`]: one address could not be resolved. Recovered locally by
//!   dropping that participant.
//! - [`RankError`]: the ranking engine was handed nothing to rank.
//! - [`TravelTimeError`] / [`CandidateSearchError`]: collaborator failures.
//! - [`SearchError`]: everything the end-to-end pipeline can surface.
//!
//! Unreachable origin-to-venue legs are not errors. They are data folded into
//! the `valid` flag of a ranked result.

use thiserror::Error;

use crate::participant::ParticipantId;

/// A latitude/longitude pair outside the valid range (or non-finite).
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("invalid coordinate ({lat}, {lng})")]
pub struct InvalidCoordinate {
    pub lat: f64,
    pub lng: f64,
}

/// Why a single participant could not be turned into a coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    #[error("address not found")]
    NotFound,
    #[error("geocode request timed out")]
    Timeout,
    #[error("participant has neither a coordinate nor an address")]
    EmptyAddress,
    #[error("coordinate out of range")]
    InvalidCoordinate,
    #[error("geocoder failure: {0}")]
    Provider(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("a search needs between {min} and {max} participants, got {count}")]
    InvalidParticipantCount { count: usize, min: usize, max: usize },

    #[error("participant id {0} appears more than once")]
    DuplicateParticipant(ParticipantId),

    /// Fewer than two participants could be located.
    #[error("only {resolved} of {submitted} participants could be located; at least 2 are required")]
    InsufficientOrigins { resolved: usize, submitted: usize },

    /// A prebuilt origin set is too small to define a search area.
    #[error("a search area needs at least 2 origins, got {0}")]
    TooFewOrigins(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RankError {
    #[error("no candidate venues to rank")]
    NoCandidates,
    #[error("ranking needs at least 2 origins, got {0}")]
    NoOrigins(usize),
}

/// Failure of an entire travel-time batch (one origin, all destinations).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TravelTimeError {
    #[error("travel-time request timed out")]
    Timeout,
    #[error("travel mode {0} is not supported by this provider")]
    Unsupported(&'static str),
    #[error("provider returned {got} durations for {expected} destinations")]
    LengthMismatch { expected: usize, got: usize },
    #[error("travel-time provider failure: {0}")]
    Provider(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("candidate search failed: {0}")]
pub struct CandidateSearchError(pub String);

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search query is empty")]
    EmptyQuery,

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    CandidateSearch(#[from] CandidateSearchError),

    #[error("no venues found for this search")]
    NoCandidates,

    /// Only raised under [`crate::config::BatchFailurePolicy::Abort`].
    #[error("travel times for participant {origin} could not be calculated: {source}")]
    TravelTimeFailure {
        origin: ParticipantId,
        #[source]
        source: TravelTimeError,
    },

    #[error(transparent)]
    Rank(#[from] RankError),
}

impl SearchError {
    /// True for failures the user can fix by changing the input.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            SearchError::EmptyQuery | SearchError::Resolve(_) | SearchError::NoCandidates
        )
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Rejected text for one of the string-coded enums.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown travel mode `{0}`")]
    UnknownTravelMode(String),
    #[error("unknown sort preference `{0}`")]
    UnknownSortPreference(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("malformed link: {0}")]
    Url(#[from] url::ParseError),
    #[error("link is missing required parameter `{0}`")]
    MissingParameter(&'static str),
    #[error(transparent)]
    Value(#[from] ParseError),
    #[error("a shared search holds at most {max} participants, got {count}")]
    TooManyParticipants { count: usize, max: usize },
    #[error("shared leg slot `{0}` is unknown or used twice")]
    InvalidSlot(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_origins_message_mentions_counts() {
        let err = ResolveError::InsufficientOrigins {
            resolved: 1,
            submitted: 3,
        };
        let text = err.to_string();
        assert!(text.contains("only 1 of 3"));
    }

    #[test]
    fn resolve_errors_are_user_facing() {
        let err = SearchError::from(ResolveError::InsufficientOrigins {
            resolved: 0,
            submitted: 2,
        });
        assert!(err.is_user_facing());
        assert!(!SearchError::from(RankError::NoOrigins(1)).is_user_facing());
    }

    #[test]
    fn travel_time_failure_names_origin() {
        let err = SearchError::TravelTimeFailure {
            origin: ParticipantId::new("b"),
            source: TravelTimeError::Timeout,
        };
        assert!(err.to_string().contains("participant b"));
        assert!(!err.is_user_facing());
    }
}
