//! Fair meeting-point search.
//!
//! Participants' starting points are resolved to coordinates, their centroid
//! seeds a venue search, and candidate venues are ranked by how balanced the
//! travel times are across everyone (or by total travel time).

pub mod candidate;
pub mod config;
pub mod error;
pub mod geo;
pub mod links;
pub mod participant;
pub mod ports;
pub mod providers;
pub mod ranking;
pub mod resolver;
pub mod search;
#[cfg(feature = "test-helpers")]
pub mod test_helpers;

pub use candidate::{Candidate, CandidateFilters, CandidateId};
pub use config::{BatchFailurePolicy, SearchConfig};
pub use error::{RankError, ResolveError, SearchError};
pub use geo::{Coordinate, GeometrySnapshot};
pub use participant::{Participant, ParticipantId, ParticipantLocation, ResolvedOrigin, Role, TravelMode};
pub use ranking::{rank, FairnessLabel, RankedResult, SortPreference, TravelEstimate, TravelTime};
pub use resolver::{GeometryResolver, Resolution};
pub use search::{MeetingSearch, SearchOutcome, SearchRequest, SearchSummary};
