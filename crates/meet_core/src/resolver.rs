//! Geometry resolver: participants in, origins + centroid + search radius out.
//!
//! Every participant is resolved concurrently. Pre-selected coordinates are
//! used as-is; addresses go through the [`Geocoder`] with a per-request
//! timeout. The resolver waits for every lookup to settle, drops the ones
//! that failed, and only then checks that at least two origins remain.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{GeocodeError, ResolveError};
use crate::geo::{Coordinate, GeometrySnapshot};
use crate::participant::{Participant, ParticipantLocation, ResolvedOrigin};
use crate::ports::Geocoder;

pub const MIN_PARTICIPANTS: usize = 2;
pub const MAX_PARTICIPANTS: usize = 5;

/// Output of a successful resolve. Origins keep participant input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub origins: Vec<ResolvedOrigin>,
    pub centroid: Coordinate,
    pub radius_m: f64,
}

impl Resolution {
    /// Build from an origin set, recomputing centroid and radius.
    ///
    /// Fails with [`ResolveError::TooFewOrigins`] below two origins.
    pub fn from_origins(origins: Vec<ResolvedOrigin>) -> Result<Self, ResolveError> {
        let snapshot = match GeometrySnapshot::from_origins(&origins) {
            Some(snapshot) if origins.len() >= MIN_PARTICIPANTS => snapshot,
            _ => return Err(ResolveError::TooFewOrigins(origins.len())),
        };
        Ok(Self {
            origins,
            centroid: snapshot.centroid,
            radius_m: snapshot.radius_m,
        })
    }

    pub fn geometry(&self) -> GeometrySnapshot {
        GeometrySnapshot {
            centroid: self.centroid,
            radius_m: self.radius_m,
        }
    }
}

pub struct GeometryResolver {
    geocoder: Arc<dyn Geocoder>,
    geocode_timeout: Duration,
}

impl GeometryResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>, geocode_timeout: Duration) -> Self {
        Self {
            geocoder,
            geocode_timeout,
        }
    }

    /// Resolve all participants and derive the search geometry.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::InvalidParticipantCount`] outside 2..=5 participants.
    /// - [`ResolveError::DuplicateParticipant`] when two participants share an id.
    /// - [`ResolveError::InsufficientOrigins`] when fewer than two resolve.
    pub async fn resolve(&self, participants: &[Participant]) -> Result<Resolution, ResolveError> {
        validate_participants(participants)?;

        let lookups = participants.iter().map(|p| self.locate(p));
        let settled = join_all(lookups).await;

        let origins: Vec<ResolvedOrigin> = participants
            .iter()
            .zip(settled)
            .filter_map(|(participant, outcome)| match outcome {
                Ok(coordinate) => Some(ResolvedOrigin::new(participant.clone(), coordinate)),
                Err(err) => {
                    warn!(participant = %participant.id, error = %err, "dropping participant that could not be located");
                    None
                }
            })
            .collect();

        if origins.len() < MIN_PARTICIPANTS {
            return Err(ResolveError::InsufficientOrigins {
                resolved: origins.len(),
                submitted: participants.len(),
            });
        }

        let resolution = Resolution::from_origins(origins)?;
        debug!(
            origins = resolution.origins.len(),
            centroid = %resolution.centroid,
            radius_m = resolution.radius_m,
            "resolved search geometry"
        );
        Ok(resolution)
    }

    async fn locate(&self, participant: &Participant) -> Result<Coordinate, GeocodeError> {
        let text = match &participant.location {
            ParticipantLocation::Selected { coordinate, .. } => {
                return if coordinate.is_valid() {
                    Ok(*coordinate)
                } else {
                    Err(GeocodeError::InvalidCoordinate)
                };
            }
            ParticipantLocation::Address { text } => text.trim(),
        };
        if text.is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }

        let coordinate = tokio::time::timeout(self.geocode_timeout, self.geocoder.geocode(text))
            .await
            .map_err(|_| GeocodeError::Timeout)??;
        if coordinate.is_valid() {
            Ok(coordinate)
        } else {
            Err(GeocodeError::InvalidCoordinate)
        }
    }
}

fn validate_participants(participants: &[Participant]) -> Result<(), ResolveError> {
    let count = participants.len();
    if !(MIN_PARTICIPANTS..=MAX_PARTICIPANTS).contains(&count) {
        return Err(ResolveError::InvalidParticipantCount {
            count,
            min: MIN_PARTICIPANTS,
            max: MAX_PARTICIPANTS,
        });
    }
    let mut seen = HashSet::with_capacity(count);
    for participant in participants {
        if !seen.insert(&participant.id) {
            return Err(ResolveError::DuplicateParticipant(participant.id.clone()));
        }
    }
    Ok(())
}
