//! Participants of a search and their resolved origins.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::geo::Coordinate;

/// Caller-chosen identifier, unique within one search.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    You,
    #[default]
    Friend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelMode {
    #[default]
    Driving,
    Transit,
    Walking,
    Bicycling,
}

impl TravelMode {
    pub const ALL: [TravelMode; 4] = [
        TravelMode::Driving,
        TravelMode::Transit,
        TravelMode::Walking,
        TravelMode::Bicycling,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Driving => "DRIVING",
            TravelMode::Transit => "TRANSIT",
            TravelMode::Walking => "WALKING",
            TravelMode::Bicycling => "BICYCLING",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive.
impl FromStr for TravelMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        TravelMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseError::UnknownTravelMode(trimmed.to_string()))
    }
}

/// Where a participant starts from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParticipantLocation {
    /// Coordinate picked earlier (e.g. an autocomplete selection). Skips geocoding.
    Selected {
        coordinate: Coordinate,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        address: Option<String>,
    },
    /// Free-text address that still has to be geocoded.
    Address { text: String },
}

impl ParticipantLocation {
    /// The human-readable address, if one is known.
    pub fn address_text(&self) -> Option<&str> {
        match self {
            ParticipantLocation::Selected { address, .. } => address.as_deref(),
            ParticipantLocation::Address { text } => Some(text.as_str()),
        }
    }

    /// Text that identifies this location in links and summaries; falls back
    /// to the `lat,lng` pair for bare coordinates.
    pub fn display_text(&self) -> String {
        match self {
            ParticipantLocation::Selected {
                address: Some(address),
                ..
            } if !address.trim().is_empty() => address.clone(),
            ParticipantLocation::Selected { coordinate, .. } => coordinate.to_string(),
            ParticipantLocation::Address { text } => text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub label: String,
    pub location: ParticipantLocation,
    #[serde(default)]
    pub travel_mode: TravelMode,
}

impl Participant {
    pub fn new(
        id: ParticipantId,
        role: Role,
        label: impl Into<String>,
        location: ParticipantLocation,
        travel_mode: TravelMode,
    ) -> Self {
        Self {
            id,
            role,
            label: label.into(),
            location,
            travel_mode,
        }
    }

    /// A driving friend starting from a free-text address.
    pub fn at_address(id: impl Into<String>, text: impl Into<String>) -> Self {
        let id = ParticipantId::new(id);
        let label = id.0.clone();
        Self::new(
            id,
            Role::Friend,
            label,
            ParticipantLocation::Address { text: text.into() },
            TravelMode::default(),
        )
    }

    /// A driving friend starting from a known coordinate.
    pub fn at_coordinate(id: impl Into<String>, coordinate: Coordinate) -> Self {
        let id = ParticipantId::new(id);
        let label = id.0.clone();
        Self::new(
            id,
            Role::Friend,
            label,
            ParticipantLocation::Selected {
                coordinate,
                address: None,
            },
            TravelMode::default(),
        )
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn with_mode(mut self, travel_mode: TravelMode) -> Self {
        self.travel_mode = travel_mode;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// A participant whose starting point is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedOrigin {
    pub participant: Participant,
    pub coordinate: Coordinate,
}

impl ResolvedOrigin {
    pub fn new(participant: Participant, coordinate: Coordinate) -> Self {
        Self {
            participant,
            coordinate,
        }
    }

    pub fn id(&self) -> &ParticipantId {
        &self.participant.id
    }

    pub fn travel_mode(&self) -> TravelMode {
        self.participant.travel_mode
    }
}
