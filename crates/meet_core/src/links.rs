//! Shareable search links and per-leg directions URLs.
//!
//! A share link carries what each participant typed plus their travel mode,
//! the venue query and the sort preference:
//!
//! ```text
//! https://host/?addrA=...&modeA=DRIVING&addrB=...&modeB=WALKING&type=coffee&sort=FAIRNESS
//! ```
//!
//! Coordinates are not embedded; addresses are geocoded again when the link
//! is opened, unless the text itself is a `lat,lng` pair.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::LinkError;
use crate::geo::Coordinate;
use crate::participant::{Participant, ParticipantId, ParticipantLocation, Role, TravelMode};
use crate::ranking::SortPreference;
use crate::resolver::MAX_PARTICIPANTS;
use crate::search::SearchRequest;

const DIRECTIONS_BASE: &str = "https://www.google.com/maps/dir/?api=1";

/// (participant id, address parameter, mode parameter) per slot.
const LEG_PARAMS: [(&str, &str, &str); MAX_PARTICIPANTS] = [
    ("a", "addrA", "modeA"),
    ("b", "addrB", "modeB"),
    ("c", "addrC", "modeC"),
    ("d", "addrD", "modeD"),
    ("e", "addrE", "modeE"),
];
const REQUIRED_LEGS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedLeg {
    /// Lower-case slot letter, `a` to `e`. Also the participant id on decode.
    pub slot: String,
    pub address: String,
    pub mode: TravelMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedSearch {
    pub legs: Vec<SharedLeg>,
    pub query: String,
    pub sort_preference: SortPreference,
}

impl SharedSearch {
    pub fn from_request(request: &SearchRequest) -> Result<Self, LinkError> {
        if request.participants.len() > MAX_PARTICIPANTS {
            return Err(LinkError::TooManyParticipants {
                count: request.participants.len(),
                max: MAX_PARTICIPANTS,
            });
        }
        Ok(Self {
            legs: request
                .participants
                .iter()
                .zip(LEG_PARAMS)
                .map(|(p, (slot, _, _))| SharedLeg {
                    slot: slot.to_string(),
                    address: p.location.display_text(),
                    mode: p.travel_mode,
                })
                .collect(),
            query: request.query.trim().to_string(),
            sort_preference: request.sort_preference,
        })
    }

    /// Encode onto `base`, replacing any query string it already has.
    pub fn to_url(&self, base: &str) -> Result<Url, LinkError> {
        if self.legs.len() > MAX_PARTICIPANTS {
            return Err(LinkError::TooManyParticipants {
                count: self.legs.len(),
                max: MAX_PARTICIPANTS,
            });
        }
        let mut seen = HashSet::new();
        let mut keyed = Vec::with_capacity(self.legs.len());
        for leg in &self.legs {
            let params = LEG_PARAMS
                .into_iter()
                .find(|(slot, _, _)| *slot == leg.slot)
                .filter(|(slot, _, _)| seen.insert(*slot))
                .ok_or_else(|| LinkError::InvalidSlot(leg.slot.clone()))?;
            keyed.push((leg, params));
        }

        let mut url = Url::parse(base)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.clear();
            for (leg, (_, addr_key, mode_key)) in keyed {
                pairs
                    .append_pair(addr_key, &leg.address)
                    .append_pair(mode_key, leg.mode.as_str());
            }
            pairs
                .append_pair("type", &self.query)
                .append_pair("sort", self.sort_preference.as_str());
        }
        Ok(url)
    }

    /// Decode a share link.
    ///
    /// `addrA`, `addrB` and `type` are required; other slots are optional.
    /// Missing modes default to DRIVING and a missing sort to FAIRNESS.
    pub fn parse(link: &str) -> Result<Self, LinkError> {
        let url = Url::parse(link)?;
        let params: HashMap<String, String> = url.query_pairs().into_owned().collect();
        let non_blank = |key: &str| {
            params
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        let mut legs = Vec::new();
        for (index, (slot, addr_key, mode_key)) in LEG_PARAMS.into_iter().enumerate() {
            let Some(address) = non_blank(addr_key) else {
                if index < REQUIRED_LEGS {
                    return Err(LinkError::MissingParameter(addr_key));
                }
                continue;
            };
            let mode = match non_blank(mode_key) {
                Some(mode) => mode.parse()?,
                None => TravelMode::default(),
            };
            legs.push(SharedLeg {
                slot: slot.to_string(),
                address: address.to_string(),
                mode,
            });
        }

        let query = non_blank("type").ok_or(LinkError::MissingParameter("type"))?;
        let sort_preference = match non_blank("sort") {
            Some(sort) => sort.parse()?,
            None => SortPreference::default(),
        };

        Ok(Self {
            legs,
            query: query.to_string(),
            sort_preference,
        })
    }

    /// Turn the link back into a search. The first leg is the link's owner.
    /// Participants keep their slot letter as id, so skipped slots leave gaps.
    pub fn into_request(self) -> SearchRequest {
        let participants = self
            .legs
            .into_iter()
            .enumerate()
            .map(|(index, leg)| {
                let location = match leg.address.parse::<Coordinate>() {
                    Ok(coordinate) => ParticipantLocation::Selected {
                        coordinate,
                        address: None,
                    },
                    Err(_) => ParticipantLocation::Address { text: leg.address },
                };
                let role = if index == 0 { Role::You } else { Role::Friend };
                let label = leg.slot.to_uppercase();
                Participant::new(
                    ParticipantId::new(leg.slot),
                    role,
                    label,
                    location,
                    leg.mode,
                )
            })
            .collect();
        SearchRequest::new(participants, self.query).with_sort_preference(self.sort_preference)
    }
}

/// Turn-by-turn directions from `origin` to `destination`.
pub fn directions_url(origin: Coordinate, destination: Coordinate, mode: TravelMode) -> String {
    format!(
        "{DIRECTIONS_BASE}&origin={},{}&destination={},{}&travelmode={}",
        origin.lat,
        origin.lng,
        destination.lat,
        destination.lng,
        mode.as_str().to_lowercase()
    )
}
