use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::error::OsrmError;
use super::parser::parse_table_response;
use super::response::OsrmTableResponse;
use crate::error::TravelTimeError;
use crate::participant::TravelMode;
use crate::ports::{TravelTimeProvider, TravelTimeRequest};
use crate::ranking::TravelTime;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Async HTTP client for the OSRM table service.
#[derive(Debug, Clone)]
pub struct OsrmTravelTimes {
    client: Client,
    endpoint: String,
}

impl OsrmTravelTimes {
    /// Create a client for the given OSRM endpoint (e.g. `http://localhost:5000`).
    pub fn new(endpoint: &str) -> Result<Self, OsrmError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(OsrmError::Http)?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }
}

/// OSRM routing profile for a travel mode.
pub(super) fn profile_for(mode: TravelMode) -> Result<&'static str, TravelTimeError> {
    match mode {
        TravelMode::Driving => Ok("driving"),
        TravelMode::Walking => Ok("foot"),
        TravelMode::Bicycling => Ok("bike"),
        TravelMode::Transit => Err(TravelTimeError::Unsupported(mode.as_str())),
    }
}

/// `/table/v1/{profile}/{origin;dest;...}?sources=0&destinations=1;..;n`.
pub(super) fn table_url(
    endpoint: &str,
    profile: &str,
    request: &TravelTimeRequest,
) -> Result<Url, OsrmError> {
    let coord_segment = std::iter::once(request.origin)
        .chain(request.destinations.iter().copied())
        .map(|c| format!("{:.6},{:.6}", c.lng, c.lat))
        .collect::<Vec<_>>()
        .join(";");
    let destinations = (1..=request.destinations.len())
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(";");

    let mut url = Url::parse(&format!("{endpoint}/table/v1/{profile}/{coord_segment}"))?;
    url.query_pairs_mut()
        .append_pair("sources", "0")
        .append_pair("destinations", &destinations)
        .append_pair("annotations", "duration");
    Ok(url)
}

#[async_trait]
impl TravelTimeProvider for OsrmTravelTimes {
    async fn travel_times(
        &self,
        request: &TravelTimeRequest,
    ) -> Result<Vec<TravelTime>, TravelTimeError> {
        let profile = profile_for(request.mode)?;
        if request.destinations.is_empty() {
            return Ok(Vec::new());
        }

        let url = table_url(&self.endpoint, profile, request)?;
        debug!(origin = %request.origin, destinations = request.destinations.len(), profile, "querying OSRM table");

        let response = self.client.get(url).send().await.map_err(OsrmError::Http)?;
        let parsed: OsrmTableResponse = response.json().await.map_err(OsrmError::Json)?;
        parse_table_response(parsed, request.destinations.len())
    }
}
