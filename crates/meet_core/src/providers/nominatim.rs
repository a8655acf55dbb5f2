//! Nominatim (OpenStreetMap) geocoder.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::GeocodeError;
use crate::geo::Coordinate;
use crate::ports::Geocoder;

pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Geocoder backed by a Nominatim `/search` endpoint.
///
/// Nominatim's usage policy requires an identifying User-Agent.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(endpoint: &str, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self, address: &str) -> Result<Url, GeocodeError> {
        let mut url = Url::parse(&format!("{}/search", self.endpoint))
            .map_err(|err| GeocodeError::Provider(format!("failed to build Nominatim URL: {err}")))?;
        url.query_pairs_mut()
            .append_pair("q", address)
            .append_pair("format", "jsonv2")
            .append_pair("limit", "1");
        Ok(url)
    }
}

fn first_coordinate(places: &[NominatimPlace]) -> Result<Coordinate, GeocodeError> {
    let place = places.first().ok_or(GeocodeError::NotFound)?;
    let lat: f64 = place
        .lat
        .parse()
        .map_err(|_| GeocodeError::Provider(format!("bad latitude {:?}", place.lat)))?;
    let lng: f64 = place
        .lon
        .parse()
        .map_err(|_| GeocodeError::Provider(format!("bad longitude {:?}", place.lon)))?;
    Coordinate::new(lat, lng).map_err(|_| GeocodeError::InvalidCoordinate)
}

fn http_error(err: reqwest::Error) -> GeocodeError {
    if err.is_timeout() {
        GeocodeError::Timeout
    } else {
        GeocodeError::Provider(err.to_string())
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        let url = self.search_url(address)?;
        debug!(address, "querying Nominatim");
        let places: Vec<NominatimPlace> = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(http_error)?
            .json()
            .await
            .map_err(http_error)?;
        first_coordinate(&places)
    }
}
