use thiserror::Error;

use crate::error::TravelTimeError;

/// Errors encountered while querying an OSRM table.
#[derive(Debug, Error)]
pub enum OsrmError {
    #[error("OSRM request failed: {0}")]
    Http(#[source] reqwest::Error),
    #[error("OSRM response could not be decoded: {0}")]
    Json(#[source] reqwest::Error),
    #[error("failed to build OSRM URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("OSRM returned {code}: {message}")]
    Api { code: String, message: String },
    #[error("OSRM response has no duration row")]
    NoDurations,
}

impl From<OsrmError> for TravelTimeError {
    fn from(err: OsrmError) -> Self {
        match err {
            OsrmError::Http(ref source) if source.is_timeout() => TravelTimeError::Timeout,
            other => TravelTimeError::Provider(other.to_string()),
        }
    }
}
