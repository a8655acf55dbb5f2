//! Pluggable collaborators for the search ports.
//!
//! Travel-time backends, selectable via [`TravelTimeProviderKind`]:
//!
//! - **`EstimatedTravelTimes`**: straight-line distance at per-mode average
//!   speeds. Zero external dependencies.
//! - **`OsrmTravelTimes`** (feature `osrm`): OSRM `/table` service.
//! - **`PrecomputedTravelTimes`** (feature `precomputed`): travel-time table
//!   loaded from disk.
//!
//! Remote and table backends are wrapped in [`CachedTravelTimes`].
//!
//! Geocoders: [`GazetteerGeocoder`] (in-memory) and `NominatimGeocoder`
//! (feature `nominatim`). Venue search: [`VenueCatalog`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
#[cfg(any(feature = "osrm", feature = "precomputed"))]
use tracing::warn;

use crate::geo::Coordinate;
use crate::participant::TravelMode;
use crate::ports::TravelTimeProvider;

pub mod cache;
pub mod catalog;
pub mod estimate;
pub mod gazetteer;
#[cfg(feature = "nominatim")]
pub mod nominatim;
#[cfg(feature = "osrm")]
pub mod osrm;
#[cfg(feature = "precomputed")]
pub mod precomputed;

pub use cache::CachedTravelTimes;
pub use catalog::VenueCatalog;
pub use estimate::EstimatedTravelTimes;
pub use gazetteer::GazetteerGeocoder;

/// Which travel-time backend to use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TravelTimeProviderKind {
    /// Distance-based estimates, no external service.
    #[default]
    Estimated,
    /// OSRM HTTP endpoint (e.g. `"http://localhost:5000"`).
    #[cfg(feature = "osrm")]
    Osrm { endpoint: String },
    /// Travel-time table serialized with bincode.
    #[cfg(feature = "precomputed")]
    Precomputed { path: String },
}

/// Coordinates quantized to micro-degrees (~0.1 m), so keys hash exactly.
const KEY_SCALE: f64 = 1e6;

/// Directional `(origin, destination, mode)` key shared by the cache and the
/// precomputed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LegKey {
    origin: (i64, i64),
    destination: (i64, i64),
    mode: TravelMode,
}

impl LegKey {
    pub fn new(origin: Coordinate, destination: Coordinate, mode: TravelMode) -> Self {
        Self {
            origin: quantize(origin),
            destination: quantize(destination),
            mode,
        }
    }
}

fn quantize(c: Coordinate) -> (i64, i64) {
    (
        (c.lat * KEY_SCALE).round() as i64,
        (c.lng * KEY_SCALE).round() as i64,
    )
}

/// Construct a travel-time provider from its descriptor.
///
/// - `Estimated` is returned uncached (it is pure arithmetic).
/// - `Osrm` and `Precomputed` are wrapped in a [`CachedTravelTimes`] with
///   `cache_capacity` entries. If the backend cannot be constructed, a
///   warning is logged and estimates are used instead.
pub fn build_travel_time_provider(
    kind: &TravelTimeProviderKind,
    #[allow(unused_variables)] cache_capacity: usize,
) -> Arc<dyn TravelTimeProvider> {
    match kind {
        TravelTimeProviderKind::Estimated => Arc::new(EstimatedTravelTimes::default()),

        #[cfg(feature = "osrm")]
        TravelTimeProviderKind::Osrm { endpoint } => match osrm::OsrmTravelTimes::new(endpoint) {
            Ok(provider) => Arc::new(CachedTravelTimes::new(Arc::new(provider), cache_capacity)),
            Err(err) => {
                warn!(endpoint = %endpoint, error = %err, "failed to build OSRM client, falling back to estimates");
                Arc::new(EstimatedTravelTimes::default())
            }
        },

        #[cfg(feature = "precomputed")]
        TravelTimeProviderKind::Precomputed { path } => {
            match precomputed::PrecomputedTravelTimes::from_file(path) {
                Ok(provider) => {
                    Arc::new(CachedTravelTimes::new(Arc::new(provider), cache_capacity))
                }
                Err(err) => {
                    warn!(path = %path, error = %err, "failed to load travel-time table, falling back to estimates");
                    Arc::new(EstimatedTravelTimes::default())
                }
            }
        }
    }
}
