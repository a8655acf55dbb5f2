use async_trait::async_trait;

use crate::error::TravelTimeError;
use crate::geo::haversine_m;
use crate::participant::TravelMode;
use crate::ports::{TravelTimeProvider, TravelTimeRequest};
use crate::ranking::TravelTime;

/// Road distance is longer than the great circle; this is a typical urban ratio.
pub const DEFAULT_DETOUR_FACTOR: f64 = 1.3;

/// Average speed (km/h) and maximum sensible leg length (km) per mode.
fn mode_profile(mode: TravelMode) -> (f64, Option<f64>) {
    match mode {
        TravelMode::Driving => (40.0, None),
        TravelMode::Transit => (25.0, None),
        TravelMode::Bicycling => (15.0, Some(80.0)),
        TravelMode::Walking => (5.0, Some(25.0)),
    }
}

/// Distance-based travel-time estimates.
///
/// Legs longer than the mode's maximum (e.g. a 40 km walk) are reported as
/// unreachable rather than as an absurd duration.
#[derive(Debug, Clone, Copy)]
pub struct EstimatedTravelTimes {
    detour_factor: f64,
}

impl EstimatedTravelTimes {
    pub fn new(detour_factor: f64) -> Self {
        Self {
            detour_factor: detour_factor.max(1.0),
        }
    }

    /// Estimated duration for a single leg of `distance_m` metres.
    pub fn estimate(&self, distance_m: f64, mode: TravelMode) -> TravelTime {
        let (speed_kmh, max_km) = mode_profile(mode);
        let road_km = distance_m / 1000.0 * self.detour_factor;
        if max_km.is_some_and(|max| road_km > max) {
            return TravelTime::Unreachable;
        }
        if road_km <= 0.0 {
            return TravelTime::Seconds(0);
        }
        TravelTime::from_secs_f64(road_km / speed_kmh * 3600.0)
    }
}

impl Default for EstimatedTravelTimes {
    fn default() -> Self {
        Self::new(DEFAULT_DETOUR_FACTOR)
    }
}

#[async_trait]
impl TravelTimeProvider for EstimatedTravelTimes {
    async fn travel_times(
        &self,
        request: &TravelTimeRequest,
    ) -> Result<Vec<TravelTime>, TravelTimeError> {
        Ok(request
            .destinations
            .iter()
            .map(|destination| self.estimate(haversine_m(request.origin, *destination), request.mode))
            .collect())
    }
}
