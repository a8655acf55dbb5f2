//! Geographic primitives: coordinates, great-circle distance, centroid and
//! search-radius derivation.
//!
//! The centroid is a plain arithmetic mean of latitudes and longitudes. That is
//! not geodesically exact, but the searches this crate serves are city-scale
//! and the mean is the defined semantics.

use std::fmt;
use std::str::FromStr;

use h3o::{CellIndex, LatLng, Resolution};
use serde::{Deserialize, Serialize};

use crate::error::InvalidCoordinate;
use crate::participant::ResolvedOrigin;

/// Mean earth radius used by the haversine formula, in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Lower bound of the derived search radius (1 km).
pub const MIN_SEARCH_RADIUS_M: f64 = 1_000.0;

/// Upper bound of the derived search radius (50 km).
pub const MAX_SEARCH_RADIUS_M: f64 = 50_000.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Creates a validated coordinate.
    pub fn new(lat: f64, lng: f64) -> Result<Self, InvalidCoordinate> {
        let coordinate = Self { lat, lng };
        if coordinate.is_valid() {
            Ok(coordinate)
        } else {
            Err(InvalidCoordinate { lat, lng })
        }
    }

    /// Creates a coordinate without range checks. Use with trusted inputs only.
    #[inline]
    pub const fn new_unchecked(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and within [-90, 90] x [-180, 180].
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// H3 cell containing this coordinate, or `None` if it is out of range.
    pub fn to_cell(self, resolution: Resolution) -> Option<CellIndex> {
        if !self.is_valid() {
            return None;
        }
        LatLng::new(self.lat, self.lng)
            .ok()
            .map(|ll| ll.to_cell(resolution))
    }

    /// Great-circle distance to `other` in metres.
    pub fn distance_m(&self, other: &Coordinate) -> f64 {
        haversine_m(*self, *other)
    }
}

impl From<LatLng> for Coordinate {
    fn from(ll: LatLng) -> Self {
        Self {
            lat: ll.lat(),
            lng: ll.lng(),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Parses `"lat,lng"` (whitespace around either number is ignored).
impl FromStr for Coordinate {
    type Err = InvalidCoordinate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = InvalidCoordinate {
            lat: f64::NAN,
            lng: f64::NAN,
        };
        let (lat, lng) = s.split_once(',').ok_or(invalid)?;
        let lat: f64 = lat.trim().parse().map_err(|_| invalid)?;
        let lng: f64 = lng.trim().parse().map_err(|_| invalid)?;
        Coordinate::new(lat, lng)
    }
}

/// Haversine distance between two coordinates in metres.
pub fn haversine_m(a: Coordinate, b: Coordinate) -> f64 {
    let (lat1, lon1) = (a.lat.to_radians(), a.lng.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lng.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlon = (dlon * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Arithmetic mean of latitudes and longitudes. `None` for an empty slice.
pub fn centroid(points: &[Coordinate]) -> Option<Coordinate> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (lat_sum, lng_sum) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat, lng + p.lng));
    Some(Coordinate::new_unchecked(lat_sum / n, lng_sum / n))
}

/// Largest distance from `center` to any point, clamped to
/// [`MIN_SEARCH_RADIUS_M`, `MAX_SEARCH_RADIUS_M`].
pub fn search_radius_m(center: Coordinate, points: &[Coordinate]) -> f64 {
    points
        .iter()
        .map(|p| haversine_m(center, *p))
        .fold(0.0_f64, f64::max)
        .clamp(MIN_SEARCH_RADIUS_M, MAX_SEARCH_RADIUS_M)
}

/// Centroid and search radius of one origin set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometrySnapshot {
    pub centroid: Coordinate,
    pub radius_m: f64,
}

impl GeometrySnapshot {
    /// Derive the snapshot from raw coordinates. `None` when `points` is empty.
    pub fn from_coordinates(points: &[Coordinate]) -> Option<Self> {
        let centroid = centroid(points)?;
        Some(Self {
            centroid,
            radius_m: search_radius_m(centroid, points),
        })
    }

    /// Recompute from the current origin set.
    pub fn from_origins(origins: &[ResolvedOrigin]) -> Option<Self> {
        let points: Vec<Coordinate> = origins.iter().map(|o| o.coordinate).collect();
        Self::from_coordinates(&points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centroid_of_two_points_on_equator() {
        let c = centroid(&[
            Coordinate::new_unchecked(0.0, 0.0),
            Coordinate::new_unchecked(0.0, 2.0),
        ])
        .expect("centroid");
        assert_eq!(c, Coordinate::new_unchecked(0.0, 1.0));
    }

    #[test]
    fn centroid_of_nothing_is_none() {
        assert!(centroid(&[]).is_none());
    }

    #[test]
    fn one_degree_of_longitude_on_equator() {
        let d = haversine_m(
            Coordinate::new_unchecked(0.0, 0.0),
            Coordinate::new_unchecked(0.0, 1.0),
        );
        assert!((d - 111_194.9).abs() < 1.0, "got {d}");
    }

    #[test]
    fn radius_has_one_km_floor() {
        let a = Coordinate::new_unchecked(52.5200, 13.4050);
        let b = Coordinate::new_unchecked(52.5201, 13.4051);
        let snapshot = GeometrySnapshot::from_coordinates(&[a, b]).expect("snapshot");
        assert_eq!(snapshot.radius_m, MIN_SEARCH_RADIUS_M);
    }

    #[test]
    fn radius_has_fifty_km_ceiling() {
        let berlin = Coordinate::new_unchecked(52.52, 13.405);
        let munich = Coordinate::new_unchecked(48.137, 11.575);
        let snapshot = GeometrySnapshot::from_coordinates(&[berlin, munich]).expect("snapshot");
        assert_eq!(snapshot.radius_m, MAX_SEARCH_RADIUS_M);
    }

    #[test]
    fn radius_is_max_distance_when_in_range() {
        let a = Coordinate::new_unchecked(52.50, 13.40);
        let b = Coordinate::new_unchecked(52.54, 13.40);
        let snapshot = GeometrySnapshot::from_coordinates(&[a, b]).expect("snapshot");
        let expected = haversine_m(snapshot.centroid, a).max(haversine_m(snapshot.centroid, b));
        assert!((snapshot.radius_m - expected).abs() < 1e-9);
        assert!(snapshot.radius_m > MIN_SEARCH_RADIUS_M);
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(Coordinate::new(91.0, 0.0).is_err());
        assert!(Coordinate::new(0.0, -180.5).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn parses_lat_lng_pair() {
        let c: Coordinate = " 52.5, 13.4 ".parse().expect("parse");
        assert_eq!(c, Coordinate::new_unchecked(52.5, 13.4));
        assert!("52.5".parse::<Coordinate>().is_err());
        assert!("north,east".parse::<Coordinate>().is_err());
    }

    #[test]
    fn maps_into_h3_cell() {
        let cell = Coordinate::new_unchecked(52.52, 13.405)
            .to_cell(Resolution::Seven)
            .expect("cell");
        let back = Coordinate::from(LatLng::from(cell));
        assert!(haversine_m(back, Coordinate::new_unchecked(52.52, 13.405)) < 3_000.0);
        assert!(Coordinate::new_unchecked(95.0, 0.0).to_cell(Resolution::Seven).is_none());
    }
}
