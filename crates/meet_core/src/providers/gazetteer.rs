use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::GeocodeError;
use crate::geo::Coordinate;
use crate::ports::Geocoder;

/// In-memory address table.
///
/// Lookups ignore case and collapse runs of whitespace. Text that already
/// parses as `"lat,lng"` is returned directly, so coordinate strings (e.g.
/// from a shared link) need no entry.
#[derive(Debug, Clone, Default)]
pub struct GazetteerGeocoder {
    entries: HashMap<String, Coordinate>,
}

impl GazetteerGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, address: &str, coordinate: Coordinate) -> Self {
        self.insert(address, coordinate);
        self
    }

    pub fn insert(&mut self, address: &str, coordinate: Coordinate) {
        self.entries.insert(normalize(address), coordinate);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<(S, Coordinate)> for GazetteerGeocoder {
    fn from_iter<I: IntoIterator<Item = (S, Coordinate)>>(iter: I) -> Self {
        let mut gazetteer = Self::new();
        for (address, coordinate) in iter {
            gazetteer.insert(address.as_ref(), coordinate);
        }
        gazetteer
    }
}

fn normalize(address: &str) -> String {
    address
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl Geocoder for GazetteerGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        if let Ok(coordinate) = address.parse::<Coordinate>() {
            return Ok(coordinate);
        }
        self.entries
            .get(&normalize(address))
            .copied()
            .ok_or(GeocodeError::NotFound)
    }
}
