//! Request and catalog files.

use std::fs;
use std::path::Path;

use anyhow::Context;
use meet_core::providers::{GazetteerGeocoder, VenueCatalog};
use meet_core::{Candidate, Coordinate, SearchRequest};
use serde::{Deserialize, Serialize};

/// A search request plus the addresses this run can resolve offline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestFile {
    #[serde(flatten)]
    pub search: SearchRequest,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gazetteer: Vec<KnownAddress>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnownAddress {
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

impl RequestFile {
    pub fn gazetteer(&self) -> anyhow::Result<GazetteerGeocoder> {
        let mut gazetteer = GazetteerGeocoder::new();
        for entry in &self.gazetteer {
            let coordinate = Coordinate::new(entry.lat, entry.lng)
                .with_context(|| format!("gazetteer entry {:?}", entry.address))?;
            gazetteer.insert(&entry.address, coordinate);
        }
        Ok(gazetteer)
    }
}

pub fn load_request(path: &Path) -> anyhow::Result<RequestFile> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read request {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse request {}", path.display()))
}

pub fn load_catalog(path: &Path) -> anyhow::Result<VenueCatalog> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read catalog {}", path.display()))?;
    let venues: Vec<Candidate> =
        serde_json::from_str(&contents).with_context(|| format!("parse catalog {}", path.display()))?;
    Ok(VenueCatalog::new(venues))
}
