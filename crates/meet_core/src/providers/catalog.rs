//! In-memory venue catalog with an H3 cell index.
//!
//! Venues are bucketed by their resolution-7 cell (~5 km² hexagons). A query
//! first collects the grid disk covering the bias circle, so venues near the
//! centroid are found without scanning the whole catalog. If the disk holds
//! fewer than `max_results` matches, the nearest matches outside the bias
//! fill the remainder: the bias is a preference, not a filter.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use h3o::{CellIndex, Resolution};
use tracing::{debug, warn};

use crate::candidate::Candidate;
use crate::error::CandidateSearchError;
use crate::geo::haversine_m;
use crate::ports::{CandidateQuery, CandidateSearch};

const INDEX_RESOLUTION: Resolution = Resolution::Seven;

/// Conservative lower bound on the distance covered by one grid ring at
/// resolution 7, in metres.
const RING_SPACING_M: f64 = 1_200.0;

#[derive(Debug, Clone, Default)]
pub struct VenueCatalog {
    venues: Vec<Candidate>,
    by_cell: HashMap<CellIndex, Vec<usize>>,
}

impl VenueCatalog {
    /// Build a catalog. Venues with out-of-range coordinates are skipped.
    pub fn new(venues: impl IntoIterator<Item = Candidate>) -> Self {
        let mut catalog = Self::default();
        for venue in venues {
            catalog.insert(venue);
        }
        catalog
    }

    pub fn insert(&mut self, venue: Candidate) {
        let Some(cell) = venue.coordinate.to_cell(INDEX_RESOLUTION) else {
            warn!(venue = %venue.id, coordinate = %venue.coordinate, "skipping venue with invalid coordinate");
            return;
        };
        self.by_cell.entry(cell).or_default().push(self.venues.len());
        self.venues.push(venue);
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    pub fn venues(&self) -> &[Candidate] {
        &self.venues
    }

    /// Indices of venues in cells overlapping the circle.
    fn indices_near(&self, query: &CandidateQuery) -> Vec<usize> {
        let Some(origin) = query.bias.center.to_cell(INDEX_RESOLUTION) else {
            return Vec::new();
        };
        let k = (query.bias.radius_m / RING_SPACING_M).ceil() as u32 + 1;
        origin
            .grid_disk::<Vec<_>>(k)
            .iter()
            .filter_map(|cell| self.by_cell.get(cell))
            .flatten()
            .copied()
            .collect()
    }

    fn matches(&self, venue: &Candidate, tokens: &[String], query: &CandidateQuery) -> bool {
        if !query.filters.accepts(venue) {
            return false;
        }
        let haystack = format!(
            "{} {}",
            venue.display_name,
            venue.category.as_deref().unwrap_or_default()
        )
        .to_lowercase();
        tokens.iter().all(|token| haystack.contains(token.as_str()))
    }

    fn by_distance(&self, indices: &mut [usize], query: &CandidateQuery) {
        let center = query.bias.center;
        indices.sort_by(|a, b| {
            haversine_m(center, self.venues[*a].coordinate)
                .total_cmp(&haversine_m(center, self.venues[*b].coordinate))
                .then(a.cmp(b))
        });
    }
}

/// Lower-cased whitespace-separated query tokens.
fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

#[async_trait]
impl CandidateSearch for VenueCatalog {
    async fn search_candidates(
        &self,
        query: &CandidateQuery,
    ) -> Result<Vec<Candidate>, CandidateSearchError> {
        let tokens = tokenize(&query.text);
        let center = query.bias.center;

        let mut inside: Vec<usize> = self
            .indices_near(query)
            .into_iter()
            .filter(|&i| {
                let venue = &self.venues[i];
                haversine_m(center, venue.coordinate) <= query.bias.radius_m
                    && self.matches(venue, &tokens, query)
            })
            .collect();
        self.by_distance(&mut inside, query);
        inside.truncate(query.max_results);

        if inside.len() < query.max_results {
            let taken: HashSet<usize> = inside.iter().copied().collect();
            let mut outside: Vec<usize> = (0..self.venues.len())
                .filter(|i| !taken.contains(i) && self.matches(&self.venues[*i], &tokens, query))
                .collect();
            self.by_distance(&mut outside, query);
            outside.truncate(query.max_results - inside.len());
            inside.extend(outside);
        }

        debug!(
            query = %query.text,
            matched = inside.len(),
            catalog = self.venues.len(),
            "catalog search"
        );
        Ok(inside.into_iter().map(|i| self.venues[i].clone()).collect())
    }
}
