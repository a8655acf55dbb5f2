//! Travel-time table loaded from a bincode file.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use super::LegKey;
use crate::error::TravelTimeError;
use crate::ports::{TravelTimeProvider, TravelTimeRequest};
use crate::ranking::TravelTime;

/// Leg durations in seconds.
pub type TravelTimeTable = HashMap<LegKey, u64>;

#[derive(Debug, Error)]
pub enum PrecomputedError {
    #[error("travel-time table I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("travel-time table encoding: {0}")]
    Encoding(#[from] bincode::Error),
}

/// Lookup-only provider. Pairs missing from the table are unreachable.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedTravelTimes {
    table: TravelTimeTable,
}

impl PrecomputedTravelTimes {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PrecomputedError> {
        let data = fs::read(path)?;
        let table: TravelTimeTable = bincode::deserialize(&data)?;
        Ok(Self { table })
    }

    pub fn from_table(table: TravelTimeTable) -> Self {
        Self { table }
    }

    pub fn save_to_file(
        table: &TravelTimeTable,
        path: impl AsRef<Path>,
    ) -> Result<(), PrecomputedError> {
        let data = bincode::serialize(table)?;
        fs::write(path, data)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[async_trait]
impl TravelTimeProvider for PrecomputedTravelTimes {
    async fn travel_times(
        &self,
        request: &TravelTimeRequest,
    ) -> Result<Vec<TravelTime>, TravelTimeError> {
        Ok(request
            .destinations
            .iter()
            .map(|d| {
                self.table
                    .get(&LegKey::new(request.origin, *d, request.mode))
                    .map_or(TravelTime::Unreachable, |secs| TravelTime::Seconds(*secs))
            })
            .collect())
    }
}
