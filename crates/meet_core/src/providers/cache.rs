use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lru::LruCache;
use tracing::trace;

use super::LegKey;
use crate::error::TravelTimeError;
use crate::geo::Coordinate;
use crate::ports::{TravelTimeProvider, TravelTimeRequest};
use crate::ranking::TravelTime;

/// LRU-cached wrapper around any [`TravelTimeProvider`].
///
/// Cache key is [`LegKey`] (directional, per mode). Only departure-less
/// requests use the cache; a departure time makes the answer time-dependent.
/// On a partial hit only the missing destinations are sent to the inner
/// provider. Failed batches are never cached.
pub struct CachedTravelTimes {
    inner: Arc<dyn TravelTimeProvider>,
    cache: Mutex<LruCache<LegKey, TravelTime>>,
}

impl CachedTravelTimes {
    pub fn new(inner: Arc<dyn TravelTimeProvider>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Number of cached legs.
    pub fn len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, request: &TravelTimeRequest) -> Vec<Option<TravelTime>> {
        let Ok(mut cache) = self.cache.lock() else {
            return vec![None; request.destinations.len()];
        };
        request
            .destinations
            .iter()
            .map(|d| cache.get(&LegKey::new(request.origin, *d, request.mode)).copied())
            .collect()
    }
}

#[async_trait]
impl TravelTimeProvider for CachedTravelTimes {
    async fn travel_times(
        &self,
        request: &TravelTimeRequest,
    ) -> Result<Vec<TravelTime>, TravelTimeError> {
        if request.departure.is_some() {
            return self.inner.travel_times(request).await;
        }

        // Fast path: every leg cached
        let mut slots = self.lookup(request);
        let missing: Vec<(usize, Coordinate)> = slots
            .iter()
            .zip(&request.destinations)
            .enumerate()
            .filter(|(_, (slot, _))| slot.is_none())
            .map(|(i, (_, d))| (i, *d))
            .collect();
        if missing.is_empty() {
            trace!(origin = %request.origin, legs = slots.len(), "travel-time cache hit");
            return Ok(slots.into_iter().flatten().collect());
        }

        // Slow path: query inner provider for the misses only
        let sub_request = TravelTimeRequest {
            origin: request.origin,
            destinations: missing.iter().map(|(_, d)| *d).collect(),
            mode: request.mode,
            departure: None,
        };
        let fetched = self.inner.travel_times(&sub_request).await?;
        if fetched.len() != missing.len() {
            return Err(TravelTimeError::LengthMismatch {
                expected: missing.len(),
                got: fetched.len(),
            });
        }

        if let Ok(mut cache) = self.cache.lock() {
            for ((_, destination), time) in missing.iter().zip(&fetched) {
                cache.put(LegKey::new(request.origin, *destination, request.mode), *time);
            }
        }
        for ((index, _), time) in missing.into_iter().zip(fetched) {
            slots[index] = Some(time);
        }
        Ok(slots.into_iter().flatten().collect())
    }
}
