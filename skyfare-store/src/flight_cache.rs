use skyfare_core::{FlightOffer, FlightSearch, OfferStore, StoreError};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30);

/// Cache key for a search: `origin:destination:YYYY-MM-DD:adults:non_stop`.
pub fn fingerprint(search: &FlightSearch) -> String {
    format!(
        "{}:{}:{}:{}:{}",
        search.origin,
        search.destination,
        search.departure_date_str(),
        search.adults,
        search.non_stop
    )
}

/// Cache-aside gateway over an [`OfferStore`]. Owns the JSON encoding of
/// cached offer lists and the write TTL.
#[derive(Clone)]
pub struct FlightCache {
    store: Arc<dyn OfferStore>,
    ttl: Duration,
}

impl FlightCache {
    pub fn new(store: Arc<dyn OfferStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// `Ok(None)` on miss or expiry. Store and decode failures are errors,
    /// never misses.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<FlightOffer>>, StoreError> {
        let Some(raw) = self.store.get(key).await? else {
            debug!("Cache miss: {}", key);
            return Ok(None);
        };

        let offers: Vec<FlightOffer> = serde_json::from_str(&raw)?;
        debug!("Cache hit: {} ({} offers)", key, offers.len());
        Ok(Some(offers))
    }

    pub async fn set(&self, key: &str, offers: &[FlightOffer]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(offers)?;
        self.store.set(key, raw, self.ttl).await
    }
}
