//! Caching layer for timetable responses.
//!
//! Only station suggestions are cached: they change rarely and are queried
//! on every keystroke of a station picker. Route and carriage searches
//! report live seat availability and always go upstream.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::domain::{
    Car, CarriageSearch, RoundTrip, RoundTripSearch, RouteSearch, Station, StationSearch,
    TrainRoute,
};
use crate::rzd::{HttpTransport, RzdClient, RzdError, Transport};

/// Cache key for station suggestions: (normalized query, compact mode,
/// language).
type StationKey = (String, bool, String);

/// Cached suggestion list.
type StationEntry = Arc<Vec<Station>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_capacity: 1000,
        }
    }
}

/// Cache for station suggestions.
pub struct StationCache {
    stations: MokaCache<StationKey, StationEntry>,
}

impl StationCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let stations = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { stations }
    }

    /// Build the key for a search, filling in the client's default language.
    fn key(search: &StationSearch, default_language: &str) -> StationKey {
        (
            search.query.trim().to_lowercase(),
            search.compact,
            search
                .language
                .as_deref()
                .unwrap_or(default_language)
                .to_string(),
        )
    }

    pub async fn get(&self, key: &StationKey) -> Option<StationEntry> {
        self.stations.get(key).await
    }

    pub async fn insert(&self, key: StationKey, entry: StationEntry) {
        self.stations.insert(key, entry).await;
    }
}

/// Timetable client with caching.
///
/// Wraps an `RzdClient`; station suggestions are served from the cache
/// when possible, everything else passes straight through.
pub struct CachedRzdClient<T = HttpTransport> {
    client: RzdClient<T>,
    cache: StationCache,
}

impl<T: Transport> CachedRzdClient<T> {
    /// Create a new cached client.
    pub fn new(client: RzdClient<T>, cache_config: &CacheConfig) -> Self {
        Self {
            client,
            cache: StationCache::new(cache_config),
        }
    }

    /// Suggest stations, using the cache if available. Failures are not
    /// cached.
    pub async fn search_stations(
        &self,
        search: &StationSearch,
        cancel: &CancellationToken,
    ) -> Result<StationEntry, RzdError> {
        let key = StationCache::key(search, self.client.language());

        if let Some(cached) = self.cache.get(&key).await {
            debug!(query = %key.0, "station suggestions served from cache");
            return Ok(cached);
        }

        let stations = Arc::new(self.client.search_stations(search, cancel).await?);
        self.cache.insert(key, stations.clone()).await;

        Ok(stations)
    }

    pub async fn search_routes(
        &self,
        search: &RouteSearch,
        cancel: &CancellationToken,
    ) -> Result<Vec<TrainRoute>, RzdError> {
        self.client.search_routes(search, cancel).await
    }

    pub async fn search_routes_return(
        &self,
        search: &RoundTripSearch,
        cancel: &CancellationToken,
    ) -> Result<RoundTrip, RzdError> {
        self.client.search_routes_return(search, cancel).await
    }

    pub async fn search_carriages(
        &self,
        search: &CarriageSearch,
        cancel: &CancellationToken,
    ) -> Result<Vec<Car>, RzdError> {
        self.client.search_carriages(search, cancel).await
    }

    /// Access the underlying client for operations that bypass cache.
    pub fn client(&self) -> &RzdClient<T> {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rzd::{ManualClock, MockTransport, RzdConfig};

    fn cached_client() -> CachedRzdClient<MockTransport> {
        let client = RzdClient::with_transport(
            &RzdConfig::default().with_max_retries(1),
            MockTransport::new(),
            Arc::new(ManualClock::new()),
        )
        .unwrap();
        CachedRzdClient::new(client, &CacheConfig::default())
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(3600));
        assert_eq!(config.max_capacity, 1000);
    }

    #[test]
    fn key_normalizes_query_and_language() {
        let mut search = StationSearch::new("  Моск ");
        assert_eq!(
            StationCache::key(&search, "ru"),
            ("моск".to_string(), true, "ru".to_string())
        );

        search.language = Some("en".to_string());
        search.compact = false;
        assert_eq!(
            StationCache::key(&search, "ru"),
            ("моск".to_string(), false, "en".to_string())
        );
    }

    #[tokio::test]
    async fn second_lookup_hits_cache() {
        let client = cached_client();
        client
            .client()
            .engine()
            .transport()
            .push_json(r#"[{"n":"МОСКВА","c":2000000}]"#);

        let cancel = CancellationToken::new();
        let first = client
            .search_stations(&StationSearch::new("МОСК"), &cancel)
            .await
            .unwrap();
        let second = client
            .search_stations(&StationSearch::new("моск"), &cancel)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(client.client().engine().transport().request_count(), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let client = cached_client();
        let transport = client.client().engine().transport();
        transport
            .push_json(r#"{"result":"OK","tp":[{"msgList":[{"message":"Станция не найдена"}]}]}"#)
            .push_json("[]");

        let cancel = CancellationToken::new();
        let search = StationSearch::new("ZZZ");
        assert!(client.search_stations(&search, &cancel).await.is_err());
        assert!(client.search_stations(&search, &cancel).await.unwrap().is_empty());
        assert_eq!(transport.request_count(), 2);
    }
}
