//! Stale-while-revalidate caching of raw upstream payloads.

use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::store::StateStore;

pub const GOLD_CACHE_KEY: &str = "gold_prices_cache";
pub const CURRENCY_CACHE_KEY: &str = "currency_prices_cache";
pub const BRIDGE_CACHE_KEY: &str = "proxy_market_data";

pub const DEFAULT_TTL_HOURS: i64 = 24;

/// A payload paired with its fetch time. Replaced wholesale on every
/// successful fetch, never partially updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedPayload<T> {
    pub timestamp: DateTime<Utc>,
    pub data: T,
}

/// Outcome of an SWR lookup.
///
/// `data` is always usable. `is_stale` marks an entry served past its
/// TTL because the refresh failed; `error` carries that refresh
/// failure for callers that want to surface it.
#[derive(Debug)]
pub struct CacheOutcome<T, E> {
    pub data: T,
    pub is_stale: bool,
    pub error: Option<E>,
}

/// Durable cache with stale-while-revalidate semantics.
pub struct SwrCache {
    store: Arc<StateStore>,
    ttl: Duration,
    // One guard per key so overlapping refreshes cannot race on the
    // same entry; a caller that waited re-checks freshness first.
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SwrCache {
    pub fn new(store: Arc<StateStore>, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_default_ttl(store: Arc<StateStore>) -> Self {
        Self::new(store, Duration::hours(DEFAULT_TTL_HOURS))
    }

    async fn key_guard(&self, key: &str) -> Arc<Mutex<()>> {
        let mut guards = self.in_flight.lock().await;
        guards
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// SWR lookup for `key`.
    ///
    /// A fresh entry is returned without calling `fetch`. A missing or
    /// expired entry triggers `fetch`; on success the entry is replaced
    /// and returned fresh. When the fetch fails and any prior entry
    /// exists, the stale entry is preferred over raising; only with
    /// nothing cached at all does the error propagate.
    pub async fn get_with<T, E, F, Fut>(
        &self,
        key: &str,
        fetch: F,
    ) -> Result<CacheOutcome<T, E>, E>
    where
        T: Serialize + DeserializeOwned + Clone,
        E: Display,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let guard = self.key_guard(key).await;
        let _refresh_permit = guard.lock().await;

        let cached: Option<CachedPayload<T>> = self.store.get_json(key);

        if let Some(entry) = &cached {
            let age = Utc::now() - entry.timestamp;
            if age < self.ttl {
                debug!(
                    "using fresh cache for {} ({} mins old)",
                    key,
                    age.num_minutes()
                );
                return Ok(CacheOutcome {
                    data: entry.data.clone(),
                    is_stale: false,
                    error: None,
                });
            }
        }

        debug!("fetching fresh data for {}", key);
        match fetch().await {
            Ok(data) => {
                self.store.set_json(
                    key,
                    &CachedPayload {
                        timestamp: Utc::now(),
                        data: data.clone(),
                    },
                );
                Ok(CacheOutcome {
                    data,
                    is_stale: false,
                    error: None,
                })
            }
            Err(err) => match cached {
                Some(entry) => {
                    let stale_mins = (Utc::now() - entry.timestamp).num_minutes();
                    warn!(
                        "fetch failed for {} ({}), serving stale cache ({} mins old)",
                        key, err, stale_mins
                    );
                    Ok(CacheOutcome {
                        data: entry.data,
                        is_stale: true,
                        error: Some(err),
                    })
                }
                None => Err(err),
            },
        }
    }

    /// Convenience wrapper that discards the staleness flag.
    pub async fn get<T, E, F, Fut>(&self, key: &str, fetch: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned + Clone,
        E: Display,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        Ok(self.get_with(key, fetch).await?.data)
    }

}
