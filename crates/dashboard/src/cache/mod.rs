//! Query/mutation cache for list queries against the WMS API.
//!
//! One cache entry per `(entity, search-term)` key, 5-minute TTL. For a given
//! key at most one fetch is in flight: concurrent readers share the pending
//! fetch (`moka`'s coalescing). A successful mutation invalidates the whole
//! key family for its entity, so every table refetches on its next render.
//!
//! Two pieces of search plumbing live here as well:
//!
//! - [`QueryCache::debounce`] - a search term must settle for 300 ms before a
//!   fetch is issued; terms superseded within the window never reach the
//!   network.
//! - in-flight cancellation - starting a fetch for a newer term aborts the
//!   outstanding fetch for an older term of the same entity, so a slow stale
//!   response can never land after a faster newer one.
//!
//! The cache is an injected service on `AppState`, not a process-global, so
//! tests construct their own instance and substitute fetch functions freely.

mod key;

pub use key::{CacheValue, Entity, QueryKey};

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::{AbortHandle, Abortable};
use moka::future::Cache;
use thiserror::Error;

use crate::wms::WmsError;

/// Maximum number of cached query results.
const MAX_CAPACITY: u64 = 1000;

/// How long a successful result stays fresh.
const TIME_TO_LIVE: Duration = Duration::from_secs(300);

/// How long a search term must stay unchanged before it is fetched.
const DEBOUNCE_DELAY: Duration = Duration::from_millis(300);

/// Errors surfaced by a cached fetch.
///
/// Clonable because concurrent readers of one key all receive the same
/// failure. Failures are never cached and never retried automatically.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// The underlying API call failed; carries the message shown to the user.
    #[error("{0}")]
    Api(String),

    /// The fetch was aborted because a newer search term took its place.
    #[error("superseded by a newer search")]
    Superseded,
}

impl From<WmsError> for QueryError {
    fn from(err: WmsError) -> Self {
        Self::Api(err.to_string())
    }
}

/// Shared query/mutation cache.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<QueryCacheInner>,
}

struct QueryCacheInner {
    cache: Cache<QueryKey, CacheValue>,
    /// Latest in-flight fetch per entity, keyed so a newer search term can
    /// abort an older one. Entries for finished fetches are harmless.
    inflight: Mutex<HashMap<Entity, (String, AbortHandle)>>,
    debouncer: Debouncer,
}

impl QueryCache {
    /// Create a cache with production TTL and debounce settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_debounce(DEBOUNCE_DELAY)
    }

    /// Create a cache with a custom debounce delay (used by tests).
    #[must_use]
    pub fn with_debounce(delay: Duration) -> Self {
        Self {
            inner: Arc::new(QueryCacheInner {
                cache: Cache::builder()
                    .max_capacity(MAX_CAPACITY)
                    .time_to_live(TIME_TO_LIVE)
                    .support_invalidation_closures()
                    .build(),
                inflight: Mutex::new(HashMap::new()),
                debouncer: Debouncer::new(delay),
            }),
        }
    }

    /// Wait out the debounce window for a search on `entity`.
    ///
    /// Returns `true` if the caller's term is still the latest one once the
    /// window elapses; callers must skip the fetch entirely on `false`.
    pub async fn debounce(&self, entity: Entity) -> bool {
        self.inner.debouncer.settle(entity).await
    }

    /// Read through the cache, fetching on miss.
    ///
    /// Concurrent callers with the same key share a single fetch. Starting a
    /// fetch for a new search term aborts the in-flight fetch for the
    /// entity's previous term.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Api` when the fetch fails (the error is not
    /// cached) and `QueryError::Superseded` when a newer term aborted it.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        entity: Entity,
        search: &str,
        fetch: F,
    ) -> Result<CacheValue, QueryError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CacheValue, WmsError>> + Send,
    {
        let key = QueryKey::new(entity, search);
        let inner = Arc::clone(&self.inner);
        let term = key.search.clone();

        self.inner
            .cache
            .try_get_with(key, async move {
                let (handle, registration) = AbortHandle::new_pair();
                register_latest(&inner.inflight, entity, term, handle);

                match Abortable::new(fetch(), registration).await {
                    Ok(Ok(value)) => Ok(value),
                    Ok(Err(err)) => {
                        tracing::warn!(entity = entity.name(), error = %err, "query fetch failed");
                        Err(QueryError::from(err))
                    }
                    Err(_aborted) => Err(QueryError::Superseded),
                }
            })
            .await
            .map_err(|err: Arc<QueryError>| (*err).clone())
    }

    /// Drop every cached result for an entity family.
    ///
    /// Called after each successful create/update/delete so the next render
    /// of any table for that entity refetches.
    pub fn invalidate(&self, entity: Entity) {
        tracing::debug!(entity = entity.name(), "invalidating cached queries");
        if let Err(err) = self
            .inner
            .cache
            .invalidate_entries_if(move |key, _| key.entity == entity)
        {
            tracing::warn!(entity = entity.name(), error = %err, "cache invalidation failed");
        }
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Record `(term, handle)` as the entity's latest fetch, aborting the
/// previous one if it was for a different term.
fn register_latest(
    inflight: &Mutex<HashMap<Entity, (String, AbortHandle)>>,
    entity: Entity,
    term: String,
    handle: AbortHandle,
) {
    let mut map = inflight.lock().expect("inflight lock poisoned");
    if let Some((previous_term, previous_handle)) = map.insert(entity, (term.clone(), handle))
        && previous_term != term
    {
        tracing::debug!(
            entity = entity.name(),
            stale = %previous_term,
            latest = %term,
            "aborting stale in-flight search"
        );
        previous_handle.abort();
    }
}

/// Coalesces rapid search input: a term only settles once no newer term has
/// arrived for the configured delay.
struct Debouncer {
    delay: Duration,
    counter: AtomicU64,
    latest: Mutex<HashMap<Entity, u64>>,
}

impl Debouncer {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            counter: AtomicU64::new(0),
            latest: Mutex::new(HashMap::new()),
        }
    }

    async fn settle(&self, entity: Entity) -> bool {
        let generation = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        self.latest
            .lock()
            .expect("debouncer lock poisoned")
            .insert(entity, generation);

        tokio::time::sleep(self.delay).await;

        self.latest
            .lock()
            .expect("debouncer lock poisoned")
            .get(&entity)
            .is_some_and(|latest| *latest == generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::AtomicUsize;

    use chrono::Utc;
    use rust_decimal::Decimal;

    use stockdeck_core::ProductId;

    use crate::wms::Product;

    fn product(id: i64, name: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            stock: 5,
            price: Decimal::new(1999, 2),
            created_at: Utc::now(),
        }
    }

    fn products_value(count: usize) -> CacheValue {
        CacheValue::Products((0..count).map(|i| product(i as i64, "Crate")).collect())
    }

    #[tokio::test]
    async fn test_second_read_hits_cache() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let calls = Arc::clone(&calls);
            let value = cache
                .get_or_fetch(Entity::Products, "", move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(products_value(3))
                })
                .await
                .expect("fetch");
            assert_eq!(value.into_products().expect("products").len(), 3);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_readers_share_one_fetch() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let fetch = |calls: Arc<AtomicUsize>, cache: QueryCache| async move {
            cache
                .get_or_fetch(Entity::Products, "crate", move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    Ok(products_value(1))
                })
                .await
        };

        let (a, b) = tokio::join!(
            fetch(Arc::clone(&calls), cache.clone()),
            fetch(Arc::clone(&calls), cache.clone())
        );

        assert!(a.is_ok());
        assert!(b.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let calls = Arc::clone(&calls);
            cache
                .get_or_fetch(Entity::Users, "", move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(CacheValue::Users(vec![]))
                })
                .await
                .expect("fetch");
            cache.invalidate(Entity::Users);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_only_touches_own_family() {
        let cache = QueryCache::new();
        let product_calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let calls = Arc::clone(&product_calls);
            cache
                .get_or_fetch(Entity::Products, "", move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(products_value(1))
                })
                .await
                .expect("fetch");
            // A users mutation must not evict cached product queries.
            cache.invalidate(Entity::Users);
        }

        assert_eq!(product_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let failing = cache
            .get_or_fetch(Entity::Products, "", {
                let calls = Arc::clone(&calls);
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(WmsError::MissingSessionCookie)
                }
            })
            .await;
        assert!(matches!(failing, Err(QueryError::Api(_))));

        let ok = cache
            .get_or_fetch(Entity::Products, "", {
                let calls = Arc::clone(&calls);
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(products_value(2))
                }
            })
            .await;
        assert!(ok.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_only_final_term_settles() {
        // Three keystrokes 100ms apart: only the last survives the 300ms window.
        let cache = QueryCache::new();

        let first = tokio::spawn({
            let cache = cache.clone();
            async move { cache.debounce(Entity::Products).await }
        });
        tokio::time::sleep(Duration::from_millis(100)).await;

        let second = tokio::spawn({
            let cache = cache.clone();
            async move { cache.debounce(Entity::Products).await }
        });
        tokio::time::sleep(Duration::from_millis(100)).await;

        let third = tokio::spawn({
            let cache = cache.clone();
            async move { cache.debounce(Entity::Products).await }
        });

        assert!(!first.await.expect("join"));
        assert!(!second.await.expect("join"));
        assert!(third.await.expect("join"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_is_per_entity() {
        let cache = QueryCache::new();

        let products = tokio::spawn({
            let cache = cache.clone();
            async move { cache.debounce(Entity::Products).await }
        });
        tokio::time::sleep(Duration::from_millis(100)).await;

        // A users search must not supersede the pending products search.
        let users = tokio::spawn({
            let cache = cache.clone();
            async move { cache.debounce(Entity::Users).await }
        });

        assert!(products.await.expect("join"));
        assert!(users.await.expect("join"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_term_aborts_stale_fetch() {
        let cache = QueryCache::new();
        let completed = Arc::new(AtomicUsize::new(0));

        let slow = tokio::spawn({
            let cache = cache.clone();
            let completed = Arc::clone(&completed);
            async move {
                cache
                    .get_or_fetch(Entity::Products, "cr", move || async move {
                        tokio::time::sleep(Duration::from_secs(5)).await;
                        completed.fetch_add(1, Ordering::SeqCst);
                        Ok(products_value(1))
                    })
                    .await
            }
        });
        // Let the slow fetch start before the newer term arrives.
        tokio::time::sleep(Duration::from_millis(10)).await;

        let fast = cache
            .get_or_fetch(Entity::Products, "crate", {
                let completed = Arc::clone(&completed);
                move || async move {
                    completed.fetch_add(1, Ordering::SeqCst);
                    Ok(products_value(2))
                }
            })
            .await
            .expect("fast fetch");
        assert_eq!(fast.into_products().expect("products").len(), 2);

        let stale = slow.await.expect("join");
        assert!(matches!(stale, Err(QueryError::Superseded)));
        // Only the newer fetch ever completed; the stale one never resolved.
        assert_eq!(completed.load(Ordering::SeqCst), 1);
    }
}
