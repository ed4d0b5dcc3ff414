//! Time-bounded single-value cache.

use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

struct Entry<V> {
    value: V,
    loaded_at: Instant,
}

/// Holds one loaded value for a fixed TTL.
///
/// Concurrent readers share the cached value; a stale or missing value is
/// reloaded under the write lock so only one loader runs at a time.
pub struct TtlCache<V> {
    ttl: Duration,
    slot: RwLock<Option<Entry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// Cached value while fresh, otherwise the loader's. `force_refresh`
    /// always reloads. Loader errors are returned and nothing is cached.
    pub async fn get_or_load<E, F, Fut>(&self, force_refresh: bool, loader: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if !force_refresh {
            if let Some(value) = self.fresh(&*self.slot.read().await) {
                return Ok(value);
            }
        }

        let mut slot = self.slot.write().await;
        if !force_refresh {
            // another caller may have loaded while we waited
            if let Some(value) = self.fresh(&slot) {
                return Ok(value);
            }
        }
        let value = loader().await?;
        *slot = Some(Entry {
            value: value.clone(),
            loaded_at: Instant::now(),
        });
        Ok(value)
    }

    pub async fn invalidate(&self) {
        *self.slot.write().await = None;
    }

    fn fresh(&self, slot: &Option<Entry<V>>) -> Option<V> {
        slot.as_ref()
            .filter(|entry| entry.loaded_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn load(counter: &AtomicUsize) -> Result<usize, String> {
        Ok(counter.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[tokio::test]
    async fn serves_cached_value_until_invalidated() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let loads = AtomicUsize::new(0);

        assert_eq!(cache.get_or_load(false, || load(&loads)).await, Ok(1));
        assert_eq!(cache.get_or_load(false, || load(&loads)).await, Ok(1));
        assert_eq!(cache.get_or_load(true, || load(&loads)).await, Ok(2));

        cache.invalidate().await;
        assert_eq!(cache.get_or_load(false, || load(&loads)).await, Ok(3));
    }

    #[tokio::test]
    async fn expired_value_is_reloaded_and_errors_are_not_cached() {
        let cache = TtlCache::new(Duration::from_millis(10));
        let loads = AtomicUsize::new(0);

        assert_eq!(cache.get_or_load(false, || load(&loads)).await, Ok(1));
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cache.get_or_load(false, || load(&loads)).await, Ok(2));

        cache.invalidate().await;
        let failed: Result<usize, String> = cache
            .get_or_load(false, || async { Err("offline".to_string()) })
            .await;
        assert!(failed.is_err());
        assert_eq!(cache.get_or_load(false, || load(&loads)).await, Ok(3));
    }
}
