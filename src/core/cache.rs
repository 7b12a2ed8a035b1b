use crate::core::rates::RateSnapshot;
use crate::core::source::RateSource;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(60 * 60);

/// Holds the latest rate snapshot and refreshes it from a [`RateSource`].
///
/// Readers get an `Arc` to a whole snapshot, so a refresh never exposes a mix of old and new
/// rates. Refreshes are serialized: callers arriving while one is in flight wait for it and
/// reuse its result.
pub struct RateCache<S: RateSource> {
    source: S,
    current: RwLock<Option<Arc<RateSnapshot>>>,
    refresh: Mutex<()>,
}

impl<S: RateSource> RateCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            current: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    pub async fn current_snapshot(&self) -> Option<Arc<RateSnapshot>> {
        self.current.read().await.clone()
    }

    pub async fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.current.read().await.as_ref().map(|s| s.fetched_at())
    }

    /// Fetches a new snapshot when none is held or the held one is older than `max_age`.
    pub async fn ensure_fresh(&self, max_age: Duration) {
        if !self.is_stale(max_age).await {
            debug!("Rate cache HIT");
            return;
        }

        let _guard = self.refresh.lock().await;
        // Another caller may have refreshed while we waited.
        if !self.is_stale(max_age).await {
            debug!("Rate cache refreshed by concurrent caller");
            return;
        }

        debug!("Rate cache MISS");
        self.replace().await;
    }

    /// Fetches a new snapshot regardless of age.
    pub async fn force_refresh(&self) {
        let seen = self.current_snapshot().await;

        let _guard = self.refresh.lock().await;
        let now_held = self.current_snapshot().await;
        let refreshed_meanwhile = match (&seen, &now_held) {
            (Some(a), Some(b)) => !Arc::ptr_eq(a, b),
            (None, Some(_)) => true,
            _ => false,
        };
        if refreshed_meanwhile {
            debug!("Rate cache refreshed by concurrent caller");
            return;
        }

        self.replace().await;
    }

    async fn is_stale(&self, max_age: Duration) -> bool {
        match self.current.read().await.as_ref() {
            None => true,
            Some(snapshot) => {
                let age = Utc::now().signed_duration_since(snapshot.fetched_at());
                // An unrepresentable max_age can never be exceeded.
                chrono::Duration::from_std(max_age).is_ok_and(|max| age > max)
            }
        }
    }

    // Callers must hold the refresh lock.
    async fn replace(&self) {
        let snapshot = Arc::new(self.source.fetch().await);
        info!(
            currencies = snapshot.len(),
            fetched_at = %snapshot.fetched_at(),
            "Exchange rates updated"
        );
        *self.current.write().await = Some(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::CurrencyCode;
    use crate::core::rates::{RateEntry, RateOrigin};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    /// Counts fetches and returns a snapshot whose USD rate is the fetch number.
    struct CountingSource {
        call_count: AtomicUsize,
        delay: Duration,
        age: chrono::Duration,
    }

    impl CountingSource {
        fn new() -> Self {
            Self {
                call_count: AtomicUsize::new(0),
                delay: Duration::ZERO,
                age: chrono::Duration::zero(),
            }
        }

        fn calls(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RateSource for CountingSource {
        async fn fetch(&self) -> RateSnapshot {
            let n = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;
            if !self.delay.is_zero() {
                sleep(self.delay).await;
            }
            let now = Utc::now();
            let mut entries = vec![
                RateEntry::base(now.date_naive(), RateOrigin::Primary),
                RateEntry::new(
                    CurrencyCode::Usd,
                    Decimal::from(n as u64),
                    now.date_naive(),
                    RateOrigin::Primary,
                ),
            ];
            // Coverage changes after the first fetch.
            if n == 1 {
                entries.push(RateEntry::new(
                    CurrencyCode::Eur,
                    Decimal::from(13500),
                    now.date_naive(),
                    RateOrigin::Primary,
                ));
            }
            RateSnapshot::new(entries, now - self.age)
        }
    }

    #[tokio::test]
    async fn test_starts_empty() {
        let cache = RateCache::new(CountingSource::new());
        assert!(cache.current_snapshot().await.is_none());
        assert!(cache.last_updated().await.is_none());
    }

    #[tokio::test]
    async fn test_ensure_fresh_within_window_fetches_once() {
        let cache = RateCache::new(CountingSource::new());

        cache.ensure_fresh(DEFAULT_MAX_AGE).await;
        cache.ensure_fresh(DEFAULT_MAX_AGE).await;

        assert_eq!(cache.source.calls(), 1);
        let snapshot = cache.current_snapshot().await.unwrap();
        assert_eq!(snapshot.rate_of(CurrencyCode::Usd), Some(Decimal::from(1)));
        assert_eq!(cache.last_updated().await, Some(snapshot.fetched_at()));
    }

    #[tokio::test]
    async fn test_ensure_fresh_after_window_replaces_snapshot() {
        let cache = RateCache::new(CountingSource::new());
        let max_age = Duration::from_millis(10);

        cache.ensure_fresh(max_age).await;
        let first = cache.current_snapshot().await.unwrap();
        assert!(first.get(CurrencyCode::Eur).is_some());

        sleep(Duration::from_millis(20)).await;
        cache.ensure_fresh(max_age).await;

        assert_eq!(cache.source.calls(), 2);
        let second = cache.current_snapshot().await.unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.rate_of(CurrencyCode::Usd), Some(Decimal::from(2)));
        // Replaced wholesale: entries absent upstream are gone.
        assert!(second.get(CurrencyCode::Eur).is_none());
        // Readers holding the old snapshot still see it intact.
        assert_eq!(first.rate_of(CurrencyCode::Usd), Some(Decimal::from(1)));
        assert!(first.get(CurrencyCode::Eur).is_some());
    }

    #[tokio::test]
    async fn test_backdated_snapshot_is_stale() {
        let source = CountingSource {
            age: chrono::Duration::hours(2),
            ..CountingSource::new()
        };
        let cache = RateCache::new(source);

        cache.ensure_fresh(DEFAULT_MAX_AGE).await;
        cache.ensure_fresh(DEFAULT_MAX_AGE).await;

        assert_eq!(cache.source.calls(), 2);
    }

    #[tokio::test]
    async fn test_force_refresh_always_fetches() {
        let cache = RateCache::new(CountingSource::new());

        cache.ensure_fresh(DEFAULT_MAX_AGE).await;
        cache.force_refresh().await;
        cache.force_refresh().await;

        assert_eq!(cache.source.calls(), 3);
        let snapshot = cache.current_snapshot().await.unwrap();
        assert_eq!(snapshot.rate_of(CurrencyCode::Usd), Some(Decimal::from(3)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_ensure_fresh_fetches_once() {
        let source = CountingSource {
            delay: Duration::from_millis(50),
            ..CountingSource::new()
        };
        let cache = Arc::new(RateCache::new(source));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move {
                    cache.ensure_fresh(DEFAULT_MAX_AGE).await;
                    cache.current_snapshot().await
                })
            })
            .collect();

        for handle in handles {
            let snapshot = handle.await.unwrap().unwrap();
            assert_eq!(snapshot.rate_of(CurrencyCode::Usd), Some(Decimal::from(1)));
        }
        assert_eq!(cache.source.calls(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_readers_not_blocked_by_refresh() {
        let source = CountingSource {
            delay: Duration::from_millis(200),
            ..CountingSource::new()
        };
        let cache = Arc::new(RateCache::new(source));
        cache.ensure_fresh(DEFAULT_MAX_AGE).await;

        let refreshing = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.force_refresh().await })
        };
        sleep(Duration::from_millis(20)).await;

        let read = tokio::time::timeout(Duration::from_millis(100), cache.current_snapshot())
            .await
            .expect("read must not wait for the refresh");
        assert_eq!(
            read.unwrap().rate_of(CurrencyCode::Usd),
            Some(Decimal::from(1))
        );

        refreshing.await.unwrap();
        let snapshot = cache.current_snapshot().await.unwrap();
        assert_eq!(snapshot.rate_of(CurrencyCode::Usd), Some(Decimal::from(2)));
    }
}
