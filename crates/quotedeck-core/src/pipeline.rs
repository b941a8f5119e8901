//! Fetch orchestration: cache probe, cooldown gate, bounded retry, cache
//! write-back.
//!
//! One call walks Idle → Limiting → Requesting and ends in Success,
//! RateLimited-looping-back, or Failed. The cooldown wait always precedes
//! the network call; a throttled response loops back through the retry
//! policy's fixed delay, which is independent of and longer than the base
//! cadence. There is no cancellation beyond the retry ceiling; periodic
//! re-invocation restarts the machine from Idle.

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::cache::CacheStore;
use crate::cooldown::Cooldown;
use crate::error::FetchError;
use crate::retry::RetryPolicy;

/// Rate-limited, retrying, cache-backed fetch front end.
///
/// Owns the limiter and cache exclusively; callers only ever receive
/// immutable payload values.
#[derive(Clone)]
pub struct FetchPipeline {
    cooldown: Arc<Cooldown>,
    retry: RetryPolicy,
    cache: CacheStore,
}

impl FetchPipeline {
    pub fn new(cooldown: Arc<Cooldown>, retry: RetryPolicy, cache: CacheStore) -> Self {
        Self {
            cooldown,
            retry,
            cache,
        }
    }

    /// Default cadence and retry policy with the cache disabled — the
    /// always-fetch-fresh API variant.
    pub fn fresh() -> Self {
        Self::new(
            Cooldown::shared_default(),
            RetryPolicy::default(),
            CacheStore::disabled(),
        )
    }

    /// Run one fetch orchestration for `cache_key`.
    ///
    /// `operation` performs the actual provider call and classifies its
    /// outcome into the [`FetchError`] taxonomy; the pipeline supplies the
    /// cache probe, the cooldown gate before every attempt, the fixed-delay
    /// retry loop, and the cache write on success.
    pub async fn fetch<T, F, Fut>(&self, cache_key: &str, operation: F) -> Result<T, FetchError>
    where
        T: Serialize + DeserializeOwned,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        if let Some(hit) = self.cache.get::<T>(cache_key) {
            debug!(key = cache_key, "cache hit; skipping network call");
            return Ok(hit);
        }

        let cooldown = &self.cooldown;
        let operation = &operation;
        let value = self
            .retry
            .run(move |attempt| async move {
                debug!(key = cache_key, attempt, "waiting on cooldown before request");
                cooldown.acquire().await;
                debug!(key = cache_key, attempt, "issuing provider request");
                operation().await
            })
            .await?;

        self.cache.put(cache_key, &value);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use super::*;

    fn pipeline_with_cache(cache: CacheStore) -> FetchPipeline {
        FetchPipeline::new(
            Arc::new(Cooldown::new(Duration::from_secs(15))),
            RetryPolicy::new(3, Duration::from_secs(20)),
            cache,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn cache_hit_skips_the_network_entirely() {
        let cache = CacheStore::in_memory(Duration::from_secs(300));
        cache.put("amzn_data", &185.5_f64);
        let pipeline = pipeline_with_cache(cache);
        let calls = AtomicU32::new(0);

        let value = pipeline
            .fetch("amzn_data", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<f64, FetchError>(0.0) }
            })
            .await
            .expect("cache hit");

        assert_eq!(value, 185.5);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn success_is_written_back_to_the_cache() {
        let cache = CacheStore::in_memory(Duration::from_secs(300));
        let pipeline = pipeline_with_cache(cache.clone());

        let value = pipeline
            .fetch("amzn_data", || async { Ok::<f64, FetchError>(185.5) })
            .await
            .expect("must fetch");

        assert_eq!(value, 185.5);
        assert_eq!(cache.get::<f64>("amzn_data"), Some(185.5));
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_cache_always_goes_to_the_network() {
        let pipeline = pipeline_with_cache(CacheStore::disabled());
        let calls = AtomicU32::new(0);

        for _ in 0..2 {
            pipeline
                .fetch("amzn_data", || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Ok::<f64, FetchError>(185.5) }
                })
                .await
                .expect("must fetch");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn throttled_provider_exhausts_with_fixed_delays() {
        let pipeline = pipeline_with_cache(CacheStore::disabled());
        let calls = AtomicU32::new(0);
        let started = tokio::time::Instant::now();

        let error = pipeline
            .fetch("amzn_data", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<f64, _>(FetchError::RateLimited) }
            })
            .await
            .expect_err("must exhaust");

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert!(matches!(error, FetchError::Exhausted { attempts: 4, .. }));
        // First cooldown is free; the three retry pauses (20 s) each exceed
        // the 15 s cadence, so the whole run takes exactly 60 s.
        assert_eq!(started.elapsed(), Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_leaves_no_cache_entry() {
        let cache = CacheStore::in_memory(Duration::from_secs(300));
        let pipeline = pipeline_with_cache(cache.clone());

        let _ = pipeline
            .fetch("amzn_data", || async {
                Err::<f64, _>(FetchError::transport("offline"))
            })
            .await;

        assert_eq!(cache.get::<f64>("amzn_data"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn consecutive_fetches_respect_the_cadence() {
        let pipeline = pipeline_with_cache(CacheStore::disabled());
        let started = tokio::time::Instant::now();

        for _ in 0..2 {
            pipeline
                .fetch("amzn_data", || async { Ok::<f64, FetchError>(1.0) })
                .await
                .expect("must fetch");
        }

        assert_eq!(started.elapsed(), Duration::from_secs(15));
    }
}
