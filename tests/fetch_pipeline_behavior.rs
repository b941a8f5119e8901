//! End-to-end fetch orchestration: adapter, cooldown, retry, and cache
//! working together against a scripted transport.

use std::sync::Arc;
use std::time::Duration;

use quotedeck_core::format::{metric_lines, Tendency};
use quotedeck_tests::{
    prev_day_body, symbol, CacheStore, Cooldown, FetchError, FetchPipeline, ManualClock,
    PolygonAdapter, RetryPolicy, ScriptedHttpClient,
};

fn pipeline(cache: CacheStore) -> FetchPipeline {
    FetchPipeline::new(
        Arc::new(Cooldown::new(Duration::from_secs(15))),
        RetryPolicy::new(3, Duration::from_secs(20)),
        cache,
    )
}

#[tokio::test(start_paused = true)]
async fn snapshot_fetch_produces_the_dashboard_metrics() {
    let http = ScriptedHttpClient::always_ok(&prev_day_body(185.50, 180.00, 45_000_000.0));
    let adapter = PolygonAdapter::new(http.clone(), "test-key");
    let pipeline = pipeline(CacheStore::disabled());
    let sym = symbol("AMZN");

    let snapshot = pipeline
        .fetch(&sym.cache_key(), || {
            let adapter = adapter.clone();
            let sym = sym.clone();
            async move { adapter.prev_day(&sym).await }
        })
        .await
        .expect("must fetch");

    let (price, change, tendency, volume) = metric_lines(&snapshot);
    assert_eq!(price, "$185.50");
    assert_eq!(change, "$5.50 (3.06%)");
    assert_eq!(tendency, Tendency::Positive);
    assert_eq!(volume, "45,000,000");
    assert_eq!(http.request_count(), 1);

    let urls = http.requested_urls();
    assert!(urls[0].contains("/aggs/ticker/AMZN/prev"));
    assert!(urls[0].contains("apiKey=test-key"));
}

#[tokio::test(start_paused = true)]
async fn throttled_provider_exhausts_after_four_attempts() {
    let http = ScriptedHttpClient::always_status(429);
    let adapter = PolygonAdapter::new(http.clone(), "test-key");
    let pipeline = pipeline(CacheStore::disabled());
    let sym = symbol("AMZN");
    let started = tokio::time::Instant::now();

    let error = pipeline
        .fetch(&sym.cache_key(), || {
            let adapter = adapter.clone();
            let sym = sym.clone();
            async move { adapter.prev_day(&sym).await }
        })
        .await
        .expect_err("must exhaust");

    assert!(matches!(error, FetchError::Exhausted { attempts: 4, .. }));
    assert_eq!(http.request_count(), 4);
    // Free first cooldown, then three fixed 20 s retry pauses.
    assert_eq!(started.elapsed(), Duration::from_secs(60));
}

#[tokio::test(start_paused = true)]
async fn back_to_back_fetches_keep_the_fifteen_second_cadence() {
    let http = ScriptedHttpClient::always_ok(&prev_day_body(185.50, 180.00, 45_000_000.0));
    let adapter = PolygonAdapter::new(http.clone(), "test-key");
    let pipeline = pipeline(CacheStore::disabled());
    let sym = symbol("AMZN");
    let started = tokio::time::Instant::now();

    for _ in 0..2 {
        pipeline
            .fetch(&sym.cache_key(), || {
                let adapter = adapter.clone();
                let sym = sym.clone();
                async move { adapter.prev_day(&sym).await }
            })
            .await
            .expect("must fetch");
    }

    assert_eq!(http.request_count(), 2);
    assert_eq!(started.elapsed(), Duration::from_secs(15));
}

#[tokio::test(start_paused = true)]
async fn fresh_variant_skips_the_cache_at_the_default_cadence() {
    let http = ScriptedHttpClient::always_ok(&prev_day_body(185.50, 180.00, 45_000_000.0));
    let adapter = PolygonAdapter::new(http.clone(), "test-key");
    let pipeline = FetchPipeline::fresh();
    let sym = symbol("AMZN");
    let started = tokio::time::Instant::now();

    for _ in 0..2 {
        pipeline
            .fetch(&sym.cache_key(), || {
                let adapter = adapter.clone();
                let sym = sym.clone();
                async move { adapter.prev_day(&sym).await }
            })
            .await
            .expect("must fetch");
    }

    // Nothing is cached, so both calls go out, spaced by the default 15 s.
    assert_eq!(http.request_count(), 2);
    assert_eq!(started.elapsed(), Duration::from_secs(15));
}

#[tokio::test(start_paused = true)]
async fn durable_cache_survives_a_new_pipeline_and_expires() {
    let dir = tempfile::tempdir().expect("tempdir");
    let clock = ManualClock::at(1_700_000_000);
    let http = ScriptedHttpClient::always_ok(&prev_day_body(185.50, 180.00, 45_000_000.0));
    let adapter = PolygonAdapter::new(http.clone(), "test-key");
    let sym = symbol("AMZN");

    let fetch_with_fresh_pipeline = || {
        let cache = CacheStore::durable(dir.path(), Duration::from_secs(300))
            .with_clock(clock.clone());
        let pipeline = pipeline(cache);
        let adapter = adapter.clone();
        let sym = sym.clone();
        async move {
            pipeline
                .fetch(&sym.cache_key(), || {
                    let adapter = adapter.clone();
                    let sym = sym.clone();
                    async move { adapter.prev_day(&sym).await }
                })
                .await
                .expect("must fetch")
        }
    };

    fetch_with_fresh_pipeline().await;
    assert_eq!(http.request_count(), 1);

    // A brand-new pipeline over the same directory reads the entry back.
    fetch_with_fresh_pipeline().await;
    assert_eq!(http.request_count(), 1);

    // Past the TTL the entry is evicted and the network is hit again.
    clock.advance(300);
    fetch_with_fresh_pipeline().await;
    assert_eq!(http.request_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn malformed_body_fails_without_retrying() {
    let http = ScriptedHttpClient::always_ok("<html>not json</html>");
    let adapter = PolygonAdapter::new(http.clone(), "test-key");
    let pipeline = pipeline(CacheStore::disabled());
    let sym = symbol("AMZN");

    let error = pipeline
        .fetch(&sym.cache_key(), || {
            let adapter = adapter.clone();
            let sym = sym.clone();
            async move { adapter.prev_day(&sym).await }
        })
        .await
        .expect_err("must fail");

    assert!(matches!(error, FetchError::MalformedResponse { .. }));
    assert_eq!(http.request_count(), 1);
}
