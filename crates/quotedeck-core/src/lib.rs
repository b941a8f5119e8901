//! # Quotedeck Core
//!
//! Fetch pipeline and domain contracts for the quotedeck single-stock
//! dashboard.
//!
//! ## Overview
//!
//! The crate centers on one component: a rate-limited, retrying,
//! cache-backed fetch pipeline that turns raw provider responses into
//! immutable [`QuoteSnapshot`] and [`HistoricalSeries`] values. Everything
//! downstream of those values (chart painting, page updates) is a consumer,
//! not part of this crate.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (aggregates API, proxied-page scrape) |
//! | [`cache`] | Time-bounded cache with memory and durable JSON-file backends |
//! | [`config`] | Environment-sourced secrets |
//! | [`cooldown`] | Minimum-spacing rate limiter |
//! | [`domain`] | Domain models (QuoteSnapshot, Bar, HistoricalSeries) |
//! | [`error`] | Validation, fetch, and config error types |
//! | [`format`] | en-US display formatting for the metric block |
//! | [`http_client`] | HTTP client abstraction |
//! | [`normalize`] | Lossy text-to-value normalization |
//! | [`pipeline`] | Fetch orchestration |
//! | [`retry`] | Fixed-delay bounded retry loop |
//! | [`signal`] | Moving-average crossover markers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use quotedeck_core::{
//!     FetchPipeline, PolygonAdapter, ReqwestHttpClient, Secrets, Symbol,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let secrets = Secrets::from_env()?;
//!     let adapter = PolygonAdapter::new(
//!         Arc::new(ReqwestHttpClient::new()),
//!         secrets.polygon_api_key(),
//!     );
//!
//!     let symbol = Symbol::parse("AMZN")?;
//!     let pipeline = FetchPipeline::fresh();
//!     let snapshot = pipeline
//!         .fetch(&symbol.cache_key(), || adapter.prev_day(&symbol))
//!         .await?;
//!
//!     println!("{}: {}", symbol, quotedeck_core::format::currency(snapshot.price));
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! One fetch orchestration classifies every failure into the
//! [`FetchError`] taxonomy. `RateLimited` and `Transport` stay inside the
//! retry loop and never reach a caller; `Exhausted` is the terminal signal
//! the rendering layer turns into its error state. Malformed payload
//! *fields* never error at all — they degrade to zero per the dashboard's
//! lossy display policy.
//!
//! ## Concurrency
//!
//! The limiter timestamp and cache state are guarded internally, so the
//! pipeline stays correct if fetch triggers ever overlap; the expected
//! usage remains one in-flight fetch of a given kind, driven by periodic
//! timers.
//!
//! ## Security
//!
//! - API keys are read from environment variables only and never logged

pub mod adapters;
pub mod cache;
pub mod config;
pub mod cooldown;
pub mod domain;
pub mod error;
pub mod format;
pub mod http_client;
pub mod normalize;
pub mod pipeline;
pub mod retry;
pub mod signal;

// Re-export commonly used types at crate root for convenience

// Adapter implementations
pub use adapters::{FieldExtractor, PolygonAdapter, ProxiedPageAdapter};

// Caching
pub use cache::{CacheBackend, CacheStore, Clock, JsonFileBackend, MemoryBackend, SystemClock};

// Configuration
pub use config::Secrets;

// Rate limiting
pub use cooldown::{Cooldown, DEFAULT_MIN_INTERVAL};

// Domain models
pub use domain::{Bar, HistoricalSeries, QuoteSnapshot, Symbol, UtcDateTime, LOOKBACK_DAYS, MAX_BARS};

// Error types
pub use error::{ConfigError, FetchError, ValidationError};

// HTTP client types
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, NoopHttpClient,
    ReqwestHttpClient,
};

// Normalization
pub use normalize::{parse_price, parse_volume, ScrapedFields};

// Pipeline
pub use pipeline::FetchPipeline;

// Retry policy
pub use retry::{RetryPolicy, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY};

// Signals
pub use signal::{crossover_points, SignalPoints, MA_PERIOD};
