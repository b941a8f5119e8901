//! Polygon-style aggregates adapter.
//!
//! Two endpoints: previous-day aggregate for the live metric block and a
//! 30-day daily range for the chart series. The API key rides as a query
//! parameter per the provider's scheme.

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::error::FetchError;
use crate::http_client::{HttpClient, HttpRequest};
use crate::{Bar, HistoricalSeries, QuoteSnapshot, Symbol, UtcDateTime, LOOKBACK_DAYS, MAX_BARS};

pub const DEFAULT_BASE_URL: &str = "https://api.polygon.io/v2";

/// Client for the aggregates endpoints.
#[derive(Clone)]
pub struct PolygonAdapter {
    http_client: Arc<dyn HttpClient>,
    api_key: String,
    base_url: String,
}

impl PolygonAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            base_url: String::from(DEFAULT_BASE_URL),
        }
    }

    /// Point the adapter at a different host, mostly for tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Previous trading day's aggregate, normalized into a snapshot.
    ///
    /// A well-formed body with no result rows degrades to an all-zero
    /// snapshot; a body that is not JSON at all is a malformed-response
    /// failure.
    pub async fn prev_day(&self, symbol: &Symbol) -> Result<QuoteSnapshot, FetchError> {
        let url = format!(
            "{}/aggs/ticker/{}/prev?apiKey={}",
            self.base_url,
            urlencoding::encode(symbol.as_str()),
            urlencoding::encode(&self.api_key),
        );

        let body = self.execute(url).await?;
        let response: AggregatesResponse = serde_json::from_str(&body)
            .map_err(|error| FetchError::malformed(format!("previous-day payload: {error}")))?;

        let captured_at = UtcDateTime::now();
        let snapshot = match response.results.first() {
            Some(row) => QuoteSnapshot::derive(
                symbol.clone(),
                row.c,
                row.o,
                volume_from_raw(row.v),
                captured_at,
            ),
            None => {
                debug!(%symbol, "previous-day response carried no result rows");
                QuoteSnapshot::empty(symbol.clone(), captured_at)
            }
        };

        Ok(snapshot)
    }

    /// Daily bars over the fixed 30-calendar-day lookback window, capped at
    /// [`MAX_BARS`] rows at the consuming edge.
    pub async fn daily_series(&self, symbol: &Symbol) -> Result<HistoricalSeries, FetchError> {
        let to = UtcDateTime::now();
        let from = to.days_back(LOOKBACK_DAYS);

        let url = format!(
            "{}/aggs/ticker/{}/range/1/day/{}/{}?adjusted=true&sort=asc&limit={}&apiKey={}",
            self.base_url,
            urlencoding::encode(symbol.as_str()),
            from.unix_seconds(),
            to.unix_seconds(),
            MAX_BARS,
            urlencoding::encode(&self.api_key),
        );

        let body = self.execute(url).await?;
        let response: AggregatesResponse = serde_json::from_str(&body)
            .map_err(|error| FetchError::malformed(format!("range payload: {error}")))?;

        let bars = response
            .results
            .iter()
            .map(|row| {
                Bar::sanitized(
                    UtcDateTime::from_unix_ms_lossy(row.t),
                    row.o,
                    row.h,
                    row.l,
                    row.c,
                    volume_from_raw(row.v),
                )
            })
            .collect();

        Ok(HistoricalSeries::from_bars(symbol.clone(), bars))
    }

    async fn execute(&self, url: String) -> Result<String, FetchError> {
        let request = HttpRequest::get(url);
        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|error| FetchError::transport(error.message()))?;

        if !response.is_success() {
            return Err(FetchError::status(response.status));
        }

        Ok(response.body)
    }
}

/// Aggregates envelope. Missing fields default so a sparse row degrades to
/// zeros instead of failing the whole response.
#[derive(Debug, Deserialize)]
struct AggregatesResponse {
    #[serde(default)]
    results: Vec<AggregateRow>,
}

#[derive(Debug, Default, Deserialize)]
struct AggregateRow {
    #[serde(default)]
    t: i64,
    #[serde(default)]
    o: f64,
    #[serde(default)]
    h: f64,
    #[serde(default)]
    l: f64,
    #[serde(default)]
    c: f64,
    /// The provider reports volume as a float.
    #[serde(default)]
    v: f64,
}

fn volume_from_raw(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::http_client::{HttpError, HttpResponse};

    #[derive(Debug)]
    struct ScriptedHttpClient {
        response: Result<HttpResponse, HttpError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedHttpClient {
        fn ok(body: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(HttpResponse::ok_json(body)),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn status(status: u16) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(HttpResponse {
                    status,
                    body: String::new(),
                }),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn last_url(&self) -> String {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .last()
                .map(|request| request.url.clone())
                .unwrap_or_default()
        }
    }

    impl HttpClient for ScriptedHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> std::pin::Pin<
            Box<dyn std::future::Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>,
        > {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    fn sym() -> Symbol {
        Symbol::parse("AMZN").expect("valid symbol")
    }

    #[tokio::test]
    async fn prev_day_parses_aggregate_row() {
        let client = ScriptedHttpClient::ok(r#"{"results":[{"c":185.50,"o":180.00,"v":45000000}]}"#);
        let adapter = PolygonAdapter::new(client.clone(), "key-123");

        let snapshot = adapter.prev_day(&sym()).await.expect("must parse");
        assert_eq!(snapshot.price, 185.50);
        assert_eq!(snapshot.open, 180.00);
        assert_eq!(snapshot.volume, 45_000_000);
        assert!((snapshot.change - 5.50).abs() < 1e-9);

        let url = client.last_url();
        assert!(url.contains("/aggs/ticker/AMZN/prev"));
        assert!(url.contains("apiKey=key-123"));
    }

    #[tokio::test]
    async fn empty_results_degrade_to_zero_snapshot() {
        let client = ScriptedHttpClient::ok(r#"{"status":"OK","results":[]}"#);
        let adapter = PolygonAdapter::new(client, "key-123");

        let snapshot = adapter.prev_day(&sym()).await.expect("must not error");
        assert_eq!(snapshot.price, 0.0);
        assert_eq!(snapshot.volume, 0);
    }

    #[tokio::test]
    async fn missing_row_fields_default_to_zero() {
        let client = ScriptedHttpClient::ok(r#"{"results":[{"c":185.50}]}"#);
        let adapter = PolygonAdapter::new(client, "key-123");

        let snapshot = adapter.prev_day(&sym()).await.expect("must not error");
        assert_eq!(snapshot.price, 185.50);
        assert_eq!(snapshot.open, 0.0);
        assert_eq!(snapshot.change_percent, 0.0);
    }

    #[tokio::test]
    async fn throttle_status_maps_to_rate_limited() {
        let client = ScriptedHttpClient::status(429);
        let adapter = PolygonAdapter::new(client, "key-123");

        let error = adapter.prev_day(&sym()).await.expect_err("must fail");
        assert!(matches!(error, FetchError::RateLimited));
    }

    #[tokio::test]
    async fn server_error_maps_to_transport() {
        let client = ScriptedHttpClient::status(500);
        let adapter = PolygonAdapter::new(client, "key-123");

        let error = adapter.prev_day(&sym()).await.expect_err("must fail");
        assert!(matches!(
            error,
            FetchError::Transport {
                status: Some(500),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let client = ScriptedHttpClient::ok("<html>maintenance</html>");
        let adapter = PolygonAdapter::new(client, "key-123");

        let error = adapter.prev_day(&sym()).await.expect_err("must fail");
        assert!(matches!(error, FetchError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn daily_series_builds_range_url_in_epoch_seconds() {
        let client = ScriptedHttpClient::ok(
            r#"{"results":[
                {"t":1704067200000,"o":180.0,"h":186.0,"l":179.0,"c":185.5,"v":45000000},
                {"t":1704153600000,"o":185.5,"h":188.0,"l":184.0,"c":186.2,"v":39000000}
            ]}"#,
        );
        let adapter = PolygonAdapter::new(client.clone(), "key-123");

        let series = adapter.daily_series(&sym()).await.expect("must parse");
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars[0].close, 185.5);
        assert_eq!(series.bars[1].volume, 39_000_000);

        let url = client.last_url();
        assert!(url.contains("/range/1/day/"));
        assert!(url.contains("adjusted=true&sort=asc&limit=30"));
    }
}
