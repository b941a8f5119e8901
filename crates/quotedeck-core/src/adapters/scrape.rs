//! Scraping variant: fetch a quote page through a CORS-relay proxy.
//!
//! The pipeline only owns the transport and normalization halves. Turning
//! the proxied page body into the three cell texts is selector work that
//! belongs to a black-box [`FieldExtractor`] collaborator supplied by the
//! embedding application.

use std::sync::Arc;

use crate::error::FetchError;
use crate::http_client::{HttpClient, HttpRequest};
use crate::normalize::{snapshot_from_scraped, ScrapedFields};
use crate::{QuoteSnapshot, Symbol, UtcDateTime};

/// Public CORS relay used when the embedder does not supply one.
pub const DEFAULT_PROXY_PREFIX: &str = "https://api.allorigins.win/raw?url=";

/// Extracts the price/open/volume cell text from a fetched page body.
///
/// Fields the extractor cannot locate should come back empty; normalization
/// degrades them to zero.
pub trait FieldExtractor: Send + Sync {
    fn extract(&self, body: &str) -> ScrapedFields;
}

/// Quote source that reads a public quote page through a CORS proxy.
#[derive(Clone)]
pub struct ProxiedPageAdapter {
    http_client: Arc<dyn HttpClient>,
    extractor: Arc<dyn FieldExtractor>,
    proxy_prefix: String,
    page_url: String,
}

impl ProxiedPageAdapter {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        extractor: Arc<dyn FieldExtractor>,
        page_url: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            extractor,
            proxy_prefix: String::from(DEFAULT_PROXY_PREFIX),
            page_url: page_url.into(),
        }
    }

    pub fn with_proxy_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.proxy_prefix = prefix.into();
        self
    }

    /// Fetch the page through the proxy and normalize the extracted cells.
    pub async fn snapshot(&self, symbol: &Symbol) -> Result<QuoteSnapshot, FetchError> {
        let url = format!(
            "{}{}",
            self.proxy_prefix,
            urlencoding::encode(&self.page_url)
        );

        let request = HttpRequest::get(url);
        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|error| FetchError::transport(error.message()))?;

        if !response.is_success() {
            return Err(FetchError::status(response.status));
        }

        let fields = self.extractor.extract(&response.body);
        Ok(snapshot_from_scraped(
            symbol.clone(),
            &fields,
            UtcDateTime::now(),
        ))
    }
}
