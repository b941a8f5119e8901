//! Provider adapters: the aggregates API and the proxied-page scrape.

mod polygon;
mod scrape;

pub use polygon::{PolygonAdapter, DEFAULT_BASE_URL};
pub use scrape::{FieldExtractor, ProxiedPageAdapter, DEFAULT_PROXY_PREFIX};
