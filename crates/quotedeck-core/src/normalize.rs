//! Lossy normalization of raw provider text into domain values.
//!
//! Dashboard policy: a malformed field becomes zero, it never fails the
//! snapshot. Appropriate for a display surface, not for anything
//! safety-critical.

use crate::{QuoteSnapshot, Symbol, UtcDateTime};

/// Pre-extracted cell text from the scraping variant. Which page elements
/// these come from is the extractor's business, not the pipeline's.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScrapedFields {
    pub price: String,
    pub open: String,
    pub volume: String,
}

/// Parse a display volume string.
///
/// `"12.3M"` → 12_300_000, `"450K"` → 450_000, otherwise a plain integer
/// with thousands separators stripped. Anything unparseable is zero.
pub fn parse_volume(text: &str) -> u64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0;
    }

    if let Some(prefix) = trimmed.strip_suffix('M') {
        return scale_suffix(prefix, 1_000_000.0);
    }
    if let Some(prefix) = trimmed.strip_suffix('K') {
        return scale_suffix(prefix, 1_000.0);
    }

    let digits: String = trimmed.chars().filter(|ch| *ch != ',').collect();
    digits.parse::<u64>().unwrap_or(0)
}

fn scale_suffix(prefix: &str, factor: f64) -> u64 {
    let cleaned: String = prefix.trim().chars().filter(|ch| *ch != ',').collect();
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => (value * factor).round() as u64,
        _ => 0,
    }
}

/// Parse a display price string (`"$185.50"`, `"1,234.56"`). Unparseable or
/// negative text is zero.
pub fn parse_price(text: &str) -> f64 {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|ch| *ch != '$' && *ch != ',')
        .collect();

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => 0.0,
    }
}

/// Build a snapshot from scraped cell text, deriving change fields per the
/// usual formulas.
pub fn snapshot_from_scraped(
    symbol: Symbol,
    fields: &ScrapedFields,
    captured_at: UtcDateTime,
) -> QuoteSnapshot {
    QuoteSnapshot::derive(
        symbol,
        parse_price(&fields.price),
        parse_price(&fields.open),
        parse_volume(&fields.volume),
        captured_at,
    )
}
