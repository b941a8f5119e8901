//! Display formatting for the metric block.
//!
//! Mirrors en-US display conventions: grouped thousands, two-decimal
//! dollars, and B/T suffixes for market-cap scale figures.

use crate::QuoteSnapshot;

/// Presentation text for a metric whose fetch orchestration failed.
pub const ERROR_STATE: &str = "Error loading data";

/// Presentation text while a metric has not been painted yet.
pub const LOADING_STATE: &str = "Loading...";

/// Direction styling hook for the change metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tendency {
    Positive,
    Negative,
}

impl Tendency {
    /// Zero change renders as positive, matching the dashboard's styling
    /// rule.
    pub fn from_change(change: f64) -> Self {
        if change >= 0.0 {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Positive => "▲",
            Self::Negative => "▼",
        }
    }
}

/// Group an integer with commas: `45000000` → `"45,000,000"`.
pub fn group_thousands(value: u64) -> String {
    group_digits(&value.to_string())
}

/// Dollar formatting with trillion/billion support.
///
/// `185.5` → `"$185.50"`, `1.8921e12` → `"$1.89T"`. Negative values keep
/// the sign ahead of the dollar: `-5.5` → `"-$5.50"`. Suffixes apply only
/// above the positive thresholds, as in the source dashboard.
pub fn currency(value: f64) -> String {
    if !value.is_finite() {
        return currency(0.0);
    }

    if value >= 1e12 {
        return format!("${:.2}T", value / 1e12);
    }
    if value >= 1e9 {
        return format!("${:.2}B", value / 1e9);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", value.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{sign}${}.{fraction}", group_digits(integer))
}

/// The change metric line: `"$5.50 (3.06%)"`.
pub fn change_line(change: f64, change_percent: f64) -> String {
    format!("{} ({:.2}%)", currency(change), change_percent)
}

/// Market capitalization from price and a share count supplied by the
/// caller.
pub fn market_cap(price: f64, shares_outstanding: f64) -> String {
    currency(price * shares_outstanding)
}

/// The full metric block for one snapshot, in render order: price, change,
/// change tendency, volume.
pub fn metric_lines(snapshot: &QuoteSnapshot) -> (String, String, Tendency, String) {
    (
        currency(snapshot.price),
        change_line(snapshot.change, snapshot.change_percent),
        Tendency::from_change(snapshot.change),
        group_thousands(snapshot.volume),
    )
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
