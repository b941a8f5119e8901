//! # Domain Models
//!
//! Canonical domain types for quotedeck market data.
//!
//! ## Models
//!
//! | Type | Description |
//! |------|-------------|
//! | [`QuoteSnapshot`] | Point-in-time price/volume record with derived change fields |
//! | [`Bar`] | Daily OHLCV bar with timestamp |
//! | [`HistoricalSeries`] | Ordered, deduplicated bar series capped at 30 bars |
//! | [`Symbol`] | Validated stock ticker |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! ## Lossy construction
//!
//! Snapshot and bar constructors follow the dashboard's
//! lossy-but-available policy: negative or non-finite provider values
//! collapse to zero instead of rejecting the record, and a zero open price
//! yields zero change fields rather than a division by zero.

mod models;
mod symbol;
mod timestamp;

pub use models::{Bar, HistoricalSeries, QuoteSnapshot, LOOKBACK_DAYS, MAX_BARS};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
