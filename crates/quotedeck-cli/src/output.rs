//! Terminal rendering for the metric block, the bar table, and the
//! commentary panel.
//!
//! Text output mirrors the dashboard panels: a metric block per snapshot,
//! a dated bar table with BUY/SELL markers, and four labelled commentary
//! sections. When a fetch fails every metric paints the same error state
//! so a partial panel never shows stale numbers next to fresh ones.

use serde_json::{json, Value};

use quotedeck_ai::AnalysisReport;
use quotedeck_core::format::{self, ERROR_STATE, LOADING_STATE};
use quotedeck_core::signal::SignalPoints;
use quotedeck_core::{FetchError, HistoricalSeries, QuoteSnapshot, Symbol};

pub fn render_json(value: &Value, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

/// Metric block for one snapshot, with an optional market-cap line.
pub fn quote_block(snapshot: &QuoteSnapshot, shares_outstanding: Option<f64>) -> String {
    let (price, change, tendency, volume) = format::metric_lines(snapshot);
    let mut block = format!(
        "{}\n  Price:   {price}\n  Change:  {} {change}\n  Volume:  {volume}\n",
        snapshot.symbol,
        tendency.arrow(),
    );
    if let Some(shares) = shares_outstanding {
        let cap = format::market_cap(snapshot.price, shares);
        block.push_str(&format!("  Mkt Cap: {cap}\n"));
    }
    block
}

/// Metric block with every metric in the error state.
pub fn quote_error_block(symbol: &Symbol) -> String {
    format!(
        "{symbol}\n  Price:   {ERROR_STATE}\n  Change:  {ERROR_STATE}\n  Volume:  {ERROR_STATE}\n"
    )
}

/// Placeholder block painted before the first watch fetch lands.
pub fn quote_loading_block(symbol: &Symbol) -> String {
    format!(
        "{symbol}\n  Price:   {LOADING_STATE}\n  Change:  {LOADING_STATE}\n  Volume:  {LOADING_STATE}\n"
    )
}

pub fn quote_json(
    snapshot: &QuoteSnapshot,
    shares_outstanding: Option<f64>,
) -> Result<Value, serde_json::Error> {
    let mut value = serde_json::to_value(snapshot)?;
    if let (Some(shares), Some(object)) = (shares_outstanding, value.as_object_mut()) {
        object.insert(
            String::from("market_cap"),
            Value::String(format::market_cap(snapshot.price, shares)),
        );
    }
    Ok(value)
}

/// Dated bar table with crossover markers in the last column.
pub fn bars_block(series: &HistoricalSeries, signals: &SignalPoints) -> String {
    let mut block = format!("{}  {} bars\n", series.symbol, series.len());
    for (index, bar) in series.bars.iter().enumerate() {
        let marker = if signals.buy.contains(&index) {
            "  BUY"
        } else if signals.sell.contains(&index) {
            "  SELL"
        } else {
            ""
        };
        let stamp = bar.ts.format_rfc3339();
        let date = stamp.get(..10).unwrap_or(stamp.as_str());
        block.push_str(&format!(
            "  {date}  {:>12}  {:>14}{marker}\n",
            format::currency(bar.close),
            format::group_thousands(bar.volume),
        ));
    }
    block
}

pub fn bars_error_block(symbol: &Symbol) -> String {
    format!("{symbol}\n  {ERROR_STATE}\n")
}

pub fn bars_json(
    series: &HistoricalSeries,
    signals: &SignalPoints,
) -> Result<Value, serde_json::Error> {
    Ok(json!({
        "symbol": series.symbol,
        "bars": serde_json::to_value(&series.bars)?,
        "signals": {
            "buy": signals.buy,
            "sell": signals.sell,
        },
    }))
}

/// Four labelled commentary sections, displayed verbatim.
pub fn analysis_block(symbol: &Symbol, report: &AnalysisReport) -> String {
    format!(
        "{symbol}\nTechnical\n  {}\nSentiment\n  {}\nTrading Signals\n  {}\nRisk Factors\n  {}\n",
        report.technical, report.sentiment, report.signals, report.risk,
    )
}

pub fn analysis_json(
    symbol: &Symbol,
    report: &AnalysisReport,
) -> Result<Value, serde_json::Error> {
    Ok(json!({
        "symbol": symbol,
        "analysis": serde_json::to_value(report)?,
    }))
}

/// JSON error shape shared by every command: the symbol, the error text,
/// and the same state string the text renderer paints.
pub fn error_json(symbol: &Symbol, error: &FetchError) -> Value {
    json!({
        "symbol": symbol,
        "state": ERROR_STATE,
        "error": error.to_string(),
    })
}
