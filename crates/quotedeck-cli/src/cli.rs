//! CLI argument definitions for quotedeck.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `quote` | Fetch the previous-day snapshot for one symbol |
//! | `bars` | Fetch the 30-day daily series with signal markers |
//! | `watch` | Periodically refresh the metric block and series |
//! | `analyze` | Ask the chat-completion endpoint for commentary |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `text` | Output format (text, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--cache-dir` | none | Durable cache directory (cache disabled without it) |
//! | `--cache-ttl-secs` | `300` | Cache entry maximum age |
//! | `--min-interval-secs` | `15` | Spacing between provider requests |
//! | `--retry-delay-secs` | `20` | Fixed pause before each retry |
//! | `--max-retries` | `3` | Retries after the initial attempt |

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Single-stock dashboard in a terminal.
///
/// Fetches price/volume data from a market-data aggregates API through a
/// rate-limited, retrying, cache-backed pipeline, and optionally asks a
/// chat-completion endpoint for commentary.
#[derive(Debug, Parser)]
#[command(
    name = "quotedeck",
    author,
    version,
    about = "Single-stock dashboard CLI"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Directory for the durable JSON-file cache. Without it every fetch
    /// goes to the network.
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Maximum cache entry age in seconds.
    #[arg(long, global = true, default_value_t = 300)]
    pub cache_ttl_secs: u64,

    /// Minimum spacing between provider requests in seconds.
    #[arg(long, global = true, default_value_t = 15)]
    pub min_interval_secs: u64,

    /// Fixed pause before each retry in seconds.
    #[arg(long, global = true, default_value_t = 20)]
    pub retry_delay_secs: u64,

    /// Retries after the initial attempt.
    #[arg(long, global = true, default_value_t = 3)]
    pub max_retries: u32,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable metric block.
    Text,
    /// Single JSON object output.
    Json,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the previous trading day's snapshot for a symbol.
    ///
    /// # Examples
    ///
    ///   quotedeck quote AMZN
    ///   quotedeck quote AMZN --shares-outstanding 10200000000
    Quote(QuoteArgs),

    /// Fetch the 30-day daily series with moving-average signal markers.
    ///
    /// # Examples
    ///
    ///   quotedeck bars AMZN
    ///   quotedeck bars AMZN --format json --pretty
    Bars(BarsArgs),

    /// Refresh the metric block every quote interval and the series every
    /// series interval, indefinitely or for a fixed number of rounds.
    ///
    /// # Examples
    ///
    ///   quotedeck watch AMZN
    ///   quotedeck watch AMZN --quote-secs 15 --series-secs 120 --rounds 8
    Watch(WatchArgs),

    /// Ask the chat-completion endpoint for four-section commentary.
    ///
    /// Requires QUOTEDECK_OPENAI_API_KEY.
    ///
    /// # Examples
    ///
    ///   quotedeck analyze AMZN
    Analyze(AnalyzeArgs),
}

#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// Ticker symbol.
    pub symbol: String,

    /// Share count used to derive a market-cap line.
    #[arg(long)]
    pub shares_outstanding: Option<f64>,
}

#[derive(Debug, Args)]
pub struct BarsArgs {
    /// Ticker symbol.
    pub symbol: String,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Ticker symbol.
    pub symbol: String,

    /// Seconds between metric-block refreshes.
    #[arg(long, default_value_t = 15)]
    pub quote_secs: u64,

    /// Seconds between series refreshes.
    #[arg(long, default_value_t = 120)]
    pub series_secs: u64,

    /// Stop after this many quote refreshes (runs forever without it).
    #[arg(long)]
    pub rounds: Option<u64>,

    /// Share count used to derive a market-cap line.
    #[arg(long)]
    pub shares_outstanding: Option<f64>,
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Ticker symbol.
    pub symbol: String,
}
