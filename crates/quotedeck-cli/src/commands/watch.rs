use std::process::ExitCode;
use std::time::Duration;

use tracing::info;

use quotedeck_core::Symbol;

use crate::cli::{Cli, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::{bars, quote, AppContext};

/// Periodic refresh loop: the metric block on the quote cadence, the bar
/// table on the series cadence. A failed refresh paints the error state and
/// the loop keeps ticking; the exit code reports whether any refresh failed
/// once a bounded run finishes.
pub async fn run(args: &WatchArgs, cli: &Cli, context: &AppContext) -> Result<ExitCode, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;

    let mut quote_tick = tokio::time::interval(Duration::from_secs(args.quote_secs.max(1)));
    let mut series_tick = tokio::time::interval(Duration::from_secs(args.series_secs.max(1)));
    let mut completed = 0u64;
    let mut had_errors = false;

    info!(
        %symbol,
        quote_secs = args.quote_secs,
        series_secs = args.series_secs,
        "starting watch loop"
    );

    // Placeholder metrics until the first fetch lands.
    if matches!(cli.format, OutputFormat::Text) {
        print!("{}", output::quote_loading_block(&symbol));
    }

    loop {
        tokio::select! {
            _ = quote_tick.tick() => {
                if !quote::paint(&symbol, args.shares_outstanding, cli, context).await? {
                    had_errors = true;
                }
                completed += 1;
                if let Some(rounds) = args.rounds {
                    if completed >= rounds {
                        break;
                    }
                }
            }
            _ = series_tick.tick() => {
                if !bars::paint(&symbol, cli, context).await? {
                    had_errors = true;
                }
            }
        }
    }

    if had_errors {
        Ok(ExitCode::from(3))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
