use std::process::ExitCode;

use tracing::warn;

use quotedeck_core::signal::crossover_points;
use quotedeck_core::Symbol;

use crate::cli::{BarsArgs, Cli, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::{series_cache_key, AppContext};

pub async fn run(args: &BarsArgs, cli: &Cli, context: &AppContext) -> Result<ExitCode, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let fetched = paint(&symbol, cli, context).await?;

    if fetched {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(3))
    }
}

/// Fetch the daily series through the pipeline and render the bar table
/// with crossover markers. Returns whether the fetch succeeded.
pub(super) async fn paint(
    symbol: &Symbol,
    cli: &Cli,
    context: &AppContext,
) -> Result<bool, CliError> {
    let adapter = context.adapter.clone();
    let fetched = context
        .pipeline
        .fetch(&series_cache_key(symbol), || {
            let adapter = adapter.clone();
            let symbol = symbol.clone();
            async move { adapter.daily_series(&symbol).await }
        })
        .await;

    match fetched {
        Ok(series) => {
            let signals = crossover_points(&series);
            match cli.format {
                OutputFormat::Text => print!("{}", output::bars_block(&series, &signals)),
                OutputFormat::Json => {
                    let value = output::bars_json(&series, &signals)?;
                    println!("{}", output::render_json(&value, cli.pretty)?);
                }
            }
            Ok(true)
        }
        Err(error) => {
            warn!(%symbol, %error, "series fetch failed; painting error state");
            match cli.format {
                OutputFormat::Text => print!("{}", output::bars_error_block(symbol)),
                OutputFormat::Json => {
                    let value = output::error_json(symbol, &error);
                    println!("{}", output::render_json(&value, cli.pretty)?);
                }
            }
            Ok(false)
        }
    }
}
