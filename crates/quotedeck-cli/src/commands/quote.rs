use std::process::ExitCode;

use tracing::warn;

use quotedeck_core::Symbol;

use crate::cli::{Cli, OutputFormat, QuoteArgs};
use crate::error::CliError;
use crate::output;

use super::AppContext;

pub async fn run(args: &QuoteArgs, cli: &Cli, context: &AppContext) -> Result<ExitCode, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let fetched = paint(&symbol, args.shares_outstanding, cli, context).await?;

    if fetched {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(3))
    }
}

/// Fetch the snapshot through the pipeline and render one metric block.
/// Returns whether the fetch succeeded; a failure has already painted the
/// error state.
pub(super) async fn paint(
    symbol: &Symbol,
    shares_outstanding: Option<f64>,
    cli: &Cli,
    context: &AppContext,
) -> Result<bool, CliError> {
    let adapter = context.adapter.clone();
    let fetched = context
        .pipeline
        .fetch(&symbol.cache_key(), || {
            let adapter = adapter.clone();
            let symbol = symbol.clone();
            async move { adapter.prev_day(&symbol).await }
        })
        .await;

    match fetched {
        Ok(snapshot) => {
            match cli.format {
                OutputFormat::Text => {
                    print!("{}", output::quote_block(&snapshot, shares_outstanding));
                }
                OutputFormat::Json => {
                    let value = output::quote_json(&snapshot, shares_outstanding)?;
                    println!("{}", output::render_json(&value, cli.pretty)?);
                }
            }
            Ok(true)
        }
        Err(error) => {
            warn!(%symbol, %error, "snapshot fetch failed; painting error state");
            match cli.format {
                OutputFormat::Text => print!("{}", output::quote_error_block(symbol)),
                OutputFormat::Json => {
                    let value = output::error_json(symbol, &error);
                    println!("{}", output::render_json(&value, cli.pretty)?);
                }
            }
            Ok(false)
        }
    }
}
