use std::process::ExitCode;

use tracing::warn;

use quotedeck_ai::AnalysisClient;
use quotedeck_core::Symbol;

use crate::cli::{AnalyzeArgs, Cli, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::{series_cache_key, AppContext};

/// Fetch the daily series, then ask the completion endpoint for
/// commentary. The commentary exchange degrades internally; only a failed
/// series fetch maps to the fetch-failure exit code.
pub async fn run(
    args: &AnalyzeArgs,
    cli: &Cli,
    context: &AppContext,
) -> Result<ExitCode, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let api_key = context.secrets.require_openai_api_key()?.to_owned();

    let adapter = context.adapter.clone();
    let fetched = context
        .pipeline
        .fetch(&series_cache_key(&symbol), || {
            let adapter = adapter.clone();
            let symbol = symbol.clone();
            async move { adapter.daily_series(&symbol).await }
        })
        .await;

    let series = match fetched {
        Ok(series) => series,
        Err(error) => {
            warn!(%symbol, %error, "series fetch failed; no data to analyze");
            match cli.format {
                OutputFormat::Text => print!("{}", output::bars_error_block(&symbol)),
                OutputFormat::Json => {
                    let value = output::error_json(&symbol, &error);
                    println!("{}", output::render_json(&value, cli.pretty)?);
                }
            }
            return Ok(ExitCode::from(3));
        }
    };

    let client = AnalysisClient::new(context.http_client.clone(), api_key);
    let report = client.analyze(&symbol, &series).await;

    match cli.format {
        OutputFormat::Text => print!("{}", output::analysis_block(&symbol, &report)),
        OutputFormat::Json => {
            let value = output::analysis_json(&symbol, &report)?;
            println!("{}", output::render_json(&value, cli.pretty)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}
