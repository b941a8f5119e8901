mod analyze;
mod bars;
mod quote;
mod watch;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use quotedeck_core::{
    CacheStore, Cooldown, FetchPipeline, HttpClient, PolygonAdapter, ReqwestHttpClient,
    RetryPolicy, Secrets, Symbol,
};

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Shared wiring every command runs against: one HTTP client, one
/// aggregates adapter, and one fetch pipeline built from the global flags.
pub struct AppContext {
    pub adapter: PolygonAdapter,
    pub pipeline: FetchPipeline,
    pub secrets: Secrets,
    pub http_client: Arc<dyn HttpClient>,
}

pub async fn run(cli: &Cli) -> Result<ExitCode, CliError> {
    let context = build_context(cli)?;

    match &cli.command {
        Command::Quote(args) => quote::run(args, cli, &context).await,
        Command::Bars(args) => bars::run(args, cli, &context).await,
        Command::Watch(args) => watch::run(args, cli, &context).await,
        Command::Analyze(args) => analyze::run(args, cli, &context).await,
    }
}

fn build_context(cli: &Cli) -> Result<AppContext, CliError> {
    let secrets = Secrets::from_env()?;
    let http_client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
    let adapter = PolygonAdapter::new(http_client.clone(), secrets.polygon_api_key());

    let cache = match &cli.cache_dir {
        Some(dir) => CacheStore::durable(dir, Duration::from_secs(cli.cache_ttl_secs)),
        None => CacheStore::disabled(),
    };
    let pipeline = FetchPipeline::new(
        Arc::new(Cooldown::new(Duration::from_secs(cli.min_interval_secs))),
        RetryPolicy::new(cli.max_retries, Duration::from_secs(cli.retry_delay_secs)),
        cache,
    );

    Ok(AppContext {
        adapter,
        pipeline,
        secrets,
        http_client,
    })
}

/// Cache key for the daily series, alongside [`Symbol::cache_key`] for the
/// snapshot.
pub(crate) fn series_cache_key(symbol: &Symbol) -> String {
    format!("{}_series", symbol.as_str().to_lowercase())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use quotedeck_core::config::POLYGON_API_KEY_VAR;
    use quotedeck_core::FetchError;

    use super::*;

    #[tokio::test]
    async fn cache_dir_flag_wires_a_durable_store() {
        std::env::set_var(POLYGON_API_KEY_VAR, "test-key");
        let dir = tempfile::tempdir().expect("tempdir must create");
        let args = [
            "quotedeck",
            "--cache-dir",
            dir.path().to_str().expect("utf-8 temp path"),
            "quote",
            "AMZN",
        ];

        let first = build_context(&Cli::parse_from(args)).expect("context must build");
        let value = first
            .pipeline
            .fetch("amzn_data", || async { Ok::<f64, FetchError>(185.5) })
            .await
            .expect("must fetch");
        assert_eq!(value, 185.5);

        // A second context over the same directory serves the entry from
        // disk; the operation is never invoked.
        let second = build_context(&Cli::parse_from(args)).expect("context must build");
        let cached = second
            .pipeline
            .fetch("amzn_data", || async {
                Err::<f64, _>(FetchError::transport("offline"))
            })
            .await
            .expect("cache hit");
        assert_eq!(cached, 185.5);
    }
}
