// src/main.rs
use std::process::ExitCode;

use sort_my_packages::api;
use sort_my_packages::config::AppConfig;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "sort_my_packages=info,tower_http=info";

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before the subscriber so RUST_LOG from the file applies.
    let dotenv_result = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(err) = dotenv_result {
        if !matches!(err, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            tracing::warn!("Could not load .env: {}", err);
        }
    }

    tracing::info!("Pack service v{} starting...", env!("CARGO_PKG_VERSION"));
    let app_config = AppConfig::from_env();

    match api::start_api_server(app_config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("❌ API server terminated with an error: {err}");
            ExitCode::FAILURE
        }
    }
}
