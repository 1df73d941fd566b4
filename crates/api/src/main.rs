//! Manager entry point: serves the health endpoint.

use std::sync::Arc;

use clap::Parser;
use common::Config;
use common::config::DEFAULT_CONFIG_PATH;
use storage::PostgresHealthStorage;

/// Manager service exposing the health endpoint
#[derive(Parser, Debug)]
#[command(name = "manager", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,
}

#[tokio::main]
async fn main() {
    // Local development convenience; a missing .env is fine.
    let _ = dotenvy::dotenv();
    common::telemetry::init_tracing();

    let args = Args::parse();
    if let Err(err) = run(&args).await {
        tracing::error!(error = %err, "application error");
        std::process::exit(1);
    }
}

async fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    // sqlx and axum-server share rustls; pin the provider before either uses it.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let config =
        Config::load(&args.config).map_err(|e| format!("failed to load config: {e}"))?;
    tracing::info!(
        service = %config.service_name,
        env = %config.service_env,
        port = config.http_port,
        tls = config.tls.enabled,
        "loaded configuration"
    );

    let pool = storage::connect(&config).await?;

    let state = api::AppState::with_storage(PostgresHealthStorage::new(pool.clone()));
    let app = api::create_app(Arc::new(state));

    api::server::start_server(app, &config).await?;

    pool.close().await;
    tracing::info!("server shut down gracefully");
    Ok(())
}
