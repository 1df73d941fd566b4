//! Migrator entry point: applies every migration file once, in order.

use clap::Parser;
use common::Config;
use common::config::DEFAULT_CONFIG_PATH;
use migrator::{DEFAULT_MIGRATION_DIR, Migrator};

/// Applies SQL migration files to the manager database
#[derive(Parser, Debug)]
#[command(name = "migrator", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Directory containing the .sql migration files
    #[arg(short, long, default_value = DEFAULT_MIGRATION_DIR)]
    dir: String,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    common::telemetry::init_tracing();

    let args = Args::parse();
    if let Err(err) = run(&args).await {
        tracing::error!(error = %err, "migrator error");
        std::process::exit(1);
    }
}

async fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config =
        Config::load(&args.config).map_err(|e| format!("failed to load config: {e}"))?;

    let pool = storage::connect(&config).await?;

    let migrator = Migrator::new(pool, &args.dir);
    let result = migrator.run().await;
    migrator.executor().close().await;

    let applied = result?;
    tracing::info!(applied = applied.len(), "migrator finished");
    Ok(())
}
