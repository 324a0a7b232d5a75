use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use taproom_core::telemetry::{InstrumentationConfig, init_tracing};
use taproom_server::{Settings, server};
use tracing::info;

/// Taproom API - serves the good beers to signed-in users
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let instrumentation_config = InstrumentationConfig {
        service_name: "taproom-server".to_string(),
        ..InstrumentationConfig::from_env()
    };
    init_tracing(&instrumentation_config)?;

    if let Some(path) = &cli.config {
        info!("Loading configuration from: {}", path.display());
    }
    let settings = Settings::load(cli.config.as_deref())?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
        }
        info!("Received shutdown signal");
    };

    server::serve(settings, shutdown).await?;
    Ok(())
}
