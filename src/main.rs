use clap::Parser;
use std::sync::Arc;

use npro_metrics::{ config::Config, logger, webserver };

/// Read-only token economics API for the NPRO token
#[derive(Parser, Debug)]
#[command(name = "npro-metrics", version, about)]
struct Args {
    /// Path to the JSON configuration file
    #[arg(long, default_value = "config.json")]
    config: String,

    /// Override the configured bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the configured bind port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    if let Err(e) = logger::init(&config.general.log_level) {
        eprintln!("Failed to initialize logger: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting NPRO token metrics API...");
    log::info!(
        "Token contract: {} ({} excluded accounts)",
        config.token.contract,
        config.token.excluded_accounts.len()
    );
    log::info!("DEX price source: {}", config.pricing.dex_source);

    let state = match webserver::AppState::new(config) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            log::error!("Failed to initialize application state: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = webserver::start_server(state).await {
        log::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
