//! Abacus: a calculator HTTP API.
//!
//! This is the application entry point. It parses CLI arguments, loads
//! configuration from a TOML file, initializes tracing, opens the SQLite
//! history store, assembles the Axum router, and serves HTTP until
//! SIGINT/SIGTERM.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use abacus::config::{AppConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use abacus::history::SqliteHistory;
use abacus::routes::create_router;
use abacus::shutdown;
use abacus::state::AppState;

/// Abacus: a calculator HTTP API with persistent history
#[derive(Parser, Debug)]
#[command(name = "abacus", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level filter (e.g., "abacus=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration (built-in defaults when the file is absent)
    let config = AppConfig::load_or_default(&args.config)?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    if Path::new(&args.config).exists() {
        tracing::info!(path = %args.config, "Loaded configuration");
    } else {
        tracing::info!(path = %args.config, "No config file found, using defaults");
    }

    // Open the history store (creates the database file and schema if missing)
    let history = SqliteHistory::open(&config.database.path).await?;
    tracing::info!(path = %config.database.path, "Opened history database");

    // Create application state and router
    let state = AppState::new(config.clone(), Arc::new(history));
    let app = create_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.http.host, config.http.port)
        .parse()
        .expect("Invalid http.host or http.port in config");
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::signal())
        .await?;

    Ok(())
}
