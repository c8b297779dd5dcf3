//! hookfeed server
//!
//! Receives repository webhooks, stores a normalized record of each push,
//! opened pull request and merge, and serves the most recent ones.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::{ConfigLoader, ConfigOverrides, ConfigSource};
use hookfeed_core::framework::DatabaseProcessor;
use server::{build_router, run_server};
use sqlx::postgres::PgPoolOptions;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// hookfeed - repository webhook event feed
#[derive(Parser, Debug)]
#[command(name = "hookfeed-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file [default: ./hookfeed.toml if present]
    #[arg(short, long, env = "HOOKFEED_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen address (e.g., 0.0.0.0:5000)
    #[arg(short, long, env = "HOOKFEED_LISTEN")]
    listen: Option<SocketAddr>,

    /// Override the listen port
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Enable debug logging
    #[arg(long, env = "HOOKFEED_DEBUG")]
    debug: bool,

    /// Comma-separated list of allowed CORS origins (`*` for any)
    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',')]
    allowed_origins: Option<Vec<String>>,

    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,

    /// Run database migrations on startup
    #[arg(long, default_value = "false")]
    migrate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let config_loader = ConfigLoader::new(
        args.config.as_ref(),
        ConfigOverrides {
            listen: args.listen,
            port: args.port,
            debug: args.debug,
            allowed_origins: args.allowed_origins,
            database_url: args.database_url,
        },
    );
    let (config, source) = config_loader.load()?;

    // Initialize tracing
    init_tracing(config.debug);

    tracing::info!("Starting hookfeed-server v{}", env!("CARGO_PKG_VERSION"));
    match &source {
        ConfigSource::File(path) => tracing::info!("Configuration loaded from {:?}", path),
        ConfigSource::Defaults => tracing::info!("No configuration file found, using defaults"),
    }

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to database: {}", e);
            e
        })?;
    tracing::info!("Database connection established");

    // Run migrations if requested
    if args.migrate {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("../migrations")
            .run(&db_pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to run migrations: {}", e);
                e
            })?;
        tracing::info!("Migrations completed successfully");
    }

    // Create application state
    let state = AppState::new(DatabaseProcessor::new(db_pool.clone()));

    // Build the router
    let router = build_router(state, &config.allowed_origins);

    // Run the server
    tracing::info!("Starting HTTP server on {}", config.listen);
    let result = run_server(router, config.listen).await;

    // Close database connections gracefully
    tracing::info!("Closing database connections...");
    db_pool.close().await;
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing(debug: bool) {
    let default_filter = if debug {
        "debug,sqlx=info,tower_http=debug"
    } else {
        "info,sqlx=warn,tower_http=debug"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
