//! Zinad Status: the status frontend binary.
//!
//! This is the application entry point. It initializes tracing, loads configuration
//! from a TOML file, builds the backend client and page registry, sets up the Axum
//! router and starts the HTTP server.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use zinad_status::backend::HttpBackendClient;
use zinad_status::config::{AppConfig, LoggingConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use zinad_status::http::start_server;
use zinad_status::page::MountedPages;
use zinad_status::routes::create_router;
use zinad_status::state::AppState;
use zinad_status::templates::init_templates;

/// Zinad Status: a status page for the Zinad backend
#[derive(Parser, Debug)]
#[command(name = "zinad-status", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "CONFIG_PATH", default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level filter (e.g., "zinad_status=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

/// Install the global subscriber. Filter priority: CLI > RUST_LOG > default.
fn init_tracing(log_level: Option<String>, logging: &LoggingConfig) {
    let log_filter = log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry = tracing_subscriber::registry().with(EnvFilter::new(&log_filter));
    if logging.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args = Args::parse();

    // Configuration comes first so the log format can be honoured
    let config = AppConfig::load(&args.config)?;
    init_tracing(args.log_level, &config.logging);

    tracing::info!(path = %args.config, "Loaded configuration");

    let client = HttpBackendClient::from_config(&config.backend)?;
    tracing::info!(
        url = %client.hello_url(),
        timeout_secs = config.backend.request_timeout_seconds,
        "Backend client configured"
    );

    let tera = init_templates(&config.ui.templates_dir)?;
    tracing::info!(dir = %config.ui.templates_dir, "Initialized templates");

    let pages = MountedPages::new(Arc::new(client), &config.pages);

    let http_config = config.http.clone();
    let state = AppState::new(config, tera, pages);
    let app = create_router(state);

    start_server(app, &http_config).await?;

    Ok(())
}
