use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use detection_meter::config::{Config, LogFormat};
use detection_meter::{create_router, AppState};

const DEFAULT_LOG_FILTER: &str = "detection_meter=debug,tower_http=debug,axum::rejection=trace";

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    // LOG_FORMAT is read before Config so that config loading itself is logged
    let format = LogFormat::parse(std::env::var("LOG_FORMAT").ok().as_deref());

    if format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    init_tracing();

    // Load configuration; a missing API key stops startup here
    let config = Config::from_env().context("Invalid configuration")?;

    tracing::info!("Starting Detection Meter");
    tracing::info!("Model: {} ({})", config.model, config.api_base);
    tracing::info!("Max file size: {}MB", config.max_file_size_mb);
    tracing::info!("Max concurrent requests: {}", config.max_concurrent_requests);

    let state = AppState::from_config(&config).context("Failed to initialise services")?;
    let app = create_router(state);

    let addr = format!("{}:{}", config.server_host, config.server_port);

    tracing::info!("Server listening on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
