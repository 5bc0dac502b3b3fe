//! Main entry point for the Image Generation Gateway

use image_gen_gateway::{api, backend::OpenAiBackend, config::Settings, AppState};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::load()?;
    settings.validate()?;

    // Initialize logging; RUST_LOG overrides the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if settings.logging.format == "pretty" {
        registry.with(fmt::layer().pretty()).init();
    } else {
        registry.with(fmt::layer().json()).init();
    }

    info!("Starting Image Generation Gateway");
    info!(
        host = %settings.server.host,
        port = settings.server.port,
        upstream = %settings.upstream.base_url,
        model = %settings.upstream.model,
        "Loaded configuration"
    );

    let backend = Arc::new(OpenAiBackend::new(&settings.upstream)?);
    let addr = format!("{}:{}", settings.server.host, settings.server.port);

    let app_state = Arc::new(AppState::new(settings, backend));
    let app = api::routes::create_router(app_state);

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
