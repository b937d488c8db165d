use anyhow::Context;
use sentinel_core::ModelConfig;
use sentinel_web::{create_app, AppState, WebConfig};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A local .env is optional
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    // Without the API key the form is never served
    let model_config = ModelConfig::load()
        .map_err(|e| {
            tracing::error!("Configuration error: {}", e);
            e
        })
        .context("Configuration error")?;

    let config = WebConfig::load().context("Invalid web configuration")?;
    let addr = config.socket_addr().context("Invalid listen address")?;

    let state = AppState::from_config(&model_config, config.clone())
        .context("Failed to initialize model client")?;
    let app = create_app(state);

    tracing::info!(
        provider = model_config.provider.name(),
        model = %model_config.model,
        max_upload = config.max_upload_size,
        "Log Sentinel starting on http://{}",
        addr
    );

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
