// Log Sentinel web front end
// Single-page form that sends security logs to the configured model for triage

pub mod config;
pub mod error_handling;
pub mod handlers;
pub mod render;
pub mod validation;

pub use config::WebConfig;
pub use error_handling::{AppError, AppResult};

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use sentinel_core::{create_provider, AIError, Analyzer, ModelConfig};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

// Main application state
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Analyzer,
    pub config: WebConfig,
}

impl AppState {
    pub fn new(analyzer: Analyzer, config: WebConfig) -> Self {
        Self { analyzer, config }
    }

    /// Builds the one model client for the process lifetime.
    pub fn from_config(model_config: &ModelConfig, config: WebConfig) -> Result<Self, AIError> {
        let client = create_provider(model_config)?;
        Ok(Self::new(Analyzer::new(client), config))
    }
}

pub fn create_app(state: AppState) -> Router {
    let body_limit = state.config.body_limit();

    Router::new()
        .route("/", get(handlers::page::index))
        .route("/analyze", post(handlers::page::analyze))
        .route("/api/analyze", post(handlers::analysis::analyze_logs))
        .route("/health", get(handlers::health::health_check))
        .fallback(error_handling::handle_404)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(error_handling::trace_request))
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
