use axum::{extract::State, response::Json};

use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": crate::NAME,
        "version": crate::VERSION,
        "provider": state.analyzer.provider_name(),
        "model": state.analyzer.model(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
