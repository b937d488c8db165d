use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use sentinel_core::{InputSource, LogInput};
use serde::{Deserialize, Serialize};

use crate::{
    error_handling::{AppError, AppResult},
    render::markdown_to_html,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub logs: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub provider: String,
    pub model: String,
    pub source: InputSource,
    pub input_bytes: usize,
    pub elapsed_ms: u64,
    pub generated_at: DateTime<Utc>,
    pub report_markdown: String,
    pub report_html: String,
}

/// JSON counterpart of the page form for pasted text.
pub async fn analyze_logs(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> AppResult<Json<AnalyzeResponse>> {
    let input = LogInput::from_pasted(request.logs)?;

    let report = state.analyzer.analyze(input).await.map_err(|e| {
        AppError::ai_provider(state.analyzer.provider_name(), e.to_string())
    })?;

    Ok(Json(AnalyzeResponse {
        report_html: markdown_to_html(&report.markdown),
        provider: report.provider,
        model: report.model,
        source: report.source,
        input_bytes: report.input_bytes,
        elapsed_ms: report.elapsed_ms,
        generated_at: report.generated_at,
        report_markdown: report.markdown,
    }))
}
