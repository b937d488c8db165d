use axum::{
    extract::Request,
    http::{StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use sentinel_core::InputError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Upload rejected: {0}")]
    Upload(#[from] ValidationError),

    #[error("File processing error: {message}")]
    FileProcessing { message: String },

    #[error("AI provider error: {provider} - {message}")]
    AIProvider { provider: String, message: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("No route found for {path}")]
    RouteNotFound { path: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

/// JSON body returned for every failed API request.
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: String,
    pub timestamp: String,
    pub details: Option<serde_json::Value>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Upload(rejection) => rejection.to_status_code(),
            AppError::FileProcessing { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::AIProvider { .. } => StatusCode::BAD_GATEWAY,
            AppError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable (`error`, `code`) pair.
    fn labels(&self) -> (&'static str, &'static str) {
        match self {
            AppError::Validation { .. } => ("validation_error", "VALIDATION_FAILED"),
            AppError::Upload(_) => ("upload_rejected", "UPLOAD_REJECTED"),
            AppError::FileProcessing { .. } => ("file_processing_error", "FILE_PROCESSING"),
            AppError::AIProvider { .. } => ("ai_provider_error", "AI_SERVICE_ERROR"),
            AppError::BadRequest { .. } => ("bad_request", "BAD_REQUEST"),
            AppError::RouteNotFound { .. } => ("not_found", "ROUTE_NOT_FOUND"),
            AppError::Internal { .. } => ("internal_error", "INTERNAL_ERROR"),
        }
    }

    /// Text shown to the client. Internal details stay in the log.
    fn public_message(&self) -> String {
        match self {
            AppError::Validation { message }
            | AppError::FileProcessing { message }
            | AppError::BadRequest { message } => message.clone(),
            AppError::Upload(rejection) => rejection.to_message(),
            AppError::AIProvider { message, .. } => format!("An error occurred: {}", message),
            AppError::RouteNotFound { .. } => self.to_string(),
            AppError::Internal { .. } => "An internal error occurred".to_string(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            AppError::AIProvider { provider, .. } => {
                Some(serde_json::json!({ "provider": provider }))
            }
            _ => None,
        }
    }

    pub fn to_response_body(&self) -> ErrorResponse {
        let (error, code) = self.labels();
        ErrorResponse {
            error: error.to_string(),
            message: self.public_message(),
            code: code.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            details: self.details(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), "{}", self);
        } else {
            warn!(status = status.as_u16(), "{}", self);
        }

        (status, Json(self.to_response_body())).into_response()
    }
}

impl From<InputError> for AppError {
    fn from(err: InputError) -> Self {
        match err {
            InputError::Missing | InputError::EmptyUpload { .. } => {
                AppError::validation(err.to_string())
            }
            other => AppError::file_processing(other.to_string()),
        }
    }
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn file_processing(message: impl Into<String>) -> Self {
        Self::FileProcessing {
            message: message.into(),
        }
    }

    pub fn ai_provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AIProvider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

pub async fn handle_404(uri: Uri) -> AppError {
    AppError::RouteNotFound {
        path: uri.path().to_string(),
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Wraps each request in a span carrying a fresh trace id.
pub async fn trace_request(request: Request, next: Next) -> Response {
    let span = tracing::info_span!(
        "request",
        trace_id = %Uuid::new_v4(),
        method = %request.method(),
        path = %request.uri().path(),
    );

    async move {
        let started = std::time::Instant::now();
        let response = next.run(request).await;
        info!(
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Request finished"
        );
        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_maps_to_validation() {
        let error: AppError = InputError::Missing.into();
        assert!(matches!(error, AppError::Validation { .. }));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_empty_upload_maps_to_validation() {
        let error: AppError = InputError::EmptyUpload {
            filename: "empty.log".to_string(),
        }
        .into();
        assert!(matches!(error, AppError::Validation { .. }));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_bad_encoding_maps_to_unprocessable() {
        let error: AppError = InputError::InvalidEncoding {
            filename: "x.log".to_string(),
            detected: None,
        }
        .into();
        assert_eq!(error.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_upload_rejection_keeps_status() {
        let error: AppError = ValidationError::FileExtensionNotAllowed("exe".to_string()).into();
        assert_eq!(error.into_response().status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_provider_error_body() {
        let body = AppError::ai_provider("gemini", "Rate limited: quota exceeded").to_response_body();
        assert_eq!(body.code, "AI_SERVICE_ERROR");
        assert_eq!(body.message, "An error occurred: Rate limited: quota exceeded");
        assert_eq!(body.details.unwrap()["provider"], "gemini");
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let body = AppError::internal("template missing").to_response_body();
        assert_eq!(body.message, "An internal error occurred");
        assert!(body.details.is_none());
    }
}
