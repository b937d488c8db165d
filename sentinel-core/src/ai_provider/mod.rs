use crate::config::{ModelConfig, Provider};
use crate::prompt::AnalysisPrompt;
use reqwest::{Client, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod claude;
pub mod gemini;
pub mod openai;

pub use claude::ClaudeProvider;
pub use gemini::GeminiProvider;
pub use openai::OpenAIProvider;

#[derive(Error, Debug)]
pub enum AIError {
    #[error("API request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),
    #[error("Rate limited: {0}")]
    RateLimited(String),
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),
}

/// Adapter for one hosted text-generation service. One call per analysis,
/// no retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, prompt: &AnalysisPrompt) -> Result<String, AIError>;
    fn provider_name(&self) -> &str;
    fn model(&self) -> &str;
}

pub fn create_provider(config: &ModelConfig) -> Result<Arc<dyn ModelClient>, AIError> {
    info!(
        "Creating AI provider: {} with model: {}",
        config.provider.name(),
        config.model
    );
    match config.provider {
        Provider::Gemini => {
            debug!("Initializing Gemini provider");
            Ok(Arc::new(GeminiProvider::new(config)?))
        }
        Provider::OpenAI => {
            debug!("Initializing OpenAI provider");
            Ok(Arc::new(OpenAIProvider::new(config)?))
        }
        Provider::Claude => {
            debug!("Initializing Claude/Anthropic provider");
            Ok(Arc::new(ClaudeProvider::new(config)?))
        }
    }
}

/// HTTP client shared by the adapters. Without a configured timeout the call
/// waits for the service.
pub(crate) fn build_http_client(timeout_secs: Option<u64>) -> Result<Client, AIError> {
    let mut builder = Client::builder().user_agent(concat!(
        "log-sentinel/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| AIError::ClientBuild(e.to_string()))
}

/// Turns a non-success response into an `AIError` carrying the service's own
/// message.
pub(crate) async fn check_status(response: Response) -> Result<Response, AIError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    let message = extract_error_message(&body);
    warn!(status = status.as_u16(), "Model service returned an error");

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AIError::AuthenticationError(message),
        StatusCode::TOO_MANY_REQUESTS => AIError::RateLimited(message),
        _ => AIError::Http {
            status: status.as_u16(),
            message,
        },
    })
}

/// All three services wrap errors as `{"error": {"message": ...}}`.
pub(crate) fn extract_error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| v.pointer("/error/message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "empty response body".to_string()
            } else {
                trimmed.to_string()
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_message_from_json() {
        let body = r#"{"error": {"code": 429, "message": "quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(extract_error_message(body), "quota exceeded");
    }

    #[test]
    fn test_extract_error_message_plain_text() {
        assert_eq!(extract_error_message("  upstream down \n"), "upstream down");
        assert_eq!(extract_error_message(""), "empty response body");
    }

    #[test]
    fn test_error_display_keeps_service_text() {
        let err = AIError::RateLimited("quota exceeded".to_string());
        assert_eq!(err.to_string(), "Rate limited: quota exceeded");

        let err = AIError::Http {
            status: 503,
            message: "overloaded".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: overloaded");
    }

    #[test]
    fn test_create_provider_per_config() {
        for provider in [Provider::Gemini, Provider::OpenAI, Provider::Claude] {
            let config = ModelConfig::new(provider, "test_key");
            let client = create_provider(&config).unwrap();
            assert_eq!(client.provider_name(), provider.name());
            assert_eq!(client.model(), provider.default_model());
        }
    }

    #[test]
    fn test_build_http_client_with_timeout() {
        assert!(build_http_client(None).is_ok());
        assert!(build_http_client(Some(5)).is_ok());
    }
}
