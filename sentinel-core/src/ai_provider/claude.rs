use crate::ai_provider::{build_http_client, check_status, AIError, ModelClient};
use crate::config::ModelConfig;
use crate::prompt::AnalysisPrompt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct ClaudeRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ClaudeMessage>,
}

#[derive(Debug, Serialize)]
struct ClaudeMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    #[serde(default)]
    content: Vec<ClaudeContent>,
}

#[derive(Debug, Deserialize)]
struct ClaudeContent {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

pub struct ClaudeProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl ClaudeProvider {
    pub fn new(config: &ModelConfig) -> Result<Self, AIError> {
        Ok(Self {
            client: build_http_client(config.request_timeout_secs)?,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        })
    }

    fn get_endpoint(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    fn build_request(&self, prompt: &AnalysisPrompt) -> ClaudeRequest {
        ClaudeRequest {
            model: self.model.clone(),
            max_tokens: self.max_output_tokens,
            temperature: self.temperature,
            messages: vec![ClaudeMessage {
                role: "user".to_string(),
                content: prompt.as_str().to_string(),
            }],
        }
    }
}

fn extract_text(response: ClaudeResponse) -> Result<String, AIError> {
    let text: String = response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect();

    if text.is_empty() {
        return Err(AIError::InvalidResponse(
            "No content in response".to_string(),
        ));
    }
    Ok(text)
}

#[async_trait::async_trait]
impl ModelClient for ClaudeProvider {
    async fn generate(&self, prompt: &AnalysisPrompt) -> Result<String, AIError> {
        let request = self.build_request(prompt);
        debug!(model = %self.model, prompt_bytes = prompt.len(), "Sending Claude request");

        let response = self
            .client
            .post(self.get_endpoint())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let response = check_status(response).await?;

        let claude_response: ClaudeResponse = response
            .json()
            .await
            .map_err(|e| AIError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        extract_text(claude_response)
    }

    fn provider_name(&self) -> &str {
        "claude"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Provider;

    #[test]
    fn test_claude_provider_creation() {
        let provider = ClaudeProvider::new(&ModelConfig::new(Provider::Claude, "test_key")).unwrap();
        assert_eq!(provider.api_key, "test_key");
        assert_eq!(provider.model, "claude-3-5-haiku-latest");
        assert_eq!(provider.get_endpoint(), "https://api.anthropic.com/v1/messages");
    }

    #[test]
    fn test_extract_text_skips_non_text_blocks() {
        let response: ClaudeResponse = serde_json::from_str(
            r#"{"content": [{"type": "thinking", "thinking": "..."}, {"type": "text", "text": "| a | b | c |"}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), "| a | b | c |");
    }

    #[test]
    fn test_extract_text_empty() {
        let response: ClaudeResponse = serde_json::from_str(r#"{"content": []}"#).unwrap();
        assert!(extract_text(response).is_err());
    }
}
