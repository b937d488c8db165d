use crate::ai_provider::{build_http_client, check_status, AIError, ModelClient};
use crate::config::ModelConfig;
use crate::prompt::AnalysisPrompt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl OpenAIProvider {
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
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn build_request(&self, prompt: &AnalysisPrompt) -> OpenAIRequest {
        OpenAIRequest {
            model: self.model.clone(),
            messages: vec![OpenAIMessage {
                role: "user".to_string(),
                content: prompt.as_str().to_string(),
            }],
            temperature: self.temperature,
            max_tokens: self.max_output_tokens,
        }
    }
}

fn extract_text(response: OpenAIResponse) -> Result<String, AIError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.is_empty())
        .ok_or_else(|| AIError::InvalidResponse("No choices in response".to_string()))
}

#[async_trait::async_trait]
impl ModelClient for OpenAIProvider {
    async fn generate(&self, prompt: &AnalysisPrompt) -> Result<String, AIError> {
        let request = self.build_request(prompt);
        debug!(model = %self.model, prompt_bytes = prompt.len(), "Sending OpenAI request");

        let response = self
            .client
            .post(self.get_endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let response = check_status(response).await?;

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| AIError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        extract_text(openai_response)
    }

    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
