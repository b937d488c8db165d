#![allow(dead_code)]

use axum::{body::Body, http::Request, Router};
use sentinel_core::{AIError, AnalysisPrompt, Analyzer, ModelClient};
use sentinel_web::{create_app, AppState, WebConfig};
use std::sync::{Arc, Mutex};

pub const BOUNDARY: &str = "----sentinel-test-boundary";

/// Model client that records prompts and answers with a fixed reply.
pub struct StubClient {
    reply: Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl StubClient {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait::async_trait]
impl ModelClient for StubClient {
    async fn generate(&self, prompt: &AnalysisPrompt) -> Result<String, AIError> {
        self.prompts.lock().unwrap().push(prompt.as_str().to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(AIError::RateLimited(message.clone())),
        }
    }

    fn provider_name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}

pub fn app_with(client: Arc<StubClient>) -> Router {
    app_with_config(client, WebConfig::default())
}

pub fn app_with_config(client: Arc<StubClient>, config: WebConfig) -> Router {
    let analyzer = Analyzer::new(client);
    create_app(AppState::new(analyzer, config))
}

/// Builds a multipart body the way a browser submits the page form.
pub fn form_body(file: Option<(&str, &[u8])>, logs: &str) -> Vec<u8> {
    let mut body = Vec::new();

    let (filename, bytes): (&str, &[u8]) = file.unwrap_or(("", b""));
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n");

    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"logs\"\r\n\r\n");
    body.extend_from_slice(logs.as_bytes());
    body.extend_from_slice(b"\r\n");

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn form_request(file: Option<(&str, &[u8])>, logs: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(form_body(file, logs)))
        .unwrap()
}

pub async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
