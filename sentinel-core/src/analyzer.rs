use crate::ai_provider::{AIError, ModelClient};
use crate::input::{resolve_input, InputError, InputSource, LogInput, UploadedFile};
use crate::prompt::PromptBuilder;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// The model's answer for one run, kept as opaque Markdown.
#[derive(Debug, Clone, Serialize)]
pub struct TriageReport {
    pub markdown: String,
    pub provider: String,
    pub model: String,
    pub source: InputSource,
    pub input_bytes: usize,
    pub elapsed_ms: u64,
    pub generated_at: DateTime<Utc>,
}

/// Result of one "Analyze" action.
#[derive(Debug, Clone)]
pub enum TriageOutcome {
    Report(TriageReport),
    /// Nothing to analyze (no input or an empty file); the model was not called.
    Warning(String),
    Error(String),
}

impl TriageOutcome {
    pub fn is_report(&self) -> bool {
        matches!(self, TriageOutcome::Report(_))
    }
}

impl From<InputError> for TriageOutcome {
    fn from(err: InputError) -> Self {
        match err {
            InputError::Missing | InputError::EmptyUpload { .. } => {
                TriageOutcome::Warning(err.to_string())
            }
            other => TriageOutcome::Error(other.to_string()),
        }
    }
}

/// Runs collector, prompt builder and model client in sequence. Holds the
/// one model client built at startup.
#[derive(Clone)]
pub struct Analyzer {
    client: Arc<dyn ModelClient>,
}

impl Analyzer {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self { client }
    }

    pub fn provider_name(&self) -> &str {
        self.client.provider_name()
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    pub async fn run(&self, upload: Option<UploadedFile>, pasted: Option<&str>) -> TriageOutcome {
        let input = match resolve_input(upload, pasted) {
            Ok(input) => input,
            Err(InputError::Missing) => {
                warn!("Analyze requested without any log input");
                return InputError::Missing.into();
            }
            Err(err) => {
                warn!("Rejected log input: {}", err);
                return err.into();
            }
        };

        match self.analyze(input).await {
            Ok(report) => TriageOutcome::Report(report),
            Err(err) => TriageOutcome::Error(format!("An error occurred: {}", err)),
        }
    }

    pub async fn analyze(&self, input: LogInput) -> Result<TriageReport, AIError> {
        let prompt = PromptBuilder::build(&input);
        info!(
            source = %input.source().describe(),
            input_bytes = input.len(),
            lines = input.line_count(),
            prompt_bytes = prompt.len(),
            provider = self.client.provider_name(),
            "Starting log triage"
        );

        let started = Instant::now();
        let result = self.client.generate(&prompt).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(markdown) => {
                info!(elapsed_ms, response_bytes = markdown.len(), "Log triage completed");
                Ok(TriageReport {
                    markdown,
                    provider: self.client.provider_name().to_string(),
                    model: self.client.model().to_string(),
                    source: input.source().clone(),
                    input_bytes: input.len(),
                    elapsed_ms,
                    generated_at: Utc::now(),
                })
            }
            Err(err) => {
                error!(elapsed_ms, "Log triage failed: {}", err);
                Err(err)
            }
        }
    }
}
