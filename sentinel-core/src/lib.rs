//! Core of Log Sentinel: turns pasted or uploaded security logs into a triage
//! prompt and hands it to a hosted text-generation model.

pub mod ai_provider;
pub mod analyzer;
pub mod config;
pub mod input;
pub mod prompt;
pub mod severity;

pub use ai_provider::{create_provider, AIError, ModelClient};
pub use analyzer::{Analyzer, TriageOutcome, TriageReport};
pub use config::{ConfigError, ModelConfig, Provider};
pub use input::{resolve_input, InputError, InputSource, LogInput, UploadedFile};
pub use prompt::{AnalysisPrompt, PromptBuilder};
pub use severity::Severity;
