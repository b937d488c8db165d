use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

pub const SECRETS_FILE_VAR: &str = "SENTINEL_SECRETS_FILE";
pub const DEFAULT_SECRETS_FILE: &str = "secrets.toml";
pub const GENERIC_API_KEY_VAR: &str = "SENTINEL_API_KEY";

const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 8192;
const DEFAULT_TEMPERATURE: f32 = 0.2;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "{provider} API key not found. Set {env_var} (or SENTINEL_API_KEY) in the environment, \
         or add {env_var} to {}",
        .secrets_path.display()
    )]
    MissingApiKey {
        provider: Provider,
        env_var: &'static str,
        secrets_path: PathBuf,
    },
    #[error("Unsupported model provider: {0} (expected gemini, openai or claude)")]
    UnsupportedProvider(String),
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
    #[error("Failed to read secrets file {path}: {source}")]
    SecretsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse secrets file {path}: {source}")]
    SecretsParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Hosted text-generation services the model client can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gemini,
    OpenAI,
    Claude,
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::OpenAI => "openai",
            Provider::Claude => "claude",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini-2.5-flash",
            Provider::OpenAI => "gpt-4o-mini",
            Provider::Claude => "claude-3-5-haiku-latest",
        }
    }

    pub fn api_key_var(&self) -> &'static str {
        match self {
            Provider::Gemini => "GEMINI_API_KEY",
            Provider::OpenAI => "OPENAI_API_KEY",
            Provider::Claude => "ANTHROPIC_API_KEY",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Provider::Gemini => "Gemini",
            Provider::OpenAI => "OpenAI",
            Provider::Claude => "Anthropic",
        };
        f.write_str(label)
    }
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(Provider::Gemini),
            "openai" => Ok(Provider::OpenAI),
            "claude" | "anthropic" => Ok(Provider::Claude),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Settings for the model client. Built once at startup.
#[derive(Clone, Serialize)]
pub struct ModelConfig {
    pub provider: Provider,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: String,
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl ModelConfig {
    pub fn new(provider: Provider, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            model: provider.default_model().to_string(),
            api_key: api_key.into(),
            base_url: None,
            request_timeout_secs: None,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Loads settings from the process environment, falling back to the
    /// secrets file named by `SENTINEL_SECRETS_FILE`.
    pub fn load() -> Result<Self, ConfigError> {
        let secrets_path = env::var(SECRETS_FILE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SECRETS_FILE));
        Self::from_sources(|key| env::var(key).ok(), &secrets_path)
    }

    /// Resolves every setting through `lookup` first and the secrets file
    /// second. A missing secrets file is not an error.
    pub fn from_sources<F>(lookup: F, secrets_path: &Path) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secrets = read_secrets(secrets_path)?;
        let get = |key: &str| -> Option<String> {
            lookup(key)
                .or_else(|| secrets.get(key).and_then(toml_scalar))
                .filter(|v| !v.trim().is_empty())
        };

        let provider = match get("SENTINEL_PROVIDER") {
            Some(name) => name.parse()?,
            None => Provider::Gemini,
        };

        let api_key = get(GENERIC_API_KEY_VAR)
            .or_else(|| get(provider.api_key_var()))
            .ok_or_else(|| ConfigError::MissingApiKey {
                provider,
                env_var: provider.api_key_var(),
                secrets_path: secrets_path.to_path_buf(),
            })?;

        let mut config = Self::new(provider, api_key.trim());

        if let Some(model) = get("SENTINEL_MODEL") {
            config.model = model.trim().to_string();
        }
        if let Some(base_url) = get("SENTINEL_API_BASE_URL") {
            config.base_url = Some(base_url.trim().trim_end_matches('/').to_string());
        }
        if let Some(timeout) = get("SENTINEL_REQUEST_TIMEOUT") {
            let secs: u64 = parse_value("SENTINEL_REQUEST_TIMEOUT", &timeout)?;
            config.request_timeout_secs = (secs > 0).then_some(secs);
        }
        if let Some(tokens) = get("SENTINEL_MAX_OUTPUT_TOKENS") {
            config.max_output_tokens = parse_value("SENTINEL_MAX_OUTPUT_TOKENS", &tokens)?;
        }
        if let Some(temperature) = get("SENTINEL_TEMPERATURE") {
            let value: f32 = parse_value("SENTINEL_TEMPERATURE", &temperature)?;
            if !(0.0..=2.0).contains(&value) {
                return Err(ConfigError::InvalidValue {
                    key: "SENTINEL_TEMPERATURE".to_string(),
                    value: temperature,
                    reason: "must be between 0.0 and 2.0".to_string(),
                });
            }
            config.temperature = value;
        }

        info!(
            provider = config.provider.name(),
            model = %config.model,
            "Model configuration loaded"
        );
        Ok(config)
    }
}

fn read_secrets(path: &Path) -> Result<toml::Table, ConfigError> {
    if !path.exists() {
        debug!("No secrets file at {}", path.display());
        return Ok(toml::Table::new());
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::SecretsRead {
        path: path.to_path_buf(),
        source,
    })?;

    content
        .parse::<toml::Table>()
        .map_err(|source| ConfigError::SecretsParse {
            path: path.to_path_buf(),
            source,
        })
}

fn toml_scalar(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
