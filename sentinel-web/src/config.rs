use serde::{Deserialize, Serialize};
use std::env;
use std::net::{IpAddr, SocketAddr};

/// Room for the pasted-text field and multipart framing on top of the file.
const FORM_OVERHEAD: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_size: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            max_upload_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

impl WebConfig {
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::default();

        // Load from environment variables
        if let Ok(host) = env::var("SENTINEL_HOST") {
            config.host = host;
        }

        if let Ok(port) = env::var("SENTINEL_PORT").or_else(|_| env::var("PORT")) {
            config.port = port.parse()?;
        }

        if let Ok(max_size) = env::var("SENTINEL_MAX_UPLOAD_SIZE") {
            config.max_upload_size = max_size.parse()?;
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip: IpAddr = self.host.parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Request body cap for the form and JSON routes.
    pub fn body_limit(&self) -> usize {
        self.max_upload_size.saturating_add(FORM_OVERHEAD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WebConfig::default();
        assert_eq!(config.port, 8501);
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:8501");
        assert!(config.body_limit() > config.max_upload_size);
    }

    #[test]
    fn test_invalid_host() {
        let config = WebConfig {
            host: "not an ip".to_string(),
            ..WebConfig::default()
        };
        assert!(config.socket_addr().is_err());
    }
}
