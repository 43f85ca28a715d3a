//! Application configuration module
//!
//! Client-side connection settings: where the API lives and which bearer
//! token to present.

use thiserror::Error;

/// Default API server used when nothing else is configured
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the API server, without a trailing slash
    pub server_url: String,
    /// Bearer token from register/login
    pub token: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            token: None,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Read `CLIENT_API_URL` from the environment, falling back to the default server
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = Self::builder();
        if let Ok(url) = std::env::var("CLIENT_API_URL") {
            builder = builder.server_url(url);
        }
        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.server_url.clone()));
        }
        Ok(())
    }

    /// Full URL for a REST endpoint, e.g. `api_url("/api/projects")`
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url, path)
    }

    /// WebSocket URL of the real-time channel
    pub fn socket_url(&self) -> String {
        let base = if let Some(rest) = self.server_url.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = self.server_url.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            self.server_url.clone()
        };
        match &self.token {
            Some(token) => format!("{}/socket?token={}", base, token),
            None => format!("{}/socket", base),
        }
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    token: Option<String>,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Set the bearer token
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let server_url = self
            .server_url
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let config = AppConfig {
            server_url,
            token: self.token,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}
