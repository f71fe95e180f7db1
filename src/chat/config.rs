//! Configuration for the chat service and its HTTP server.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::chat::errors::{ChatError, ChatResult};

/// Model used when `PARLANCE_MODEL` is not set.
const DEFAULT_MODEL: &str = "llama3.2";

/// Port used when `PARLANCE_PORT` is not set.
const DEFAULT_PORT: u16 = 3000;

/// Top-level configuration for the chat service.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Completion backend settings.
    pub llm: LlmConfig,
    /// HTTP server settings.
    pub server: ServerConfig,
}

impl ChatConfig {
    /// Build a configuration from the process environment.
    ///
    /// Reads `PARLANCE_MODEL`, `PARLANCE_OLLAMA_URL` and `PARLANCE_PORT`,
    /// falling back to defaults for anything unset. An unparseable port
    /// falls back to the default rather than aborting startup.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::InvalidConfig`] if the resulting configuration
    /// fails validation.
    pub fn from_env() -> ChatResult<Self> {
        let mut config = Self::default();
        if let Ok(model) = std::env::var("PARLANCE_MODEL") {
            config.llm.model = model;
        }
        if let Ok(base_url) = std::env::var("PARLANCE_OLLAMA_URL") {
            config.llm.base_url = Some(base_url);
        }
        config.server.port = std::env::var("PARLANCE_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::InvalidConfig`] describing the first invalid
    /// field found.
    pub fn validate(&self) -> ChatResult<()> {
        self.llm.validate()
    }
}

/// Settings for the completion backend.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model name, e.g. "llama3.2".
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum tokens to generate, if capped.
    pub max_tokens: Option<u64>,
    /// Base URL of the Ollama server. `None` uses the provider default.
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: None,
            base_url: None,
        }
    }
}

impl LlmConfig {
    /// Validate backend settings.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::InvalidConfig`] if the model name is empty, the
    /// temperature is out of range or the base URL does not parse.
    pub fn validate(&self) -> ChatResult<()> {
        if self.model.trim().is_empty() {
            return Err(ChatError::InvalidConfig(
                "llm.model must not be empty".to_string(),
            ));
        }
        if !self.temperature.is_finite() || !(0.0..=2.0).contains(&self.temperature) {
            return Err(ChatError::InvalidConfig(format!(
                "llm.temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }
        if let Some(base_url) = &self.base_url {
            Url::parse(base_url).map_err(|e| {
                ChatError::InvalidConfig(format!("llm.base_url is not a valid URL: {e}"))
            })?;
        }
        Ok(())
    }
}

/// Settings for the HTTP server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port the server listens on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ChatConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.llm.model, "llama3.2");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn empty_model_is_rejected() {
        let mut config = ChatConfig::default();
        config.llm.model = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ChatError::InvalidConfig(_)));
    }

    #[test]
    fn out_of_range_temperature_is_rejected() {
        let mut config = ChatConfig::default();
        config.llm.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_base_url_is_rejected() {
        let mut config = ChatConfig::default();
        config.llm.base_url = Some("not a url".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn valid_base_url_is_accepted() {
        let mut config = ChatConfig::default();
        config.llm.base_url = Some("http://localhost:11434".to_string());
        assert!(config.validate().is_ok());
    }
}
