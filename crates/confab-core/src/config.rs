//! Application configuration domain models.

use serde::{Deserialize, Serialize};

/// Default relay endpoint the client talks to.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Default model identifier sent with each chat request.
pub const DEFAULT_MODEL: &str = "deepseek-r1-distill-llama-70b";

/// Root configuration for the application.
///
/// Loaded from `config.toml` by the infrastructure layer; every field has a
/// default so a missing or partial file still yields a usable configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RootConfig {
    /// Chat relay endpoint settings.
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Settings for the chat relay endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Base URL of the relay server (the `/api/chat` endpoint lives under it).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model identifier forwarded with every request.
    #[serde(default = "default_model")]
    pub model: String,
    /// Optional request timeout in seconds. `None` leaves timing out entirely
    /// to the transport.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            request_timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RootConfig::default();
        assert_eq!(config.chat.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.chat.model, DEFAULT_MODEL);
        assert!(config.chat.request_timeout_secs.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: RootConfig = toml::from_str("[chat]\nmodel = \"llama-3.1-8b-instant\"\n").unwrap();
        assert_eq!(config.chat.model, "llama-3.1-8b-instant");
        assert_eq!(config.chat.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: RootConfig = toml::from_str("").unwrap();
        assert_eq!(config, RootConfig::default());
    }
}
