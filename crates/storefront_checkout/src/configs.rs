//! Layered settings: a TOML file overridden by `STOREFRONT__`-prefixed
//! environment variables. The debug flag lives here and nowhere else;
//! call sites receive it instead of re-deriving it.

use error_stack::ResultExt;
use masking::Secret;
use serde::Deserialize;

use crate::errors::{CheckoutError, CustomResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub backend: BackendSettings,
    #[serde(default)]
    pub sdk: SdkSettings,
    /// Verbose request/response logging
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendSettings {
    /// Origin of the marketplace REST backend, e.g. `https://api.example.com`
    pub base_url: String,
    /// Bearer token attached to every request when present
    pub api_token: Option<Secret<String>>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SdkSettings {
    /// Bounded wait for the provider SDK ready signal. Non-availability
    /// after this window is a hard failure, not an infinite spin.
    #[serde(default = "default_sdk_ready_timeout_ms")]
    pub ready_timeout_ms: u64,
}

impl Default for SdkSettings {
    fn default() -> Self {
        Self {
            ready_timeout_ms: default_sdk_ready_timeout_ms(),
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_sdk_ready_timeout_ms() -> u64 {
    10_000
}

impl Settings {
    /// Load from `config/checkout.toml` (optional) and the environment.
    pub fn new() -> CustomResult<Self, CheckoutError> {
        Self::with_config_path("config/checkout")
    }

    pub fn with_config_path(path: &str) -> CustomResult<Self, CheckoutError> {
        config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("STOREFRONT").separator("__"))
            .build()
            .change_context(CheckoutError::ConfigurationError)?
            .try_deserialize()
            .change_context(CheckoutError::ConfigurationError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_sections_are_omitted() {
        let settings: Settings = serde_json::from_value(serde_json::json!({
            "backend": { "base_url": "https://api.example.com" }
        }))
        .expect("minimal settings");
        assert_eq!(settings.backend.request_timeout_secs, 30);
        assert_eq!(settings.sdk.ready_timeout_ms, 10_000);
        assert!(!settings.debug);
        assert!(settings.backend.api_token.is_none());
    }
}
