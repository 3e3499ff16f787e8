use crate::error::{GenerationError, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-3-pro-image-preview";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_MAX_RETRIES: usize = 2;
pub const DEFAULT_RETRY_INTERVAL_MS: u64 = 2000;

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub max_retries: usize,
    pub retry_interval: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_interval: Duration::from_millis(DEFAULT_RETRY_INTERVAL_MS),
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Unparseable numbers fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let api_key = non_blank("GEMINI_API_KEY").or_else(|| non_blank("GOOGLE_API_KEY"));
        let base_url = lookup("GEMINI_BASE_URL").unwrap_or(defaults.base_url);
        let model = lookup("GEMINI_MODEL").unwrap_or(defaults.model);
        let timeout = lookup("SITEGEN_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);
        let max_retries = lookup("SITEGEN_MAX_RETRIES")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_retries);
        let retry_interval = lookup("SITEGEN_RETRY_INTERVAL_MS")
            .and_then(|s| s.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.retry_interval);

        GeminiConfig {
            base_url,
            model,
            api_key,
            timeout,
            max_retries,
            retry_interval,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, max_retries: usize, interval: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_interval = interval;
        self
    }

    pub fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                GenerationError::Config("GEMINI_API_KEY (or GOOGLE_API_KEY) is not set".into())
            })
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }
}

/// Settings for running job sets, separate from the API client.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub output_root: PathBuf,
    pub logo_symbol: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            output_root: PathBuf::from("."),
            logo_symbol: PathBuf::from("Images/Logos/CCR_House_Hands_2C (1).jpg"),
        }
    }
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let output_root = env::var("SITEGEN_OUTPUT_ROOT")
            .map(PathBuf::from)
            .unwrap_or(defaults.output_root);
        let logo_symbol = env::var("SITEGEN_LOGO_SYMBOL")
            .map(PathBuf::from)
            .unwrap_or(defaults.logo_symbol);

        RunConfig {
            output_root,
            logo_symbol,
        }
    }

    pub fn with_output_root(mut self, output_root: impl Into<PathBuf>) -> Self {
        self.output_root = output_root.into();
        self
    }

    pub fn with_logo_symbol(mut self, logo_symbol: impl Into<PathBuf>) -> Self {
        self.logo_symbol = logo_symbol.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = GeminiConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(config.max_retries, 2);
        assert!(config.api_key.is_none());
        assert!(config.api_key().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let config = GeminiConfig::from_lookup(lookup_from(&[
            ("GOOGLE_API_KEY", "fallback"),
            ("GEMINI_MODEL", "gemini-2.0-flash-exp"),
            ("SITEGEN_TIMEOUT_SECS", "30"),
            ("SITEGEN_MAX_RETRIES", "0"),
            ("SITEGEN_RETRY_INTERVAL_MS", "not-a-number"),
        ]));
        assert_eq!(config.api_key().unwrap(), "fallback");
        assert_eq!(config.model, "gemini-2.0-flash-exp");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 0);
        assert_eq!(
            config.retry_interval,
            Duration::from_millis(DEFAULT_RETRY_INTERVAL_MS)
        );
    }

    #[test]
    fn test_primary_key_wins_and_blank_is_rejected() {
        let config = GeminiConfig::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "primary"),
            ("GOOGLE_API_KEY", "fallback"),
        ]));
        assert_eq!(config.api_key().unwrap(), "primary");

        let empty_primary = GeminiConfig::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", ""),
            ("GOOGLE_API_KEY", "fallback"),
        ]));
        assert_eq!(empty_primary.api_key().unwrap(), "fallback");

        let blank = GeminiConfig::new().with_api_key("   ");
        assert!(matches!(blank.api_key(), Err(GenerationError::Config(_))));
    }

    #[test]
    fn test_endpoint() {
        let config = GeminiConfig::new().with_base_url("http://127.0.0.1:9000/");
        assert_eq!(
            config.endpoint("gemini-3-pro-image-preview"),
            "http://127.0.0.1:9000/v1beta/models/gemini-3-pro-image-preview:generateContent"
        );
    }
}
