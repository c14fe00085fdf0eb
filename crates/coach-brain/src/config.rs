//! Configuration for the completion gateway.

use std::env;
use std::time::Duration;

use crate::error::BrainError;

/// Default OpenRouter API base URL.
pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "meta-llama/llama-3-70b-instruct";

/// Default attribution title sent as `X-Title`.
pub const DEFAULT_APP_TITLE: &str = "AI Accountability Coach";

/// Configuration for [`OpenRouterBrain`](crate::OpenRouterBrain).
#[derive(Debug, Clone)]
pub struct CoachBrainConfig {
    /// API base URL (the `/chat/completions` path is appended).
    pub api_url: String,

    /// API key for bearer authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// Temperature for generation (0.0 - 2.0).
    pub temperature: f32,

    /// Optional `HTTP-Referer` attribution header.
    pub app_url: Option<String>,

    /// Optional `X-Title` attribution header.
    pub app_title: Option<String>,

    /// Request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for CoachBrainConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            app_url: None,
            app_title: Some(DEFAULT_APP_TITLE.to_string()),
            timeout: None,
        }
    }
}

impl CoachBrainConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `OPENROUTER_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `OPENROUTER_API_URL` - API base URL (default: https://openrouter.ai/api/v1)
    /// - `COACH_MODEL` - Model name (default: meta-llama/llama-3-70b-instruct)
    /// - `COACH_TEMPERATURE` - Temperature (default: 0.7)
    /// - `COACH_APP_URL` - `HTTP-Referer` header (default: unset)
    /// - `COACH_APP_TITLE` - `X-Title` header (default: AI Accountability Coach)
    /// - `COACH_COMPLETION_TIMEOUT_SECS` - Request timeout (default: none)
    pub fn from_env() -> Result<Self, BrainError> {
        let api_key = env::var("OPENROUTER_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| BrainError::Configuration("OPENROUTER_API_KEY not set".to_string()))?;

        let api_url =
            env::var("OPENROUTER_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let model = env::var("COACH_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let temperature = env::var("COACH_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.7);

        let app_url = env::var("COACH_APP_URL").ok().filter(|v| !v.is_empty());

        let app_title = match env::var("COACH_APP_TITLE") {
            Ok(title) if title.is_empty() => None,
            Ok(title) => Some(title),
            Err(_) => Some(DEFAULT_APP_TITLE.to_string()),
        };

        let timeout = env::var("COACH_COMPLETION_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(Self {
            api_url,
            api_key,
            model,
            temperature,
            app_url,
            app_title,
            timeout,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> CoachBrainConfigBuilder {
        CoachBrainConfigBuilder::default()
    }

    /// Full URL of the chat-completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_url.trim_end_matches('/'))
    }
}

/// Builder for CoachBrainConfig.
#[derive(Debug, Default)]
pub struct CoachBrainConfigBuilder {
    config: CoachBrainConfig,
}

impl CoachBrainConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API base URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = temp;
        self
    }

    /// Set the `HTTP-Referer` header.
    pub fn app_url(mut self, url: impl Into<String>) -> Self {
        self.config.app_url = Some(url.into());
        self
    }

    /// Set the `X-Title` header.
    pub fn app_title(mut self, title: impl Into<String>) -> Self {
        self.config.app_title = Some(title.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> CoachBrainConfig {
        self.config
    }
}
