//! Configuration for hedge-fund runs

use crate::error::{HedgeError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default base URL of the financial data API
pub const DEFAULT_DATA_API_BASE: &str = "https://api.financialdatasets.ai";

/// Environment variable holding the financial data API key
pub const DATA_API_KEY_VAR: &str = "FINANCIAL_DATASETS_API_KEY";

/// Environment variable that overrides the model
pub const MODEL_VAR: &str = "OPENAI_MODEL";

/// Optional sampling temperature override
pub const TEMPERATURE_VAR: &str = "OPENAI_TEMPERATURE";

/// Optional data API requests-per-minute override
pub const RATE_LIMIT_VAR: &str = "FINANCIAL_DATASETS_RATE_LIMIT";

/// Configuration for a hedge-fund run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HedgeConfig {
    /// Chat model used by every decision-support node
    pub model: String,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Sampling temperature
    pub temperature: Option<f32>,

    /// Financial data API base URL
    pub data_api_base: String,

    /// Financial data API key
    #[serde(skip_serializing)]
    pub data_api_key: String,

    /// HTTP request timeout for data calls
    pub request_timeout: Duration,

    /// Data API requests per minute
    pub rate_limit: u32,

    /// News records requested by the sentiment node
    pub news_limit: usize,

    /// Insider trade records requested by the market data node
    pub insider_trade_limit: usize,

    /// TTM financial metric periods requested by the market data node
    pub metrics_limit: usize,

    /// Months between the default start date and the end date
    pub lookback_months: u32,
}

impl Default for HedgeConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            max_tokens: 4096,
            temperature: None,
            data_api_base: DEFAULT_DATA_API_BASE.to_string(),
            data_api_key: String::new(),
            request_timeout: Duration::from_secs(30),
            rate_limit: 60,
            news_limit: 100,
            insider_trade_limit: 1000,
            metrics_limit: 10,
            lookback_months: 1,
        }
    }
}

impl HedgeConfig {
    /// Create a new configuration builder
    pub fn builder() -> HedgeConfigBuilder {
        HedgeConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.data_api_key.trim().is_empty() {
            return Err(HedgeError::ConfigError(format!(
                "{DATA_API_KEY_VAR} is not set"
            )));
        }
        if self.model.trim().is_empty() {
            return Err(HedgeError::ConfigError("model must not be empty".to_string()));
        }
        if self.rate_limit == 0 {
            return Err(HedgeError::ConfigError(
                "rate_limit must be greater than 0".to_string(),
            ));
        }
        if self.news_limit == 0 || self.insider_trade_limit == 0 || self.metrics_limit == 0 {
            return Err(HedgeError::ConfigError(
                "record limits must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for `HedgeConfig`
#[derive(Debug, Default)]
pub struct HedgeConfigBuilder {
    model: Option<String>,
    max_tokens: Option<usize>,
    temperature: Option<f32>,
    data_api_base: Option<String>,
    data_api_key: Option<String>,
    request_timeout: Option<Duration>,
    rate_limit: Option<u32>,
    news_limit: Option<usize>,
    insider_trade_limit: Option<usize>,
    metrics_limit: Option<usize>,
    lookback_months: Option<u32>,
}

impl HedgeConfigBuilder {
    /// Set the chat model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set max tokens per completion
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the data API base URL
    pub fn data_api_base(mut self, base: impl Into<String>) -> Self {
        self.data_api_base = Some(base.into());
        self
    }

    /// Set the data API key
    pub fn data_api_key(mut self, key: impl Into<String>) -> Self {
        self.data_api_key = Some(key.into());
        self
    }

    /// Apply environment overrides: data API key, model, temperature and
    /// rate limit. Unset variables leave the builder untouched.
    pub fn with_env(mut self) -> Result<Self> {
        if let Some(key) = agent_utils::optional_env(DATA_API_KEY_VAR) {
            self.data_api_key = Some(key);
        }
        if let Some(model) = agent_utils::optional_env(MODEL_VAR) {
            self.model = Some(model);
        }
        if let Some(temperature) = agent_utils::parse_env::<f32>(TEMPERATURE_VAR)? {
            self.temperature = Some(temperature);
        }
        if let Some(per_minute) = agent_utils::parse_env::<u32>(RATE_LIMIT_VAR)? {
            self.rate_limit = Some(per_minute);
        }
        Ok(self)
    }

    /// Set the HTTP request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set data API requests per minute
    pub fn rate_limit(mut self, per_minute: u32) -> Self {
        self.rate_limit = Some(per_minute);
        self
    }

    /// Set the news record limit
    pub fn news_limit(mut self, limit: usize) -> Self {
        self.news_limit = Some(limit);
        self
    }

    /// Set the insider trade record limit
    pub fn insider_trade_limit(mut self, limit: usize) -> Self {
        self.insider_trade_limit = Some(limit);
        self
    }

    /// Set the financial metrics period limit
    pub fn metrics_limit(mut self, limit: usize) -> Self {
        self.metrics_limit = Some(limit);
        self
    }

    /// Set the default lookback window in months
    pub fn lookback_months(mut self, months: u32) -> Self {
        self.lookback_months = Some(months);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<HedgeConfig> {
        let defaults = HedgeConfig::default();

        let config = HedgeConfig {
            model: self.model.unwrap_or(defaults.model),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: self.temperature.or(defaults.temperature),
            data_api_base: self
                .data_api_base
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.data_api_base),
            data_api_key: self.data_api_key.unwrap_or(defaults.data_api_key),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            rate_limit: self.rate_limit.unwrap_or(defaults.rate_limit),
            news_limit: self.news_limit.unwrap_or(defaults.news_limit),
            insider_trade_limit: self
                .insider_trade_limit
                .unwrap_or(defaults.insider_trade_limit),
            metrics_limit: self.metrics_limit.unwrap_or(defaults.metrics_limit),
            lookback_months: self.lookback_months.unwrap_or(defaults.lookback_months),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HedgeConfig::default();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.news_limit, 100);
        assert_eq!(config.data_api_base, DEFAULT_DATA_API_BASE);
        assert_eq!(config.lookback_months, 1);
    }

    #[test]
    fn test_builder() {
        let config = HedgeConfig::builder()
            .data_api_key("fd-key")
            .data_api_base("http://localhost:9000/")
            .model("gpt-4o-mini")
            .news_limit(20)
            .build()
            .unwrap();

        assert_eq!(config.data_api_key, "fd-key");
        assert_eq!(config.data_api_base, "http://localhost:9000");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.news_limit, 20);
        assert_eq!(config.insider_trade_limit, 1000);
    }

    #[test]
    fn test_validation() {
        let err = HedgeConfig::builder().build().unwrap_err();
        assert!(err.to_string().contains(DATA_API_KEY_VAR));

        let err = HedgeConfig::builder()
            .data_api_key("k")
            .rate_limit(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, HedgeError::ConfigError(_)));
    }
}
