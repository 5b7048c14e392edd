//! Configuration management for the forecast service
//!
//! Settings come from the process environment (optionally seeded from a
//! `.env` file by the binary). Both API credentials are mandatory; every
//! other value has a default.

use crate::{Result, SidekickError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration structure for the forecast service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SidekickConfig {
    /// Text-generation backend settings
    pub openai: OpenAiConfig,
    /// Weather provider settings
    pub weather: WeatherConfig,
    /// HTTP listener settings
    pub server: ServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Text-generation backend configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    #[serde(default = "default_openai_model")]
    pub model: String,
    #[serde(default = "default_openai_temperature")]
    pub temperature: f32,
    #[serde(default = "default_openai_max_tokens")]
    pub max_tokens: u32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Weather provider configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    pub api_key: String,
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Credentials must never show up in logs.
impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl std::fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

// Default value functions
fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-3.5-turbo-instruct".to_string()
}

fn default_openai_temperature() -> f32 {
    0.7
}

fn default_openai_max_tokens() -> u32 {
    256
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_port() -> u16 {
    3001
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl WeatherConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl OpenAiConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl SidekickConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`SidekickError::Config`] when a credential is missing or a
    /// value cannot be parsed or is out of range.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let openai_key = var("OPENAI_API_KEY");
        let weather_key = var("OPENWEATHER_API_KEY");
        let (openai_key, weather_key) = match (openai_key, weather_key) {
            (Some(openai), Some(weather)) => (openai, weather),
            (openai, weather) => {
                let missing: Vec<&str> = [
                    openai.is_none().then_some("OPENAI_API_KEY"),
                    weather.is_none().then_some("OPENWEATHER_API_KEY"),
                ]
                .into_iter()
                .flatten()
                .collect();
                return Err(SidekickError::config(format!(
                    "Missing API keys: {}",
                    missing.join(", ")
                )));
            }
        };

        let timeout_seconds: Option<u32> = parse_var(&var, "REQUEST_TIMEOUT_SECONDS")?;

        let mut config = Self {
            openai: OpenAiConfig {
                api_key: openai_key,
                base_url: var("OPENAI_BASE_URL").unwrap_or_default(),
                model: var("OPENAI_MODEL").unwrap_or_default(),
                temperature: parse_var(&var, "OPENAI_TEMPERATURE")?
                    .unwrap_or_else(default_openai_temperature),
                max_tokens: parse_var(&var, "OPENAI_MAX_TOKENS")?.unwrap_or_default(),
                timeout_seconds: timeout_seconds.unwrap_or_default(),
            },
            weather: WeatherConfig {
                api_key: weather_key,
                base_url: var("OPENWEATHER_BASE_URL").unwrap_or_default(),
                timeout_seconds: timeout_seconds.unwrap_or_default(),
            },
            server: ServerConfig {
                port: parse_var(&var, "PORT")?.unwrap_or_else(default_port),
            },
            logging: LoggingConfig {
                format: var("LOG_FORMAT").unwrap_or_default(),
            },
        };

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.openai.base_url.is_empty() {
            self.openai.base_url = default_openai_base_url();
        }
        if self.openai.model.is_empty() {
            self.openai.model = default_openai_model();
        }
        if self.openai.max_tokens == 0 {
            self.openai.max_tokens = default_openai_max_tokens();
        }
        if self.openai.timeout_seconds == 0 {
            self.openai.timeout_seconds = default_timeout();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_timeout();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        if self.openai.api_key.is_empty() || self.weather.api_key.is_empty() {
            return Err(SidekickError::config("API keys cannot be empty"));
        }

        for (name, url) in [
            ("OPENAI_BASE_URL", &self.openai.base_url),
            ("OPENWEATHER_BASE_URL", &self.weather.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(SidekickError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL"
                )));
            }
        }

        if self.openai.timeout_seconds > 300 || self.weather.timeout_seconds > 300 {
            return Err(SidekickError::config(
                "Request timeout cannot exceed 300 seconds",
            ));
        }

        if !(0.0..=2.0).contains(&self.openai.temperature) {
            return Err(SidekickError::config(
                "OPENAI_TEMPERATURE must be between 0.0 and 2.0",
            ));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(SidekickError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        Ok(())
    }
}

fn parse_var<T, F>(var: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    var(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|_| SidekickError::config(format!("Invalid value for {key}: '{raw}'")))
        })
        .transpose()
}
