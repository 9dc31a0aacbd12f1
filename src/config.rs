//! Configuration management for the `WeatherChat` application
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings.

use crate::WeatherChatError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Root configuration structure for the `WeatherChat` application
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WeatherChatConfig {
    /// Web server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Weather provider configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// LLM agent configuration
    #[serde(default)]
    pub agent: AgentConfig,
}

/// Web server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port the HTTP server binds to
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Weather provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL for the geocoding API
    #[serde(default = "default_geocoding_base_url")]
    pub geocoding_base_url: String,
    /// Base URL for the forecast API
    #[serde(default = "default_forecast_base_url")]
    pub forecast_base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
}

/// LLM agent settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// OpenRouter API key; the agent path is skipped entirely when absent
    pub api_key: Option<String>,
    /// Base URL for the chat-completions API
    #[serde(default = "default_agent_base_url")]
    pub base_url: String,
    /// Model identifier requested from the provider
    #[serde(default = "default_agent_model")]
    pub model: String,
    /// Request timeout in seconds
    #[serde(default = "default_agent_timeout")]
    pub timeout_seconds: u32,
}

// Default value functions
fn default_port() -> u16 {
    8000
}

fn default_geocoding_base_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_forecast_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_weather_timeout() -> u32 {
    30
}

fn default_agent_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_agent_model() -> String {
    "google/gemini-2.0-flash-exp:free".to_string()
}

fn default_agent_timeout() -> u32 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocoding_base_url: default_geocoding_base_url(),
            forecast_base_url: default_forecast_base_url(),
            timeout_seconds: default_weather_timeout(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_agent_base_url(),
            model: default_agent_model(),
            timeout_seconds: default_agent_timeout(),
        }
    }
}

impl WeatherChatConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides with WEATHERCHAT_ prefix, e.g.
        // WEATHERCHAT_SERVER__PORT=9000
        builder = builder.add_source(
            Environment::with_prefix("WEATHERCHAT")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: WeatherChatConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // The deployment contract for the credential is the plain
        // OPENROUTER_API_KEY environment variable.
        if config.agent.api_key.is_none() {
            config.agent.api_key = env::var("OPENROUTER_API_KEY").ok().filter(|k| !k.is_empty());
        }

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weatherchat").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        if let Some(api_key) = &self.agent.api_key {
            if api_key.is_empty() {
                return Err(WeatherChatError::config(
                    "Agent API key cannot be empty if provided. Either remove it or provide a valid key."
                ).into());
            }
        }

        if self.weather.timeout_seconds == 0 || self.weather.timeout_seconds > 300 {
            return Err(WeatherChatError::config(
                "Weather API timeout must be between 1 and 300 seconds",
            )
            .into());
        }

        if self.agent.timeout_seconds == 0 || self.agent.timeout_seconds > 300 {
            return Err(WeatherChatError::config(
                "Agent API timeout must be between 1 and 300 seconds",
            )
            .into());
        }

        for url in [
            &self.weather.geocoding_base_url,
            &self.weather.forecast_base_url,
            &self.agent.base_url,
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(WeatherChatError::config(format!(
                    "Base URL '{url}' must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
