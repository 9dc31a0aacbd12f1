//! Error types and handling for the `WeatherChat` application
//!
//! Configuration is the only typed error domain; the HTTP-client seams
//! carry `anyhow` contexts, and upstream failures degrade to tagged
//! snapshot or fallback responses rather than raised errors.

use thiserror::Error;

/// Main error type for the `WeatherChat` application
#[derive(Error, Debug)]
pub enum WeatherChatError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl WeatherChatError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
