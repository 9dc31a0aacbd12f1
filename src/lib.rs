//! `WeatherChat` - weather query backend with an AI agent front
//!
//! This library provides the core functionality for geocoding city names,
//! fetching forecasts, and answering free-text weather queries via an
//! LLM tool-calling agent with a structured fallback path.

pub mod agent;
pub mod api;
pub mod config;
pub mod error;
pub mod forecast;
pub mod geocoding;
pub mod models;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use agent::{AgentClient, QueryRouter};
pub use config::WeatherChatConfig;
pub use error::WeatherChatError;
pub use forecast::ForecastClient;
pub use geocoding::GeocodingClient;
pub use models::{AgentResponse, Location, WeatherSnapshot};
pub use weather::WeatherService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
