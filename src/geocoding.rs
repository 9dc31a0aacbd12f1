//! Geocoding client for the `OpenMeteo` geocoding API
//!
//! Resolves a free-text city name to coordinates. No API key required.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::WeatherChatConfig;
use crate::models::Location;

/// Client for the geocoding endpoint
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: Client,
    base_url: String,
}

/// Geocoding response from `OpenMeteo`
#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
}

impl From<GeocodingResult> for Location {
    fn from(result: GeocodingResult) -> Self {
        Location {
            latitude: result.latitude,
            longitude: result.longitude,
            name: result.name,
            country: result.country.unwrap_or_default(),
        }
    }
}

impl GeocodingClient {
    /// Create a new geocoding client
    pub fn new(config: &WeatherChatConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.weather.timeout_seconds.into()))
            .user_agent(concat!("WeatherChat/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.weather.geocoding_base_url.clone(),
        })
    }

    /// Resolve a city name to its best-matching location.
    ///
    /// Returns `Ok(None)` when the provider recognizes the request but has
    /// no match; transport and parse failures bubble up as errors.
    pub async fn geocode(&self, city: &str) -> Result<Option<Location>> {
        let url = format!(
            "{}/search?name={}&count=1&language=en&format=json",
            self.base_url,
            urlencoding::encode(city)
        );

        debug!("Geocoding city: {}", city);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Geocoding request failed for '{city}'"))?;

        let geocoding: GeocodingResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse OpenMeteo geocoding response")?;

        Ok(geocoding
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(Location::from))
    }
}
