//! Weather snapshot model
//!
//! `WeatherSnapshot` is a strictly tagged result: a request either yields the
//! full success shape or a single error string, never a partial mix. Values
//! pass through in the provider's units (Celsius, km/h) without conversion.

use serde::{Deserialize, Serialize};

/// Result of the geocode → forecast pipeline for one city query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum WeatherSnapshot {
    /// Successful fetch with current conditions and a short daily forecast
    Report(WeatherReport),
    /// Upstream failure, carried as a plain message
    Error {
        /// Human-readable failure description
        error: String,
    },
}

impl WeatherSnapshot {
    /// Build an error-tagged snapshot
    pub fn error<S: Into<String>>(message: S) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    /// True when the snapshot carries the error shape
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Successful weather fetch for one location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherReport {
    /// "City, Country" header for the report
    pub location: String,
    /// Conditions at the provider's current instant
    pub current: CurrentConditions,
    /// One entry per forecast day, in provider order
    pub forecast: Vec<DailyForecast>,
}

/// Current conditions; missing provider values stay `None` and render as N/A
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentConditions {
    /// Temperature in °C
    pub temp: Option<f64>,
    /// Wind speed in km/h
    pub wind: Option<f64>,
    /// Relative humidity in percent, aligned from the hourly series
    pub humidity: Option<f64>,
    /// WMO weather code
    pub code: Option<u8>,
}

/// One day of the daily forecast series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyForecast {
    /// Date in the provider's local timezone (YYYY-MM-DD)
    pub date: String,
    /// Daily maximum temperature in °C
    pub max_temp: Option<f64>,
    /// Daily minimum temperature in °C
    pub min_temp: Option<f64>,
    /// WMO weather code for the day
    pub code: Option<u8>,
}
