//! Forecast client for the `OpenMeteo` forecast API
//!
//! Fetches current conditions plus hourly and daily series for a coordinate
//! pair and condenses them into the snapshot model. Humidity is only
//! available hourly, so the entry closest to the provider's "current"
//! instant is aligned with the current conditions.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::config::WeatherChatConfig;
use crate::models::{CurrentConditions, DailyForecast};

/// Number of forecast days requested from the provider
const FORECAST_DAYS: usize = 4;

/// Client for the forecast endpoint
#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: Client,
    base_url: String,
}

/// Current conditions plus the condensed daily series
#[derive(Debug, Clone)]
pub struct ForecastBundle {
    pub current: CurrentConditions,
    pub forecast: Vec<DailyForecast>,
}

impl ForecastClient {
    /// Create a new forecast client
    pub fn new(config: &WeatherChatConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.weather.timeout_seconds.into()))
            .user_agent(concat!("WeatherChat/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.weather.forecast_base_url.clone(),
        })
    }

    /// Fetch and condense the forecast for a coordinate pair.
    ///
    /// Coordinate ranges are not validated here; the provider rejects
    /// out-of-range values itself.
    pub async fn fetch(&self, latitude: f64, longitude: f64) -> Result<ForecastBundle> {
        let url = format!(
            "{}/forecast?latitude={latitude}&longitude={longitude}\
             &hourly=temperature_2m,relative_humidity_2m,precipitation,windspeed_10m,weathercode\
             &daily=temperature_2m_max,temperature_2m_min,sunrise,sunset,weathercode\
             &current_weather=true&forecast_days={FORECAST_DAYS}&timezone=auto",
            self.base_url
        );

        debug!("Fetching forecast for ({:.4}, {:.4})", latitude, longitude);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| "Forecast request failed")?;

        let forecast: openmeteo::ForecastResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse OpenMeteo forecast response")?;

        Ok(condense(&forecast))
    }
}

/// Index into `times` whose timestamp is closest to `target`, measured in
/// seconds. Ties keep the earlier index. An empty series or an unparseable
/// target resolves to 0.
pub fn nearest_hour_index(times: &[String], target: Option<&str>) -> usize {
    let Some(target_dt) = target.and_then(parse_local_timestamp) else {
        return 0;
    };

    let mut best_idx = 0;
    let mut best_diff = i64::MAX;
    for (i, time) in times.iter().enumerate() {
        let Some(dt) = parse_local_timestamp(time) else {
            continue;
        };
        let diff = (dt - target_dt).num_seconds().abs();
        if diff < best_diff {
            best_diff = diff;
            best_idx = i;
        }
    }
    best_idx
}

/// Parse the provider's local-time format, with and without seconds
fn parse_local_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// Condense a raw provider response into current conditions and a short
/// daily series. Every lookup is positional and defensive; a truncated or
/// misaligned series yields `None` values, never a panic.
fn condense(response: &openmeteo::ForecastResponse) -> ForecastBundle {
    let current_weather = response.current_weather.as_ref();

    let humidity = response.hourly.as_ref().and_then(|hourly| {
        let idx = nearest_hour_index(
            &hourly.time,
            current_weather.and_then(|c| c.time.as_deref()),
        );
        hourly
            .relative_humidity
            .as_ref()
            .and_then(|series| series.get(idx).copied().flatten())
    });

    let current = CurrentConditions {
        temp: current_weather.and_then(|c| c.temperature),
        wind: current_weather.and_then(|c| c.wind_speed),
        humidity,
        code: current_weather.and_then(|c| c.weather_code),
    };

    let mut forecast = Vec::new();
    if let Some(daily) = &response.daily {
        for (i, date) in daily.time.iter().take(FORECAST_DAYS).enumerate() {
            forecast.push(DailyForecast {
                date: date.clone(),
                max_temp: daily
                    .temperature_max
                    .as_ref()
                    .and_then(|series| series.get(i).copied().flatten()),
                min_temp: daily
                    .temperature_min
                    .as_ref()
                    .and_then(|series| series.get(i).copied().flatten()),
                code: daily
                    .weather_code
                    .as_ref()
                    .and_then(|series| series.get(i).copied().flatten()),
            });
        }
    }

    ForecastBundle { current, forecast }
}

/// `OpenMeteo` API response structures
mod openmeteo {
    use serde::Deserialize;

    /// Forecast response from the `OpenMeteo` API
    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub current_weather: Option<CurrentWeather>,
        pub hourly: Option<HourlyData>,
        pub daily: Option<DailyData>,
    }

    /// Current-weather snapshot block
    #[derive(Debug, Deserialize)]
    pub struct CurrentWeather {
        pub temperature: Option<f64>,
        #[serde(rename = "windspeed")]
        pub wind_speed: Option<f64>,
        #[serde(rename = "weathercode")]
        pub weather_code: Option<u8>,
        pub time: Option<String>,
    }

    /// Hourly series; only humidity is consumed downstream
    #[derive(Debug, Deserialize)]
    pub struct HourlyData {
        #[serde(default)]
        pub time: Vec<String>,
        #[serde(rename = "relative_humidity_2m")]
        pub relative_humidity: Option<Vec<Option<f64>>>,
    }

    /// Daily series
    #[derive(Debug, Deserialize)]
    pub struct DailyData {
        #[serde(default)]
        pub time: Vec<String>,
        #[serde(rename = "temperature_2m_max")]
        pub temperature_max: Option<Vec<Option<f64>>>,
        #[serde(rename = "temperature_2m_min")]
        pub temperature_min: Option<Vec<Option<f64>>>,
        #[serde(rename = "weathercode")]
        pub weather_code: Option<Vec<Option<u8>>>,
    }
}
