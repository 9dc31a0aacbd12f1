//! Weather service: geocode → forecast → snapshot pipeline
//!
//! This is the outer fetch boundary. Upstream failures never escape as
//! errors; they are folded into an error-tagged `WeatherSnapshot` so the
//! caller always receives exactly one of the two snapshot shapes.

use tracing::{debug, instrument, warn};

use crate::config::WeatherChatConfig;
use crate::forecast::ForecastClient;
use crate::geocoding::GeocodingClient;
use crate::models::{WeatherReport, WeatherSnapshot};

/// Combined geocoding + forecast pipeline for one city query
#[derive(Debug, Clone)]
pub struct WeatherService {
    geocoding: GeocodingClient,
    forecast: ForecastClient,
}

impl WeatherService {
    /// Create the service from application configuration
    pub fn new(config: &WeatherChatConfig) -> anyhow::Result<Self> {
        Ok(Self {
            geocoding: GeocodingClient::new(config)?,
            forecast: ForecastClient::new(config)?,
        })
    }

    /// Fetch the weather snapshot for a city. Infallible by design: every
    /// upstream failure degrades to the error-tagged shape.
    #[instrument(skip(self))]
    pub async fn fetch_snapshot(&self, city: &str) -> WeatherSnapshot {
        match self.fetch_inner(city).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Weather fetch failed for '{}': {:#}", city, e);
                WeatherSnapshot::error(format!("Error fetching weather data: {e:#}"))
            }
        }
    }

    async fn fetch_inner(&self, city: &str) -> anyhow::Result<WeatherSnapshot> {
        let Some(location) = self.geocoding.geocode(city).await? else {
            return Ok(WeatherSnapshot::error(format!(
                "Could not find coordinates for {city}."
            )));
        };

        debug!(
            "Resolved '{}' to {} at ({})",
            city,
            location.display_name(),
            location.format_coordinates()
        );

        let bundle = self
            .forecast
            .fetch(location.latitude, location.longitude)
            .await?;

        Ok(WeatherSnapshot::Report(WeatherReport {
            location: location.display_name(),
            current: bundle.current,
            forecast: bundle.forecast,
        }))
    }

    /// Fetch a city's weather and render it as the report string. This is
    /// what the agent tool exposes to the model.
    pub async fn fetch_report_text(&self, city: &str) -> String {
        format_report(&self.fetch_snapshot(city).await)
    }
}

/// Render a snapshot as the fixed-layout report. Error snapshots pass
/// through verbatim, with no decoration.
#[must_use]
pub fn format_report(snapshot: &WeatherSnapshot) -> String {
    match snapshot {
        WeatherSnapshot::Error { error } => error.clone(),
        WeatherSnapshot::Report(report) => {
            let mut forecast_lines = String::new();
            for day in &report.forecast {
                forecast_lines.push_str(&format!(
                    "\n- {}: Max {}°C, Min {}°C",
                    day.date,
                    format_or_na(day.max_temp),
                    format_or_na(day.min_temp)
                ));
            }

            format!(
                "Weather Report for {}:\n\
                 Current: {}°C, Wind: {} km/h, Humidity: {}%\n\
                 Forecast:{}",
                report.location,
                format_or_na(report.current.temp),
                format_or_na(report.current.wind),
                format_or_na(report.current.humidity),
                forecast_lines
            )
        }
    }
}

/// Values the provider omitted render as the N/A sentinel
fn format_or_na(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}
