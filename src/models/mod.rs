//! Request-scoped data model for geocoding, weather, and agent responses

pub mod location;
pub mod response;
pub mod weather;

pub use location::Location;
pub use response::AgentResponse;
pub use weather::{CurrentConditions, DailyForecast, WeatherReport, WeatherSnapshot};
