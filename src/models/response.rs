//! Agent response model
//!
//! The router resolves every query into exactly one of two variants; the
//! AI-to-fallback transition happens at most once per request and is never
//! reversed, so the outcome is modeled as a tagged result rather than as
//! exception-driven branching.

use serde::{Deserialize, Serialize};

use super::WeatherSnapshot;

/// Terminal outcome of one routed query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AgentResponse {
    /// The LLM path succeeded and produced prose
    Ai {
        /// Final text the model returned
        message: String,
    },
    /// The LLM path was unavailable or failed; structured data instead
    Fallback {
        /// Raw pipeline result for the extracted city
        data: WeatherSnapshot,
        /// Why the AI path was not used
        error: String,
        /// City the fallback resolved from the query text
        city_query: String,
    },
}
