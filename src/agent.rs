//! LLM agent and query router
//!
//! The agent path binds a single `get_weather` tool to an OpenRouter
//! chat-completions call and loops while the model requests tool
//! executions. The router owns the one-way AI → fallback transition: any
//! agent failure is classified into a reason string and the query degrades
//! to the direct weather pipeline with a city extracted from the text.

use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use crate::config::WeatherChatConfig;
use crate::models::AgentResponse;
use crate::weather::WeatherService;

/// Upper bound on model → tool → model round trips per query
const MAX_TOOL_ITERATIONS: usize = 5;

/// City used when the query yields no usable city text
const DEFAULT_CITY: &str = "London";

const SYSTEM_PROMPT: &str =
    "You are a weather assistant. Fetch data using the tool and summarize it nicely. Use emojis!";

const TOOL_NAME: &str = "get_weather";

/// Matches "in <city>" anywhere in the query, letters and spaces only
static CITY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)in\s+([a-zA-Z\s]+)").unwrap());

/// OpenRouter chat-completions client with the weather tool attached
#[derive(Debug, Clone)]
pub struct AgentClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl AgentClient {
    /// Create a new agent client. Returns `None` when no credential is
    /// configured; the caller then routes straight to the fallback path.
    pub fn from_config(config: &WeatherChatConfig) -> Result<Option<Self>> {
        let Some(api_key) = config.agent.api_key.clone() else {
            return Ok(None);
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.agent.timeout_seconds.into()))
            .user_agent(concat!("WeatherChat/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Some(Self {
            client,
            base_url: config.agent.base_url.clone(),
            api_key,
            model: config.agent.model.clone(),
        }))
    }

    /// Run the tool-calling loop for one query and return the model's
    /// final prose.
    #[instrument(skip(self, weather))]
    pub async fn run(&self, query: &str, weather: &WeatherService) -> Result<String> {
        let mut messages = vec![
            openrouter::ChatMessage::system(SYSTEM_PROMPT),
            openrouter::ChatMessage::user(query),
        ];

        for _ in 0..MAX_TOOL_ITERATIONS {
            let message = self.complete(&messages).await?;
            let tool_calls = message.tool_calls.clone().unwrap_or_default();

            if tool_calls.is_empty() {
                return message
                    .content
                    .filter(|content| !content.is_empty())
                    .ok_or_else(|| anyhow!("AI response contained no content"));
            }

            messages.push(message);
            for call in tool_calls {
                let content = self.execute_tool(&call, weather).await;
                messages.push(openrouter::ChatMessage::tool(&call.id, &content));
            }
        }

        bail!("AI agent exceeded {MAX_TOOL_ITERATIONS} tool iterations")
    }

    /// One chat-completions round trip
    async fn complete(
        &self,
        messages: &[openrouter::ChatMessage],
    ) -> Result<openrouter::ChatMessage> {
        let body = json!({
            "model": self.model,
            "temperature": 0,
            "messages": messages,
            "tools": [openrouter::weather_tool_definition()],
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .with_context(|| "AI request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("AI request failed with status {status}: {detail}");
        }

        let completion: openrouter::ChatResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse AI response")?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| anyhow!("No choices in AI response"))
    }

    /// Execute one requested tool call. Bad arguments are reported back to
    /// the model as the tool result rather than aborting the loop.
    async fn execute_tool(&self, call: &openrouter::ToolCall, weather: &WeatherService) -> String {
        if call.function.name != TOOL_NAME {
            return format!("Unknown tool: {}", call.function.name);
        }

        match serde_json::from_str::<GetWeatherArgs>(&call.function.arguments) {
            Ok(args) => {
                debug!("Agent invoked {} for city '{}'", TOOL_NAME, args.city);
                weather.fetch_report_text(&args.city).await
            }
            Err(e) => format!("Invalid tool arguments: {e}"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GetWeatherArgs {
    city: String,
}

/// Routes a free-text query: AI path first, structured fallback on any
/// agent failure. The transition is one-way within a request.
pub struct QueryRouter {
    weather: WeatherService,
    agent: Option<AgentClient>,
}

impl QueryRouter {
    /// Build the router from application configuration
    pub fn new(config: &WeatherChatConfig) -> Result<Self> {
        let agent = AgentClient::from_config(config)?;
        if agent.is_none() {
            warn!("No agent API key configured; all queries will use the fallback path");
        }
        Ok(Self {
            weather: WeatherService::new(config)?,
            agent,
        })
    }

    /// Resolve one query into its terminal response. Never fails: every
    /// agent error degrades to the fallback variant.
    #[instrument(skip(self))]
    pub async fn handle_query(&self, query: &str) -> AgentResponse {
        let reason = match &self.agent {
            None => "API Key missing".to_string(),
            Some(agent) => match agent.run(query, &self.weather).await {
                Ok(message) => return AgentResponse::Ai { message },
                Err(e) => {
                    let reason = classify_agent_error(&format!("{e:#}"));
                    warn!("AI agent failed. Switching to fallback mode. Error: {}", reason);
                    reason
                }
            },
        };

        let city = extract_city(query);
        info!("Fallback utilizing city: {}", city);

        let data = self.weather.fetch_snapshot(&city).await;
        AgentResponse::Fallback {
            data,
            error: reason,
            city_query: city,
        }
    }
}

/// Map an agent failure onto its fallback reason. Rate limiting is detected
/// by substring ("429" / "Rate limit", case-sensitive) because the upstream
/// provider reports it only in error text, not as a typed code.
fn classify_agent_error(message: &str) -> String {
    if message.contains("429") || message.contains("Rate limit") {
        "Daily AI Rate Limit Reached (Free Tier)".to_string()
    } else {
        let truncated: String = message.chars().take(100).collect();
        format!("AI Error: {truncated}...")
    }
}

/// Extract a fallback city from the query text: the "in <words>" pattern
/// wins; a query of fewer than three tokens is taken whole; anything else
/// defaults to London.
fn extract_city(query: &str) -> String {
    if let Some(captures) = CITY_PATTERN.captures(query) {
        return captures[1].trim().to_string();
    }

    let clean_query = query.trim();
    if clean_query.split_whitespace().count() < 3 {
        return clean_query.to_string();
    }

    DEFAULT_CITY.to_string()
}

/// OpenRouter chat-completions wire types
mod openrouter {
    use serde::{Deserialize, Serialize};
    use serde_json::{Value, json};

    /// One chat message, in any of the four roles the loop produces
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ChatMessage {
        pub role: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub content: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub tool_calls: Option<Vec<ToolCall>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub tool_call_id: Option<String>,
    }

    impl ChatMessage {
        pub fn system(content: &str) -> Self {
            Self::plain("system", content)
        }

        pub fn user(content: &str) -> Self {
            Self::plain("user", content)
        }

        pub fn tool(call_id: &str, content: &str) -> Self {
            Self {
                role: "tool".to_string(),
                content: Some(content.to_string()),
                tool_calls: None,
                tool_call_id: Some(call_id.to_string()),
            }
        }

        fn plain(role: &str, content: &str) -> Self {
            Self {
                role: role.to_string(),
                content: Some(content.to_string()),
                tool_calls: None,
                tool_call_id: None,
            }
        }
    }

    /// Tool invocation requested by the model
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ToolCall {
        pub id: String,
        #[serde(rename = "type")]
        pub kind: String,
        pub function: FunctionCall,
    }

    /// Function name plus JSON-encoded arguments
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct FunctionCall {
        pub name: String,
        pub arguments: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ChatResponse {
        #[serde(default)]
        pub choices: Vec<Choice>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Choice {
        pub message: ChatMessage,
    }

    /// Declaration of the single exposed tool
    pub fn weather_tool_definition() -> Value {
        json!({
            "type": "function",
            "function": {
                "name": super::TOOL_NAME,
                "description": "Get the current weather and detailed forecast for a specific city.",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "city": {
                            "type": "string",
                            "description": "City name, e.g. 'Paris' or 'Tokyo'"
                        }
                    },
                    "required": ["city"]
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("weather in Paris", "Paris")]
    #[case("what is the weather IN tokyo", "tokyo")]
    #[case("forecast in New York", "New York")]
    #[case("Tokyo", "Tokyo")]
    #[case("  Oslo  ", "Oslo")]
    #[case("tell me something", "London")]
    #[case("what a lovely day today", "London")]
    fn test_extract_city(#[case] query: &str, #[case] expected: &str) {
        assert_eq!(extract_city(query), expected);
    }

    #[test]
    fn test_extract_city_stops_at_non_letters() {
        // The pattern only spans letters and whitespace
        assert_eq!(extract_city("weather in Paris, please?"), "Paris");
    }

    #[test]
    fn test_extract_city_matches_in_inside_words() {
        // "rain" ends in "in", so the pattern anchors there and the
        // capture swallows the literal "in" that follows
        assert_eq!(extract_city("will it rain in New York"), "in New York");
    }

    #[test]
    fn test_extract_city_empty_query() {
        assert_eq!(extract_city(""), "");
    }

    #[rstest]
    #[case("AI request failed with status 429 Too Many Requests: {}")]
    #[case("Rate limit exceeded for free tier")]
    fn test_classify_rate_limit(#[case] message: &str) {
        assert_eq!(
            classify_agent_error(message),
            "Daily AI Rate Limit Reached (Free Tier)"
        );
    }

    #[test]
    fn test_classify_rate_limit_is_case_sensitive() {
        let reason = classify_agent_error("rate limit hit");
        assert!(reason.starts_with("AI Error: "));
    }

    #[test]
    fn test_classify_other_error_truncates_to_100_chars() {
        let long = "x".repeat(250);
        let reason = classify_agent_error(&long);
        assert_eq!(reason, format!("AI Error: {}...", "x".repeat(100)));
    }

    #[test]
    fn test_classify_short_error_keeps_full_text() {
        assert_eq!(
            classify_agent_error("connection refused"),
            "AI Error: connection refused..."
        );
    }

    #[test]
    fn test_tool_definition_shape() {
        let tool = openrouter::weather_tool_definition();
        assert_eq!(tool["type"], "function");
        assert_eq!(tool["function"]["name"], "get_weather");
        assert_eq!(
            tool["function"]["parameters"]["required"],
            serde_json::json!(["city"])
        );
    }

    #[test]
    fn test_tool_message_serialization() {
        let message = openrouter::ChatMessage::tool("call_1", "sunny");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["role"], "tool");
        assert_eq!(value["tool_call_id"], "call_1");
        assert!(value.get("tool_calls").is_none());
    }

    #[test]
    fn test_assistant_tool_call_roundtrip() {
        let body = serde_json::json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call_1",
                "type": "function",
                "function": {"name": "get_weather", "arguments": "{\"city\":\"Paris\"}"}
            }]
        });
        let message: openrouter::ChatMessage = serde_json::from_value(body).unwrap();
        let calls = message.tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].function.name, "get_weather");

        let args: GetWeatherArgs = serde_json::from_str(&calls[0].function.arguments).unwrap();
        assert_eq!(args.city, "Paris");
    }
}
