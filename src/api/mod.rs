//! Inbound HTTP API
//!
//! One endpoint: `POST /chat` takes `{"query": string}` and returns the
//! routed `AgentResponse`. Routed queries cannot fail; the only error
//! surface is a malformed request body, which is reported as a server
//! error with the rejection text as detail.

use std::sync::Arc;

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::agent::QueryRouter;

/// Inbound chat request body
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Free-text weather query
    pub query: String,
}

pub fn router(query_router: Arc<QueryRouter>) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .with_state(query_router)
}

async fn chat(
    State(query_router): State<Arc<QueryRouter>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(request)) => Json(query_router.handle_query(&request.query).await).into_response(),
        Err(rejection) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": rejection.body_text() })),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_parsing() {
        let request: ChatRequest = serde_json::from_str(r#"{"query":"weather in Paris"}"#).unwrap();
        assert_eq!(request.query, "weather in Paris");
    }

    #[test]
    fn test_chat_request_rejects_missing_query() {
        let result = serde_json::from_str::<ChatRequest>(r#"{"q":"oops"}"#);
        assert!(result.is_err());
    }
}
