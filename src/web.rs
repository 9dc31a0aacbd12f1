//! Web server bootstrap

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::agent::QueryRouter;
use crate::api;

/// Build the application router: API under `/api`, CORS open
pub fn app(query_router: Arc<QueryRouter>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api::router(query_router))
        .layer(cors)
}

pub async fn run(port: u16, query_router: Arc<QueryRouter>) -> Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://localhost:{}", port);
    axum::serve(listener, app(query_router))
        .await
        .with_context(|| "Web server exited with an error")?;
    Ok(())
}
