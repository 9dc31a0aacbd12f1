use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use weatherchat::agent::QueryRouter;
use weatherchat::config::WeatherChatConfig;
use weatherchat::web;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = WeatherChatConfig::load()?;
    let query_router = Arc::new(QueryRouter::new(&config)?);

    web::run(config.server.port, query_router).await
}
