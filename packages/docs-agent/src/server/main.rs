// Main entry point for the chat API server

use std::sync::Arc;

use anyhow::{Context, Result};
use docs_agent::{
    logging,
    server::{build_app, AppState},
    AgentDeps, Config, DocsAgent,
};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init("info,docs_agent=debug,tower_http=info");

    tracing::info!("Starting documentation assistant API");

    // Load configuration
    let config = Arc::new(Config::from_env().context("Failed to load configuration")?);
    tracing::info!(
        vector_store = %config.vector_store_name,
        vector_store_id = %config.vector_store_id,
        default_file_id = %config.default_file_id,
        model = %config.agent.model,
        "Configuration loaded"
    );

    let agent = Arc::new(DocsAgent::new(AgentDeps::openai(config.clone())));
    let app = build_app(AppState::new(agent));

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Chat endpoint: http://localhost:{}/api/chat", config.port);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
