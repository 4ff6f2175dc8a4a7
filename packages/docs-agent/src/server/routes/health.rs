use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: String,
    vector_store: String,
    /// False when no API key is configured; answers will be degraded
    provider_configured: bool,
}

/// Health check endpoint
///
/// The agent has no local dependencies to probe, so this only reports the
/// configuration it runs with.
pub async fn health_handler(Extension(state): Extension<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        vector_store: state.config.vector_store_name.clone(),
        provider_configured: state.config.has_api_key(),
    })
}
