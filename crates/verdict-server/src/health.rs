//! Health endpoint.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime: String,
    /// Provider name, or `"fallback"` when generation is offline
    pub ai_provider: String,
    /// Whether that provider reports it can make calls
    pub ai_ready: bool,
    /// Whether orders can be created
    pub payments: bool,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime: state.uptime(),
        ai_provider: state
            .generator
            .provider_name()
            .unwrap_or("fallback")
            .to_string(),
        ai_ready: state.generator.provider_ready().await,
        payments: state.gateway.is_some(),
    })
}
