//! Liveness endpoint for the GreenSpot backend

use axum::{extract::State, Json};
use serde::Serialize;

use crate::config::AssistantConfig;
use crate::AppState;

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
    pub assistant: AssistantStatus,
    pub max_photo_bytes: usize,
}

/// What the garden assistant can currently do
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssistantStatus {
    pub configured: bool,
    pub design_images: bool,
}

impl AssistantStatus {
    fn from_config(config: &AssistantConfig) -> Self {
        let configured = config.api_key().is_some();
        Self {
            configured,
            design_images: configured && config.image_generation_enabled,
        }
    }
}

/// Database reachability plus the assistant and upload settings clients depend on
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "connected",
        Err(e) => {
            tracing::warn!("Database health check failed: {}", e);
            "disconnected"
        }
    };

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        database,
        assistant: AssistantStatus::from_config(&state.config.assistant),
        max_photo_bytes: state.config.uploads.max_photo_bytes,
    })
}
