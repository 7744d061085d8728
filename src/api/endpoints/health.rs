//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub citizen_identified: bool,
    pub webhook_failures: u64,
}

/// `GET /api/health` — connection check for the frontend.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    Ok(Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        citizen_identified: ctx.core.profile().is_identified(),
        webhook_failures: ctx.core.webhook_failures(),
    }))
}
