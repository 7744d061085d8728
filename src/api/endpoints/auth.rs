//! Citizen identification: name + national id, remembered on the device.
//!
//! There is deliberately no password and no session token — this is
//! prefill convenience, not authentication.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::profile::{is_valid_national_id, CitizenProfile};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub national_id: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub profile: CitizenProfile,
    pub identified: bool,
}

/// `POST /api/auth/login`
pub async fn login(
    State(ctx): State<ApiContext>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    if request.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Full name is required".into()));
    }
    if request.name.len() > 200 {
        return Err(ApiError::BadRequest("Full name too long".into()));
    }
    let national_id: String = request
        .national_id
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    if !is_valid_national_id(&national_id) {
        return Err(ApiError::BadRequest(
            "National id must be exactly 12 digits".into(),
        ));
    }

    let profile = CitizenProfile {
        name: request.name.trim().to_string(),
        national_id,
        phone: String::new(),
        email: request.email.trim().to_string(),
    };
    ctx.core.login(&profile)?;

    let stored = ctx.core.profile();
    let identified = stored.is_identified();
    Ok(Json(ProfileResponse {
        profile: stored,
        identified,
    }))
}

/// `POST /api/auth/logout` — forget the stored identification.
pub async fn logout(State(ctx): State<ApiContext>) -> Result<Json<serde_json::Value>, ApiError> {
    ctx.core.logout()?;
    Ok(Json(serde_json::json!({ "status": "ok" })))
}

/// `GET /api/auth/profile` — prefill data for the forms.
pub async fn profile(State(ctx): State<ApiContext>) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = ctx.core.profile();
    let identified = profile.is_identified();
    Ok(Json(ProfileResponse {
        profile,
        identified,
    }))
}
