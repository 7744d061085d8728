//! Assistant endpoints.
//!
//! The backend client is blocking (reqwest), so the send handler hops to a
//! blocking thread; the in-flight guard in `AssistantService` is what keeps
//! a second send out while the first is running.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::assistant::{AvatarOption, AVATAR_OPTIONS};
use crate::language::Language;
use crate::models::chat::ChatMessage;

#[derive(Deserialize)]
pub struct SendRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct SendResponse {
    pub reply: ChatMessage,
}

/// `POST /api/chat/send`
pub async fn send(
    State(ctx): State<ApiContext>,
    Json(request): Json<SendRequest>,
) -> Result<Json<SendResponse>, ApiError> {
    let core = Arc::clone(&ctx.core);
    let reply = tokio::task::spawn_blocking(move || core.assistant().send(&request.message))
        .await
        .map_err(|e| ApiError::Internal(format!("assistant task failed: {e}")))??;

    Ok(Json(SendResponse { reply }))
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub session_id: String,
    pub messages: Vec<ChatMessage>,
    pub avatar: String,
    pub language: Language,
    pub busy: bool,
}

/// `GET /api/chat/history`
pub async fn history(State(ctx): State<ApiContext>) -> Result<Json<HistoryResponse>, ApiError> {
    let session = ctx.core.assistant().snapshot();
    Ok(Json(HistoryResponse {
        session_id: session.id.to_string(),
        messages: session.messages,
        avatar: session.avatar,
        language: session.language,
        busy: ctx.core.assistant().is_busy(),
    }))
}

#[derive(Serialize)]
pub struct OptionsResponse {
    pub avatars: Vec<AvatarOption>,
    pub languages: Vec<&'static str>,
}

/// `GET /api/chat/options` — persona choices.
pub async fn options(State(_ctx): State<ApiContext>) -> Result<Json<OptionsResponse>, ApiError> {
    Ok(Json(OptionsResponse {
        avatars: AVATAR_OPTIONS.to_vec(),
        languages: vec![Language::Vi.as_str(), Language::En.as_str()],
    }))
}

#[derive(Deserialize)]
pub struct PersonaRequest {
    pub avatar: Option<String>,
    pub language: Option<String>,
}

/// `POST /api/chat/persona` — change avatar/language, persisted.
pub async fn persona(
    State(ctx): State<ApiContext>,
    Json(request): Json<PersonaRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let language = match request.language.as_deref() {
        Some(raw) => Some(raw.parse::<Language>().map_err(ApiError::BadRequest)?),
        None => None,
    };
    if let Some(avatar) = request.avatar.as_deref() {
        if crate::assistant::find_avatar(avatar).is_none() {
            return Err(ApiError::BadRequest(format!("Unknown avatar: {avatar}")));
        }
    }

    ctx.core
        .set_chat_persona(request.avatar.as_deref(), language)?;
    Ok(Json(serde_json::json!({ "status": "ok" })))
}
