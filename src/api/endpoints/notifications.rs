//! Notification feed endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::notification::{NotificationCategory, NotificationItem};

#[derive(Deserialize)]
pub struct FeedQuery {
    /// Optional category filter, by display label ("Thông báo", …).
    pub category: Option<String>,
}

#[derive(Serialize)]
pub struct FeedResponse {
    pub notifications: Vec<NotificationItem>,
    pub unread: usize,
}

/// `GET /api/notifications[?category=]`
pub async fn feed(
    State(ctx): State<ApiContext>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<FeedResponse>, ApiError> {
    let category = match query.category.as_deref() {
        None | Some("Tất cả") => None,
        Some(raw) => Some(
            raw.parse::<NotificationCategory>()
                .map_err(ApiError::BadRequest)?,
        ),
    };

    let mut notifications = ctx.core.notifications()?;
    if let Some(category) = category {
        notifications.retain(|item| item.category == category);
    }
    let unread = ctx.core.unread_notifications()?;

    Ok(Json(FeedResponse {
        notifications,
        unread,
    }))
}

#[derive(Serialize)]
pub struct MarkReadResponse {
    pub id: u64,
    pub is_read: bool,
}

/// `POST /api/notifications/:id/read`
pub async fn mark_read(
    State(ctx): State<ApiContext>,
    Path(id): Path<u64>,
) -> Result<Json<MarkReadResponse>, ApiError> {
    if !ctx.core.mark_notification_read(id)? {
        return Err(ApiError::NotFound(format!("Notification {id} not found")));
    }
    Ok(Json(MarkReadResponse { id, is_read: true }))
}
