//! The booking flow endpoints: one per screen action.
//!
//! Handlers validate request shape, then delegate to the state machine —
//! guard decisions live in `booking::flow`, not here.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::booking::flow::ContactDetails;
use crate::booking::ticket::{render_ticket, ticket_filename};
use crate::models::booking::{BookingDraft, BookingRecord, BookingStep};

#[derive(Serialize)]
pub struct FlowView {
    pub step: BookingStep,
    pub draft: BookingDraft,
}

/// `POST /api/booking/start` — begin (or restart) a booking session.
pub async fn start(State(ctx): State<ApiContext>) -> Result<Json<FlowView>, ApiError> {
    let now = Local::now().naive_local();
    let (step, draft) = ctx.core.start_booking(now)?;
    Ok(Json(FlowView { step, draft }))
}

#[derive(Deserialize)]
pub struct SelectionRequest {
    pub service: Option<String>,
    /// YYYY-MM-DD
    pub date: Option<String>,
    pub time_slot: Option<String>,
}

/// `POST /api/booking/selection` — apply service/date/slot picks.
///
/// Date is applied before slot, so a request carrying both behaves like the
/// screen: pick a day, then a slot that is valid for it.
pub async fn selection(
    State(ctx): State<ApiContext>,
    Json(request): Json<SelectionRequest>,
) -> Result<Json<FlowView>, ApiError> {
    let now = Local::now().naive_local();

    let date = match &request.date {
        Some(raw) => Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| ApiError::BadRequest("Invalid date format. Use YYYY-MM-DD".into()))?,
        ),
        None => None,
    };

    ctx.core.with_booking(|flow| {
        if let Some(date) = date {
            flow.select_date(date, now)?;
        }
        if let Some(service) = &request.service {
            flow.select_service(service)?;
        }
        if let Some(slot) = &request.time_slot {
            flow.select_slot(slot, now)?;
        }
        Ok(())
    })?;

    flow_view(&ctx)
}

/// `POST /api/booking/next` — Selection → PersonalInfo.
pub async fn next(State(ctx): State<ApiContext>) -> Result<Json<FlowView>, ApiError> {
    ctx.core.with_booking(|flow| flow.proceed())?;
    flow_view(&ctx)
}

/// `POST /api/booking/back` — PersonalInfo → Selection, fields retained.
pub async fn back(State(ctx): State<ApiContext>) -> Result<Json<FlowView>, ApiError> {
    ctx.core.with_booking(|flow| flow.back())?;
    flow_view(&ctx)
}

#[derive(Deserialize)]
pub struct ConfirmRequest {
    pub citizen_name: String,
    pub national_id: String,
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Serialize)]
pub struct ConfirmResponse {
    pub record: BookingRecord,
    pub ticket_filename: String,
    /// Counter directions for the confirmation screen.
    pub arrival_note: String,
}

/// `POST /api/booking/confirm` — PersonalInfo → Completed.
///
/// On success the notification is already in the feed and the webhook (if
/// configured) has been dispatched; the response carries the record plus
/// the ticket download name.
pub async fn confirm(
    State(ctx): State<ApiContext>,
    Json(request): Json<ConfirmRequest>,
) -> Result<Json<ConfirmResponse>, ApiError> {
    let now = Local::now().naive_local();

    ctx.core.with_booking(|flow| {
        flow.set_contact(ContactDetails {
            citizen_name: request.citizen_name,
            national_id: request.national_id,
            phone: request.phone,
            email: request.email,
            note: request.note,
        })
    })?;

    let record = ctx.core.confirm_booking(now)?;
    let ticket_filename = ticket_filename(&record.code);
    let arrival_note = ctx.core.language().arrival_note(&record.counter);
    Ok(Json(ConfirmResponse {
        record,
        ticket_filename,
        arrival_note,
    }))
}

/// `GET /api/booking/ticket` — the rendered PNG for the completed booking.
///
/// Re-rendering is idempotent: the ticket is a pure function of the record.
pub async fn ticket(State(ctx): State<ApiContext>) -> Result<impl IntoResponse, ApiError> {
    let record = ctx.core.booking_record()?;
    let png = render_ticket(&record).map_err(|e| ApiError::Internal(e.to_string()))?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        ticket_filename(&record.code)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        png,
    ))
}

/// `POST /api/booking/finish` — discard the session (return to home).
pub async fn finish(State(ctx): State<ApiContext>) -> Result<Json<serde_json::Value>, ApiError> {
    ctx.core.finish_booking()?;
    Ok(Json(serde_json::json!({ "status": "ok" })))
}

fn flow_view(ctx: &ApiContext) -> Result<Json<FlowView>, ApiError> {
    let (step, draft) = ctx
        .core
        .booking_view()?
        .ok_or(ApiError::NoActiveBooking)?;
    Ok(Json(FlowView { step, draft }))
}
