//! Booking options: services, selectable dates, and valid slots.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{Datelike, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::booking::schedule::{available_dates, valid_slots_for, DEFAULT_HORIZON};
use crate::booking::SERVICES;

#[derive(Deserialize)]
pub struct OptionsQuery {
    /// Date to compute slots for (YYYY-MM-DD). Defaults to the first
    /// selectable date.
    pub date: Option<String>,
}

#[derive(Serialize)]
pub struct DateOption {
    pub date: NaiveDate,
    pub weekday: &'static str,
}

#[derive(Serialize)]
pub struct OptionsResponse {
    pub services: Vec<&'static str>,
    pub dates: Vec<DateOption>,
    pub slot_date: NaiveDate,
    pub slots: Vec<&'static str>,
    pub saturday_note: Option<&'static str>,
}

/// `GET /api/booking/options?date=YYYY-MM-DD`
pub async fn options(
    State(ctx): State<ApiContext>,
    Query(query): Query<OptionsQuery>,
) -> Result<Json<OptionsResponse>, ApiError> {
    let now = Local::now().naive_local();
    let language = ctx.core.language();

    let dates = available_dates(now.date(), DEFAULT_HORIZON);
    let slot_date = match query.date {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map_err(|_| ApiError::BadRequest("Invalid date format. Use YYYY-MM-DD".into()))?,
        None => *dates
            .first()
            .ok_or_else(|| ApiError::Internal("empty booking horizon".into()))?,
    };
    if !dates.contains(&slot_date) {
        return Err(ApiError::BadRequest(
            "Date is outside the booking horizon".into(),
        ));
    }

    let saturday = slot_date.weekday() == Weekday::Sat;
    Ok(Json(OptionsResponse {
        services: SERVICES.to_vec(),
        dates: dates
            .iter()
            .map(|&date| DateOption {
                date,
                weekday: language.weekday_label(date),
            })
            .collect(),
        slot_date,
        slots: valid_slots_for(slot_date, now),
        saturday_note: saturday.then(|| language.saturday_note()),
    }))
}
