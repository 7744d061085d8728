use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Where the booking form currently is.
///
/// A linear flow: `Selection → PersonalInfo → Completed`. Back navigation
/// is only allowed from `PersonalInfo`; `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStep {
    Selection,
    PersonalInfo,
    Completed,
}

impl BookingStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Selection => "selection",
            Self::PersonalInfo => "personal_info",
            Self::Completed => "completed",
        }
    }
}

/// The in-progress appointment form. Owned by the active booking session
/// and discarded when the session ends or completes.
///
/// Empty strings mean "not yet entered" — validation happens at the
/// transition guards, not at field assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingDraft {
    pub service: String,
    pub date: NaiveDate,
    pub time_slot: String,
    pub citizen_name: String,
    pub national_id: String,
    pub phone: String,
    pub email: String,
    pub note: String,
}

impl BookingDraft {
    /// Fresh draft anchored to the given (already validated) default date.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            service: String::new(),
            date,
            time_slot: String::new(),
            citizen_name: String::new(),
            national_id: String::new(),
            phone: String::new(),
            email: String::new(),
            note: String::new(),
        }
    }
}

/// A confirmed appointment. Produced exactly once per completed draft;
/// immutable from then on. `code` is presentational and not guaranteed
/// globally unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRecord {
    pub code: String,
    pub service: String,
    pub counter: String,
    pub date: NaiveDate,
    pub time_slot: String,
    pub citizen_name: String,
    pub national_id: String,
}

impl BookingRecord {
    /// Appointment date as shown to citizens (dd/mm/yyyy).
    pub fn date_label(&self) -> String {
        self.date.format("%d/%m/%Y").to_string()
    }
}
