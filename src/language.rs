//! The two hardcoded language packs driving screen copy.
//!
//! The source screens duplicated whole components per language; here one
//! canonical component per screen asks the active `Language` for its copy.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Vi,
    En,
}

impl Default for Language {
    fn default() -> Self {
        Self::Vi
    }
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vi => "vi",
            Self::En => "en",
        }
    }

    /// Opening bubble of a fresh assistant conversation.
    pub fn assistant_greeting(&self) -> &'static str {
        match self {
            Self::Vi => {
                "Xin chào! Tôi là trợ lý AI của UBND phường. \
                 Tôi có thể giúp gì cho bạn về thủ tục hành chính hôm nay?"
            }
            Self::En => {
                "Hello! I am the ward office AI assistant. \
                 How can I help you with public services today?"
            }
        }
    }

    /// Shown as the assistant's bubble when the hosted AI call fails.
    pub fn assistant_fallback(&self) -> &'static str {
        match self {
            Self::Vi => "Hệ thống đang bận, vui lòng thử lại sau.",
            Self::En => "The system is busy right now, please try again later.",
        }
    }

    pub fn booking_confirmed_title(&self, service: &str) -> String {
        match self {
            Self::Vi => format!("Lịch hẹn thành công: {service}"),
            Self::En => format!("Appointment confirmed: {service}"),
        }
    }

    pub fn booking_confirmed_summary(
        &self,
        code: &str,
        name: &str,
        national_id: &str,
        time_slot: &str,
        date_label: &str,
    ) -> String {
        match self {
            Self::Vi => format!(
                "Mã cuộc hẹn {code} của ông/bà {name} (CCCD: {national_id}) \
                 đã được xác nhận vào lúc {time_slot} ngày {date_label}."
            ),
            Self::En => format!(
                "Appointment {code} for {name} (ID: {national_id}) \
                 is confirmed at {time_slot} on {date_label}."
            ),
        }
    }

    /// Short weekday label for the date picker strip.
    pub fn weekday_label(&self, date: NaiveDate) -> &'static str {
        match (self, date.weekday()) {
            (Self::Vi, Weekday::Mon) => "Thứ Hai",
            (Self::Vi, Weekday::Tue) => "Thứ Ba",
            (Self::Vi, Weekday::Wed) => "Thứ Tư",
            (Self::Vi, Weekday::Thu) => "Thứ Năm",
            (Self::Vi, Weekday::Fri) => "Thứ Sáu",
            (Self::Vi, Weekday::Sat) => "Thứ Bảy",
            (Self::Vi, Weekday::Sun) => "Chủ Nhật",
            (Self::En, Weekday::Mon) => "Monday",
            (Self::En, Weekday::Tue) => "Tuesday",
            (Self::En, Weekday::Wed) => "Wednesday",
            (Self::En, Weekday::Thu) => "Thursday",
            (Self::En, Weekday::Fri) => "Friday",
            (Self::En, Weekday::Sat) => "Saturday",
            (Self::En, Weekday::Sun) => "Sunday",
        }
    }

    /// Note shown next to the slot picker when a Saturday is selected.
    pub fn saturday_note(&self) -> &'static str {
        match self {
            Self::Vi => "Chỉ làm buổi sáng",
            Self::En => "Morning slots only",
        }
    }

    /// Counter directions shown on the confirmation screen.
    pub fn arrival_note(&self, counter: &str) -> String {
        match self {
            Self::Vi => format!(
                "Vị trí: Quầy số {counter}. Vui lòng mang CCCD bản chính để đối soát."
            ),
            Self::En => format!(
                "Location: counter {counter}. Please bring your original ID card for verification."
            ),
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vi" => Ok(Self::Vi),
            "en" => Ok(Self::En),
            other => Err(format!("unknown language: {other}")),
        }
    }
}
