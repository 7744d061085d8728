use serde::{Deserialize, Serialize};

use crate::models::booking::BookingRecord;

/// Feed category, matching the three tabs of the notification screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationCategory {
    #[serde(rename = "Thông báo")]
    Announcement,
    #[serde(rename = "Tin tức")]
    News,
    #[serde(rename = "Sự kiện")]
    Event,
}

impl NotificationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Announcement => "Thông báo",
            Self::News => "Tin tức",
            Self::Event => "Sự kiện",
        }
    }
}

impl std::str::FromStr for NotificationCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Thông báo" => Ok(Self::Announcement),
            "Tin tức" => Ok(Self::News),
            "Sự kiện" => Ok(Self::Event),
            other => Err(format!("unknown notification category: {other}")),
        }
    }
}

/// Summary of a confirmed appointment embedded in its notification,
/// enough to re-show the ticket card without the full flow state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingSummary {
    pub name: String,
    pub code: String,
    pub service: String,
    pub time: String,
    pub date: String,
    pub counter: String,
}

impl From<&BookingRecord> for BookingSummary {
    fn from(record: &BookingRecord) -> Self {
        Self {
            name: record.citizen_name.clone(),
            code: record.code.clone(),
            service: record.service.clone(),
            time: record.time_slot.clone(),
            date: record.date_label(),
            counter: record.counter.clone(),
        }
    }
}

/// One entry of the notification feed. Appended by the booking flow and the
/// seeded ward announcements; mutated only by mark-as-read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationItem {
    pub id: u64,
    pub title: String,
    pub summary: String,
    /// Display timestamp, `HH:MM - dd/mm/yyyy`.
    pub timestamp: String,
    pub category: NotificationCategory,
    pub is_read: bool,
    #[serde(default)]
    pub is_important: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub is_booking: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking: Option<BookingSummary>,
}
