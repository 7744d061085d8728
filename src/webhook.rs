//! Best-effort booking announcement sink.
//!
//! The product rule: the citizen's booking is confirmed client-side the
//! moment local validation passes — the webhook POST must never block or
//! fail that. The sink is fire-and-forget, but failures are counted and
//! logged rather than silently vanishing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::booking::{BookingDraft, BookingRecord};

/// The JSON body POSTed to the ward's intake webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingAnnouncement {
    pub code: String,
    pub service: String,
    pub counter: String,
    pub date: String,
    pub time_slot: String,
    pub citizen_name: String,
    pub national_id: String,
    pub phone: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub note: String,
    /// ISO-8601 submission timestamp.
    pub submitted_at: String,
}

impl BookingAnnouncement {
    pub fn new(record: &BookingRecord, draft: &BookingDraft, submitted_at: DateTime<Utc>) -> Self {
        Self {
            code: record.code.clone(),
            service: record.service.clone(),
            counter: record.counter.clone(),
            date: record.date.to_string(),
            time_slot: record.time_slot.clone(),
            citizen_name: record.citizen_name.clone(),
            national_id: record.national_id.clone(),
            phone: draft.phone.clone(),
            email: draft.email.clone(),
            note: draft.note.clone(),
            submitted_at: submitted_at.to_rfc3339(),
        }
    }
}

/// Where completed bookings are announced. Implementations must never block
/// the caller and never surface failure.
pub trait BookingSink: Send + Sync {
    fn dispatch(&self, announcement: BookingAnnouncement);

    /// How many dispatches are known to have failed so far.
    fn failures(&self) -> u64;
}

// ═══════════════════════════════════════════════════════════
// HTTP sink
// ═══════════════════════════════════════════════════════════

/// POSTs announcements from a background task. No retries; a non-2xx
/// response or transport error bumps the failure counter and is logged.
pub struct WebhookSink {
    endpoint: String,
    client: reqwest::Client,
    failures: Arc<AtomicU64>,
}

impl WebhookSink {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
            failures: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl BookingSink for WebhookSink {
    fn dispatch(&self, announcement: BookingAnnouncement) {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let failures = Arc::clone(&self.failures);
        let code = announcement.code.clone();

        tokio::spawn(async move {
            let result = client.post(&endpoint).json(&announcement).send().await;
            match result {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!(code, "Booking webhook delivered");
                }
                Ok(response) => {
                    failures.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(
                        code,
                        status = %response.status(),
                        "Booking webhook rejected"
                    );
                }
                Err(e) => {
                    failures.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(code, error = %e, "Booking webhook unreachable");
                }
            }
        });
    }

    fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}

// ═══════════════════════════════════════════════════════════
// Null + recording sinks
// ═══════════════════════════════════════════════════════════

/// Used when no webhook endpoint is configured.
pub struct NullSink;

impl BookingSink for NullSink {
    fn dispatch(&self, announcement: BookingAnnouncement) {
        tracing::debug!(code = announcement.code, "No booking webhook configured");
    }

    fn failures(&self) -> u64 {
        0
    }
}

/// Captures dispatched announcements for assertions.
#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<BookingAnnouncement>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<BookingAnnouncement> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl BookingSink for RecordingSink {
    fn dispatch(&self, announcement: BookingAnnouncement) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(announcement);
        }
    }

    fn failures(&self) -> u64 {
        0
    }
}
