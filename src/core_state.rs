//! Shared application state behind every transport.
//!
//! `CoreState` owns the notification feed, the single active booking
//! session, the assistant service, and the injected store/sink
//! collaborators. Wrapped in `Arc` at startup; `RwLock` guards the pieces
//! the HTTP handlers touch concurrently.

use std::sync::{Arc, RwLock};

use chrono::{NaiveDateTime, Utc};

use crate::assistant::backend::OfflineBackend;
use crate::assistant::{AssistantService, ChatBackend, ChatError, GeminiClient};
use crate::booking::flow::{BookingFlow, FlowError};
use crate::config;
use crate::language::Language;
use crate::models::booking::{BookingDraft, BookingRecord, BookingStep};
use crate::models::notification::NotificationItem;
use crate::models::profile::CitizenProfile;
use crate::notifications::NotificationCenter;
use crate::profile_store::{keys, load_profile, JsonFileStore, ProfileStore, StoreError};
use crate::webhook::{BookingAnnouncement, BookingSink, NullSink, WebhookSink};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("No booking session in progress")]
    NoActiveBooking,
    #[error(transparent)]
    Flow(#[from] FlowError),
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct CoreState {
    notifications: RwLock<NotificationCenter>,
    booking: RwLock<Option<BookingFlow>>,
    assistant: AssistantService,
    store: Arc<dyn ProfileStore>,
    sink: Arc<dyn BookingSink>,
}

impl CoreState {
    /// Production wiring: file-backed store, webhook sink when configured,
    /// hosted AI when an API key is present.
    pub fn new() -> Result<Self, StoreError> {
        let store: Arc<dyn ProfileStore> =
            Arc::new(JsonFileStore::open(config::profile_store_path())?);

        let sink: Arc<dyn BookingSink> = match std::env::var(config::BOOKING_WEBHOOK_ENV) {
            Ok(endpoint) if !endpoint.is_empty() => Arc::new(WebhookSink::new(endpoint)),
            _ => Arc::new(NullSink),
        };

        let backend: Arc<dyn ChatBackend> = match GeminiClient::from_env() {
            Ok(client) => Arc::new(client),
            Err(e) => {
                tracing::warn!(error = %e, "Assistant runs offline (fallback replies only)");
                Arc::new(OfflineBackend)
            }
        };

        Ok(Self::with_parts(store, sink, backend))
    }

    /// Explicit wiring — tests inject memory store, recording sink, and a
    /// scripted backend here.
    pub fn with_parts(
        store: Arc<dyn ProfileStore>,
        sink: Arc<dyn BookingSink>,
        backend: Arc<dyn ChatBackend>,
    ) -> Self {
        // Restore persisted personalization
        let language = store
            .get(keys::CHAT_LANGUAGE)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();
        let avatar = store
            .get(keys::CHAT_AVATAR)
            .unwrap_or_else(|| crate::assistant::DEFAULT_AVATAR.to_string());

        Self {
            notifications: RwLock::new(NotificationCenter::with_seed()),
            booking: RwLock::new(None),
            assistant: AssistantService::with_persona(backend, language, &avatar),
            store,
            sink,
        }
    }

    pub fn language(&self) -> Language {
        self.assistant.snapshot().language
    }

    // ── Booking session ─────────────────────────────────────

    /// Begin a fresh booking session, replacing any abandoned one.
    pub fn start_booking(&self, now: NaiveDateTime) -> Result<(BookingStep, BookingDraft), CoreError> {
        let mut guard = self.booking.write().map_err(|_| CoreError::LockPoisoned)?;
        let flow = BookingFlow::start(now.date());
        let view = (flow.step(), flow.draft().clone());
        *guard = Some(flow);
        Ok(view)
    }

    /// Run one operation against the active flow.
    pub fn with_booking<T>(
        &self,
        op: impl FnOnce(&mut BookingFlow) -> Result<T, FlowError>,
    ) -> Result<T, CoreError> {
        let mut guard = self.booking.write().map_err(|_| CoreError::LockPoisoned)?;
        let flow = guard.as_mut().ok_or(CoreError::NoActiveBooking)?;
        op(flow).map_err(CoreError::from)
    }

    /// Current step + draft, if a session is active.
    pub fn booking_view(&self) -> Result<Option<(BookingStep, BookingDraft)>, CoreError> {
        let guard = self.booking.read().map_err(|_| CoreError::LockPoisoned)?;
        Ok(guard
            .as_ref()
            .map(|flow| (flow.step(), flow.draft().clone())))
    }

    /// The confirmed record of the active session, once completed.
    pub fn booking_record(&self) -> Result<BookingRecord, CoreError> {
        let guard = self.booking.read().map_err(|_| CoreError::LockPoisoned)?;
        guard
            .as_ref()
            .and_then(|flow| flow.record().cloned())
            .ok_or(CoreError::NoActiveBooking)
    }

    /// Complete the active booking: validate, freeze the record, then run
    /// the completion side effects (notification, webhook, prefill).
    pub fn confirm_booking(&self, now: NaiveDateTime) -> Result<BookingRecord, CoreError> {
        let (record, draft) = {
            let mut guard = self.booking.write().map_err(|_| CoreError::LockPoisoned)?;
            let flow = guard.as_mut().ok_or(CoreError::NoActiveBooking)?;
            let record = flow.confirm(&mut rand::thread_rng())?;
            (record, flow.draft().clone())
        };

        let language = self.language();
        if let Ok(mut notifications) = self.notifications.write() {
            notifications.push_booking(&record, now, language);
        }

        self.sink
            .dispatch(BookingAnnouncement::new(&record, &draft, Utc::now()));

        // Best-effort prefill for the next visit; a failing store must not
        // un-confirm the booking.
        if let Err(e) = self.persist_prefill(&draft) {
            tracing::warn!(error = %e, "Could not persist booking prefill");
        }

        tracing::info!(code = %record.code, counter = %record.counter, "Booking confirmed");
        Ok(record)
    }

    fn persist_prefill(&self, draft: &BookingDraft) -> Result<(), StoreError> {
        self.store.set(keys::PHONE, &draft.phone)?;
        if !draft.email.is_empty() {
            self.store.set(keys::EMAIL, &draft.email)?;
        }
        Ok(())
    }

    /// Drop the booking session (the "return to home" exit).
    pub fn finish_booking(&self) -> Result<(), CoreError> {
        let mut guard = self.booking.write().map_err(|_| CoreError::LockPoisoned)?;
        *guard = None;
        Ok(())
    }

    // ── Notifications ───────────────────────────────────────

    pub fn notifications(&self) -> Result<Vec<NotificationItem>, CoreError> {
        let guard = self
            .notifications
            .read()
            .map_err(|_| CoreError::LockPoisoned)?;
        Ok(guard.items().to_vec())
    }

    pub fn unread_notifications(&self) -> Result<usize, CoreError> {
        let guard = self
            .notifications
            .read()
            .map_err(|_| CoreError::LockPoisoned)?;
        Ok(guard.unread_count())
    }

    pub fn mark_notification_read(&self, id: u64) -> Result<bool, CoreError> {
        let mut guard = self
            .notifications
            .write()
            .map_err(|_| CoreError::LockPoisoned)?;
        Ok(guard.mark_read(id))
    }

    // ── Citizen profile ─────────────────────────────────────

    /// Persist the identification form. Validation happens at the endpoint.
    pub fn login(&self, profile: &CitizenProfile) -> Result<(), CoreError> {
        self.store.set(keys::CITIZEN_NAME, profile.name.trim())?;
        self.store.set(keys::NATIONAL_ID, &profile.national_id)?;
        if !profile.email.is_empty() {
            self.store.set(keys::EMAIL, profile.email.trim())?;
        }
        tracing::info!("Citizen identified on this device");
        Ok(())
    }

    pub fn logout(&self) -> Result<(), CoreError> {
        self.store.remove(keys::CITIZEN_NAME)?;
        self.store.remove(keys::NATIONAL_ID)?;
        self.store.remove(keys::PHONE)?;
        self.store.remove(keys::EMAIL)?;
        Ok(())
    }

    pub fn profile(&self) -> CitizenProfile {
        load_profile(self.store.as_ref())
    }

    // ── Assistant ───────────────────────────────────────────

    pub fn assistant(&self) -> &AssistantService {
        &self.assistant
    }

    /// Update avatar/language and persist the choice.
    pub fn set_chat_persona(
        &self,
        avatar: Option<&str>,
        language: Option<Language>,
    ) -> Result<(), CoreError> {
        self.assistant.set_persona(avatar, language)?;
        if let Some(avatar) = avatar {
            self.store.set(keys::CHAT_AVATAR, avatar)?;
        }
        if let Some(language) = language {
            self.store.set(keys::CHAT_LANGUAGE, language.as_str())?;
        }
        Ok(())
    }

    /// Observability for the best-effort webhook.
    pub fn webhook_failures(&self) -> u64 {
        self.sink.failures()
    }
}
