//! The booking form state machine.
//!
//! A linear three-state flow over one mutable [`BookingDraft`]:
//! `Selection → PersonalInfo → Completed`. Each transition is guarded;
//! a failed guard leaves the flow exactly where it was. Completion derives
//! the immutable [`BookingRecord`] — side effects (notification, webhook,
//! profile prefill) belong to the owner of the flow, not the flow itself.

use chrono::{NaiveDate, NaiveDateTime};
use rand::Rng;

use crate::models::booking::{BookingDraft, BookingRecord, BookingStep};
use crate::models::profile::is_valid_national_id;

use super::catalog::{counter_for_service, is_known_service};
use super::code::generate_code;
use super::schedule::{available_dates, valid_slots_for, DEFAULT_HORIZON};

/// Why a selection or transition was refused.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("Service category is not in the catalog")]
    UnknownService,
    #[error("Date is outside the booking horizon")]
    DateUnavailable,
    #[error("Time slot is not available for the selected date")]
    SlotUnavailable,
    #[error("Select a service and a time slot first")]
    SelectionIncomplete,
    #[error("Full name is required")]
    NameRequired,
    #[error("National id must be exactly 12 digits")]
    InvalidNationalId,
    #[error("Phone number is required")]
    PhoneRequired,
    #[error("Not allowed in step {0:?}")]
    WrongStep(BookingStep),
}

/// Personal fields entered on the second screen.
#[derive(Debug, Clone, Default)]
pub struct ContactDetails {
    pub citizen_name: String,
    pub national_id: String,
    pub phone: String,
    pub email: String,
    pub note: String,
}

/// One citizen's in-progress booking session.
#[derive(Debug, Clone)]
pub struct BookingFlow {
    step: BookingStep,
    draft: BookingDraft,
    record: Option<BookingRecord>,
}

impl BookingFlow {
    /// Start a fresh session. The draft is anchored to the first selectable
    /// date of the horizon computed from `today`.
    pub fn start(today: NaiveDate) -> Self {
        let first = available_dates(today, DEFAULT_HORIZON)
            .into_iter()
            .next()
            .unwrap_or(today);
        Self {
            step: BookingStep::Selection,
            draft: BookingDraft::new(first),
            record: None,
        }
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    /// The confirmed record, once the flow reached `Completed`.
    pub fn record(&self) -> Option<&BookingRecord> {
        self.record.as_ref()
    }

    // ── Selection screen ─────────────────────────────────────

    /// Pick a service category from the catalog.
    pub fn select_service(&mut self, service: &str) -> Result<(), FlowError> {
        self.require_step(BookingStep::Selection)?;
        if !is_known_service(service) {
            return Err(FlowError::UnknownService);
        }
        self.draft.service = service.to_string();
        Ok(())
    }

    /// Pick an appointment date. Must lie inside the horizon computed from
    /// `now`. A previously chosen slot that is no longer valid for the new
    /// date is cleared.
    pub fn select_date(&mut self, date: NaiveDate, now: NaiveDateTime) -> Result<(), FlowError> {
        self.require_step(BookingStep::Selection)?;
        if !available_dates(now.date(), DEFAULT_HORIZON).contains(&date) {
            return Err(FlowError::DateUnavailable);
        }
        self.draft.date = date;
        if !self.draft.time_slot.is_empty()
            && !valid_slots_for(date, now).contains(&self.draft.time_slot.as_str())
        {
            self.draft.time_slot.clear();
        }
        Ok(())
    }

    /// Pick a time slot. Must be valid for the currently selected date.
    pub fn select_slot(&mut self, slot: &str, now: NaiveDateTime) -> Result<(), FlowError> {
        self.require_step(BookingStep::Selection)?;
        if !valid_slots_for(self.draft.date, now).contains(&slot) {
            return Err(FlowError::SlotUnavailable);
        }
        self.draft.time_slot = slot.to_string();
        Ok(())
    }

    // ── Transitions ──────────────────────────────────────────

    /// `Selection → PersonalInfo`, guarded on service + slot being chosen.
    pub fn proceed(&mut self) -> Result<(), FlowError> {
        self.require_step(BookingStep::Selection)?;
        if self.draft.service.is_empty() || self.draft.time_slot.is_empty() {
            return Err(FlowError::SelectionIncomplete);
        }
        self.step = BookingStep::PersonalInfo;
        Ok(())
    }

    /// `PersonalInfo → Selection`. Always allowed; entered fields survive.
    pub fn back(&mut self) -> Result<(), FlowError> {
        self.require_step(BookingStep::PersonalInfo)?;
        self.step = BookingStep::Selection;
        Ok(())
    }

    /// Store personal fields. Digits-only filtering of the national id
    /// mirrors the input mask; validation itself happens in [`confirm`].
    ///
    /// [`confirm`]: BookingFlow::confirm
    pub fn set_contact(&mut self, contact: ContactDetails) -> Result<(), FlowError> {
        self.require_step(BookingStep::PersonalInfo)?;
        self.draft.citizen_name = contact.citizen_name;
        self.draft.national_id = contact
            .national_id
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        self.draft.phone = contact.phone;
        self.draft.email = contact.email;
        self.draft.note = contact.note;
        Ok(())
    }

    /// `PersonalInfo → Completed`: validate the personal fields, derive the
    /// code, and freeze the record. The flow is terminal afterwards.
    pub fn confirm<R: Rng>(&mut self, rng: &mut R) -> Result<BookingRecord, FlowError> {
        self.require_step(BookingStep::PersonalInfo)?;
        if self.draft.citizen_name.trim().is_empty() {
            return Err(FlowError::NameRequired);
        }
        if !is_valid_national_id(&self.draft.national_id) {
            return Err(FlowError::InvalidNationalId);
        }
        if self.draft.phone.trim().is_empty() {
            return Err(FlowError::PhoneRequired);
        }

        let record = BookingRecord {
            code: generate_code(self.draft.date, &self.draft.time_slot, rng),
            service: self.draft.service.clone(),
            counter: counter_for_service(&self.draft.service).to_string(),
            date: self.draft.date,
            time_slot: self.draft.time_slot.clone(),
            citizen_name: self.draft.citizen_name.trim().to_string(),
            national_id: self.draft.national_id.clone(),
        };
        self.record = Some(record.clone());
        self.step = BookingStep::Completed;
        Ok(record)
    }

    fn require_step(&self, expected: BookingStep) -> Result<(), FlowError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(FlowError::WrongStep(self.step))
        }
    }
}
