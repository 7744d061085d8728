pub mod booking;
pub mod chat;
pub mod notification;
pub mod profile;

pub use booking::{BookingDraft, BookingRecord, BookingStep};
pub use chat::{ChatMessage, ChatRole};
pub use notification::{NotificationCategory, NotificationItem};
pub use profile::CitizenProfile;
