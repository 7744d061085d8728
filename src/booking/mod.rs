//! Appointment booking: catalog, schedule filters, the form state machine,
//! code derivation, and ticket rendering.

pub mod catalog;
pub mod code;
pub mod flow;
pub mod font;
pub mod schedule;
pub mod ticket;

pub use catalog::{counter_for_service, ALL_TIME_SLOTS, SERVICES};
pub use code::generate_code;
pub use flow::{BookingFlow, ContactDetails, FlowError};
pub use schedule::{available_dates, valid_slots_for, DEFAULT_HORIZON};
pub use ticket::{render_ticket, ticket_filename, TicketError};
