//! API endpoint handlers.
//!
//! Each module corresponds to one screen of the citizen app. Handlers
//! validate request shape and delegate to `CoreState`.

pub mod auth;
pub mod booking;
pub mod catalog;
pub mod chat;
pub mod health;
pub mod notifications;
