//! Reserva Service Layer
//!
//! This crate hosts the booking & availability core as services composed from
//! the repositories in `reserva-db`: availability computation, the booking
//! lifecycle with its conflict guarantee, reminder scheduling and dispatch,
//! and the subscription entitlement gate. External collaborators plug in
//! through the `Notifier` and `AdminDirectory` traits; transports stay out.

pub mod availability;
pub mod billing;
pub mod booking;
pub mod calendar;
pub mod reminder;
pub mod subscription;

pub use availability::AvailabilityEngine;
pub use billing::{BillingService, SubscriptionSummary};
pub use booking::{AdminDirectory, BookingLedger, DbAdminDirectory};
pub use calendar::CalendarFeed;
pub use reminder::{Notifier, ReminderScheduler};
pub use subscription::SubscriptionGate;
