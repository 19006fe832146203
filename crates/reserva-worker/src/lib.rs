//! Reserva background worker
//!
//! Hosts the periodic driver that drains due reminders through an injected
//! notifier, plus tracing initialization for driver processes.

pub mod dispatcher;
pub mod telemetry;

pub use dispatcher::{ReminderDispatcher, ReminderDispatcherConfig};
pub use telemetry::init_telemetry;
