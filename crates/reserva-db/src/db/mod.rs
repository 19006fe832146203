//! Database repositories for the booking core
//!
//! Each repository owns the queries for one entity and keeps every statement
//! scoped to its organization where tenancy applies.

pub mod admin;
pub mod availability;
pub mod booking;
pub mod organization;
pub mod pool;
pub mod reminder;
pub mod service;
pub mod subscription;

pub use admin::OrganizationAdminRepository;
pub use availability::{AvailabilityRuleRepository, BlackoutDateRepository};
pub use booking::BookingRepository;
pub use organization::OrganizationRepository;
pub use pool::{connect, run_migrations};
pub use reminder::ScheduledReminderRepository;
pub use service::ServiceRepository;
pub use subscription::SubscriptionRepository;
