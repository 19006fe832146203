//! Reserva data access layer
//!
//! PostgreSQL repositories for the booking core, one per entity. Repositories
//! return domain models from `reserva-core` and surface storage failures
//! through the core error taxonomy; in particular, a unique-violation on
//! booking insert becomes `AppError::Conflict`.

pub mod db;

pub use db::{
    connect, run_migrations, AvailabilityRuleRepository, BlackoutDateRepository,
    BookingRepository, OrganizationAdminRepository, OrganizationRepository,
    ScheduledReminderRepository, ServiceRepository, SubscriptionRepository,
};
