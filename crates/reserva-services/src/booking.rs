//! Booking ledger: reservation lifecycle and the no-double-booking guarantee.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use reserva_core::models::{Booking, BookingStatus};
use reserva_core::AppError;
use reserva_db::{BookingRepository, OrganizationAdminRepository, ServiceRepository};

use crate::reminder::ReminderScheduler;
use crate::subscription::SubscriptionGate;

/// Authorization boundary: whether a user administers an organization.
/// Owned by an external collaborator; the ledger only consumes the answer.
#[async_trait]
pub trait AdminDirectory: Send + Sync {
    async fn is_admin(&self, organization_id: Uuid, user_id: i64) -> Result<bool, AppError>;
}

/// Directory backed by the organization_admins table.
#[derive(Clone)]
pub struct DbAdminDirectory {
    admins: OrganizationAdminRepository,
}

impl DbAdminDirectory {
    pub fn new(admins: OrganizationAdminRepository) -> Self {
        Self { admins }
    }
}

#[async_trait]
impl AdminDirectory for DbAdminDirectory {
    async fn is_admin(&self, organization_id: Uuid, user_id: i64) -> Result<bool, AppError> {
        self.admins.is_admin(organization_id, user_id).await
    }
}

/// Owns the reservation lifecycle. Availability output is only an advisory
/// pre-check; the authoritative conflict defense is the storage-level unique
/// index on (organization, start) over active statuses, surfaced here as
/// `AppError::Conflict`.
#[derive(Clone)]
pub struct BookingLedger {
    bookings: BookingRepository,
    services: ServiceRepository,
    gate: SubscriptionGate,
    admins: Arc<dyn AdminDirectory>,
    reminders: ReminderScheduler,
}

impl BookingLedger {
    pub fn new(
        bookings: BookingRepository,
        services: ServiceRepository,
        gate: SubscriptionGate,
        admins: Arc<dyn AdminDirectory>,
        reminders: ReminderScheduler,
    ) -> Self {
        Self {
            bookings,
            services,
            gate,
            admins,
            reminders,
        }
    }

    /// Create a PENDING reservation. Entitlement is checked here and only
    /// here; later transitions deliberately do not re-check it. On `Conflict`
    /// the caller should re-query availability, not retry the same slot.
    #[tracing::instrument(skip(self, client_name, client_phone), fields(%organization_id, %service_id, %start_at))]
    pub async fn create(
        &self,
        organization_id: Uuid,
        service_id: Uuid,
        client_id: i64,
        start_at: DateTime<Utc>,
        client_name: &str,
        client_phone: Option<&str>,
    ) -> Result<Booking, AppError> {
        if !self.gate.is_entitled(organization_id).await? {
            return Err(AppError::NotEntitled(
                "organization has no active subscription".to_string(),
            ));
        }

        let service = self
            .services
            .get_by_id(service_id)
            .await?
            .filter(|s| s.organization_id == organization_id)
            .ok_or_else(|| AppError::NotFound(format!("service {}", service_id)))?;
        if !service.is_active {
            return Err(AppError::InactiveResource(format!("service {}", service_id)));
        }

        let end_at = start_at + service.duration();
        let booking = self
            .bookings
            .create(
                organization_id,
                service_id,
                client_id,
                start_at,
                end_at,
                client_name,
                client_phone,
            )
            .await?;
        tracing::info!(booking_id = %booking.id, "booking created");
        Ok(booking)
    }

    /// Confirm a PENDING booking and register its reminders. A reminder
    /// scheduling failure is logged and never blocks the confirmation.
    #[tracing::instrument(skip(self), fields(%booking_id, %organization_id))]
    pub async fn confirm(
        &self,
        booking_id: Uuid,
        organization_id: Uuid,
        acting_admin: i64,
    ) -> Result<Booking, AppError> {
        let booking = self
            .transition_as_admin(
                booking_id,
                organization_id,
                acting_admin,
                BookingStatus::Confirmed,
            )
            .await?;
        if let Err(err) = self.reminders.schedule_for_booking(&booking).await {
            tracing::warn!(booking_id = %booking.id, error = %err, "failed to schedule reminders");
        }
        Ok(booking)
    }

    /// Reject a PENDING booking, freeing its slot.
    #[tracing::instrument(skip(self), fields(%booking_id, %organization_id))]
    pub async fn reject(
        &self,
        booking_id: Uuid,
        organization_id: Uuid,
        acting_admin: i64,
    ) -> Result<Booking, AppError> {
        self.transition_as_admin(
            booking_id,
            organization_id,
            acting_admin,
            BookingStatus::Canceled,
        )
        .await
    }

    async fn transition_as_admin(
        &self,
        booking_id: Uuid,
        organization_id: Uuid,
        acting_admin: i64,
        to: BookingStatus,
    ) -> Result<Booking, AppError> {
        if !self.admins.is_admin(organization_id, acting_admin).await? {
            return Err(AppError::Unauthorized(format!(
                "user {} is not an administrator of this organization",
                acting_admin
            )));
        }

        let booking = self
            .bookings
            .get_by_id(booking_id)
            .await?
            .filter(|b| b.organization_id == organization_id)
            .ok_or_else(|| AppError::NotFound(format!("booking {}", booking_id)))?;
        if booking.status != BookingStatus::Pending {
            return Err(AppError::InvalidTransition(format!(
                "booking is {}, expected PENDING",
                booking.status
            )));
        }

        let updated = self
            .bookings
            .update_status_if(booking_id, BookingStatus::Pending, to)
            .await?
            .ok_or_else(|| {
                AppError::InvalidTransition("booking is no longer PENDING".to_string())
            })?;
        tracing::info!(booking_id = %updated.id, status = %updated.status, "booking transitioned");
        Ok(updated)
    }

    /// Client-initiated cancellation; requires ownership. The freed slot is
    /// visible to the very next availability query.
    #[tracing::instrument(skip(self), fields(%booking_id, client_id))]
    pub async fn cancel(&self, booking_id: Uuid, client_id: i64) -> Result<Booking, AppError> {
        let booking = self
            .bookings
            .get_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("booking {}", booking_id)))?;
        if booking.client_id != client_id {
            return Err(AppError::Unauthorized(
                "booking belongs to another client".to_string(),
            ));
        }
        if booking.status == BookingStatus::Canceled {
            return Err(AppError::InvalidTransition(
                "booking is already CANCELED".to_string(),
            ));
        }

        let updated = self
            .bookings
            .update_status_if(booking_id, booking.status, BookingStatus::Canceled)
            .await?
            .ok_or_else(|| {
                AppError::InvalidTransition("booking status changed concurrently".to_string())
            })?;
        tracing::info!(booking_id = %updated.id, "booking canceled by client");
        Ok(updated)
    }
}
