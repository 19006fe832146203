//! Availability engine: offerable start times for one service on one date.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use uuid::Uuid;

use reserva_core::slots;
use reserva_core::AppError;
use reserva_db::{
    AvailabilityRuleRepository, BlackoutDateRepository, BookingRepository, OrganizationRepository,
    ServiceRepository,
};

/// Read-only computation over schedule rules, blackouts, and existing
/// bookings. The result is advisory: the uniqueness constraint checked at
/// booking creation is the authoritative conflict defense, so a slot returned
/// here can still be lost to a concurrent writer.
#[derive(Clone)]
pub struct AvailabilityEngine {
    organizations: OrganizationRepository,
    services: ServiceRepository,
    rules: AvailabilityRuleRepository,
    blackouts: BlackoutDateRepository,
    bookings: BookingRepository,
}

impl AvailabilityEngine {
    pub fn new(
        organizations: OrganizationRepository,
        services: ServiceRepository,
        rules: AvailabilityRuleRepository,
        blackouts: BlackoutDateRepository,
        bookings: BookingRepository,
    ) -> Self {
        Self {
            organizations,
            services,
            rules,
            blackouts,
            bookings,
        }
    }

    /// Ordered free start instants for `date`. "No availability" is a normal
    /// outcome: a missing organization, or a service that is missing, foreign,
    /// or inactive, yields an empty sequence rather than an error.
    #[tracing::instrument(skip(self), fields(%organization_id, %service_id, %date))]
    pub async fn compute_free_slots(
        &self,
        organization_id: Uuid,
        service_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<DateTime<Utc>>, AppError> {
        let Some(org) = self.organizations.get_by_id(organization_id).await? else {
            return Ok(Vec::new());
        };
        let tz: Tz = org.timezone.parse().map_err(|_| {
            AppError::InvalidInput(format!(
                "organization timezone is not a valid IANA name: {}",
                org.timezone
            ))
        })?;

        let service = self
            .services
            .get_by_id(service_id)
            .await?
            .filter(|s| s.organization_id == organization_id && s.is_active);
        let Some(service) = service else {
            return Ok(Vec::new());
        };

        let Some((day_start, day_end)) = slots::day_window(date, tz) else {
            return Ok(Vec::new());
        };

        let rules = self.rules.list_for_org(organization_id).await?;
        let blackouts = self
            .blackouts
            .list_intersecting(organization_id, day_start, day_end)
            .await?;
        let occupied: Vec<(DateTime<Utc>, DateTime<Utc>)> = self
            .bookings
            .list_active_in_range(organization_id, day_start, day_end)
            .await?
            .into_iter()
            .map(|b| (b.start_at, b.end_at))
            .collect();

        Ok(slots::compute_free_slots(
            date,
            tz,
            Utc::now(),
            service.duration_minutes,
            &rules,
            &blackouts,
            &occupied,
        ))
    }
}
