//! Read-only calendar feed, gated by the organization's calendar token.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use reserva_core::models::{Booking, BookingStatus, Organization};
use reserva_core::AppError;
use reserva_db::{BookingRepository, OrganizationRepository, ServiceRepository};

#[derive(Clone)]
pub struct CalendarFeed {
    organizations: OrganizationRepository,
    services: ServiceRepository,
    bookings: BookingRepository,
}

impl CalendarFeed {
    pub fn new(
        organizations: OrganizationRepository,
        services: ServiceRepository,
        bookings: BookingRepository,
    ) -> Self {
        Self {
            organizations,
            services,
            bookings,
        }
    }

    /// Token lookup; the id must match the token's owner. A mismatch is
    /// indistinguishable from an unknown feed.
    #[tracing::instrument(skip(self, token), fields(%organization_id))]
    pub async fn resolve(
        &self,
        organization_id: Uuid,
        token: &str,
    ) -> Result<Organization, AppError> {
        self.organizations
            .get_by_calendar_token(token)
            .await?
            .filter(|org| org.id == organization_id)
            .ok_or_else(|| AppError::NotFound("calendar feed".to_string()))
    }

    /// Non-canceled bookings from `from` on, ordered by start.
    #[tracing::instrument(skip(self), fields(%organization_id))]
    pub async fn list_active_bookings(
        &self,
        organization_id: Uuid,
        from: DateTime<Utc>,
    ) -> Result<Vec<Booking>, AppError> {
        self.bookings.list_active_from(organization_id, from).await
    }

    /// Render the feed as a minimal iCalendar document.
    #[tracing::instrument(skip(self, bookings), fields(organization_id = %org.id))]
    pub async fn render_ics(
        &self,
        org: &Organization,
        bookings: &[Booking],
    ) -> Result<String, AppError> {
        let service_names: HashMap<Uuid, String> = self
            .services
            .list_for_org(org.id, false)
            .await?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();
        Ok(ics_content(bookings, &service_names))
    }
}

fn ics_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%dT%H%M%SZ").to_string()
}

fn ics_content(bookings: &[Booking], service_names: &HashMap<Uuid, String>) -> String {
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "PRODID:-//Reserva//Calendar//EN".to_string(),
        "CALSCALE:GREGORIAN".to_string(),
    ];
    for booking in bookings {
        if booking.status == BookingStatus::Canceled {
            continue;
        }
        let service = service_names
            .get(&booking.service_id)
            .map(String::as_str)
            .unwrap_or("Booking");
        lines.extend([
            "BEGIN:VEVENT".to_string(),
            format!("UID:booking-{}@reserva", booking.id),
            format!("DTSTART:{}", ics_timestamp(booking.start_at)),
            format!("DTEND:{}", ics_timestamp(booking.end_at)),
            format!("SUMMARY:{} - {}", booking.client_name, service),
            "END:VEVENT".to_string(),
        ]);
    }
    lines.push("END:VCALENDAR".to_string());
    lines.join("\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn booking(status: BookingStatus, service_id: Uuid) -> Booking {
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 4, 0, 0).unwrap();
        Booking {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            service_id,
            client_id: 42,
            start_at: start,
            end_at: start + chrono::Duration::hours(1),
            status,
            client_name: "Aziza".to_string(),
            client_phone: None,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn test_renders_one_event_per_non_canceled_booking() {
        let service_id = Uuid::new_v4();
        let names = HashMap::from([(service_id, "Consultation".to_string())]);
        let bookings = vec![
            booking(BookingStatus::Confirmed, service_id),
            booking(BookingStatus::Canceled, service_id),
        ];
        let ics = ics_content(&bookings, &names);
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 1);
        assert!(ics.starts_with("BEGIN:VCALENDAR"));
        assert!(ics.ends_with("END:VCALENDAR"));
        assert!(ics.contains("DTSTART:20240304T040000Z"));
        assert!(ics.contains("SUMMARY:Aziza - Consultation"));
    }

    #[test]
    fn test_unknown_service_falls_back_to_generic_summary() {
        let ics = ics_content(
            &[booking(BookingStatus::Pending, Uuid::new_v4())],
            &HashMap::new(),
        );
        assert!(ics.contains("SUMMARY:Aziza - Booking"));
    }
}
