use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Booking status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Canceled,
}

impl BookingStatus {
    /// Transition table: PENDING → {CONFIRMED, CANCELED}, CONFIRMED → CANCELED.
    /// CANCELED is terminal; there is no re-open transition.
    pub fn can_transition(self, to: BookingStatus) -> bool {
        matches!(
            (self, to),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Canceled)
                | (BookingStatus::Confirmed, BookingStatus::Canceled)
        )
    }

    /// PENDING and CONFIRMED bookings occupy their slot.
    pub fn is_active(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Canceled => "CANCELED",
        };
        f.write_str(s)
    }
}

/// Client reservation for a service slot.
///
/// `end_at` is fixed at creation time to `start_at` + the service duration.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub service_id: Uuid,
    /// Chat-platform user id of the client who placed the booking.
    pub client_id: i64,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: BookingStatus,
    pub client_name: String,
    pub client_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-organization booking counts over a recent window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingStats {
    pub total: i64,
    pub pending: i64,
    pub confirmed: i64,
    pub canceled: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_transitions() {
        assert!(BookingStatus::Pending.can_transition(BookingStatus::Confirmed));
        assert!(BookingStatus::Pending.can_transition(BookingStatus::Canceled));
        assert!(!BookingStatus::Pending.can_transition(BookingStatus::Pending));
    }

    #[test]
    fn test_confirmed_transitions() {
        assert!(BookingStatus::Confirmed.can_transition(BookingStatus::Canceled));
        assert!(!BookingStatus::Confirmed.can_transition(BookingStatus::Confirmed));
        assert!(!BookingStatus::Confirmed.can_transition(BookingStatus::Pending));
    }

    #[test]
    fn test_canceled_is_terminal() {
        assert!(!BookingStatus::Canceled.can_transition(BookingStatus::Pending));
        assert!(!BookingStatus::Canceled.can_transition(BookingStatus::Confirmed));
        assert!(!BookingStatus::Canceled.can_transition(BookingStatus::Canceled));
    }

    #[test]
    fn test_active_statuses_occupy_slots() {
        assert!(BookingStatus::Pending.is_active());
        assert!(BookingStatus::Confirmed.is_active());
        assert!(!BookingStatus::Canceled.is_active());
    }
}
