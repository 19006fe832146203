use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed reminder offsets before a confirmed booking's start.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "reminder_kind")]
pub enum ReminderKind {
    #[sqlx(rename = "24h")]
    #[serde(rename = "24h")]
    Hours24,
    #[sqlx(rename = "2h")]
    #[serde(rename = "2h")]
    Hours2,
}

impl ReminderKind {
    pub const ALL: [ReminderKind; 2] = [ReminderKind::Hours24, ReminderKind::Hours2];

    pub fn offset(self) -> Duration {
        match self {
            ReminderKind::Hours24 => Duration::hours(24),
            ReminderKind::Hours2 => Duration::hours(2),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReminderKind::Hours24 => "24h",
            ReminderKind::Hours2 => "2h",
        }
    }
}

impl fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Future notification tied to one booking, delivered at most once.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScheduledReminder {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub remind_at: DateTime<Utc>,
    pub kind: ReminderKind,
    pub sent: bool,
}

/// Remind-at instants strictly in the future for a booking starting at
/// `start_at`. A confirmation less than 2 hours out yields nothing; one
/// between 2 and 24 hours out yields only the 2-hour reminder.
pub fn plan_reminders(
    start_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Vec<(ReminderKind, DateTime<Utc>)> {
    ReminderKind::ALL
        .iter()
        .filter_map(|kind| {
            let remind_at = start_at - kind.offset();
            (remind_at > now).then_some((*kind, remind_at))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, h, m, 0).unwrap()
    }

    #[test]
    fn test_far_future_booking_gets_both_reminders() {
        let start = Utc.with_ymd_and_hms(2024, 3, 11, 14, 0, 0).unwrap();
        let plan = plan_reminders(start, at(12, 0));
        assert_eq!(
            plan,
            vec![
                (ReminderKind::Hours24, at(14, 0)),
                (ReminderKind::Hours2, Utc.with_ymd_and_hms(2024, 3, 11, 12, 0, 0).unwrap()),
            ]
        );
    }

    #[test]
    fn test_booking_within_a_day_gets_only_short_reminder() {
        let start = at(18, 0);
        let plan = plan_reminders(start, at(12, 0));
        assert_eq!(plan, vec![(ReminderKind::Hours2, at(16, 0))]);
    }

    #[test]
    fn test_booking_within_two_hours_gets_none() {
        let start = at(13, 0);
        assert!(plan_reminders(start, at(12, 0)).is_empty());
    }

    #[test]
    fn test_remind_at_equal_to_now_is_excluded() {
        let start = at(14, 0);
        // 2h reminder would land exactly at `now`; "strictly after" drops it.
        assert!(plan_reminders(start, at(12, 0)).is_empty());
    }
}
