use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Recurring weekly availability window.
///
/// Multiple rules may target the same weekday (split morning/afternoon
/// windows); each is expanded independently.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AvailabilityRule {
    pub id: Uuid,
    pub organization_id: Uuid,
    /// 0 = Monday .. 6 = Sunday.
    pub weekday: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_step_minutes: i32,
}

/// Exception window during which no slots are offered.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BlackoutDate {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub reason: Option<String>,
}
