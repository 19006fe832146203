use chrono::Duration;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bookable service offered by an organization.
///
/// Inactive services never appear in availability computation and cannot be
/// booked.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Service {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub duration_minutes: i32,
    /// Price in minor currency units; None when the organization hides prices.
    pub price: Option<i64>,
    pub is_active: bool,
}

impl Service {
    pub fn duration(&self) -> Duration {
        Duration::minutes(self.duration_minutes as i64)
    }
}
