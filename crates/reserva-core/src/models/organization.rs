use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Organization (tenant) entity.
///
/// Owns services, availability rules, blackouts, bookings, and at most one
/// subscription. Deleting an organization cascades to everything it owns.
/// Name and timezone are mutable; identity and calendar token are not.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    /// IANA timezone name, e.g. "Asia/Tashkent".
    pub timezone: String,
    /// Opaque token gating the read-only calendar feed.
    pub calendar_token: String,
    pub created_at: DateTime<Utc>,
}

/// Administrator membership, read by the authorization collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrganizationAdmin {
    pub id: Uuid,
    pub organization_id: Uuid,
    /// Chat-platform user id of the administrator.
    pub user_id: i64,
    pub role: String,
}
