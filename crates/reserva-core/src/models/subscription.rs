use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "subscription_plan", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionPlan {
    Basic,
    Pro,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "subscription_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    Active,
    PastDue,
    Canceled,
}

/// Billing entitlement for an organization; at most one per organization.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subscription {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub plan: SubscriptionPlan,
    pub status: SubscriptionStatus,
    pub current_period_start: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
}

impl Subscription {
    /// Entitlement window: active status and the billing period has not
    /// ended. Both instants are compared in UTC.
    pub fn is_entitled_at(&self, now: DateTime<Utc>) -> bool {
        self.status == SubscriptionStatus::Active && now < self.current_period_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn subscription(status: SubscriptionStatus, period_end: DateTime<Utc>) -> Subscription {
        Subscription {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            plan: SubscriptionPlan::Basic,
            status,
            current_period_start: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            current_period_end: period_end,
        }
    }

    #[test]
    fn test_active_within_period_is_entitled() {
        let end = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        assert!(subscription(SubscriptionStatus::Active, end).is_entitled_at(now));
    }

    #[test]
    fn test_period_end_is_exclusive() {
        let end = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        assert!(!subscription(SubscriptionStatus::Active, end).is_entitled_at(end));
    }

    #[test]
    fn test_non_active_status_is_not_entitled() {
        let end = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        assert!(!subscription(SubscriptionStatus::PastDue, end).is_entitled_at(now));
        assert!(!subscription(SubscriptionStatus::Canceled, end).is_entitled_at(now));
    }
}
