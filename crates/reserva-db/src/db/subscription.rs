//! Subscription repository: at most one entitlement row per organization.

use chrono::{DateTime, Utc};
use reserva_core::models::{Subscription, SubscriptionPlan, SubscriptionStatus};
use reserva_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

#[derive(Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "subscriptions"))]
    pub async fn get_by_org(
        &self,
        organization_id: Uuid,
    ) -> Result<Option<Subscription>, AppError> {
        let subscription: Option<Subscription> = sqlx::query_as::<Postgres, Subscription>(
            "SELECT * FROM subscriptions WHERE organization_id = $1",
        )
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(subscription)
    }

    /// Create the organization's subscription or replace its plan and period.
    #[tracing::instrument(skip(self), fields(db.table = "subscriptions"))]
    pub async fn upsert(
        &self,
        organization_id: Uuid,
        plan: SubscriptionPlan,
        status: SubscriptionStatus,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
    ) -> Result<Subscription, AppError> {
        let subscription: Subscription = sqlx::query_as::<Postgres, Subscription>(
            r#"
            INSERT INTO subscriptions
                (id, organization_id, plan, status, current_period_start, current_period_end)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (organization_id) DO UPDATE SET
                plan = EXCLUDED.plan,
                status = EXCLUDED.status,
                current_period_start = EXCLUDED.current_period_start,
                current_period_end = EXCLUDED.current_period_end
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(organization_id)
        .bind(plan)
        .bind(status)
        .bind(period_start)
        .bind(period_end)
        .fetch_one(&self.pool)
        .await?;
        Ok(subscription)
    }
}
