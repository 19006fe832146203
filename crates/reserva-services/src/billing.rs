//! Manual subscription activation. Payment-provider integration stays
//! outside this core; an operator activates a plan for a number of days.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use reserva_core::models::{Subscription, SubscriptionPlan, SubscriptionStatus};
use reserva_core::AppError;
use reserva_db::{OrganizationRepository, SubscriptionRepository};

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionSummary {
    pub plan: SubscriptionPlan,
    pub status: SubscriptionStatus,
    pub current_period_end: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Clone)]
pub struct BillingService {
    organizations: OrganizationRepository,
    subscriptions: SubscriptionRepository,
}

impl BillingService {
    pub fn new(
        organizations: OrganizationRepository,
        subscriptions: SubscriptionRepository,
    ) -> Self {
        Self {
            organizations,
            subscriptions,
        }
    }

    /// Start (or replace) an ACTIVE billing period of `days` from now.
    #[tracing::instrument(skip(self), fields(%organization_id, ?plan, days))]
    pub async fn activate_plan_manual(
        &self,
        organization_id: Uuid,
        plan: SubscriptionPlan,
        days: i64,
    ) -> Result<Subscription, AppError> {
        if days <= 0 {
            return Err(AppError::InvalidInput(
                "billing period must be at least one day".to_string(),
            ));
        }
        self.organizations
            .get_by_id(organization_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("organization {}", organization_id)))?;

        let now = Utc::now();
        let subscription = self
            .subscriptions
            .upsert(
                organization_id,
                plan,
                SubscriptionStatus::Active,
                now,
                now + Duration::days(days),
            )
            .await?;
        tracing::info!(
            subscription_id = %subscription.id,
            period_end = %subscription.current_period_end,
            "subscription activated"
        );
        Ok(subscription)
    }

    /// Plan, status, period end and the computed entitlement flag; None when
    /// the organization never had a subscription.
    #[tracing::instrument(skip(self), fields(%organization_id))]
    pub async fn subscription_summary(
        &self,
        organization_id: Uuid,
    ) -> Result<Option<SubscriptionSummary>, AppError> {
        let now = Utc::now();
        Ok(self
            .subscriptions
            .get_by_org(organization_id)
            .await?
            .map(|s| SubscriptionSummary {
                plan: s.plan,
                status: s.status,
                current_period_end: s.current_period_end,
                is_active: s.is_entitled_at(now),
            }))
    }
}
