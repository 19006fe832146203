//! Subscription entitlement gate.

use chrono::Utc;
use uuid::Uuid;

use reserva_core::AppError;
use reserva_db::SubscriptionRepository;

/// Pure read: whether an organization's entitlement window is currently
/// active. Absence of a subscription row means "not entitled".
#[derive(Clone)]
pub struct SubscriptionGate {
    subscriptions: SubscriptionRepository,
}

impl SubscriptionGate {
    pub fn new(subscriptions: SubscriptionRepository) -> Self {
        Self { subscriptions }
    }

    #[tracing::instrument(skip(self), fields(%organization_id))]
    pub async fn is_entitled(&self, organization_id: Uuid) -> Result<bool, AppError> {
        let now = Utc::now();
        Ok(self
            .subscriptions
            .get_by_org(organization_id)
            .await?
            .map(|s| s.is_entitled_at(now))
            .unwrap_or(false))
    }
}
