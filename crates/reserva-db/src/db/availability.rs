//! Availability rule and blackout repositories.

use chrono::{DateTime, NaiveTime, Utc};
use reserva_core::models::{AvailabilityRule, BlackoutDate};
use reserva_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

#[derive(Clone)]
pub struct AvailabilityRuleRepository {
    pool: PgPool,
}

impl AvailabilityRuleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "availability_rules"))]
    pub async fn create(
        &self,
        organization_id: Uuid,
        weekday: i16,
        start_time: NaiveTime,
        end_time: NaiveTime,
        slot_step_minutes: i32,
    ) -> Result<AvailabilityRule, AppError> {
        if !(0..=6).contains(&weekday) {
            return Err(AppError::InvalidInput(format!(
                "weekday must be 0-6, got {}",
                weekday
            )));
        }
        if end_time <= start_time {
            return Err(AppError::InvalidInput(
                "end_time must be after start_time".to_string(),
            ));
        }
        let rule: AvailabilityRule = sqlx::query_as::<Postgres, AvailabilityRule>(
            r#"
            INSERT INTO availability_rules
                (id, organization_id, weekday, start_time, end_time, slot_step_minutes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(organization_id)
        .bind(weekday)
        .bind(start_time)
        .bind(end_time)
        .bind(slot_step_minutes)
        .fetch_one(&self.pool)
        .await?;
        Ok(rule)
    }

    #[tracing::instrument(skip(self), fields(db.table = "availability_rules"))]
    pub async fn list_for_org(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<AvailabilityRule>, AppError> {
        let rules: Vec<AvailabilityRule> = sqlx::query_as::<Postgres, AvailabilityRule>(
            r#"
            SELECT * FROM availability_rules
            WHERE organization_id = $1
            ORDER BY weekday, start_time
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rules)
    }

    #[tracing::instrument(skip(self), fields(db.table = "availability_rules", db.record_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM availability_rules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Clone)]
pub struct BlackoutDateRepository {
    pool: PgPool,
}

impl BlackoutDateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "blackout_dates"))]
    pub async fn create(
        &self,
        organization_id: Uuid,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        reason: Option<&str>,
    ) -> Result<BlackoutDate, AppError> {
        if end_at <= start_at {
            return Err(AppError::InvalidInput(
                "blackout end must be after its start".to_string(),
            ));
        }
        let blackout: BlackoutDate = sqlx::query_as::<Postgres, BlackoutDate>(
            r#"
            INSERT INTO blackout_dates (id, organization_id, start_at, end_at, reason)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(organization_id)
        .bind(start_at)
        .bind(end_at)
        .bind(reason)
        .fetch_one(&self.pool)
        .await?;
        Ok(blackout)
    }

    #[tracing::instrument(skip(self), fields(db.table = "blackout_dates"))]
    pub async fn list_for_org(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<BlackoutDate>, AppError> {
        let blackouts: Vec<BlackoutDate> = sqlx::query_as::<Postgres, BlackoutDate>(
            "SELECT * FROM blackout_dates WHERE organization_id = $1 ORDER BY start_at",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(blackouts)
    }

    /// Blackouts whose range intersects [from, until).
    #[tracing::instrument(skip(self), fields(db.table = "blackout_dates"))]
    pub async fn list_intersecting(
        &self,
        organization_id: Uuid,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<BlackoutDate>, AppError> {
        let blackouts: Vec<BlackoutDate> = sqlx::query_as::<Postgres, BlackoutDate>(
            r#"
            SELECT * FROM blackout_dates
            WHERE organization_id = $1 AND start_at < $3 AND end_at > $2
            ORDER BY start_at
            "#,
        )
        .bind(organization_id)
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;
        Ok(blackouts)
    }

    #[tracing::instrument(skip(self), fields(db.table = "blackout_dates", db.record_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM blackout_dates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
