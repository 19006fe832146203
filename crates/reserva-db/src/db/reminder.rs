//! Scheduled reminder repository.
//!
//! `mark_sent` is the sole de-duplication mechanism for reminder delivery:
//! it flips the flag only if still unsent and reports whether this caller won,
//! which is what makes overlapping dispatch passes safe.

use chrono::{DateTime, Utc};
use reserva_core::models::{ReminderKind, ScheduledReminder};
use reserva_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

#[derive(Clone)]
pub struct ScheduledReminderRepository {
    pool: PgPool,
}

impl ScheduledReminderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "scheduled_reminders"))]
    pub async fn create(
        &self,
        booking_id: Uuid,
        remind_at: DateTime<Utc>,
        kind: ReminderKind,
    ) -> Result<ScheduledReminder, AppError> {
        let reminder: ScheduledReminder = sqlx::query_as::<Postgres, ScheduledReminder>(
            r#"
            INSERT INTO scheduled_reminders (id, booking_id, remind_at, kind)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(booking_id)
        .bind(remind_at)
        .bind(kind)
        .fetch_one(&self.pool)
        .await?;
        Ok(reminder)
    }

    /// Unsent reminders due at or before `now`, oldest first.
    #[tracing::instrument(skip(self), fields(db.table = "scheduled_reminders"))]
    pub async fn list_due(&self, now: DateTime<Utc>) -> Result<Vec<ScheduledReminder>, AppError> {
        let reminders: Vec<ScheduledReminder> = sqlx::query_as::<Postgres, ScheduledReminder>(
            r#"
            SELECT * FROM scheduled_reminders
            WHERE sent = FALSE AND remind_at <= $1
            ORDER BY remind_at
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(reminders)
    }

    /// Atomically flip `sent`; false means another pass got there first.
    #[tracing::instrument(skip(self), fields(db.table = "scheduled_reminders", db.record_id = %id))]
    pub async fn mark_sent(&self, id: Uuid) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE scheduled_reminders SET sent = TRUE WHERE id = $1 AND sent = FALSE")
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "scheduled_reminders"))]
    pub async fn exists_for_booking(&self, booking_id: Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM scheduled_reminders WHERE booking_id = $1)",
        )
        .bind(booking_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}
