//! Booking repository: reservation rows and the slot uniqueness guarantee.
//!
//! The partial unique index on (organization_id, start_at) over active
//! statuses is the authoritative conflict defense; a violation surfaces as
//! `AppError::Conflict` through the core error conversion.

use chrono::{DateTime, Utc};
use reserva_core::models::{Booking, BookingStats, BookingStatus};
use reserva_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
struct StatsRow {
    total: i64,
    pending: i64,
    confirmed: i64,
    canceled: i64,
}

#[derive(Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a PENDING booking. Two concurrent writers of the same
    /// (organization, start) resolve here: one row, one Conflict.
    #[tracing::instrument(skip(self, client_name, client_phone), fields(db.table = "bookings"))]
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        organization_id: Uuid,
        service_id: Uuid,
        client_id: i64,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        client_name: &str,
        client_phone: Option<&str>,
    ) -> Result<Booking, AppError> {
        let now = Utc::now();
        let booking: Booking = sqlx::query_as::<Postgres, Booking>(
            r#"
            INSERT INTO bookings (
                id, organization_id, service_id, client_id,
                start_at, end_at, status, client_name, client_phone,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(organization_id)
        .bind(service_id)
        .bind(client_id)
        .bind(start_at)
        .bind(end_at)
        .bind(BookingStatus::Pending)
        .bind(client_name)
        .bind(client_phone)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(booking)
    }

    #[tracing::instrument(skip(self), fields(db.table = "bookings", db.record_id = %id))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Booking>, AppError> {
        let booking: Option<Booking> =
            sqlx::query_as::<Postgres, Booking>("SELECT * FROM bookings WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(booking)
    }

    /// PENDING and CONFIRMED bookings whose [start, end) intersects
    /// [from, until), the occupied set for availability computation.
    #[tracing::instrument(skip(self), fields(db.table = "bookings"))]
    pub async fn list_active_in_range(
        &self,
        organization_id: Uuid,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Booking>, AppError> {
        let bookings: Vec<Booking> = sqlx::query_as::<Postgres, Booking>(
            r#"
            SELECT * FROM bookings
            WHERE organization_id = $1
              AND status IN ('PENDING', 'CONFIRMED')
              AND start_at < $3 AND end_at > $2
            "#,
        )
        .bind(organization_id)
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    /// Future PENDING bookings awaiting an administrator's decision.
    #[tracing::instrument(skip(self), fields(db.table = "bookings"))]
    pub async fn list_pending_for_org(
        &self,
        organization_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<Booking>, AppError> {
        let bookings: Vec<Booking> = sqlx::query_as::<Postgres, Booking>(
            r#"
            SELECT * FROM bookings
            WHERE organization_id = $1 AND status = 'PENDING' AND start_at >= $2
            ORDER BY start_at
            "#,
        )
        .bind(organization_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    /// A client's upcoming active bookings across organizations.
    #[tracing::instrument(skip(self), fields(db.table = "bookings"))]
    pub async fn list_upcoming_for_client(
        &self,
        client_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Vec<Booking>, AppError> {
        let bookings: Vec<Booking> = sqlx::query_as::<Postgres, Booking>(
            r#"
            SELECT * FROM bookings
            WHERE client_id = $1
              AND status IN ('PENDING', 'CONFIRMED')
              AND start_at >= $2
            ORDER BY start_at
            "#,
        )
        .bind(client_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    /// Non-canceled bookings from `from` on, ordered by start; feeds the
    /// read-only calendar export.
    #[tracing::instrument(skip(self), fields(db.table = "bookings"))]
    pub async fn list_active_from(
        &self,
        organization_id: Uuid,
        from: DateTime<Utc>,
    ) -> Result<Vec<Booking>, AppError> {
        let bookings: Vec<Booking> = sqlx::query_as::<Postgres, Booking>(
            r#"
            SELECT * FROM bookings
            WHERE organization_id = $1
              AND status IN ('PENDING', 'CONFIRMED')
              AND start_at >= $2
            ORDER BY start_at
            "#,
        )
        .bind(organization_id)
        .bind(from)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    /// CONFIRMED bookings starting at or after `now`, across organizations;
    /// used to re-seed reminders.
    #[tracing::instrument(skip(self), fields(db.table = "bookings"))]
    pub async fn list_confirmed_from(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Booking>, AppError> {
        let bookings: Vec<Booking> = sqlx::query_as::<Postgres, Booking>(
            r#"
            SELECT * FROM bookings
            WHERE status = 'CONFIRMED' AND start_at >= $1
            ORDER BY start_at
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    /// Transition `id` from `expected` to `to` in one statement; None means
    /// the booking was missing or no longer in `expected`.
    #[tracing::instrument(skip(self), fields(db.table = "bookings", db.record_id = %id))]
    pub async fn update_status_if(
        &self,
        id: Uuid,
        expected: BookingStatus,
        to: BookingStatus,
    ) -> Result<Option<Booking>, AppError> {
        let booking: Option<Booking> = sqlx::query_as::<Postgres, Booking>(
            r#"
            UPDATE bookings
            SET status = $3, updated_at = $4
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(expected)
        .bind(to)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;
        Ok(booking)
    }

    /// Booking counts per status for bookings created in the window.
    #[tracing::instrument(skip(self), fields(db.table = "bookings"))]
    pub async fn stats_since(
        &self,
        organization_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<BookingStats, AppError> {
        let row: StatsRow = sqlx::query_as::<Postgres, StatsRow>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'PENDING') AS pending,
                COUNT(*) FILTER (WHERE status = 'CONFIRMED') AS confirmed,
                COUNT(*) FILTER (WHERE status = 'CANCELED') AS canceled
            FROM bookings
            WHERE organization_id = $1 AND created_at >= $2
            "#,
        )
        .bind(organization_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;
        Ok(BookingStats {
            total: row.total,
            pending: row.pending,
            confirmed: row.confirmed,
            canceled: row.canceled,
        })
    }
}
