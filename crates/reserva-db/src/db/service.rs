//! Service repository: bookable offerings with fixed durations.

use reserva_core::models::Service;
use reserva_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

#[derive(Clone)]
pub struct ServiceRepository {
    pool: PgPool,
}

impl ServiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "services"))]
    pub async fn create(
        &self,
        organization_id: Uuid,
        name: &str,
        duration_minutes: i32,
        price: Option<i64>,
    ) -> Result<Service, AppError> {
        let service: Service = sqlx::query_as::<Postgres, Service>(
            r#"
            INSERT INTO services (id, organization_id, name, duration_minutes, price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(organization_id)
        .bind(name)
        .bind(duration_minutes)
        .bind(price)
        .fetch_one(&self.pool)
        .await?;
        Ok(service)
    }

    #[tracing::instrument(skip(self), fields(db.table = "services", db.record_id = %id))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Service>, AppError> {
        let service: Option<Service> =
            sqlx::query_as::<Postgres, Service>("SELECT * FROM services WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(service)
    }

    #[tracing::instrument(skip(self), fields(db.table = "services"))]
    pub async fn list_for_org(
        &self,
        organization_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<Service>, AppError> {
        let services: Vec<Service> = sqlx::query_as::<Postgres, Service>(
            r#"
            SELECT * FROM services
            WHERE organization_id = $1 AND (NOT $2 OR is_active)
            ORDER BY name
            "#,
        )
        .bind(organization_id)
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;
        Ok(services)
    }

    #[tracing::instrument(skip(self), fields(db.table = "services", db.record_id = %id))]
    pub async fn set_active(&self, id: Uuid, is_active: bool) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE services SET is_active = $2 WHERE id = $1")
            .bind(id)
            .bind(is_active)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
