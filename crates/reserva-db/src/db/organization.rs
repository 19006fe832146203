//! Organization repository: tenant identity, timezone, calendar token.

use reserva_core::models::Organization;
use reserva_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

#[derive(Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new organization, minting its calendar token.
    #[tracing::instrument(skip(self), fields(db.table = "organizations"))]
    pub async fn create(&self, name: &str, timezone: &str) -> Result<Organization, AppError> {
        let id = Uuid::new_v4();
        let calendar_token = Uuid::new_v4().simple().to_string();
        let org: Organization = sqlx::query_as::<Postgres, Organization>(
            r#"
            INSERT INTO organizations (id, name, timezone, calendar_token)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(timezone)
        .bind(&calendar_token)
        .fetch_one(&self.pool)
        .await?;
        Ok(org)
    }

    #[tracing::instrument(skip(self), fields(db.table = "organizations", db.record_id = %id))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Organization>, AppError> {
        let org: Option<Organization> = sqlx::query_as::<Postgres, Organization>(
            "SELECT * FROM organizations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(org)
    }

    /// Lookup for the read-only calendar feed.
    #[tracing::instrument(skip(self, token), fields(db.table = "organizations"))]
    pub async fn get_by_calendar_token(
        &self,
        token: &str,
    ) -> Result<Option<Organization>, AppError> {
        let org: Option<Organization> = sqlx::query_as::<Postgres, Organization>(
            "SELECT * FROM organizations WHERE calendar_token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(org)
    }

    #[tracing::instrument(skip(self), fields(db.table = "organizations"))]
    pub async fn list_all(&self) -> Result<Vec<Organization>, AppError> {
        let orgs: Vec<Organization> = sqlx::query_as::<Postgres, Organization>(
            "SELECT * FROM organizations ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(orgs)
    }

    #[tracing::instrument(skip(self), fields(db.table = "organizations", db.record_id = %id))]
    pub async fn update_name(&self, id: Uuid, name: &str) -> Result<Option<Organization>, AppError> {
        let org: Option<Organization> = sqlx::query_as::<Postgres, Organization>(
            "UPDATE organizations SET name = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(org)
    }

    #[tracing::instrument(skip(self), fields(db.table = "organizations", db.record_id = %id))]
    pub async fn update_timezone(
        &self,
        id: Uuid,
        timezone: &str,
    ) -> Result<Option<Organization>, AppError> {
        let org: Option<Organization> = sqlx::query_as::<Postgres, Organization>(
            "UPDATE organizations SET timezone = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(timezone)
        .fetch_optional(&self.pool)
        .await?;
        Ok(org)
    }

    /// Delete the organization; owned rows go with it via cascading FKs.
    #[tracing::instrument(skip(self), fields(db.table = "organizations", db.record_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM organizations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
