//! Administrator membership repository, read by the authorization boundary.

use reserva_core::models::OrganizationAdmin;
use reserva_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

#[derive(Clone)]
pub struct OrganizationAdminRepository {
    pool: PgPool,
}

impl OrganizationAdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "organization_admins"))]
    pub async fn add(
        &self,
        organization_id: Uuid,
        user_id: i64,
        role: &str,
    ) -> Result<OrganizationAdmin, AppError> {
        let admin: OrganizationAdmin = sqlx::query_as::<Postgres, OrganizationAdmin>(
            r#"
            INSERT INTO organization_admins (id, organization_id, user_id, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(organization_id)
        .bind(user_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;
        Ok(admin)
    }

    #[tracing::instrument(skip(self), fields(db.table = "organization_admins"))]
    pub async fn is_admin(&self, organization_id: Uuid, user_id: i64) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM organization_admins
                WHERE organization_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(organization_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    #[tracing::instrument(skip(self), fields(db.table = "organization_admins"))]
    pub async fn list_for_org(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<OrganizationAdmin>, AppError> {
        let admins: Vec<OrganizationAdmin> = sqlx::query_as::<Postgres, OrganizationAdmin>(
            "SELECT * FROM organization_admins WHERE organization_id = $1",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(admins)
    }

    /// Organizations the user administers; drives the admin-side menus.
    #[tracing::instrument(skip(self), fields(db.table = "organization_admins"))]
    pub async fn org_ids_for_user(&self, user_id: i64) -> Result<Vec<Uuid>, AppError> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT organization_id FROM organization_admins WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }
}
