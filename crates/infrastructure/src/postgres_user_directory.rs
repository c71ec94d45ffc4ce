use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use caresuite_application::UserDirectory;
use caresuite_core::{AppError, AppResult};
use caresuite_domain::RoleId;

/// PostgreSQL-backed subject to role assignments.
#[derive(Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    /// Creates a directory with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleCountRow {
    role_id: uuid::Uuid,
    user_count: i64,
}

fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn role_for_subject(&self, subject: &str) -> AppResult<Option<RoleId>> {
        let role_id = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            SELECT role_id
            FROM user_roles
            WHERE subject = $1
            "#,
        )
        .bind(subject)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to resolve role for subject: {error}"))
        })?;

        Ok(role_id.map(RoleId::from_uuid))
    }

    async fn count_users_with_role(&self, role_id: RoleId) -> AppResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM user_roles
            WHERE role_id = $1
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count role users: {error}")))?;

        Ok(to_count(count))
    }

    async fn count_users_by_role(&self) -> AppResult<HashMap<RoleId, u64>> {
        let rows = sqlx::query_as::<_, RoleCountRow>(
            r#"
            SELECT role_id, COUNT(*) AS user_count
            FROM user_roles
            GROUP BY role_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count role users: {error}")))?;

        Ok(rows
            .into_iter()
            .map(|row| (RoleId::from_uuid(row.role_id), to_count(row.user_count)))
            .collect())
    }

    async fn assign_role(&self, subject: &str, role_id: RoleId) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_roles (subject, role_id)
            VALUES ($1, $2)
            ON CONFLICT (subject) DO UPDATE
            SET role_id = EXCLUDED.role_id,
                assigned_at = now()
            "#,
        )
        .bind(subject)
        .bind(role_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            if let sqlx::Error::Database(database_error) = &error
                && database_error.code().as_deref() == Some("23503")
            {
                return AppError::NotFound(format!("role '{role_id}' was not found"));
            }

            AppError::Internal(format!("failed to assign role: {error}"))
        })?;

        Ok(())
    }

    async fn unassign_role(&self, subject: &str) -> AppResult<bool> {
        let rows_affected = sqlx::query("DELETE FROM user_roles WHERE subject = $1")
            .bind(subject)
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to unassign role: {error}")))?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    async fn release_role(&self, role_id: RoleId) -> AppResult<u64> {
        let rows_affected = sqlx::query("DELETE FROM user_roles WHERE role_id = $1")
            .bind(role_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to release role users: {error}")))?
            .rows_affected();

        Ok(rows_affected)
    }
}
