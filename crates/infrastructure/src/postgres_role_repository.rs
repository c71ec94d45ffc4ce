use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use caresuite_application::RoleRepository;
use caresuite_core::{AppError, AppResult};
use caresuite_domain::{Role, RoleId, RoleStatus};


/// PostgreSQL-backed role repository.
///
/// Active-name uniqueness is enforced by the `roles_active_name_key` partial
/// index, so concurrent writers cannot both claim the same name.
#[derive(Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    role_id: uuid::Uuid,
    role_name: String,
    description: String,
    status: String,
    created_at: DateTime<Utc>,
    permission_id: Option<String>,
}

const SELECT_ROLES: &str = r#"
    SELECT
        roles.id AS role_id,
        roles.name AS role_name,
        roles.description,
        roles.status,
        roles.created_at,
        grants.permission_id
    FROM roles
    LEFT JOIN role_permissions AS grants
        ON grants.role_id = roles.id
"#;

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn insert_role(&self, role: &Role) -> AppResult<()> {
        let mut transaction = begin(&self.pool).await?;

        sqlx::query(
            r#"
            INSERT INTO roles (id, name, description, status, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(role.id().as_uuid())
        .bind(role.name())
        .bind(role.description())
        .bind(role.status().as_str())
        .bind(role.created_at())
        .execute(&mut *transaction)
        .await
        .map_err(|error| map_role_conflict(error, role.name(), "create"))?;

        replace_grants(&mut transaction, role).await?;
        commit(transaction).await
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(&format!(
            "{SELECT_ROLES} WHERE roles.id = $1 ORDER BY grants.permission_id"
        ))
        .bind(role_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role: {error}")))?;

        Ok(aggregate_roles(rows)?.into_iter().next())
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(&format!(
            "{SELECT_ROLES} ORDER BY roles.position, grants.permission_id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        aggregate_roles(rows)
    }

    async fn update_role(&self, role: &Role) -> AppResult<()> {
        let mut transaction = begin(&self.pool).await?;

        let rows_affected = sqlx::query(
            r#"
            UPDATE roles
            SET name = $2,
                description = $3,
                status = $4,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(role.id().as_uuid())
        .bind(role.name())
        .bind(role.description())
        .bind(role.status().as_str())
        .execute(&mut *transaction)
        .await
        .map_err(|error| map_role_conflict(error, role.name(), "update"))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "role '{}' was not found",
                role.id()
            )));
        }

        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
            .bind(role.id().as_uuid())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to clear role permissions: {error}"))
            })?;

        replace_grants(&mut transaction, role).await?;
        commit(transaction).await
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let rows_affected = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(role_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete role: {error}")))?
            .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("role '{role_id}' was not found")));
        }

        Ok(())
    }
}

async fn begin(pool: &PgPool) -> AppResult<Transaction<'static, Postgres>> {
    pool.begin()
        .await
        .map_err(|error| AppError::Internal(format!("failed to begin transaction: {error}")))
}

async fn commit(transaction: Transaction<'static, Postgres>) -> AppResult<()> {
    transaction
        .commit()
        .await
        .map_err(|error| AppError::Internal(format!("failed to commit transaction: {error}")))
}

async fn replace_grants(
    transaction: &mut Transaction<'static, Postgres>,
    role: &Role,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO role_permissions (role_id, permission_id)
        SELECT $1, permission_id
        FROM UNNEST($2::TEXT[]) AS permission_id
        ON CONFLICT (role_id, permission_id) DO NOTHING
        "#,
    )
    .bind(role.id().as_uuid())
    .bind(
        role.sorted_permissions()
            .into_iter()
            .map(str::to_owned)
            .collect::<Vec<_>>(),
    )
    .execute(&mut **transaction)
    .await
    .map_err(|error| AppError::Internal(format!("failed to persist role permissions: {error}")))?;

    Ok(())
}

/// Folds joined rows into roles, keeping the order in which roles first appear.
fn aggregate_roles(rows: Vec<RoleRow>) -> AppResult<Vec<Role>> {
    let mut order: Vec<uuid::Uuid> = Vec::new();
    let mut by_id: HashMap<uuid::Uuid, (RoleRow, Vec<String>)> = HashMap::new();

    for mut row in rows {
        let permission_id = row.permission_id.take();
        let entry = by_id.entry(row.role_id).or_insert_with(|| {
            order.push(row.role_id);
            (row, Vec::new())
        });

        if let Some(permission_id) = permission_id {
            entry.1.push(permission_id);
        }
    }

    order
        .into_iter()
        .filter_map(|role_id| by_id.remove(&role_id))
        .map(|(row, permission_ids)| {
            let status = RoleStatus::from_str(row.status.as_str()).map_err(|error| {
                AppError::Internal(format!(
                    "invalid stored status for role '{}': {error}",
                    row.role_id
                ))
            })?;

            Role::from_stored(
                RoleId::from_uuid(row.role_id),
                row.role_name,
                row.description,
                permission_ids,
                row.created_at,
                status,
            )
        })
        .collect()
}

fn map_role_conflict(error: sqlx::Error, role_name: &str, operation: &str) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::DuplicateName(role_name.to_owned());
    }

    AppError::Internal(format!("failed to {operation} role: {error}"))
}
