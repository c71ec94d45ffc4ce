use std::sync::Arc;

use chrono::Utc;

use caresuite_core::{AppError, AppResult};
use caresuite_domain::{PermissionCatalog, Role, RoleId};

use crate::role_ports::{
    CreateRoleInput, DeleteRoleOutcome, RoleRepository, UpdateRoleInput, UserDirectory,
};


/// Validated role storage on top of the repository and user directory ports.
///
/// Every write checks permission identifiers against the catalog and role
/// names against the other active roles before reaching the repository.
#[derive(Clone)]
pub struct RoleStore {
    catalog: Arc<PermissionCatalog>,
    repository: Arc<dyn RoleRepository>,
    user_directory: Arc<dyn UserDirectory>,
}

impl RoleStore {
    /// Creates a store from required dependencies.
    #[must_use]
    pub fn new(
        catalog: Arc<PermissionCatalog>,
        repository: Arc<dyn RoleRepository>,
        user_directory: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            catalog,
            repository,
            user_directory,
        }
    }

    /// Returns the catalog roles are validated against.
    #[must_use]
    pub fn catalog(&self) -> &PermissionCatalog {
        self.catalog.as_ref()
    }

    /// Creates an active role with no assigned users.
    pub async fn create(&self, input: CreateRoleInput) -> AppResult<Role> {
        self.catalog
            .ensure_known(input.permission_ids.iter().map(String::as_str))?;

        let role = Role::new(
            RoleId::new(),
            input.name,
            input.description,
            input.permission_ids,
            Utc::now(),
        )?;

        self.ensure_name_available(&role).await?;
        self.repository.insert_role(&role).await?;

        Ok(role)
    }

    /// Applies a partial update and returns the stored role.
    pub async fn update(&self, role_id: RoleId, input: UpdateRoleInput) -> AppResult<Role> {
        let mut role = self.find_existing(role_id).await?;

        if let Some(name) = input.name {
            role.rename(name)?;
        }
        if let Some(description) = input.description {
            role.set_description(description);
        }
        if let Some(permission_ids) = input.permission_ids {
            self.catalog
                .ensure_known(permission_ids.iter().map(String::as_str))?;
            role.replace_permissions(permission_ids);
        }
        if let Some(status) = input.status {
            role.set_status(status);
        }

        self.ensure_name_available(&role).await?;
        self.repository.update_role(&role).await?;

        self.with_user_count(role).await
    }

    /// Deletes a role, releasing any users still assigned to it.
    pub async fn delete(&self, role_id: RoleId) -> AppResult<DeleteRoleOutcome> {
        let role = self.get(role_id).await?;
        self.repository.delete_role(role_id).await?;
        // Assignments stay untouched unless the role itself is gone.
        let released_users = self.user_directory.release_role(role_id).await?;

        let assigned_users = released_users.max(role.user_count());
        let warning = (assigned_users > 0).then(|| {
            format!(
                "role '{}' was assigned to {assigned_users} user(s); their role assignment was removed",
                role.name()
            )
        });

        Ok(DeleteRoleOutcome {
            role,
            released_users: assigned_users,
            warning,
        })
    }

    /// Returns one role with its current user count.
    pub async fn get(&self, role_id: RoleId) -> AppResult<Role> {
        let role = self.find_existing(role_id).await?;
        self.with_user_count(role).await
    }

    /// Returns every role in insertion order with current user counts.
    pub async fn list(&self) -> AppResult<Vec<Role>> {
        let mut roles = self.repository.list_roles().await?;
        let counts = self.user_directory.count_users_by_role().await?;

        for role in &mut roles {
            role.set_user_count(counts.get(&role.id()).copied().unwrap_or(0));
        }

        Ok(roles)
    }

    async fn find_existing(&self, role_id: RoleId) -> AppResult<Role> {
        self.repository
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))
    }

    async fn with_user_count(&self, mut role: Role) -> AppResult<Role> {
        let user_count = self.user_directory.count_users_with_role(role.id()).await?;
        role.set_user_count(user_count);
        Ok(role)
    }

    async fn ensure_name_available(&self, role: &Role) -> AppResult<()> {
        if !role.is_active() {
            return Ok(());
        }

        let collides = self.repository.list_roles().await?.iter().any(|existing| {
            existing.id() != role.id() && existing.is_active() && existing.has_name(role.name())
        });

        if collides {
            return Err(AppError::DuplicateName(role.name().to_owned()));
        }

        Ok(())
    }
}
