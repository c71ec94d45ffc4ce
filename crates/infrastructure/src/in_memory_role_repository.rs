use async_trait::async_trait;
use caresuite_application::RoleRepository;
use caresuite_core::{AppError, AppResult};
use caresuite_domain::{Role, RoleId};
use tokio::sync::RwLock;

/// In-memory role repository implementation.
///
/// Roles are kept in insertion order. Every mutation holds the write lock for
/// the whole check-and-write, so active-name uniqueness cannot race.
#[derive(Debug, Default)]
pub struct InMemoryRoleRepository {
    roles: RwLock<Vec<Role>>,
}

impl InMemoryRoleRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            roles: RwLock::new(Vec::new()),
        }
    }
}

fn ensure_active_name_free(roles: &[Role], candidate: &Role) -> AppResult<()> {
    if !candidate.is_active() {
        return Ok(());
    }

    let collides = roles.iter().any(|stored| {
        stored.id() != candidate.id() && stored.is_active() && stored.has_name(candidate.name())
    });
    if collides {
        return Err(AppError::DuplicateName(candidate.name().to_owned()));
    }

    Ok(())
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn insert_role(&self, role: &Role) -> AppResult<()> {
        let mut roles = self.roles.write().await;

        if roles.iter().any(|stored| stored.id() == role.id()) {
            return Err(AppError::Internal(format!(
                "role '{}' already exists",
                role.id()
            )));
        }
        ensure_active_name_free(roles.as_slice(), role)?;

        roles.push(role.clone());
        Ok(())
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .read()
            .await
            .iter()
            .find(|role| role.id() == role_id)
            .cloned())
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        Ok(self.roles.read().await.clone())
    }

    async fn update_role(&self, role: &Role) -> AppResult<()> {
        let mut roles = self.roles.write().await;
        ensure_active_name_free(roles.as_slice(), role)?;

        let stored = roles
            .iter_mut()
            .find(|stored| stored.id() == role.id())
            .ok_or_else(|| AppError::NotFound(format!("role '{}' was not found", role.id())))?;
        *stored = role.clone();

        Ok(())
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let mut roles = self.roles.write().await;
        let position = roles
            .iter()
            .position(|role| role.id() == role_id)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;
        roles.remove(position);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use caresuite_application::RoleRepository;
    use caresuite_core::AppError;
    use caresuite_domain::{Role, RoleId, RoleStatus};
    use chrono::Utc;

    use super::InMemoryRoleRepository;

    fn role(name: &str) -> Role {
        match Role::new(
            RoleId::new(),
            name,
            "",
            ["patient-view".to_owned()],
            Utc::now(),
        ) {
            Ok(role) => role,
            Err(error) => panic!("failed to build role: {error}"),
        }
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_active_names() {
        let repository = InMemoryRoleRepository::new();
        assert!(repository.insert_role(&role("Doctor")).await.is_ok());

        let result = repository.insert_role(&role("DOCTOR")).await;

        assert!(matches!(result, Err(AppError::DuplicateName(_))));
    }

    #[tokio::test]
    async fn inactive_roles_do_not_reserve_names() {
        let repository = InMemoryRoleRepository::new();
        let mut retired = role("Doctor");
        retired.set_status(RoleStatus::Inactive);

        assert!(repository.insert_role(&retired).await.is_ok());
        assert!(repository.insert_role(&role("Doctor")).await.is_ok());
    }

    #[tokio::test]
    async fn list_preserves_insertion_order() {
        let repository = InMemoryRoleRepository::new();
        for name in ["Receptionist", "Admin", "Nurse"] {
            assert!(repository.insert_role(&role(name)).await.is_ok());
        }

        let names: Vec<String> = repository
            .list_roles()
            .await
            .unwrap_or_default()
            .iter()
            .map(|role| role.name().to_owned())
            .collect();

        assert_eq!(names, vec!["Receptionist", "Admin", "Nurse"]);
    }

    #[tokio::test]
    async fn update_and_delete_of_missing_role_are_not_found() {
        let repository = InMemoryRoleRepository::new();
        let missing = role("Ghost");

        assert!(matches!(
            repository.update_role(&missing).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            repository.delete_role(missing.id()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_replaces_stored_role() {
        let repository = InMemoryRoleRepository::new();
        let mut stored = role("Nurse");
        assert!(repository.insert_role(&stored).await.is_ok());

        stored.replace_permissions(["inventory-view".to_owned()]);
        assert!(repository.update_role(&stored).await.is_ok());

        let found = repository.find_role(stored.id()).await.ok().flatten();
        assert_eq!(
            found.map(|role| role.has_permission("inventory-view")),
            Some(true)
        );
    }
}
