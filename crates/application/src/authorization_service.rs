use std::sync::Arc;

use caresuite_core::{AppError, AppResult, UserIdentity};
use caresuite_domain::{ModuleCoverage, Permission, PermissionCatalog, Role, RoleId};

use crate::role_ports::{RoleRepository, UserDirectory};

/// Permissions currently granted to one caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectivePermissions {
    /// Assigned role, when the caller has one.
    pub role_id: Option<RoleId>,
    /// Granted catalog permissions in catalog order.
    pub permissions: Vec<Permission>,
}

/// Application service answering allow/deny questions.
#[derive(Clone)]
pub struct AuthorizationService {
    catalog: Arc<PermissionCatalog>,
    repository: Arc<dyn RoleRepository>,
    user_directory: Arc<dyn UserDirectory>,
}

impl AuthorizationService {
    /// Creates a new authorization service from its ports.
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

    /// Returns whether the role grants the permission.
    ///
    /// Inactive roles grant nothing. Unknown identifiers are denied.
    #[must_use]
    pub fn has_permission(role: &Role, permission_id: &str) -> bool {
        role.is_active() && role.has_permission(permission_id)
    }

    /// Returns `(assigned, total)` coverage of one module for the role.
    pub fn coverage(&self, role: &Role, module: &str) -> AppResult<ModuleCoverage> {
        ModuleCoverage::for_module(self.catalog.as_ref(), role, module)
    }

    /// Returns coverage of every catalog module for the role.
    #[must_use]
    pub fn coverage_by_module(&self, role: &Role) -> Vec<ModuleCoverage> {
        ModuleCoverage::for_all_modules(self.catalog.as_ref(), role)
    }

    /// Resolves the live role assigned to a subject.
    pub async fn role_for_subject(&self, subject: &str) -> AppResult<Option<Role>> {
        let Some(role_id) = self.user_directory.role_for_subject(subject).await? else {
            return Ok(None);
        };

        self.repository.find_role(role_id).await
    }

    /// Ensures the caller's role grants the permission.
    pub async fn require_permission(
        &self,
        actor: &UserIdentity,
        permission_id: &str,
    ) -> AppResult<()> {
        let granted = self
            .role_for_subject(actor.subject())
            .await?
            .is_some_and(|role| Self::has_permission(&role, permission_id));

        if granted {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "subject '{}' is missing permission '{permission_id}'",
            actor.subject()
        )))
    }

    /// Returns the caller's granted catalog permissions.
    pub async fn effective_permissions(
        &self,
        actor: &UserIdentity,
    ) -> AppResult<EffectivePermissions> {
        let Some(role) = self.role_for_subject(actor.subject()).await? else {
            return Ok(EffectivePermissions {
                role_id: None,
                permissions: Vec::new(),
            });
        };

        let permissions = self
            .catalog
            .list_all()
            .iter()
            .filter(|permission| Self::has_permission(&role, permission.id()))
            .cloned()
            .collect();

        Ok(EffectivePermissions {
            role_id: Some(role.id()),
            permissions,
        })
    }
}

#[cfg(test)]
mod tests {
    use caresuite_core::{AppError, UserIdentity};
    use caresuite_domain::{Permission, ROLE_MANAGE_PERMISSION, RoleStatus};

    use crate::test_fakes::fixture;
    use crate::{CreateRoleInput, UpdateRoleInput, UserDirectory};

    use super::AuthorizationService;

    fn service(fixture: &crate::test_fakes::Fixture) -> AuthorizationService {
        AuthorizationService::new(
            fixture.catalog.clone(),
            fixture.repository.clone(),
            fixture.user_directory.clone(),
        )
    }

    async fn nurse(fixture: &crate::test_fakes::Fixture) -> caresuite_domain::Role {
        match fixture
            .store
            .create(CreateRoleInput {
                name: "Nurse".to_owned(),
                description: String::new(),
                permission_ids: vec!["patient-view".to_owned(), "patient-edit".to_owned()],
            })
            .await
        {
            Ok(role) => role,
            Err(error) => panic!("failed to create nurse role: {error}"),
        }
    }

    #[tokio::test]
    async fn nonexistent_permission_is_denied_without_error() {
        let fixture = fixture();
        let role = nurse(&fixture).await;

        assert!(AuthorizationService::has_permission(&role, "patient-view"));
        assert!(!AuthorizationService::has_permission(
            &role,
            "nonexistent-permission"
        ));
    }

    #[tokio::test]
    async fn nurse_coverage_matches_scenario() {
        let fixture = fixture();
        let service = service(&fixture);
        let role = nurse(&fixture).await;

        let patients = service.coverage(&role, "Patients");
        let inventory = service.coverage(&role, "Inventory");

        assert_eq!(
            patients.map(|coverage| (coverage.assigned, coverage.total)).ok(),
            Some((2, 2))
        );
        assert_eq!(
            inventory.map(|coverage| (coverage.assigned, coverage.total)).ok(),
            Some((0, 1))
        );
        assert!(matches!(
            service.coverage(&role, "Pharmacy"),
            Err(AppError::NotFound(_))
        ));
        assert_eq!(service.coverage_by_module(&role).len(), 3);
    }

    #[tokio::test]
    async fn require_permission_denies_subjects_without_role() {
        let fixture = fixture();
        let service = service(&fixture);
        let actor = UserIdentity::new("mallory", "Mallory");

        let result = service
            .require_permission(&actor, ROLE_MANAGE_PERMISSION)
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn require_permission_follows_assigned_role() {
        let fixture = fixture();
        let service = service(&fixture);
        let role = nurse(&fixture).await;
        assert!(
            fixture
                .user_directory
                .assign_role("nina", role.id())
                .await
                .is_ok()
        );
        let actor = UserIdentity::new("nina", "Nina");

        assert!(
            service
                .require_permission(&actor, "patient-edit")
                .await
                .is_ok()
        );
        assert!(matches!(
            service.require_permission(&actor, "inventory-view").await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn inactive_role_grants_nothing() {
        let fixture = fixture();
        let service = service(&fixture);
        let role = nurse(&fixture).await;
        assert!(
            fixture
                .user_directory
                .assign_role("nina", role.id())
                .await
                .is_ok()
        );
        assert!(
            fixture
                .store
                .update(
                    role.id(),
                    UpdateRoleInput {
                        status: Some(RoleStatus::Inactive),
                        ..UpdateRoleInput::default()
                    },
                )
                .await
                .is_ok()
        );
        let actor = UserIdentity::new("nina", "Nina");

        let effective = service.effective_permissions(&actor).await;

        assert!(matches!(
            service.require_permission(&actor, "patient-view").await,
            Err(AppError::Forbidden(_))
        ));
        assert_eq!(
            effective.map(|effective| effective.permissions.len()).ok(),
            Some(0)
        );
    }

    #[tokio::test]
    async fn effective_permissions_skip_retired_identifiers() {
        let fixture = fixture();
        let service = service(&fixture);
        let mut role = nurse(&fixture).await;
        role.replace_permissions(["patient-view".to_owned(), "patient-archive".to_owned()]);
        {
            let mut roles = fixture.repository.roles.lock().await;
            roles.clear();
            roles.push(role.clone());
        }
        assert!(
            fixture
                .user_directory
                .assign_role("nina", role.id())
                .await
                .is_ok()
        );

        let effective = service
            .effective_permissions(&UserIdentity::new("nina", "Nina"))
            .await;
        let Ok(effective) = effective else {
            panic!("expected effective permissions");
        };

        assert_eq!(effective.role_id, Some(role.id()));
        assert_eq!(
            effective
                .permissions
                .iter()
                .map(Permission::id)
                .collect::<Vec<_>>(),
            vec!["patient-view"]
        );
    }
}
