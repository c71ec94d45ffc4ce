use std::sync::Arc;

use caresuite_core::{AppResult, UserIdentity};
use caresuite_domain::{PermissionCatalog, ROLE_MANAGE_PERMISSION};

use crate::{AuditEvent, AuditRepository, AuthorizationService, RoleStore, UserDirectory};

mod assignments;
mod roles;


/// Application service for role administration workflows.
#[derive(Clone)]
pub struct RoleAdminService {
    authorization_service: AuthorizationService,
    store: RoleStore,
    user_directory: Arc<dyn UserDirectory>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl RoleAdminService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        store: RoleStore,
        user_directory: Arc<dyn UserDirectory>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            store,
            user_directory,
            audit_repository,
        }
    }

    /// Returns the permission catalog. Readable by any authenticated caller.
    #[must_use]
    pub fn catalog(&self) -> &PermissionCatalog {
        self.store.catalog()
    }

    async fn require_role_manage_permission(&self, actor: &UserIdentity) -> AppResult<()> {
        self.authorization_service
            .require_permission(actor, ROLE_MANAGE_PERMISSION)
            .await
    }

    async fn append_audit(&self, event: AuditEvent) -> AppResult<()> {
        self.audit_repository.append_event(event).await
    }
}
