use std::sync::Arc;

use caresuite_application::{
    AuditRepository, AuthorizationService, RoleAdminService, RoleRepository, RoleStore,
    UserDirectory,
};
use caresuite_domain::PermissionCatalog;
use caresuite_infrastructure::{
    InMemoryAuditRepository, InMemoryRoleRepository, InMemoryUserDirectory,
    PostgresAuditRepository, PostgresRoleRepository, PostgresUserDirectory,
};
use sqlx::PgPool;

use crate::state::AppState;

/// Catalog and storage adapters shared by every service.
#[derive(Clone)]
pub struct RolePorts {
    pub catalog: Arc<PermissionCatalog>,
    pub repository: Arc<dyn RoleRepository>,
    pub user_directory: Arc<dyn UserDirectory>,
    pub audit_repository: Arc<dyn AuditRepository>,
}

impl RolePorts {
    pub fn postgres(catalog: Arc<PermissionCatalog>, pool: &PgPool) -> Self {
        Self {
            catalog,
            repository: Arc::new(PostgresRoleRepository::new(pool.clone())),
            user_directory: Arc::new(PostgresUserDirectory::new(pool.clone())),
            audit_repository: Arc::new(PostgresAuditRepository::new(pool.clone())),
        }
    }

    pub fn in_memory(catalog: Arc<PermissionCatalog>) -> Self {
        let repository = Arc::new(InMemoryRoleRepository::new());

        Self {
            catalog,
            user_directory: Arc::new(InMemoryUserDirectory::new(repository.clone())),
            repository,
            audit_repository: Arc::new(InMemoryAuditRepository::new()),
        }
    }

    pub fn role_store(&self) -> RoleStore {
        RoleStore::new(
            self.catalog.clone(),
            self.repository.clone(),
            self.user_directory.clone(),
        )
    }
}

pub fn build_app_state(ports: &RolePorts) -> AppState {
    let authorization_service = AuthorizationService::new(
        ports.catalog.clone(),
        ports.repository.clone(),
        ports.user_directory.clone(),
    );

    AppState {
        role_admin_service: RoleAdminService::new(
            authorization_service.clone(),
            ports.role_store(),
            ports.user_directory.clone(),
            ports.audit_repository.clone(),
        ),
        authorization_service,
    }
}
