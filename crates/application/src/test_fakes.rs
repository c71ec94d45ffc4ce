use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use caresuite_core::{AppError, AppResult};
use caresuite_domain::{Permission, PermissionCatalog, ROLE_MANAGE_PERMISSION, Role, RoleId};

use crate::{AuditEvent, AuditRepository, RoleRepository, RoleStore, UserDirectory};

#[derive(Default)]
pub(crate) struct FakeRoleRepository {
    pub(crate) roles: Mutex<Vec<Role>>,
    pub(crate) fail_deletes: AtomicBool,
}

#[async_trait]
impl RoleRepository for FakeRoleRepository {
    async fn insert_role(&self, role: &Role) -> AppResult<()> {
        let mut roles = self.roles.lock().await;
        if role.is_active()
            && roles
                .iter()
                .any(|existing| existing.is_active() && existing.has_name(role.name()))
        {
            return Err(AppError::DuplicateName(role.name().to_owned()));
        }

        roles.push(role.clone());
        Ok(())
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .lock()
            .await
            .iter()
            .find(|role| role.id() == role_id)
            .cloned())
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        Ok(self.roles.lock().await.clone())
    }

    async fn update_role(&self, role: &Role) -> AppResult<()> {
        let mut roles = self.roles.lock().await;
        let stored = roles
            .iter_mut()
            .find(|stored| stored.id() == role.id())
            .ok_or_else(|| AppError::NotFound(format!("role '{}' was not found", role.id())))?;
        *stored = role.clone();
        Ok(())
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::Internal("role storage unavailable".to_owned()));
        }

        let mut roles = self.roles.lock().await;
        let before = roles.len();
        roles.retain(|role| role.id() != role_id);
        if roles.len() == before {
            return Err(AppError::NotFound(format!("role '{role_id}' was not found")));
        }
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeUserDirectory {
    pub(crate) assignments: Mutex<HashMap<String, RoleId>>,
}

#[async_trait]
impl UserDirectory for FakeUserDirectory {
    async fn role_for_subject(&self, subject: &str) -> AppResult<Option<RoleId>> {
        Ok(self.assignments.lock().await.get(subject).copied())
    }

    async fn count_users_with_role(&self, role_id: RoleId) -> AppResult<u64> {
        Ok(self
            .assignments
            .lock()
            .await
            .values()
            .filter(|assigned| **assigned == role_id)
            .count() as u64)
    }

    async fn count_users_by_role(&self) -> AppResult<HashMap<RoleId, u64>> {
        let mut counts = HashMap::new();
        for role_id in self.assignments.lock().await.values() {
            *counts.entry(*role_id).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn assign_role(&self, subject: &str, role_id: RoleId) -> AppResult<()> {
        self.assignments
            .lock()
            .await
            .insert(subject.to_owned(), role_id);
        Ok(())
    }

    async fn unassign_role(&self, subject: &str) -> AppResult<bool> {
        Ok(self.assignments.lock().await.remove(subject).is_some())
    }

    async fn release_role(&self, role_id: RoleId) -> AppResult<u64> {
        let mut assignments = self.assignments.lock().await;
        let before = assignments.len();
        assignments.retain(|_, assigned| *assigned != role_id);
        Ok((before - assignments.len()) as u64)
    }
}

#[derive(Default)]
pub(crate) struct FakeAuditRepository {
    pub(crate) events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

/// Catalog with two Patients permissions, one Inventory permission and role management.
pub(crate) fn scenario_catalog() -> Arc<PermissionCatalog> {
    let permissions = vec![
        Permission::new("patient-view", "View Patients", "", "Patients"),
        Permission::new("patient-edit", "Edit Patients", "", "Patients"),
        Permission::new("inventory-view", "View Inventory", "", "Inventory"),
        Permission::new(ROLE_MANAGE_PERMISSION, "Manage Roles", "", "Roles & Permissions"),
    ]
    .into_iter()
    .collect::<Result<Vec<_>, _>>();

    match permissions.and_then(PermissionCatalog::new) {
        Ok(catalog) => Arc::new(catalog),
        Err(error) => panic!("failed to build scenario catalog: {error}"),
    }
}

pub(crate) struct Fixture {
    pub(crate) catalog: Arc<PermissionCatalog>,
    pub(crate) repository: Arc<FakeRoleRepository>,
    pub(crate) user_directory: Arc<FakeUserDirectory>,
    pub(crate) audit_repository: Arc<FakeAuditRepository>,
    pub(crate) store: RoleStore,
}

pub(crate) fn fixture() -> Fixture {
    let catalog = scenario_catalog();
    let repository = Arc::new(FakeRoleRepository::default());
    let user_directory = Arc::new(FakeUserDirectory::default());
    let store = RoleStore::new(catalog.clone(), repository.clone(), user_directory.clone());

    Fixture {
        catalog,
        repository,
        user_directory,
        audit_repository: Arc::new(FakeAuditRepository::default()),
        store,
    }
}
