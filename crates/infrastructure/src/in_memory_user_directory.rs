use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use caresuite_application::{RoleRepository, UserDirectory};
use caresuite_core::{AppError, AppResult};
use caresuite_domain::RoleId;
use tokio::sync::RwLock;

use crate::InMemoryRoleRepository;

/// In-memory user directory keyed by authenticated subject.
///
/// Assignments only ever reference roles present in the paired role
/// repository at the moment the assignment is written.
#[derive(Debug)]
pub struct InMemoryUserDirectory {
    roles: Arc<InMemoryRoleRepository>,
    assignments: RwLock<HashMap<String, RoleId>>,
}

impl InMemoryUserDirectory {
    /// Creates an empty directory backed by the given role repository.
    #[must_use]
    pub fn new(roles: Arc<InMemoryRoleRepository>) -> Self {
        Self {
            roles,
            assignments: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn role_for_subject(&self, subject: &str) -> AppResult<Option<RoleId>> {
        Ok(self.assignments.read().await.get(subject).copied())
    }

    async fn count_users_with_role(&self, role_id: RoleId) -> AppResult<u64> {
        let count = self
            .assignments
            .read()
            .await
            .values()
            .filter(|assigned| **assigned == role_id)
            .count();

        Ok(count as u64)
    }

    async fn count_users_by_role(&self) -> AppResult<HashMap<RoleId, u64>> {
        let mut counts = HashMap::new();
        for role_id in self.assignments.read().await.values() {
            *counts.entry(*role_id).or_insert(0) += 1;
        }

        Ok(counts)
    }

    async fn assign_role(&self, subject: &str, role_id: RoleId) -> AppResult<()> {
        let mut assignments = self.assignments.write().await;
        if self.roles.find_role(role_id).await?.is_none() {
            return Err(AppError::NotFound(format!("role '{role_id}' was not found")));
        }

        assignments.insert(subject.to_owned(), role_id);
        Ok(())
    }

    async fn unassign_role(&self, subject: &str) -> AppResult<bool> {
        Ok(self.assignments.write().await.remove(subject).is_some())
    }

    async fn release_role(&self, role_id: RoleId) -> AppResult<u64> {
        let mut assignments = self.assignments.write().await;
        let before = assignments.len();
        assignments.retain(|_, assigned| *assigned != role_id);

        Ok((before - assignments.len()) as u64)
    }
}
