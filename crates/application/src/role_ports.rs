use std::collections::HashMap;

use async_trait::async_trait;

use caresuite_core::AppResult;
use caresuite_domain::{Role, RoleId, RoleStatus};

/// Input payload for creating roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Unique role name among active roles.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Catalog permission identifiers granted by the role.
    pub permission_ids: Vec<String>,
}

/// Partial update payload; `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRoleInput {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement permission set (whole-set, not incremental).
    pub permission_ids: Option<Vec<String>>,
    /// Replacement status.
    pub status: Option<RoleStatus>,
}

/// Result of deleting a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRoleOutcome {
    /// Role as it was before deletion.
    pub role: Role,
    /// Users whose assignment was released by the deletion.
    pub released_users: u64,
    /// Set when users were assigned to the deleted role.
    pub warning: Option<String>,
}

/// Storage port for role records.
///
/// Implementations must apply each mutation atomically per role and reject a
/// write that would leave two active roles with the same normalized name.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Persists a new role, failing with `DuplicateName` on an active-name collision.
    async fn insert_role(&self, role: &Role) -> AppResult<()>;

    /// Finds a role by identifier.
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>>;

    /// Lists all roles in insertion order.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Replaces a stored role, failing with `NotFound` when absent.
    async fn update_role(&self, role: &Role) -> AppResult<()>;

    /// Deletes a role, failing with `NotFound` when absent.
    async fn delete_role(&self, role_id: RoleId) -> AppResult<()>;
}

/// Port onto the user directory that owns user-to-role assignments.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Returns the role currently assigned to a subject.
    async fn role_for_subject(&self, subject: &str) -> AppResult<Option<RoleId>>;

    /// Counts users assigned to one role.
    async fn count_users_with_role(&self, role_id: RoleId) -> AppResult<u64>;

    /// Counts users per assigned role.
    async fn count_users_by_role(&self) -> AppResult<HashMap<RoleId, u64>>;

    /// Assigns a role to a subject, replacing any previous assignment.
    async fn assign_role(&self, subject: &str, role_id: RoleId) -> AppResult<()>;

    /// Removes a subject's assignment; returns whether one existed.
    async fn unassign_role(&self, subject: &str) -> AppResult<bool>;

    /// Removes every assignment to a role; returns how many were removed.
    async fn release_role(&self, role_id: RoleId) -> AppResult<u64>;
}
