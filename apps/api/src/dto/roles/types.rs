use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for role creation.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-role-request.ts"
)]
pub struct CreateRoleRequest {
    pub name: String,
    #[serde(default)]
    #[ts(optional)]
    pub description: Option<String>,
    #[serde(default)]
    pub permission_ids: Vec<String>,
}

/// Incoming payload for a partial role update.
///
/// Absent fields keep their stored value. `permissionIds` replaces the whole set.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-role-request.ts"
)]
pub struct UpdateRoleRequest {
    #[ts(optional)]
    pub name: Option<String>,
    #[ts(optional)]
    pub description: Option<String>,
    #[ts(optional)]
    pub permission_ids: Option<Vec<String>>,
    #[ts(optional)]
    pub status: Option<String>,
}

/// API representation of a role.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Granted permission identifiers, sorted.
    pub permission_ids: Vec<String>,
    #[ts(type = "number")]
    pub user_count: u64,
    /// RFC 3339 creation timestamp.
    pub created_date: String,
    pub status: String,
}

/// Role list envelope.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-list-response.ts"
)]
pub struct RoleListResponse {
    pub roles: Vec<RoleResponse>,
}

/// Result of a role deletion.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/delete-role-response.ts"
)]
pub struct DeleteRoleResponse {
    pub deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub warning: Option<String>,
}

/// Granted versus total permissions for one catalog module.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/module-coverage-response.ts"
)]
pub struct ModuleCoverageResponse {
    pub module: String,
    pub assigned: usize,
    pub total: usize,
}

/// Coverage of every catalog module for one role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-coverage-response.ts"
)]
pub struct RoleCoverageResponse {
    pub coverage: Vec<ModuleCoverageResponse>,
}
