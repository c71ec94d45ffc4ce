use serde::Serialize;
use ts_rs::TS;

/// API representation of one catalog permission.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/permission-response.ts"
)]
pub struct PermissionResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub module: String,
}

/// Full permission catalog with module names in display order.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/permission-catalog-response.ts"
)]
pub struct PermissionCatalogResponse {
    pub permissions: Vec<PermissionResponse>,
    pub modules: Vec<String>,
}

/// Permissions held by the calling subject.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/my-permissions-response.ts"
)]
pub struct MyPermissionsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub role_id: Option<String>,
    pub permissions: Vec<PermissionResponse>,
}
