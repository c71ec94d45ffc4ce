mod common;
mod permissions;
mod roles;
mod users;

pub use common::HealthResponse;
pub use permissions::{MyPermissionsResponse, PermissionCatalogResponse, PermissionResponse};
pub use roles::{
    CreateRoleRequest, DeleteRoleResponse, ModuleCoverageResponse, RoleCoverageResponse,
    RoleListResponse, RoleResponse, UpdateRoleRequest,
};
pub use users::AssignRoleRequest;
