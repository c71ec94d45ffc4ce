mod conversions;
mod types;

pub use types::{
    CreateRoleRequest, DeleteRoleResponse, ModuleCoverageResponse, RoleCoverageResponse,
    RoleListResponse, RoleResponse, UpdateRoleRequest,
};
