use caresuite_application::{CreateRoleInput, DeleteRoleOutcome, UpdateRoleInput};
use caresuite_core::AppError;
use caresuite_domain::{ModuleCoverage, Role, RoleStatus};

use super::types::{
    CreateRoleRequest, DeleteRoleResponse, ModuleCoverageResponse, RoleResponse,
    UpdateRoleRequest,
};

impl From<Role> for RoleResponse {
    fn from(value: Role) -> Self {
        Self {
            id: value.id().to_string(),
            name: value.name().to_owned(),
            description: value.description().to_owned(),
            permission_ids: value
                .sorted_permissions()
                .into_iter()
                .map(ToOwned::to_owned)
                .collect(),
            user_count: value.user_count(),
            created_date: value.created_at().to_rfc3339(),
            status: value.status().as_str().to_owned(),
        }
    }
}

impl From<ModuleCoverage> for ModuleCoverageResponse {
    fn from(value: ModuleCoverage) -> Self {
        Self {
            module: value.module,
            assigned: value.assigned,
            total: value.total,
        }
    }
}

impl From<DeleteRoleOutcome> for DeleteRoleResponse {
    fn from(value: DeleteRoleOutcome) -> Self {
        Self {
            deleted: true,
            warning: value.warning,
        }
    }
}

impl From<CreateRoleRequest> for CreateRoleInput {
    fn from(value: CreateRoleRequest) -> Self {
        Self {
            name: value.name,
            description: value.description.unwrap_or_default(),
            permission_ids: value.permission_ids,
        }
    }
}

impl TryFrom<UpdateRoleRequest> for UpdateRoleInput {
    type Error = AppError;

    fn try_from(value: UpdateRoleRequest) -> Result<Self, Self::Error> {
        let status = value
            .status
            .as_deref()
            .map(RoleStatus::from_transport)
            .transpose()?;

        Ok(Self {
            name: value.name,
            description: value.description,
            permission_ids: value.permission_ids,
            status,
        })
    }
}
