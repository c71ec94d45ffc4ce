use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;

use caresuite_core::UserIdentity;
use caresuite_domain::RoleId;

use crate::dto::AssignRoleRequest;
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::state::AppState;

pub async fn assign_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(subject): Path<String>,
    ApiJson(payload): ApiJson<AssignRoleRequest>,
) -> ApiResult<StatusCode> {
    let role_id = RoleId::parse(payload.role_id.as_str())?;
    state
        .role_admin_service
        .assign_role(&user, subject.as_str(), role_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn unassign_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(subject): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .role_admin_service
        .unassign_role(&user, subject.as_str())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
