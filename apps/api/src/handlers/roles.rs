use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;

use caresuite_application::UpdateRoleInput;
use caresuite_core::UserIdentity;
use caresuite_domain::RoleId;

use crate::dto::{
    CreateRoleRequest, DeleteRoleResponse, ModuleCoverageResponse, RoleCoverageResponse,
    RoleListResponse, RoleResponse, UpdateRoleRequest,
};
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::state::AppState;

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<RoleListResponse>> {
    let roles = state
        .role_admin_service
        .list_roles(&user)
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(RoleListResponse { roles }))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    ApiJson(payload): ApiJson<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let role = state
        .role_admin_service
        .create_role(&user, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn get_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .role_admin_service
        .get_role(&user, RoleId::parse(role_id.as_str())?)
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_id): Path<String>,
    ApiJson(payload): ApiJson<UpdateRoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let role_id = RoleId::parse(role_id.as_str())?;
    let input = UpdateRoleInput::try_from(payload)?;
    let role = state
        .role_admin_service
        .update_role(&user, role_id, input)
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<DeleteRoleResponse>> {
    let outcome = state
        .role_admin_service
        .delete_role(&user, RoleId::parse(role_id.as_str())?)
        .await?;

    Ok(Json(DeleteRoleResponse::from(outcome)))
}

pub async fn role_coverage_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<RoleCoverageResponse>> {
    let coverage = state
        .role_admin_service
        .role_coverage(&user, RoleId::parse(role_id.as_str())?)
        .await?
        .into_iter()
        .map(ModuleCoverageResponse::from)
        .collect();

    Ok(Json(RoleCoverageResponse { coverage }))
}
