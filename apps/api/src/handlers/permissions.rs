use axum::Json;
use axum::extract::{Extension, State};

use caresuite_core::UserIdentity;

use crate::dto::{MyPermissionsResponse, PermissionCatalogResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_permissions_handler(
    State(state): State<AppState>,
) -> Json<PermissionCatalogResponse> {
    Json(PermissionCatalogResponse::from(
        state.role_admin_service.catalog(),
    ))
}

pub async fn my_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<MyPermissionsResponse>> {
    let effective = state
        .authorization_service
        .effective_permissions(&user)
        .await?;

    Ok(Json(MyPermissionsResponse::from(effective)))
}
