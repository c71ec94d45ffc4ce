use caresuite_application::EffectivePermissions;
use caresuite_domain::{Permission, PermissionCatalog};

use super::types::{MyPermissionsResponse, PermissionCatalogResponse, PermissionResponse};

impl From<&Permission> for PermissionResponse {
    fn from(value: &Permission) -> Self {
        Self {
            id: value.id().to_owned(),
            name: value.name().to_owned(),
            description: value.description().to_owned(),
            module: value.module().to_owned(),
        }
    }
}

impl From<&PermissionCatalog> for PermissionCatalogResponse {
    fn from(value: &PermissionCatalog) -> Self {
        Self {
            permissions: value.list_all().iter().map(PermissionResponse::from).collect(),
            modules: value
                .list_modules()
                .into_iter()
                .map(ToOwned::to_owned)
                .collect(),
        }
    }
}

impl From<EffectivePermissions> for MyPermissionsResponse {
    fn from(value: EffectivePermissions) -> Self {
        Self {
            role_id: value.role_id.map(|role_id| role_id.to_string()),
            permissions: value
                .permissions
                .iter()
                .map(PermissionResponse::from)
                .collect(),
        }
    }
}
