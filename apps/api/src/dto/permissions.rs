mod conversions;
mod types;

pub use types::{MyPermissionsResponse, PermissionCatalogResponse, PermissionResponse};
