use caresuite_application::{AuthorizationService, RoleAdminService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub role_admin_service: RoleAdminService,
    pub authorization_service: AuthorizationService,
}
