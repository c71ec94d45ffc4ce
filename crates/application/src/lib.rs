//! Application services and ports.

#![forbid(unsafe_code)]

mod audit;
mod authorization_service;
mod role_admin_service;
mod role_ports;
mod role_store;

#[cfg(test)]
mod test_fakes;

pub use audit::{AuditEvent, AuditRepository};
pub use authorization_service::{AuthorizationService, EffectivePermissions};
pub use role_admin_service::RoleAdminService;
pub use role_ports::{
    CreateRoleInput, DeleteRoleOutcome, RoleRepository, UpdateRoleInput, UserDirectory,
};
pub use role_store::RoleStore;
