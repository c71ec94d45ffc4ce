//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod coverage;
mod permission;
mod role;
mod security;

pub use coverage::ModuleCoverage;
pub use permission::{Permission, PermissionCatalog, ROLE_MANAGE_PERMISSION};
pub use role::{Role, RoleId, RoleStatus, normalized_role_name};
pub use security::AuditAction;
