use std::collections::{HashMap, HashSet};

use caresuite_core::{AppError, AppResult};
use serde::Serialize;

/// Permission required to administer roles and user role assignments.
pub const ROLE_MANAGE_PERMISSION: &str = "roles-manage";

/// Atomic capability a role may grant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Permission {
    id: String,
    name: String,
    description: String,
    module: String,
}

impl Permission {
    /// Creates a permission with validated identifier, name and module.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        module: impl Into<String>,
    ) -> AppResult<Self> {
        let id = id.into();
        let name = name.into();
        let module = module.into();

        if id.trim().is_empty() || id.chars().any(char::is_whitespace) {
            return Err(AppError::Validation(format!(
                "permission id '{id}' must be a non-empty token without whitespace"
            )));
        }
        if name.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "permission '{id}' must have a display name"
            )));
        }
        if module.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "permission '{id}' must belong to a module"
            )));
        }

        Ok(Self {
            id,
            name,
            description: description.into(),
            module,
        })
    }

    fn builtin(
        id: &'static str,
        name: &'static str,
        description: &'static str,
        module: &'static str,
    ) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            description: description.to_owned(),
            module: module.to_owned(),
        }
    }

    /// Returns the stable permission identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the module grouping label.
    #[must_use]
    pub fn module(&self) -> &str {
        self.module.as_str()
    }
}

/// Immutable, ordered set of every permission known to the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionCatalog {
    permissions: Vec<Permission>,
    positions: HashMap<String, usize>,
}

impl PermissionCatalog {
    /// Builds a catalog, rejecting duplicate permission identifiers.
    pub fn new(permissions: Vec<Permission>) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for permission in &permissions {
            if !seen.insert(permission.id()) {
                return Err(AppError::Validation(format!(
                    "duplicate permission id '{}' in catalog",
                    permission.id()
                )));
            }
        }

        Ok(Self::indexed(permissions))
    }

    /// Returns the built-in clinic catalog.
    #[must_use]
    pub fn clinic() -> Self {
        let permissions = CLINIC_PERMISSIONS
            .iter()
            .map(|&(id, name, description, module)| {
                Permission::builtin(id, name, description, module)
            })
            .collect();

        Self::indexed(permissions)
    }

    fn indexed(permissions: Vec<Permission>) -> Self {
        let positions = permissions
            .iter()
            .enumerate()
            .map(|(position, permission)| (permission.id.clone(), position))
            .collect();

        Self {
            permissions,
            positions,
        }
    }

    /// Returns every permission in declaration order.
    #[must_use]
    pub fn list_all(&self) -> &[Permission] {
        self.permissions.as_slice()
    }

    /// Returns distinct module names in order of first appearance.
    #[must_use]
    pub fn list_modules(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.permissions
            .iter()
            .map(Permission::module)
            .filter(|module| seen.insert(*module))
            .collect()
    }

    /// Returns the permissions of one module in declaration order.
    pub fn permissions_in_module(&self, module: &str) -> AppResult<Vec<&Permission>> {
        let permissions: Vec<&Permission> = self
            .permissions
            .iter()
            .filter(|permission| permission.module() == module)
            .collect();

        if permissions.is_empty() {
            return Err(AppError::NotFound(format!(
                "permission module '{module}' was not found"
            )));
        }

        Ok(permissions)
    }

    /// Returns whether the identifier is part of the catalog.
    #[must_use]
    pub fn contains(&self, permission_id: &str) -> bool {
        self.positions.contains_key(permission_id)
    }

    /// Finds a permission by identifier.
    #[must_use]
    pub fn find(&self, permission_id: &str) -> Option<&Permission> {
        self.positions
            .get(permission_id)
            .and_then(|position| self.permissions.get(*position))
    }

    /// Returns identifiers not present in the catalog, deduplicated in input order.
    pub fn unknown_ids<'a, I>(&self, permission_ids: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        permission_ids
            .into_iter()
            .filter(|permission_id| !self.contains(permission_id))
            .filter(|permission_id| seen.insert(*permission_id))
            .map(str::to_owned)
            .collect()
    }

    /// Fails with `InvalidPermission` when any identifier is not in the catalog.
    pub fn ensure_known<'a, I>(&self, permission_ids: I) -> AppResult<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let unknown = self.unknown_ids(permission_ids);
        if unknown.is_empty() {
            return Ok(());
        }

        Err(AppError::InvalidPermission(unknown))
    }
}

impl Default for PermissionCatalog {
    fn default() -> Self {
        Self::clinic()
    }
}

const CLINIC_PERMISSIONS: &[(&str, &str, &str, &str)] = &[
    ("dashboard-view", "View Dashboard", "Access dashboard and statistics", "Dashboard"),
    ("dashboard-export", "Export Dashboard Data", "Export dashboard reports", "Dashboard"),
    ("appointment-view", "View Appointments", "Access appointments list", "Appointments"),
    ("appointment-create", "Create Appointments", "Create new appointments", "Appointments"),
    ("appointment-edit", "Edit Appointments", "Edit existing appointments", "Appointments"),
    ("appointment-delete", "Delete Appointments", "Delete appointments", "Appointments"),
    ("attendance-view", "View Attendance", "Access attendance records", "Attendance"),
    ("attendance-checkin", "Check In/Out", "Perform attendance check-in and check-out", "Attendance"),
    ("attendance-manage", "Manage Attendance", "Edit and manage attendance records", "Attendance"),
    ("attendance-reports", "Attendance Reports", "View attendance reports and analytics", "Attendance"),
    ("inventory-view", "View Inventory", "Access inventory list", "Inventory"),
    ("inventory-add", "Add Items", "Add new inventory items", "Inventory"),
    ("inventory-edit", "Edit Items", "Edit inventory items", "Inventory"),
    ("inventory-delete", "Delete Items", "Delete inventory items", "Inventory"),
    ("inventory-adjust", "Adjust Stock", "Adjust stock quantities", "Inventory"),
    ("staff-view", "View Staff", "Access staff directory", "Staff"),
    ("staff-create", "Add Staff", "Add new staff members", "Staff"),
    ("staff-edit", "Edit Staff", "Edit staff information", "Staff"),
    ("staff-delete", "Delete Staff", "Delete staff records", "Staff"),
    ("patient-view", "View Patients", "Access patient records", "Patients"),
    ("patient-create", "Add Patients", "Create new patient records", "Patients"),
    ("patient-edit", "Edit Patients", "Edit patient information", "Patients"),
    ("patient-delete", "Delete Patients", "Delete patient records", "Patients"),
    ("medical-records-view", "View Medical Records", "Access medical records", "Medical Records"),
    ("medical-records-create", "Create Records", "Create new medical records", "Medical Records"),
    ("medical-records-edit", "Edit Records", "Edit medical records", "Medical Records"),
    ("medical-records-delete", "Delete Records", "Delete medical records", "Medical Records"),
    ("medical-records-download", "Download Records", "Download medical records as PDF", "Medical Records"),
    ("reports-view", "View Reports", "Access reports and analytics", "Reports"),
    ("reports-export", "Export Reports", "Export reports", "Reports"),
    (ROLE_MANAGE_PERMISSION, "Manage Roles", "Create and manage roles", "Roles & Permissions"),
];

#[cfg(test)]
mod tests {
    use caresuite_core::AppError;
    use proptest::prelude::*;

    use super::{Permission, PermissionCatalog, ROLE_MANAGE_PERMISSION};

    fn small_catalog() -> PermissionCatalog {
        let permissions = vec![
            Permission::new("patient-view", "View Patients", "", "Patients"),
            Permission::new("patient-edit", "Edit Patients", "", "Patients"),
            Permission::new("inventory-view", "View Inventory", "", "Inventory"),
        ]
        .into_iter()
        .collect::<Result<Vec<_>, _>>();

        match permissions.and_then(PermissionCatalog::new) {
            Ok(catalog) => catalog,
            Err(error) => panic!("failed to build catalog: {error}"),
        }
    }

    #[test]
    fn clinic_catalog_has_unique_ids() {
        let clinic = PermissionCatalog::clinic();
        let rebuilt = PermissionCatalog::new(clinic.list_all().to_vec());

        assert!(rebuilt.is_ok());
        assert_eq!(clinic.list_all().len(), 31);
        assert!(clinic.contains(ROLE_MANAGE_PERMISSION));
    }

    #[test]
    fn clinic_modules_follow_declaration_order() {
        let clinic = PermissionCatalog::clinic();

        assert_eq!(
            clinic.list_modules(),
            vec![
                "Dashboard",
                "Appointments",
                "Attendance",
                "Inventory",
                "Staff",
                "Patients",
                "Medical Records",
                "Reports",
                "Roles & Permissions",
            ]
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let permissions = vec![
            Permission::new("patient-view", "View Patients", "", "Patients"),
            Permission::new("patient-view", "View Patients Again", "", "Patients"),
        ]
        .into_iter()
        .collect::<Result<Vec<_>, _>>();

        let result = permissions.and_then(PermissionCatalog::new);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn permission_requires_module_and_token_id() {
        assert!(Permission::new("patient view", "View", "", "Patients").is_err());
        assert!(Permission::new("patient-view", "View", "", "  ").is_err());
    }

    #[test]
    fn permissions_in_module_filters_in_order() {
        let catalog = small_catalog();
        let ids: Vec<&str> = catalog
            .permissions_in_module("Patients")
            .map(|permissions| permissions.into_iter().map(Permission::id).collect())
            .unwrap_or_default();

        assert_eq!(ids, vec!["patient-view", "patient-edit"]);
    }

    #[test]
    fn unknown_module_is_not_found() {
        let catalog = small_catalog();
        let result = catalog.permissions_in_module("Patient");

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn ensure_known_lists_each_offender_once() {
        let catalog = small_catalog();
        let result = catalog.ensure_known(["patient-view", "bogus-id", "bogus-id", "other"]);

        match result {
            Err(AppError::InvalidPermission(ids)) => {
                assert_eq!(ids, vec!["bogus-id".to_owned(), "other".to_owned()]);
            }
            other => panic!("expected invalid permission error, got {other:?}"),
        }
    }

    #[test]
    fn find_returns_catalog_entry() {
        let catalog = PermissionCatalog::clinic();
        let permission = catalog.find("medical-records-download");

        assert_eq!(permission.map(Permission::module), Some("Medical Records"));
        assert!(catalog.find("medical-records-print").is_none());
    }

    proptest! {
        #[test]
        fn unknown_ids_never_contains_catalog_members(ids in proptest::collection::vec("[a-z-]{1,24}", 0..12)) {
            let catalog = PermissionCatalog::clinic();
            let unknown = catalog.unknown_ids(ids.iter().map(String::as_str));

            prop_assert!(unknown.iter().all(|id| !catalog.contains(id)));
            prop_assert!(ids.iter().filter(|id| !catalog.contains(id)).all(|id| unknown.contains(id)));
        }
    }
}
