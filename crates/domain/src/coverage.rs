use caresuite_core::AppResult;
use serde::Serialize;

use crate::{PermissionCatalog, Role};

/// Share of one module's permissions granted by a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleCoverage {
    /// Module grouping label.
    pub module: String,
    /// Module permissions granted by the role.
    pub assigned: usize,
    /// Module permissions in the catalog.
    pub total: usize,
}

impl ModuleCoverage {
    /// Computes coverage of one module, failing for unknown modules.
    pub fn for_module(catalog: &PermissionCatalog, role: &Role, module: &str) -> AppResult<Self> {
        let permissions = catalog.permissions_in_module(module)?;
        let assigned = permissions
            .iter()
            .filter(|permission| role.has_permission(permission.id()))
            .count();

        Ok(Self {
            module: module.to_owned(),
            assigned,
            total: permissions.len(),
        })
    }

    /// Computes coverage of every catalog module in module order.
    #[must_use]
    pub fn for_all_modules(catalog: &PermissionCatalog, role: &Role) -> Vec<Self> {
        let mut coverage: Vec<Self> = catalog
            .list_modules()
            .into_iter()
            .map(|module| Self {
                module: module.to_owned(),
                assigned: 0,
                total: 0,
            })
            .collect();

        for permission in catalog.list_all() {
            if let Some(entry) = coverage
                .iter_mut()
                .find(|entry| entry.module == permission.module())
            {
                entry.total += 1;
                if role.has_permission(permission.id()) {
                    entry.assigned += 1;
                }
            }
        }

        coverage
    }

    /// Returns whether every permission of the module is granted.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.assigned == self.total
    }
}
