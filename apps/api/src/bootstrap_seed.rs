use caresuite_application::CreateRoleInput;
use caresuite_core::{AppError, AppResult};
use caresuite_domain::Role;
use tracing::info;

use crate::api_services::RolePorts;

const ADMIN_ROLE_NAME: &str = "Admin";

struct DefaultRole {
    name: &'static str,
    description: &'static str,
    /// `None` grants the full catalog.
    permission_ids: Option<&'static [&'static str]>,
}

const DEFAULT_ROLES: &[DefaultRole] = &[
    DefaultRole {
        name: ADMIN_ROLE_NAME,
        description: "Full system access",
        permission_ids: None,
    },
    DefaultRole {
        name: "Doctor",
        description: "Medical staff with patient and records access",
        permission_ids: Some(&[
            "dashboard-view",
            "appointment-view",
            "appointment-create",
            "appointment-edit",
            "patient-view",
            "patient-edit",
            "medical-records-view",
            "medical-records-create",
            "medical-records-edit",
            "medical-records-download",
            "attendance-view",
            "attendance-checkin",
        ]),
    },
    DefaultRole {
        name: "Nurse",
        description: "Nursing staff with patient care access",
        permission_ids: Some(&[
            "dashboard-view",
            "appointment-view",
            "patient-view",
            "patient-edit",
            "medical-records-view",
            "medical-records-edit",
            "attendance-view",
            "attendance-checkin",
            "inventory-view",
            "inventory-adjust",
        ]),
    },
    DefaultRole {
        name: "Receptionist",
        description: "Front desk and appointment management",
        permission_ids: Some(&[
            "dashboard-view",
            "appointment-view",
            "appointment-create",
            "appointment-edit",
            "patient-view",
            "patient-create",
            "attendance-view",
            "attendance-checkin",
        ]),
    },
];

/// Seeds the default clinic roles and gives `admin_subject` the Admin role.
///
/// Roles whose name is already held by an active role are left untouched, and
/// a subject that already has a role keeps it.
pub async fn run(ports: &RolePorts, admin_subject: &str) -> AppResult<()> {
    let store = ports.role_store();
    let mut roles = store.list().await?;

    for default_role in DEFAULT_ROLES {
        if find_active(&roles, default_role.name).is_some() {
            continue;
        }

        let permission_ids = match default_role.permission_ids {
            Some(ids) => ids.iter().map(|id| (*id).to_owned()).collect(),
            None => ports
                .catalog
                .list_all()
                .iter()
                .map(|permission| permission.id().to_owned())
                .collect(),
        };

        let role = store
            .create(CreateRoleInput {
                name: default_role.name.to_owned(),
                description: default_role.description.to_owned(),
                permission_ids,
            })
            .await?;
        info!(role_id = %role.id(), role_name = role.name(), "seeded default role");
        roles.push(role);
    }

    let admin_role_id = find_active(&roles, ADMIN_ROLE_NAME)
        .map(Role::id)
        .ok_or_else(|| AppError::Internal("active Admin role is missing after seeding".to_owned()))?;

    if ports
        .user_directory
        .role_for_subject(admin_subject)
        .await?
        .is_none()
    {
        ports
            .user_directory
            .assign_role(admin_subject, admin_role_id)
            .await?;
        info!(subject = admin_subject, "assigned Admin role to bootstrap subject");
    }

    Ok(())
}

fn find_active<'a>(roles: &'a [Role], name: &str) -> Option<&'a Role> {
    roles
        .iter()
        .find(|role| role.is_active() && role.has_name(name))
}
