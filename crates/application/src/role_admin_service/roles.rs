use tracing::{info, warn};

use caresuite_domain::{AuditAction, ModuleCoverage, Role, RoleId};

use super::*;

use crate::role_ports::{CreateRoleInput, DeleteRoleOutcome, UpdateRoleInput};

impl RoleAdminService {
    /// Returns all roles for administrative users.
    pub async fn list_roles(&self, actor: &UserIdentity) -> AppResult<Vec<Role>> {
        self.require_role_manage_permission(actor).await?;
        self.store.list().await
    }

    /// Returns one role for administrative users.
    pub async fn get_role(&self, actor: &UserIdentity, role_id: RoleId) -> AppResult<Role> {
        self.require_role_manage_permission(actor).await?;
        self.store.get(role_id).await
    }

    /// Returns per-module coverage of one role.
    pub async fn role_coverage(
        &self,
        actor: &UserIdentity,
        role_id: RoleId,
    ) -> AppResult<Vec<ModuleCoverage>> {
        let role = self.get_role(actor, role_id).await?;
        Ok(self.authorization_service.coverage_by_module(&role))
    }

    /// Creates a role and emits an audit event.
    pub async fn create_role(
        &self,
        actor: &UserIdentity,
        input: CreateRoleInput,
    ) -> AppResult<Role> {
        self.require_role_manage_permission(actor).await?;

        let role = self.store.create(input).await?;
        info!(role_id = %role.id(), role_name = role.name(), actor = actor.subject(), "role created");

        self.append_audit(AuditEvent {
            subject: actor.subject().to_owned(),
            action: AuditAction::SecurityRoleCreated,
            resource_type: "rbac_role".to_owned(),
            resource_id: role.id().to_string(),
            detail: Some(format!(
                "created role '{}' with {} permission(s)",
                role.name(),
                role.permissions().len()
            )),
        })
        .await?;

        Ok(role)
    }

    /// Applies a partial role update and emits an audit event.
    pub async fn update_role(
        &self,
        actor: &UserIdentity,
        role_id: RoleId,
        input: UpdateRoleInput,
    ) -> AppResult<Role> {
        self.require_role_manage_permission(actor).await?;

        let changed_fields = changed_field_names(&input);
        let role = self.store.update(role_id, input).await?;
        info!(role_id = %role.id(), actor = actor.subject(), fields = %changed_fields, "role updated");

        self.append_audit(AuditEvent {
            subject: actor.subject().to_owned(),
            action: AuditAction::SecurityRoleUpdated,
            resource_type: "rbac_role".to_owned(),
            resource_id: role.id().to_string(),
            detail: Some(format!("updated role '{}' ({changed_fields})", role.name())),
        })
        .await?;

        Ok(role)
    }

    /// Deletes a role. Assigned users do not block deletion; they are
    /// released and the outcome carries a warning.
    pub async fn delete_role(
        &self,
        actor: &UserIdentity,
        role_id: RoleId,
    ) -> AppResult<DeleteRoleOutcome> {
        self.require_role_manage_permission(actor).await?;

        let outcome = self.store.delete(role_id).await?;
        if outcome.released_users > 0 {
            warn!(
                role_id = %role_id,
                released_users = outcome.released_users,
                actor = actor.subject(),
                "deleted role still had assigned users"
            );
        } else {
            info!(role_id = %role_id, actor = actor.subject(), "role deleted");
        }

        self.append_audit(AuditEvent {
            subject: actor.subject().to_owned(),
            action: AuditAction::SecurityRoleDeleted,
            resource_type: "rbac_role".to_owned(),
            resource_id: role_id.to_string(),
            detail: Some(format!(
                "deleted role '{}' (released {} user assignment(s))",
                outcome.role.name(),
                outcome.released_users
            )),
        })
        .await?;

        Ok(outcome)
    }
}

fn changed_field_names(input: &UpdateRoleInput) -> String {
    let fields: Vec<&str> = [
        input.name.as_ref().map(|_| "name"),
        input.description.as_ref().map(|_| "description"),
        input.permission_ids.as_ref().map(|_| "permissions"),
        input.status.as_ref().map(|_| "status"),
    ]
    .into_iter()
    .flatten()
    .collect();

    if fields.is_empty() {
        return "no changes".to_owned();
    }

    fields.join(", ")
}
