use tracing::info;

use caresuite_core::AppError;
use caresuite_domain::{AuditAction, RoleId};

use super::*;

impl RoleAdminService {
    /// Assigns an active role to a user, replacing any previous role.
    pub async fn assign_role(
        &self,
        actor: &UserIdentity,
        subject: &str,
        role_id: RoleId,
    ) -> AppResult<()> {
        self.require_role_manage_permission(actor).await?;

        let subject = subject.trim();
        if subject.is_empty() {
            return Err(AppError::Validation(
                "subject must not be empty or whitespace".to_owned(),
            ));
        }

        let role = self.store.get(role_id).await?;
        if !role.is_active() {
            return Err(AppError::Validation(format!(
                "role '{}' is inactive and cannot be assigned",
                role.name()
            )));
        }

        self.user_directory.assign_role(subject, role_id).await?;
        info!(role_id = %role_id, subject, actor = actor.subject(), "role assigned");

        self.append_audit(AuditEvent {
            subject: actor.subject().to_owned(),
            action: AuditAction::SecurityRoleAssigned,
            resource_type: "rbac_user_role".to_owned(),
            resource_id: format!("{subject}:{role_id}"),
            detail: Some(format!("assigned role '{}' to '{subject}'", role.name())),
        })
        .await
    }

    /// Removes a user's role assignment.
    pub async fn unassign_role(&self, actor: &UserIdentity, subject: &str) -> AppResult<()> {
        self.require_role_manage_permission(actor).await?;

        if !self.user_directory.unassign_role(subject).await? {
            return Err(AppError::NotFound(format!(
                "user '{subject}' has no role assignment"
            )));
        }
        info!(subject, actor = actor.subject(), "role unassigned");

        self.append_audit(AuditEvent {
            subject: actor.subject().to_owned(),
            action: AuditAction::SecurityRoleUnassigned,
            resource_type: "rbac_user_role".to_owned(),
            resource_id: subject.to_owned(),
            detail: Some(format!("removed role assignment from '{subject}'")),
        })
        .await
    }
}
