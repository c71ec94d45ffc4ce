use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use caresuite_core::{AppError, AppResult, NonEmptyString};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable role identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleId(Uuid);

impl RoleId {
    /// Creates a random role identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a role identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Parses a transport value into a role identifier.
    pub fn parse(value: &str) -> AppResult<Self> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| AppError::NotFound(format!("role '{value}' was not found")))
    }
}

impl Default for RoleId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RoleId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Lifecycle status of a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleStatus {
    /// Role grants its permissions and reserves its name.
    Active,
    /// Role is kept for reference but grants nothing.
    Inactive,
}

impl RoleStatus {
    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Parses a transport value into a status.
    pub fn from_transport(value: &str) -> AppResult<Self> {
        Self::from_str(value)
    }
}

impl FromStr for RoleStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(AppError::Validation(format!(
                "unknown role status '{value}'"
            ))),
        }
    }
}

/// Administrator-defined bundle of permissions assignable to users.
///
/// The permission set is stored as identifiers only. Referential validity
/// against the catalog is enforced by the application layer before a role is
/// persisted, so a role loaded from storage may still reference a permission
/// that has since been retired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    id: RoleId,
    name: NonEmptyString,
    description: String,
    permissions: HashSet<String>,
    user_count: u64,
    created_at: DateTime<Utc>,
    status: RoleStatus,
}

impl Role {
    /// Creates a new active role with no assigned users.
    pub fn new<I>(
        id: RoleId,
        name: impl Into<String>,
        description: impl Into<String>,
        permissions: I,
        created_at: DateTime<Utc>,
    ) -> AppResult<Self>
    where
        I: IntoIterator<Item = String>,
    {
        Self::from_stored(
            id,
            name,
            description,
            permissions,
            created_at,
            RoleStatus::Active,
        )
    }

    /// Rebuilds a role from persisted state.
    pub fn from_stored<I>(
        id: RoleId,
        name: impl Into<String>,
        description: impl Into<String>,
        permissions: I,
        created_at: DateTime<Utc>,
        status: RoleStatus,
    ) -> AppResult<Self>
    where
        I: IntoIterator<Item = String>,
    {
        Ok(Self {
            id,
            name: NonEmptyString::for_field("name", name)?,
            description: description.into().trim().to_owned(),
            permissions: permissions.into_iter().collect(),
            user_count: 0,
            created_at,
            status,
        })
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn id(&self) -> RoleId {
        self.id
    }

    /// Returns the role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the role description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the granted permission identifiers.
    #[must_use]
    pub fn permissions(&self) -> &HashSet<String> {
        &self.permissions
    }

    /// Returns granted permission identifiers in lexical order.
    #[must_use]
    pub fn sorted_permissions(&self) -> Vec<&str> {
        let mut permissions: Vec<&str> = self.permissions.iter().map(String::as_str).collect();
        permissions.sort_unstable();
        permissions
    }

    /// Returns the number of users currently holding this role.
    #[must_use]
    pub fn user_count(&self) -> u64 {
        self.user_count
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub fn status(&self) -> RoleStatus {
        self.status
    }

    /// Returns whether the role is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == RoleStatus::Active
    }

    /// Returns true iff the permission identifier is granted by this role.
    ///
    /// Unknown or retired identifiers are simply not granted.
    #[must_use]
    pub fn has_permission(&self, permission_id: &str) -> bool {
        self.permissions.contains(permission_id)
    }

    /// Compares role names the way uniqueness is enforced.
    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        normalized_role_name(self.name.as_str()) == normalized_role_name(name)
    }

    /// Renames the role.
    pub fn rename(&mut self, name: impl Into<String>) -> AppResult<()> {
        self.name = NonEmptyString::for_field("name", name)?;
        Ok(())
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into().trim().to_owned();
    }

    /// Replaces the whole permission set.
    pub fn replace_permissions<I>(&mut self, permissions: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.permissions = permissions.into_iter().collect();
    }

    /// Changes the lifecycle status.
    pub fn set_status(&mut self, status: RoleStatus) {
        self.status = status;
    }

    /// Sets the denormalized assigned-user count.
    pub fn set_user_count(&mut self, user_count: u64) {
        self.user_count = user_count;
    }
}

/// Normalizes a role name for uniqueness checks.
///
/// Stored names are already trimmed, so the database key `lower(name)` sees
/// the same text. Non-ASCII case folding there follows the database collation.
#[must_use]
pub fn normalized_role_name(name: &str) -> String {
    name.trim().to_lowercase()
}
