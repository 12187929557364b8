/// Role → permission table and the permission guard
///
/// Every workspace-scoped operation names the permissions it requires; the
/// guard succeeds only when the caller's role covers all of them. The table
/// is an explicitly constructed, immutable [`RolePermissions`] value built
/// once at startup and held in the application state — there is no
/// module-level global.
///
/// # Roles
///
/// - **OWNER**: every permission
/// - **ADMIN**: manage members, projects, tasks, and workspace settings;
///   cannot edit or delete the workspace or change member roles
/// - **MEMBER**: read access plus creating and editing tasks
///
/// # Example
///
/// ```
/// use teamhub_shared::auth::permissions::{Permission, RoleName, RolePermissions};
///
/// let table = RolePermissions::new();
/// assert!(table.guard(RoleName::Owner, &[Permission::DeleteWorkspace]).is_ok());
/// assert!(table.guard(RoleName::Member, &[Permission::DeleteWorkspace]).is_err());
/// ```
use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// Fixed message carried by every authorization failure
///
/// Deliberately does not say which permission was missing.
pub const PERMISSION_DENIED_MESSAGE: &str =
    "You do not have the necessary permissions to perform this action";

/// Error type for permission checks
#[derive(Debug, thiserror::Error)]
pub enum PermissionError {
    /// The role's permission set does not cover the required permissions
    #[error("{PERMISSION_DENIED_MESSAGE}")]
    Denied,

    /// The role name is not part of the seeded table
    #[error("Role {0} not found")]
    UnknownRole(String),
}

/// Workspace-scoped permissions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    CreateWorkspace,
    DeleteWorkspace,
    EditWorkspace,
    ManageWorkspaceSettings,
    AddMember,
    ChangeMemberRole,
    RemoveMember,
    CreateProject,
    EditProject,
    DeleteProject,
    CreateTask,
    EditTask,
    DeleteTask,
    ViewOnly,
}

impl Permission {
    /// Wire/storage representation, matching the `roles.permissions` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::CreateWorkspace => "CREATE_WORKSPACE",
            Permission::DeleteWorkspace => "DELETE_WORKSPACE",
            Permission::EditWorkspace => "EDIT_WORKSPACE",
            Permission::ManageWorkspaceSettings => "MANAGE_WORKSPACE_SETTINGS",
            Permission::AddMember => "ADD_MEMBER",
            Permission::ChangeMemberRole => "CHANGE_MEMBER_ROLE",
            Permission::RemoveMember => "REMOVE_MEMBER",
            Permission::CreateProject => "CREATE_PROJECT",
            Permission::EditProject => "EDIT_PROJECT",
            Permission::DeleteProject => "DELETE_PROJECT",
            Permission::CreateTask => "CREATE_TASK",
            Permission::EditTask => "EDIT_TASK",
            Permission::DeleteTask => "DELETE_TASK",
            Permission::ViewOnly => "VIEW_ONLY",
        }
    }

    /// All permissions, in table order
    pub fn all() -> Vec<Permission> {
        vec![
            Permission::CreateWorkspace,
            Permission::DeleteWorkspace,
            Permission::EditWorkspace,
            Permission::ManageWorkspaceSettings,
            Permission::AddMember,
            Permission::ChangeMemberRole,
            Permission::RemoveMember,
            Permission::CreateProject,
            Permission::EditProject,
            Permission::DeleteProject,
            Permission::CreateTask,
            Permission::EditTask,
            Permission::DeleteTask,
            Permission::ViewOnly,
        ]
    }
}

/// Seeded role names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleName {
    Owner,
    Admin,
    Member,
}

impl RoleName {
    /// Wire/storage representation, matching the `roles.name` column
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Owner => "OWNER",
            RoleName::Admin => "ADMIN",
            RoleName::Member => "MEMBER",
        }
    }

    /// Parses a stored role name
    pub fn parse(name: &str) -> Result<Self, PermissionError> {
        match name {
            "OWNER" => Ok(RoleName::Owner),
            "ADMIN" => Ok(RoleName::Admin),
            "MEMBER" => Ok(RoleName::Member),
            other => Err(PermissionError::UnknownRole(other.to_string())),
        }
    }

    /// All seeded roles
    pub fn all() -> [RoleName; 3] {
        [RoleName::Owner, RoleName::Admin, RoleName::Member]
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable role → permission-set table
///
/// Constructed once at startup and shared through the application state.
#[derive(Debug, Clone)]
pub struct RolePermissions {
    table: HashMap<RoleName, BTreeSet<Permission>>,
}

impl Default for RolePermissions {
    fn default() -> Self {
        Self::new()
    }
}

impl RolePermissions {
    /// Builds the statically configured table
    pub fn new() -> Self {
        let mut table = HashMap::new();

        table.insert(
            RoleName::Owner,
            Permission::all().into_iter().collect::<BTreeSet<_>>(),
        );

        table.insert(
            RoleName::Admin,
            [
                Permission::AddMember,
                Permission::CreateProject,
                Permission::EditProject,
                Permission::DeleteProject,
                Permission::CreateTask,
                Permission::EditTask,
                Permission::DeleteTask,
                Permission::ManageWorkspaceSettings,
                Permission::ViewOnly,
            ]
            .into_iter()
            .collect(),
        );

        table.insert(
            RoleName::Member,
            [
                Permission::ViewOnly,
                Permission::CreateTask,
                Permission::EditTask,
            ]
            .into_iter()
            .collect(),
        );

        Self { table }
    }

    /// Permission set for a role
    pub fn permissions_for(&self, role: RoleName) -> &BTreeSet<Permission> {
        // every RoleName variant is inserted in new()
        &self.table[&role]
    }

    /// Checks whether `role` covers every permission in `required`
    ///
    /// Pure function over the in-memory table; no side effects.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::Denied`] (fixed message, surfaced as 401)
    /// when any required permission is missing.
    pub fn guard(&self, role: RoleName, required: &[Permission]) -> Result<(), PermissionError> {
        let granted = self.permissions_for(role);

        if required.iter().all(|p| granted.contains(p)) {
            Ok(())
        } else {
            Err(PermissionError::Denied)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_has_every_permission() {
        let table = RolePermissions::new();
        for permission in Permission::all() {
            assert!(
                table.guard(RoleName::Owner, &[permission]).is_ok(),
                "owner should hold {:?}",
                permission
            );
        }
    }

    #[test]
    fn test_guard_is_subset_check() {
        // guard(R, P) succeeds iff P ⊆ permissions[R], over all roles
        let table = RolePermissions::new();
        for role in RoleName::all() {
            let granted = table.permissions_for(role).clone();
            for permission in Permission::all() {
                let expected = granted.contains(&permission);
                assert_eq!(
                    table.guard(role, &[permission]).is_ok(),
                    expected,
                    "role {:?}, permission {:?}",
                    role,
                    permission
                );
            }
        }
    }

    #[test]
    fn test_guard_requires_all_of_required_set() {
        let table = RolePermissions::new();

        // admin holds CREATE_PROJECT but not DELETE_WORKSPACE; the pair fails
        assert!(table
            .guard(RoleName::Admin, &[Permission::CreateProject])
            .is_ok());
        assert!(table
            .guard(
                RoleName::Admin,
                &[Permission::CreateProject, Permission::DeleteWorkspace]
            )
            .is_err());
    }

    #[test]
    fn test_empty_requirement_always_passes() {
        let table = RolePermissions::new();
        for role in RoleName::all() {
            assert!(table.guard(role, &[]).is_ok());
        }
    }

    #[test]
    fn test_member_is_view_and_task_scoped() {
        let table = RolePermissions::new();
        assert!(table.guard(RoleName::Member, &[Permission::ViewOnly]).is_ok());
        assert!(table.guard(RoleName::Member, &[Permission::CreateTask]).is_ok());
        assert!(table.guard(RoleName::Member, &[Permission::EditTask]).is_ok());
        assert!(table
            .guard(RoleName::Member, &[Permission::CreateProject])
            .is_err());
        assert!(table
            .guard(RoleName::Member, &[Permission::ChangeMemberRole])
            .is_err());
    }

    #[test]
    fn test_denied_message_is_fixed() {
        let table = RolePermissions::new();
        let err = table
            .guard(RoleName::Member, &[Permission::DeleteWorkspace])
            .unwrap_err();
        assert_eq!(err.to_string(), PERMISSION_DENIED_MESSAGE);
    }

    #[test]
    fn test_role_name_parse_roundtrip() {
        for role in RoleName::all() {
            assert_eq!(RoleName::parse(role.as_str()).unwrap(), role);
        }
        assert!(RoleName::parse("SUPERUSER").is_err());
    }
}
