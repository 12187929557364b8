/// Workspace lifecycle and membership queries
///
/// Creation and teardown are the two multi-table workflows here. Teardown
/// deletes every dependent record and repoints any current-workspace
/// reference before removing the workspace row, all in one transaction.
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::permissions::RoleName;
use crate::error::ServiceError;
use crate::models::member::{CreateMember, Member, MemberWithUser};
use crate::models::project::Project;
use crate::models::role::Role;
use crate::models::task::Task;
use crate::models::user::User;
use crate::models::workspace::{CreateWorkspace, Workspace};

/// Input for creating or updating a workspace
#[derive(Debug, Clone)]
pub struct WorkspaceInput {
    pub name: String,
    pub description: Option<String>,
}

/// A workspace together with its member roster
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceWithMembers {
    #[serde(flatten)]
    pub workspace: Workspace,
    pub members: Vec<MemberWithUser>,
}

/// Resolves the caller's role name within a workspace
///
/// This is the lookup behind every permission check: route handlers call
/// it once per request and hand the result to the role table.
///
/// # Errors
///
/// `NotFound` when the user, the workspace, or the membership is missing.
pub async fn get_member_role(
    pool: &PgPool,
    user_id: Uuid,
    workspace_id: Uuid,
) -> Result<RoleName, ServiceError> {
    User::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

    Workspace::find_by_id(pool, workspace_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Workspace not found".to_string()))?;

    let member = Member::find_by_user_and_workspace(pool, user_id, workspace_id)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound("You are not a member of this workspace".to_string())
        })?;

    let role = Role::find_by_id(pool, member.role_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Role not found".to_string()))?;

    role.role_name()
        .map_err(|_| ServiceError::Internal(format!("Unknown role name: {}", role.name)))
}

/// Creates a workspace owned by `owner_id` and enrolls the owner
///
/// Workspace names are unique per owner. The workspace row, the OWNER
/// membership, and the current-workspace pointer are written in one
/// transaction.
pub async fn create_workspace(
    pool: &PgPool,
    owner_id: Uuid,
    input: WorkspaceInput,
) -> Result<Workspace, ServiceError> {
    let mut tx = pool.begin().await?;

    if Workspace::find_by_owner_and_name(&mut *tx, owner_id, &input.name)
        .await?
        .is_some()
    {
        return Err(ServiceError::Conflict("Workspace already exists.".to_string()));
    }

    let workspace = Workspace::create(
        &mut *tx,
        CreateWorkspace {
            name: input.name,
            description: input.description,
            owner_id,
        },
    )
    .await?;

    let owner_role = Role::find_by_name(&mut *tx, RoleName::Owner)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Owner role not found".to_string()))?;

    Member::create(
        &mut *tx,
        CreateMember {
            user_id: owner_id,
            workspace_id: workspace.id,
            role_id: owner_role.id,
        },
    )
    .await?;

    User::set_current_workspace(&mut *tx, owner_id, Some(workspace.id)).await?;

    tx.commit().await?;

    info!(workspace_id = %workspace.id, owner_id = %owner_id, "Created workspace");
    Ok(workspace)
}

/// Fetches a workspace with its full member roster
pub async fn get_workspace_with_members(
    pool: &PgPool,
    workspace_id: Uuid,
) -> Result<WorkspaceWithMembers, ServiceError> {
    let workspace = Workspace::find_by_id(pool, workspace_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Workspace not found".to_string()))?;

    let members = Member::list_with_users(pool, workspace_id).await?;

    Ok(WorkspaceWithMembers { workspace, members })
}

/// Lists every workspace the user belongs to
pub async fn list_user_workspaces(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<Workspace>, ServiceError> {
    Ok(Workspace::list_by_member(pool, user_id).await?)
}

/// Lists a workspace's members alongside the role catalog
pub async fn get_workspace_members(
    pool: &PgPool,
    workspace_id: Uuid,
) -> Result<(Vec<MemberWithUser>, Vec<Role>), ServiceError> {
    let members = Member::list_with_users(pool, workspace_id).await?;
    let roles = Role::list(pool).await?;

    Ok((members, roles))
}

/// Overwrites a workspace's name and description
pub async fn update_workspace(
    pool: &PgPool,
    workspace_id: Uuid,
    input: WorkspaceInput,
) -> Result<Workspace, ServiceError> {
    Workspace::update(pool, workspace_id, &input.name, input.description.as_deref())
        .await?
        .ok_or_else(|| ServiceError::NotFound("Workspace not found".to_string()))
}

/// Reassigns a member's role within a workspace
pub async fn change_member_role(
    pool: &PgPool,
    workspace_id: Uuid,
    member_id: Uuid,
    role_id: Uuid,
) -> Result<Member, ServiceError> {
    Workspace::find_by_id(pool, workspace_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Workspace not found".to_string()))?;

    let role = Role::find_by_id(pool, role_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Role not found".to_string()))?;

    let member = Member::find_by_user_and_workspace(pool, member_id, workspace_id)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound("Member not found in this workspace".to_string())
        })?;

    Ok(Member::set_role(pool, member.id, role.id).await?)
}

/// Count-based analytics across an entire workspace
pub async fn workspace_analytics(
    pool: &PgPool,
    workspace_id: Uuid,
) -> Result<crate::models::task::TaskAnalytics, ServiceError> {
    Ok(Task::analytics(pool, workspace_id, None, chrono::Utc::now()).await?)
}

/// Deletes a workspace and everything scoped to it
///
/// Only the owner may tear a workspace down. Projects, tasks, and
/// memberships go first; any user whose current workspace pointed at the
/// deleted one is repointed to another workspace they belong to, or to
/// none. Returns the owner's new current workspace id.
///
/// # Errors
///
/// - `NotFound` when the workspace does not exist
/// - `Unauthorized` when the caller is not the owner
pub async fn delete_workspace(
    pool: &PgPool,
    workspace_id: Uuid,
    user_id: Uuid,
) -> Result<Option<Uuid>, ServiceError> {
    let mut tx = pool.begin().await?;

    let workspace = Workspace::find_by_id(&mut *tx, workspace_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Workspace not found".to_string()))?;

    if workspace.owner_id != user_id {
        return Err(ServiceError::Unauthorized(
            "You are not authorized to delete this workspace".to_string(),
        ));
    }

    let user = User::find_by_id(&mut *tx, user_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

    Task::delete_by_workspace(&mut *tx, workspace_id).await?;
    Project::delete_by_workspace(&mut *tx, workspace_id).await?;
    Member::delete_by_workspace(&mut *tx, workspace_id).await?;

    let mut next_workspace = user.current_workspace_id;
    if user.current_workspace_id == Some(workspace_id) {
        next_workspace = Member::find_any_other_workspace(&mut *tx, user_id, workspace_id).await?;
        User::set_current_workspace(&mut *tx, user_id, next_workspace).await?;
    }

    Workspace::delete(&mut *tx, workspace_id).await?;

    tx.commit().await?;

    info!(workspace_id = %workspace_id, "Deleted workspace");
    Ok(next_workspace)
}

/// Regenerates a workspace's invite code
pub async fn reset_invite_code(
    pool: &PgPool,
    workspace_id: Uuid,
) -> Result<Workspace, ServiceError> {
    Workspace::reset_invite_code(pool, workspace_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Workspace not found".to_string()))
}
