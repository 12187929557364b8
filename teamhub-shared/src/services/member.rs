/// Invite-code enrollment
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::permissions::RoleName;
use crate::error::{conflict_on_unique, ServiceError};
use crate::models::member::{CreateMember, Member};
use crate::models::role::Role;
use crate::models::workspace::Workspace;

/// Enrolls a user in the workspace behind an invite code
///
/// New members always join with the MEMBER role. The membership table's
/// unique (user, workspace) constraint is the arbiter for concurrent
/// joins: whichever insert lands second surfaces as a conflict, with no
/// read-then-write window.
///
/// # Errors
///
/// - `NotFound` when the invite code matches no workspace
/// - `Conflict` when the user already belongs to the workspace
pub async fn join_workspace_by_invite(
    pool: &PgPool,
    user_id: Uuid,
    invite_code: &str,
) -> Result<(Workspace, RoleName), ServiceError> {
    let mut tx = pool.begin().await?;

    let workspace = Workspace::find_by_invite_code(&mut *tx, invite_code)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound("Invalid invite code or workspace not found".to_string())
        })?;

    let member_role = Role::find_by_name(&mut *tx, RoleName::Member)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Role not found".to_string()))?;

    Member::create(
        &mut *tx,
        CreateMember {
            user_id,
            workspace_id: workspace.id,
            role_id: member_role.id,
        },
    )
    .await
    .map_err(|err| conflict_on_unique(err, "You are already a member of this workspace"))?;

    tx.commit().await?;

    info!(user_id = %user_id, workspace_id = %workspace.id, "Joined workspace via invite");
    Ok((workspace, RoleName::Member))
}
