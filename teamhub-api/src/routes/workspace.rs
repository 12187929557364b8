/// Workspace endpoints
///
/// # Endpoints
///
/// - `POST /api/workspaces/create`
/// - `GET /api/workspaces/all`
/// - `GET /api/workspaces/:id`
/// - `PUT /api/workspaces/update/:id`
/// - `DELETE /api/workspaces/delete/:id`
/// - `GET /api/workspaces/members/:id`
/// - `PUT /api/workspaces/change/member/role/:id`
/// - `POST /api/workspaces/reset/invite/:id`
/// - `GET /api/workspaces/analytics/:id`
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use teamhub_shared::auth::permissions::Permission;
use teamhub_shared::services::workspace::{self, WorkspaceInput};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::{AppState, AuthUser},
    error::{validation_error, ApiResult},
};

/// Create/update workspace request
#[derive(Debug, Deserialize, Validate)]
pub struct WorkspaceRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1 to 255 characters"))]
    pub name: String,

    pub description: Option<String>,
}

/// Change member role request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeMemberRoleRequest {
    pub member_id: Uuid,
    pub role_id: Uuid,
}

/// Creates a workspace owned by the caller
pub async fn create_workspace(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<WorkspaceRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    req.validate().map_err(|e| validation_error(&e))?;

    let workspace = workspace::create_workspace(
        &state.db,
        auth.user_id,
        WorkspaceInput {
            name: req.name,
            description: req.description,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": "Workspace created successfully",
            "workspace": workspace,
        })),
    ))
}

/// Lists every workspace the caller belongs to
pub async fn list_workspaces(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<Value>> {
    let workspaces = workspace::list_user_workspaces(&state.db, auth.user_id).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "User workspaces fetched successfully",
        "workspaces": workspaces,
    })))
}

/// Fetches a workspace with its member roster
pub async fn get_workspace(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(workspace_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    state
        .authorize(auth.user_id, workspace_id, &[Permission::ViewOnly])
        .await?;

    let workspace = workspace::get_workspace_with_members(&state.db, workspace_id).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Workspace fetched successfully",
        "workspace": workspace,
    })))
}

/// Lists a workspace's members alongside the role catalog
pub async fn get_members(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(workspace_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    state
        .authorize(auth.user_id, workspace_id, &[Permission::ViewOnly])
        .await?;

    let (members, roles) = workspace::get_workspace_members(&state.db, workspace_id).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Workspace members fetched successfully",
        "members": members,
        "roles": roles,
    })))
}

/// Overwrites a workspace's name and description
pub async fn update_workspace(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(workspace_id): Path<Uuid>,
    Json(req): Json<WorkspaceRequest>,
) -> ApiResult<Json<Value>> {
    req.validate().map_err(|e| validation_error(&e))?;

    state
        .authorize(auth.user_id, workspace_id, &[Permission::EditWorkspace])
        .await?;

    let workspace = workspace::update_workspace(
        &state.db,
        workspace_id,
        WorkspaceInput {
            name: req.name,
            description: req.description,
        },
    )
    .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Workspace updated successfully",
        "workspace": workspace,
    })))
}

/// Reassigns a member's role
pub async fn change_member_role(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(workspace_id): Path<Uuid>,
    Json(req): Json<ChangeMemberRoleRequest>,
) -> ApiResult<Json<Value>> {
    state
        .authorize(auth.user_id, workspace_id, &[Permission::ChangeMemberRole])
        .await?;

    let member =
        workspace::change_member_role(&state.db, workspace_id, req.member_id, req.role_id).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Member role changed successfully",
        "member": member,
    })))
}

/// Regenerates the workspace invite code, invalidating the old one
pub async fn reset_invite_code(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(workspace_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    state
        .authorize(
            auth.user_id,
            workspace_id,
            &[Permission::ManageWorkspaceSettings],
        )
        .await?;

    let workspace = workspace::reset_invite_code(&state.db, workspace_id).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Invite code reset successfully",
        "workspace": workspace,
    })))
}

/// Count-based analytics across the workspace
pub async fn analytics(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(workspace_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    state
        .authorize(auth.user_id, workspace_id, &[Permission::ViewOnly])
        .await?;

    let analytics = workspace::workspace_analytics(&state.db, workspace_id).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Workspace analytics retrieved successfully",
        "analytics": analytics,
    })))
}

/// Deletes a workspace and everything scoped to it
///
/// Returns the caller's new current workspace so clients can redirect.
pub async fn delete_workspace(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(workspace_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    state
        .authorize(auth.user_id, workspace_id, &[Permission::DeleteWorkspace])
        .await?;

    let current_workspace = workspace::delete_workspace(&state.db, workspace_id, auth.user_id).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Workspace deleted successfully",
        "currentWorkspace": current_workspace,
    })))
}
