/// Membership endpoints
///
/// # Endpoints
///
/// - `POST /api/members/workspaces/:invite_code/join`
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::{json, Value};
use teamhub_shared::services::member;

use crate::{
    app::{AppState, AuthUser},
    error::ApiResult,
};

/// Joins the workspace behind an invite code
///
/// # Errors
///
/// - `404 Not Found`: Unknown invite code
/// - `409 Conflict`: Caller already belongs to the workspace
pub async fn join_workspace(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(invite_code): Path<String>,
) -> ApiResult<Json<Value>> {
    let (workspace, role) =
        member::join_workspace_by_invite(&state.db, auth.user_id, &invite_code).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Successfully joined the workspace",
        "workspaceId": workspace.id,
        "role": role.as_str(),
    })))
}
