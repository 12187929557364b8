/// Project endpoints
///
/// # Endpoints
///
/// - `POST /api/projects/workspaces/:workspace_id/create`
/// - `GET /api/projects/workspaces/:workspace_id/all`
/// - `GET/PUT/DELETE /api/projects/:project_id/workspaces/:workspace_id`
/// - `GET /api/projects/:project_id/workspaces/:workspace_id/analytics`
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use teamhub_shared::auth::permissions::Permission;
use teamhub_shared::pagination::PageRequest;
use teamhub_shared::services::project::{self, ProjectInput};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::{AppState, AuthUser},
    error::{validation_error, ApiResult},
};

/// Create/update project request
#[derive(Debug, Deserialize, Validate)]
pub struct ProjectRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1 to 255 characters"))]
    pub name: String,

    pub description: Option<String>,

    pub emoji: Option<String>,
}

/// Pagination query parameters
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page_size: Option<i64>,
    pub page_number: Option<i64>,
}

impl PageQuery {
    fn request(&self) -> PageRequest {
        PageRequest::new(self.page_size.unwrap_or(10), self.page_number.unwrap_or(1))
    }
}

/// Creates a project in a workspace
pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(workspace_id): Path<Uuid>,
    Json(req): Json<ProjectRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    req.validate().map_err(|e| validation_error(&e))?;

    state
        .authorize(auth.user_id, workspace_id, &[Permission::CreateProject])
        .await?;

    let project = project::create_project(
        &state.db,
        workspace_id,
        auth.user_id,
        ProjectInput {
            name: req.name,
            description: req.description,
            emoji: req.emoji,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": "Project created successfully",
            "project": project,
        })),
    ))
}

/// Lists a workspace's projects, paginated
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(workspace_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Value>> {
    state
        .authorize(auth.user_id, workspace_id, &[Permission::ViewOnly])
        .await?;

    let page = project::list_projects(&state.db, workspace_id, query.request()).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Projects fetched successfully",
        "projects": page.items,
        "pagination": page.meta,
    })))
}

/// Fetches a project scoped to a workspace
pub async fn get_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((project_id, workspace_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Value>> {
    state
        .authorize(auth.user_id, workspace_id, &[Permission::ViewOnly])
        .await?;

    let project = project::get_project(&state.db, workspace_id, project_id).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Project fetched successfully",
        "project": project,
    })))
}

/// Overwrites a project's name, description, and emoji
pub async fn update_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((project_id, workspace_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<ProjectRequest>,
) -> ApiResult<Json<Value>> {
    req.validate().map_err(|e| validation_error(&e))?;

    state
        .authorize(auth.user_id, workspace_id, &[Permission::EditProject])
        .await?;

    let project = project::update_project(
        &state.db,
        workspace_id,
        project_id,
        ProjectInput {
            name: req.name,
            description: req.description,
            emoji: req.emoji,
        },
    )
    .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Project updated successfully",
        "project": project,
    })))
}

/// Deletes a project and its tasks
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((project_id, workspace_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Value>> {
    state
        .authorize(auth.user_id, workspace_id, &[Permission::DeleteProject])
        .await?;

    project::delete_project(&state.db, workspace_id, project_id).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Project deleted successfully",
    })))
}

/// Count-based analytics scoped to one project
pub async fn analytics(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((project_id, workspace_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Value>> {
    state
        .authorize(auth.user_id, workspace_id, &[Permission::ViewOnly])
        .await?;

    let analytics = project::project_analytics(&state.db, workspace_id, project_id).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Project analytics retrieved successfully",
        "analytics": analytics,
    })))
}
