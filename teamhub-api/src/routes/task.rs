/// Task endpoints
///
/// # Endpoints
///
/// - `POST /api/tasks/projects/:project_id/workspaces/:workspace_id/create`
/// - `POST /api/tasks/:id/projects/:project_id/workspaces/:workspace_id/update`
/// - `GET /api/tasks/workspaces/:workspace_id/all`
/// - `GET /api/tasks/:id/projects/:project_id/workspaces/:workspace_id`
/// - `DELETE /api/tasks/:id/workspaces/:workspace_id/delete`
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use teamhub_shared::auth::permissions::Permission;
use teamhub_shared::models::task::{TaskFilters, TaskPriority, TaskStatus};
use teamhub_shared::pagination::PageRequest;
use teamhub_shared::services::task::{self, TaskInput};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::{AppState, AuthUser},
    error::{validation_error, ApiError, ApiResult},
};

/// Create/update task request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters"))]
    pub title: String,

    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskRequest {
    fn into_input(self) -> TaskInput {
        TaskInput {
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            assigned_to: self.assigned_to,
            due_date: self.due_date,
        }
    }
}

/// Task listing query parameters
///
/// List-valued filters arrive as comma-separated strings, e.g.
/// `?status=TODO,IN_PROGRESS&priority=HIGH`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListQuery {
    pub project_id: Option<Uuid>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assigned_to: Option<String>,
    pub keyword: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub page_size: Option<i64>,
    pub page_number: Option<i64>,
}

impl TaskListQuery {
    fn filters(&self) -> Result<TaskFilters, ApiError> {
        let status = split_list(self.status.as_deref())
            .map(|s| {
                TaskStatus::parse(s)
                    .ok_or_else(|| ApiError::BadRequest(format!("Invalid task status: {s}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let priority = split_list(self.priority.as_deref())
            .map(|s| {
                TaskPriority::parse(s)
                    .ok_or_else(|| ApiError::BadRequest(format!("Invalid task priority: {s}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let assigned_to = split_list(self.assigned_to.as_deref())
            .map(|s| {
                Uuid::parse_str(s)
                    .map_err(|_| ApiError::BadRequest(format!("Invalid assignee id: {s}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TaskFilters {
            project_id: self.project_id,
            status,
            priority,
            assigned_to,
            keyword: self.keyword.clone(),
            due_date: self.due_date,
        })
    }

    fn page(&self) -> PageRequest {
        PageRequest::new(self.page_size.unwrap_or(10), self.page_number.unwrap_or(1))
    }
}

fn split_list(value: Option<&str>) -> impl Iterator<Item = &str> {
    value
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Creates a task under a project
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((project_id, workspace_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<TaskRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    req.validate().map_err(|e| validation_error(&e))?;

    state
        .authorize(auth.user_id, workspace_id, &[Permission::CreateTask])
        .await?;

    let task = task::create_task(
        &state.db,
        workspace_id,
        project_id,
        auth.user_id,
        req.into_input(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": "Task created successfully",
            "task": task,
        })),
    ))
}

/// Fully overwrites a task's mutable fields
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((task_id, project_id, workspace_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(req): Json<TaskRequest>,
) -> ApiResult<Json<Value>> {
    req.validate().map_err(|e| validation_error(&e))?;

    state
        .authorize(auth.user_id, workspace_id, &[Permission::EditTask])
        .await?;

    let task = task::update_task(
        &state.db,
        workspace_id,
        project_id,
        task_id,
        req.into_input(),
    )
    .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Task updated successfully",
        "task": task,
    })))
}

/// Lists tasks matching the conjunction of the query filters
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(workspace_id): Path<Uuid>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<Value>> {
    state
        .authorize(auth.user_id, workspace_id, &[Permission::ViewOnly])
        .await?;

    let filters = query.filters()?;
    let page = task::list_tasks(&state.db, workspace_id, &filters, query.page()).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Tasks fetched successfully",
        "tasks": page.items,
        "pagination": page.meta,
    })))
}

/// Fetches a task scoped to its project and workspace
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((task_id, project_id, workspace_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<Json<Value>> {
    state
        .authorize(auth.user_id, workspace_id, &[Permission::ViewOnly])
        .await?;

    // The project segment scopes the lookup the same way the detail URL
    // is built by clients; a task under a different project is not found.
    let task = task::get_task(&state.db, workspace_id, task_id).await?;
    if task.project_id != project_id {
        return Err(ApiError::NotFound("Task not found.".to_string()));
    }

    Ok(Json(json!({
        "status": "success",
        "message": "Task fetched successfully",
        "task": task,
    })))
}

/// Deletes a task scoped to a workspace
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((task_id, workspace_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Value>> {
    state
        .authorize(auth.user_id, workspace_id, &[Permission::DeleteTask])
        .await?;

    task::delete_task(&state.db, workspace_id, task_id).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Task deleted successfully",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        let items: Vec<&str> = split_list(Some("TODO, DONE ,,IN_PROGRESS")).collect();
        assert_eq!(items, vec!["TODO", "DONE", "IN_PROGRESS"]);

        assert_eq!(split_list(None).count(), 0);
    }

    #[test]
    fn test_filters_reject_unknown_status() {
        let query = TaskListQuery {
            project_id: None,
            status: Some("TODO,NOT_A_STATUS".to_string()),
            priority: None,
            assigned_to: None,
            keyword: None,
            due_date: None,
            page_size: None,
            page_number: None,
        };

        assert!(query.filters().is_err());
    }

    #[test]
    fn test_filters_parse_lists() {
        let query = TaskListQuery {
            project_id: None,
            status: Some("TODO,IN_PROGRESS".to_string()),
            priority: Some("HIGH".to_string()),
            assigned_to: None,
            keyword: Some("deploy".to_string()),
            due_date: None,
            page_size: Some(20),
            page_number: Some(2),
        };

        let filters = query.filters().unwrap();
        assert_eq!(filters.status, vec![TaskStatus::Todo, TaskStatus::InProgress]);
        assert_eq!(filters.priority, vec![TaskPriority::High]);
        assert_eq!(filters.keyword.as_deref(), Some("deploy"));
        assert_eq!(query.page().skip(), 20);
    }
}
