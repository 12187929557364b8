/// Task CRUD and filtered listing
///
/// Every operation is scoped: tasks are looked up by (id, project,
/// workspace) or (id, workspace), so a task reachable under one workspace
/// can never be read or mutated through another.
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::models::member::Member;
use crate::models::project::Project;
use crate::models::task::{CreateTask, Task, TaskFilters, TaskPriority, TaskStatus, UpdateTask};
use crate::pagination::{Page, PageRequest};

const TASK_NOT_IN_PROJECT: &str = "Task not found or does not belong to this project";
const PROJECT_NOT_FOUND: &str = "Project not found or does not belong to this workspace";

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct TaskInput {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<Uuid>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
}

/// Creates a task under a project
///
/// The project must belong to the workspace, and the assignee, when set,
/// must already be a member of it.
pub async fn create_task(
    pool: &PgPool,
    workspace_id: Uuid,
    project_id: Uuid,
    created_by: Uuid,
    input: TaskInput,
) -> Result<Task, ServiceError> {
    Project::find_in_workspace(pool, project_id, workspace_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(PROJECT_NOT_FOUND.to_string()))?;

    if let Some(assignee) = input.assigned_to {
        ensure_member(pool, assignee, workspace_id).await?;
    }

    let task = Task::create(
        pool,
        CreateTask {
            title: input.title,
            description: input.description,
            project_id,
            workspace_id,
            status: input.status,
            priority: input.priority,
            assigned_to: input.assigned_to,
            created_by,
            due_date: input.due_date,
        },
    )
    .await?;

    info!(task_id = %task.id, project_id = %project_id, "Created task");
    Ok(task)
}

/// Fully overwrites a task's mutable fields
///
/// The task must sit under the given project and workspace. A new
/// assignee is subject to the same membership check as creation.
pub async fn update_task(
    pool: &PgPool,
    workspace_id: Uuid,
    project_id: Uuid,
    task_id: Uuid,
    input: TaskInput,
) -> Result<Task, ServiceError> {
    let existing = Task::find_scoped(pool, task_id, project_id, workspace_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(TASK_NOT_IN_PROJECT.to_string()))?;

    if let Some(assignee) = input.assigned_to {
        if existing.assigned_to != Some(assignee) {
            ensure_member(pool, assignee, workspace_id).await?;
        }
    }

    Task::update(
        pool,
        task_id,
        UpdateTask {
            title: input.title,
            description: input.description,
            status: input.status.unwrap_or(existing.status),
            priority: input.priority.unwrap_or(existing.priority),
            assigned_to: input.assigned_to,
            due_date: input.due_date,
        },
    )
    .await?
    .ok_or_else(|| ServiceError::NotFound(TASK_NOT_IN_PROJECT.to_string()))
}

/// Fetches a task scoped to a workspace
pub async fn get_task(
    pool: &PgPool,
    workspace_id: Uuid,
    task_id: Uuid,
) -> Result<Task, ServiceError> {
    Task::find_in_workspace(pool, task_id, workspace_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Task not found.".to_string()))
}

/// Lists tasks matching the conjunction of the given filters
pub async fn list_tasks(
    pool: &PgPool,
    workspace_id: Uuid,
    filters: &TaskFilters,
    page: PageRequest,
) -> Result<Page<Task>, ServiceError> {
    let (items, total) = Task::list(pool, workspace_id, filters, page).await?;

    Ok(Page {
        items,
        meta: page.meta(total),
    })
}

/// Deletes a task scoped to a workspace
pub async fn delete_task(
    pool: &PgPool,
    workspace_id: Uuid,
    task_id: Uuid,
) -> Result<(), ServiceError> {
    let deleted = Task::delete_in_workspace(pool, task_id, workspace_id).await?;

    if !deleted {
        return Err(ServiceError::NotFound(
            "Task not found or does not belong to the specified workspace".to_string(),
        ));
    }

    info!(task_id = %task_id, workspace_id = %workspace_id, "Deleted task");
    Ok(())
}

async fn ensure_member(
    pool: &PgPool,
    user_id: Uuid,
    workspace_id: Uuid,
) -> Result<(), ServiceError> {
    if Member::find_by_user_and_workspace(pool, user_id, workspace_id)
        .await?
        .is_none()
    {
        return Err(ServiceError::BadRequest(
            "Assigned user is not a member of this workspace.".to_string(),
        ));
    }

    Ok(())
}
