/// Project CRUD and per-project analytics
use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::{conflict_on_unique, ServiceError};
use crate::models::project::{CreateProject, Project};
use crate::models::task::{Task, TaskAnalytics};
use crate::pagination::{Page, PageRequest};

const PROJECT_NOT_FOUND: &str = "Project not found or does not belong to this workspace";

/// Input for creating a project
#[derive(Debug, Clone)]
pub struct ProjectInput {
    pub name: String,
    pub description: Option<String>,
    pub emoji: Option<String>,
}

/// Creates a project in a workspace
///
/// Names are unique per creator within a workspace.
pub async fn create_project(
    pool: &PgPool,
    workspace_id: Uuid,
    created_by: Uuid,
    input: ProjectInput,
) -> Result<Project, ServiceError> {
    if Project::find_by_creator_and_name(pool, workspace_id, created_by, &input.name)
        .await?
        .is_some()
    {
        return Err(ServiceError::Conflict("Project already exists".to_string()));
    }

    let project = Project::create(
        pool,
        CreateProject {
            name: input.name,
            description: input.description,
            emoji: input.emoji,
            workspace_id,
            created_by,
        },
    )
    .await?;

    info!(project_id = %project.id, workspace_id = %workspace_id, "Created project");
    Ok(project)
}

/// Fetches a project scoped to a workspace
pub async fn get_project(
    pool: &PgPool,
    workspace_id: Uuid,
    project_id: Uuid,
) -> Result<Project, ServiceError> {
    Project::find_in_workspace(pool, project_id, workspace_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(PROJECT_NOT_FOUND.to_string()))
}

/// Lists a workspace's projects, newest first
pub async fn list_projects(
    pool: &PgPool,
    workspace_id: Uuid,
    page: PageRequest,
) -> Result<Page<Project>, ServiceError> {
    let total = Project::count_by_workspace(pool, workspace_id).await?;
    let items = Project::list_by_workspace(pool, workspace_id, page).await?;

    Ok(Page {
        items,
        meta: page.meta(total),
    })
}

/// Overwrites a project's name, description, and emoji
pub async fn update_project(
    pool: &PgPool,
    workspace_id: Uuid,
    project_id: Uuid,
    input: ProjectInput,
) -> Result<Project, ServiceError> {
    let existing = Project::find_in_workspace(pool, project_id, workspace_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(PROJECT_NOT_FOUND.to_string()))?;

    let emoji = input.emoji.unwrap_or(existing.emoji);

    Project::update(
        pool,
        project_id,
        &input.name,
        input.description.as_deref(),
        Some(&emoji),
    )
    .await
    .map_err(|e| conflict_on_unique(e, "Project already exists"))?
    .ok_or_else(|| ServiceError::NotFound(PROJECT_NOT_FOUND.to_string()))
}

/// Deletes a project and its tasks in one transaction
pub async fn delete_project(
    pool: &PgPool,
    workspace_id: Uuid,
    project_id: Uuid,
) -> Result<Project, ServiceError> {
    let mut tx = pool.begin().await?;

    let project = Project::find_in_workspace(&mut *tx, project_id, workspace_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(PROJECT_NOT_FOUND.to_string()))?;

    Task::delete_by_project(&mut *tx, project_id).await?;
    Project::delete(&mut *tx, project_id).await?;

    tx.commit().await?;

    info!(project_id = %project_id, workspace_id = %workspace_id, "Deleted project");
    Ok(project)
}

/// Count-based analytics scoped to one project
pub async fn project_analytics(
    pool: &PgPool,
    workspace_id: Uuid,
    project_id: Uuid,
) -> Result<TaskAnalytics, ServiceError> {
    Project::find_in_workspace(pool, project_id, workspace_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(PROJECT_NOT_FOUND.to_string()))?;

    Ok(Task::analytics(pool, workspace_id, Some(project_id), Utc::now()).await?)
}
