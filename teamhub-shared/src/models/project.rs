/// Project model and database operations
///
/// Projects group tasks within a workspace. The (workspace, creator, name)
/// triple is unique.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     emoji VARCHAR(16) NOT NULL DEFAULT '📊',
///     workspace_id UUID NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
///     created_by UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT projects_workspace_creator_name_key UNIQUE (workspace_id, created_by, name)
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::pagination::PageRequest;

/// Default emoji for projects created or updated without one
pub const DEFAULT_PROJECT_EMOJI: &str = "📊";

const PROJECT_COLUMNS: &str =
    "id, name, description, emoji, workspace_id, created_by, created_at, updated_at";

/// Project record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub emoji: String,
    pub workspace_id: Uuid,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a project
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    pub emoji: Option<String>,
    pub workspace_id: Uuid,
    pub created_by: Uuid,
}

impl Project {
    /// Creates a project
    pub async fn create(
        executor: impl PgExecutor<'_>,
        data: CreateProject,
    ) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (name, description, emoji, workspace_id, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {PROJECT_COLUMNS}"
        );

        sqlx::query_as::<_, Project>(&query)
            .bind(data.name)
            .bind(data.description)
            .bind(
                data.emoji
                    .unwrap_or_else(|| DEFAULT_PROJECT_EMOJI.to_string()),
            )
            .bind(data.workspace_id)
            .bind(data.created_by)
            .fetch_one(executor)
            .await
    }

    /// Finds a project that belongs to the given workspace
    ///
    /// Returns `None` both when the project does not exist and when it
    /// exists in a different workspace.
    pub async fn find_in_workspace(
        executor: impl PgExecutor<'_>,
        project_id: Uuid,
        workspace_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query =
            format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1 AND workspace_id = $2");

        sqlx::query_as::<_, Project>(&query)
            .bind(project_id)
            .bind(workspace_id)
            .fetch_optional(executor)
            .await
    }

    /// Finds a project by (workspace, creator, name)
    pub async fn find_by_creator_and_name(
        executor: impl PgExecutor<'_>,
        workspace_id: Uuid,
        created_by: Uuid,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects
             WHERE workspace_id = $1 AND created_by = $2 AND name = $3"
        );

        sqlx::query_as::<_, Project>(&query)
            .bind(workspace_id)
            .bind(created_by)
            .bind(name)
            .fetch_optional(executor)
            .await
    }

    /// One page of a workspace's projects, newest first
    pub async fn list_by_workspace(
        executor: impl PgExecutor<'_>,
        workspace_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects
             WHERE workspace_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );

        sqlx::query_as::<_, Project>(&query)
            .bind(workspace_id)
            .bind(page.page_size)
            .bind(page.skip())
            .fetch_all(executor)
            .await
    }

    /// Counts a workspace's projects
    pub async fn count_by_workspace(
        executor: impl PgExecutor<'_>,
        workspace_id: Uuid,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM projects WHERE workspace_id = $1")
                .bind(workspace_id)
                .fetch_one(executor)
                .await?;

        Ok(count)
    }

    /// Overwrites name, description, and emoji
    pub async fn update(
        executor: impl PgExecutor<'_>,
        id: Uuid,
        name: &str,
        description: Option<&str>,
        emoji: Option<&str>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET name = $2, description = $3, emoji = $4, updated_at = NOW()
             WHERE id = $1
             RETURNING {PROJECT_COLUMNS}"
        );

        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(name)
            .bind(description)
            .bind(emoji.unwrap_or(DEFAULT_PROJECT_EMOJI))
            .fetch_optional(executor)
            .await
    }

    /// Deletes a single project
    pub async fn delete(executor: impl PgExecutor<'_>, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes every project scoped to a workspace (teardown)
    pub async fn delete_by_workspace(
        executor: impl PgExecutor<'_>,
        workspace_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE workspace_id = $1")
            .bind(workspace_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
