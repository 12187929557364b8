/// Workspace model: the tenant boundary
///
/// Every project, task, and membership is scoped to a workspace. The invite
/// code is a regenerable opaque token that grants self-service member join.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE workspaces (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     owner_id UUID NOT NULL REFERENCES users(id),
///     invite_code VARCHAR(64) NOT NULL UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::ids::generate_invite_code;

const WORKSPACE_COLUMNS: &str =
    "id, name, description, owner_id, invite_code, created_at, updated_at";

/// Workspace record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
    pub invite_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a workspace
#[derive(Debug, Clone)]
pub struct CreateWorkspace {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
}

impl Workspace {
    /// Creates a workspace with a freshly generated invite code
    pub async fn create(
        executor: impl PgExecutor<'_>,
        data: CreateWorkspace,
    ) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO workspaces (name, description, owner_id, invite_code)
             VALUES ($1, $2, $3, $4)
             RETURNING {WORKSPACE_COLUMNS}"
        );

        sqlx::query_as::<_, Workspace>(&query)
            .bind(data.name)
            .bind(data.description)
            .bind(data.owner_id)
            .bind(generate_invite_code())
            .fetch_one(executor)
            .await
    }

    /// Finds a workspace by ID
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {WORKSPACE_COLUMNS} FROM workspaces WHERE id = $1");

        sqlx::query_as::<_, Workspace>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Finds a workspace by its invite code
    pub async fn find_by_invite_code(
        executor: impl PgExecutor<'_>,
        invite_code: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {WORKSPACE_COLUMNS} FROM workspaces WHERE invite_code = $1");

        sqlx::query_as::<_, Workspace>(&query)
            .bind(invite_code)
            .fetch_optional(executor)
            .await
    }

    /// Finds a workspace a given owner already named like this
    ///
    /// Backs the duplicate-name Conflict in workspace creation.
    pub async fn find_by_owner_and_name(
        executor: impl PgExecutor<'_>,
        owner_id: Uuid,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query =
            format!("SELECT {WORKSPACE_COLUMNS} FROM workspaces WHERE owner_id = $1 AND name = $2");

        sqlx::query_as::<_, Workspace>(&query)
            .bind(owner_id)
            .bind(name)
            .fetch_optional(executor)
            .await
    }

    /// Workspaces where the user holds a membership
    pub async fn list_by_member(
        executor: impl PgExecutor<'_>,
        user_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Workspace>(
            r#"
            SELECT w.id, w.name, w.description, w.owner_id, w.invite_code,
                   w.created_at, w.updated_at
            FROM workspaces w
            JOIN members m ON m.workspace_id = w.id
            WHERE m.user_id = $1
            ORDER BY w.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await
    }

    /// Overwrites name and description
    pub async fn update(
        executor: impl PgExecutor<'_>,
        id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE workspaces SET name = $2, description = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {WORKSPACE_COLUMNS}"
        );

        sqlx::query_as::<_, Workspace>(&query)
            .bind(id)
            .bind(name)
            .bind(description)
            .fetch_optional(executor)
            .await
    }

    /// Replaces the invite code with a fresh one
    pub async fn reset_invite_code(
        executor: impl PgExecutor<'_>,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE workspaces SET invite_code = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {WORKSPACE_COLUMNS}"
        );

        sqlx::query_as::<_, Workspace>(&query)
            .bind(id)
            .bind(generate_invite_code())
            .fetch_optional(executor)
            .await
    }

    /// Deletes the workspace row itself
    ///
    /// Dependent rows are removed explicitly by the teardown workflow
    /// before this runs.
    pub async fn delete(executor: impl PgExecutor<'_>, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workspaces WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
