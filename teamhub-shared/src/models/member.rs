/// Member model: user × workspace × role join
///
/// The UNIQUE (user_id, workspace_id) constraint is the source of truth for
/// "already a member": invite joins insert directly and map the constraint
/// violation, instead of racing a check-then-insert.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE members (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     workspace_id UUID NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
///     role_id UUID NOT NULL REFERENCES roles(id),
///     joined_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT members_user_workspace_key UNIQUE (user_id, workspace_id)
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

const MEMBER_COLUMNS: &str =
    "id, user_id, workspace_id, role_id, joined_at, created_at, updated_at";

/// Membership record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: Uuid,
    pub user_id: Uuid,
    pub workspace_id: Uuid,
    pub role_id: Uuid,
    pub joined_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a membership
#[derive(Debug, Clone)]
pub struct CreateMember {
    pub user_id: Uuid,
    pub workspace_id: Uuid,
    pub role_id: Uuid,
}

/// A member joined with user display fields and role name, for listings
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MemberWithUser {
    pub id: Uuid,
    pub user_id: Uuid,
    pub workspace_id: Uuid,
    pub joined_at: DateTime<Utc>,
    pub name: Option<String>,
    pub email: String,
    pub profile_picture: Option<String>,
    pub role_id: Uuid,
    pub role_name: String,
}

impl Member {
    /// Creates a membership
    ///
    /// # Errors
    ///
    /// A duplicate (user, workspace) pair surfaces as a unique constraint
    /// violation; callers map it to the "already a member" conflict.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        data: CreateMember,
    ) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO members (user_id, workspace_id, role_id)
             VALUES ($1, $2, $3)
             RETURNING {MEMBER_COLUMNS}"
        );

        sqlx::query_as::<_, Member>(&query)
            .bind(data.user_id)
            .bind(data.workspace_id)
            .bind(data.role_id)
            .fetch_one(executor)
            .await
    }

    /// Finds a user's membership in a workspace
    pub async fn find_by_user_and_workspace(
        executor: impl PgExecutor<'_>,
        user_id: Uuid,
        workspace_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query =
            format!("SELECT {MEMBER_COLUMNS} FROM members WHERE user_id = $1 AND workspace_id = $2");

        sqlx::query_as::<_, Member>(&query)
            .bind(user_id)
            .bind(workspace_id)
            .fetch_optional(executor)
            .await
    }

    /// Any other workspace the user still belongs to, oldest first
    ///
    /// Used by teardown to reassign the user's current workspace.
    pub async fn find_any_other_workspace(
        executor: impl PgExecutor<'_>,
        user_id: Uuid,
        excluding_workspace: Uuid,
    ) -> Result<Option<Uuid>, sqlx::Error> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT workspace_id FROM members
            WHERE user_id = $1 AND workspace_id <> $2
            ORDER BY joined_at ASC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(excluding_workspace)
        .fetch_optional(executor)
        .await?;

        Ok(row.map(|(id,)| id))
    }

    /// Members of a workspace joined with user and role display fields
    pub async fn list_with_users(
        executor: impl PgExecutor<'_>,
        workspace_id: Uuid,
    ) -> Result<Vec<MemberWithUser>, sqlx::Error> {
        sqlx::query_as::<_, MemberWithUser>(
            r#"
            SELECT m.id, m.user_id, m.workspace_id, m.joined_at,
                   u.name, u.email, u.profile_picture,
                   r.id AS role_id, r.name AS role_name
            FROM members m
            JOIN users u ON u.id = m.user_id
            JOIN roles r ON r.id = m.role_id
            WHERE m.workspace_id = $1
            ORDER BY m.joined_at ASC
            "#,
        )
        .bind(workspace_id)
        .fetch_all(executor)
        .await
    }

    /// Overwrites the member's role reference
    pub async fn set_role(
        executor: impl PgExecutor<'_>,
        id: Uuid,
        role_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let query = format!(
            "UPDATE members SET role_id = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {MEMBER_COLUMNS}"
        );

        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .bind(role_id)
            .fetch_one(executor)
            .await
    }

    /// Deletes every membership scoped to a workspace (teardown)
    pub async fn delete_by_workspace(
        executor: impl PgExecutor<'_>,
        workspace_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM members WHERE workspace_id = $1")
            .bind(workspace_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Counts memberships for a (user, workspace) pair
    pub async fn count_for(
        executor: impl PgExecutor<'_>,
        user_id: Uuid,
        workspace_id: Uuid,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM members WHERE user_id = $1 AND workspace_id = $2",
        )
        .bind(user_id)
        .bind(workspace_id)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }
}
