/// Role model: seeded role records
///
/// Members reference role rows by id. The permission sets themselves are
/// defined in code ([`crate::auth::permissions::RolePermissions`]); the
/// table mirrors them so role ids are stable references and the catalog
/// can be listed to clients. Seeded once at startup, immutable afterwards.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE roles (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(32) NOT NULL UNIQUE CHECK (name IN ('OWNER', 'ADMIN', 'MEMBER')),
///     permissions TEXT[] NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::auth::permissions::{PermissionError, RoleName};

/// Seeded role record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// The typed role name for this record
    pub fn role_name(&self) -> Result<RoleName, PermissionError> {
        RoleName::parse(&self.name)
    }

    /// Finds a role by name
    ///
    /// Returns `None` when the role table was never seeded.
    pub async fn find_by_name(
        executor: impl PgExecutor<'_>,
        name: RoleName,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Role>(
            "SELECT id, name, permissions, created_at, updated_at FROM roles WHERE name = $1",
        )
        .bind(name.as_str())
        .fetch_optional(executor)
        .await
    }

    /// Finds a role by ID
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Role>(
            "SELECT id, name, permissions, created_at, updated_at FROM roles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Lists the full role catalog
    pub async fn list(executor: impl PgExecutor<'_>) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Role>(
            "SELECT id, name, permissions, created_at, updated_at FROM roles ORDER BY name",
        )
        .fetch_all(executor)
        .await
    }

    /// Inserts or refreshes a role's permission set (seeding only)
    pub async fn upsert(
        executor: impl PgExecutor<'_>,
        name: RoleName,
        permissions: &[String],
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Role>(
            r#"
            INSERT INTO roles (name, permissions)
            VALUES ($1, $2)
            ON CONFLICT (name)
            DO UPDATE SET permissions = EXCLUDED.permissions, updated_at = NOW()
            RETURNING id, name, permissions, created_at, updated_at
            "#,
        )
        .bind(name.as_str())
        .bind(permissions)
        .fetch_one(executor)
        .await
    }
}
