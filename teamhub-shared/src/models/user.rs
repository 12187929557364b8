/// User model and database operations
///
/// Users belong to workspaces through the members table. The password hash
/// is nullable: accounts provisioned through an external identity provider
/// never get one.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255),
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255),
///     profile_picture VARCHAR(512),
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     current_workspace_id UUID REFERENCES workspaces(id) ON DELETE SET NULL,
///     last_login_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, name, email, password_hash, profile_picture, is_active, \
     current_workspace_id, last_login_at, created_at, updated_at";

/// User account
///
/// The password hash is never serialized; every payload that carries a user
/// omits it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Display name
    pub name: Option<String>,

    /// Email address, unique across all users, stored lowercase
    pub email: String,

    /// Argon2id password hash, None for provider-only accounts
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,

    /// Profile picture URL
    pub profile_picture: Option<String>,

    /// Soft-disable flag
    pub is_active: bool,

    /// The workspace the user last worked in
    ///
    /// Reassigned by workspace teardown when it points at the deleted
    /// workspace.
    pub current_workspace_id: Option<Uuid>,

    /// When the user last logged in (None if never)
    pub last_login_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: Option<String>,
    pub email: String,
    /// Already-hashed password — never plaintext
    pub password_hash: Option<String>,
    pub profile_picture: Option<String>,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error on a duplicate email (unique constraint) or
    /// database failure.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        data: CreateUser,
    ) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, password_hash, profile_picture)
             VALUES ($1, LOWER($2), $3, $4)
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(data.name)
            .bind(data.email)
            .bind(data.password_hash)
            .bind(data.profile_picture)
            .fetch_one(executor)
            .await
    }

    /// Finds a user by ID
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Finds a user by email (case-insensitive)
    pub async fn find_by_email(
        executor: impl PgExecutor<'_>,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = LOWER($1)");

        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(executor)
            .await
    }

    /// Points the user's current workspace somewhere else (or nowhere)
    pub async fn set_current_workspace(
        executor: impl PgExecutor<'_>,
        id: Uuid,
        workspace_id: Option<Uuid>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET current_workspace_id = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(workspace_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Stamps the last-login timestamp after successful authentication
    pub async fn update_last_login(
        executor: impl PgExecutor<'_>,
        id: Uuid,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_is_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            name: Some("Test User".to_string()),
            email: "test@example.com".to_string(),
            password_hash: Some("$argon2id$secret".to_string()),
            profile_picture: None,
            is_active: true,
            current_workspace_id: None,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "test@example.com");
    }
}
