/// Account model: links a user to an identity provider
///
/// One account exists per login method. For `provider = EMAIL` the
/// `provider_id` is the user's email address; for external providers it is
/// the provider's subject id.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE account_provider AS ENUM ('EMAIL', 'GOOGLE');
///
/// CREATE TABLE accounts (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     provider account_provider NOT NULL,
///     provider_id VARCHAR(255) NOT NULL,
///     refresh_token VARCHAR(512),
///     token_expiry TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (provider, provider_id)
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Identity source for an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_provider", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Provider {
    /// Local email/password credentials
    Email,

    /// Google OAuth
    Google,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Email => "EMAIL",
            Provider::Google => "GOOGLE",
        }
    }
}

/// Identity-provider link for a user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub user_id: Uuid,
    pub provider: Provider,
    pub provider_id: String,

    /// Provider refresh token, never serialized into responses
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,

    pub token_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an account link
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub user_id: Uuid,
    pub provider: Provider,
    pub provider_id: String,
}

impl Account {
    /// Creates a new account link
    pub async fn create(
        executor: impl PgExecutor<'_>,
        data: CreateAccount,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (user_id, provider, provider_id)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, provider, provider_id, refresh_token,
                      token_expiry, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.provider)
        .bind(data.provider_id)
        .fetch_one(executor)
        .await
    }

    /// Finds the account for a provider identity
    pub async fn find_by_provider(
        executor: impl PgExecutor<'_>,
        provider: Provider,
        provider_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, user_id, provider, provider_id, refresh_token,
                   token_expiry, created_at, updated_at
            FROM accounts
            WHERE provider = $1 AND provider_id = $2
            "#,
        )
        .bind(provider)
        .bind(provider_id)
        .fetch_optional(executor)
        .await
    }

    /// Counts accounts for a user
    pub async fn count_by_user(
        executor: impl PgExecutor<'_>,
        user_id: Uuid,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(executor)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_as_str() {
        assert_eq!(Provider::Email.as_str(), "EMAIL");
        assert_eq!(Provider::Google.as_str(), "GOOGLE");
    }

    #[test]
    fn test_refresh_token_is_never_serialized() {
        let account = Account {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            provider: Provider::Google,
            provider_id: "google-subject-id".to_string(),
            refresh_token: Some("secret-refresh-token".to_string()),
            token_expiry: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&account).unwrap();
        assert!(json.get("refreshToken").is_none());
        assert_eq!(json["provider"], "GOOGLE");
    }
}
