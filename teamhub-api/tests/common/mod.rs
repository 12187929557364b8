/// Common test utilities for integration tests
///
/// Shared infrastructure for the API tests: database setup, role
/// seeding, a registered test user with a signed token, and an app
/// router ready to receive requests.
use sqlx::PgPool;
use teamhub_api::app::{build_router, AppState};
use teamhub_api::config::Config;
use teamhub_shared::auth::jwt::{create_token, Claims};
use teamhub_shared::auth::permissions::RolePermissions;
use teamhub_shared::models::user::User;
use teamhub_shared::models::workspace::Workspace;
use teamhub_shared::services::auth::{register_user, RegisterUser};
use teamhub_shared::services::roles::seed_roles;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub user: User,
    pub workspace: Workspace,
    pub jwt_token: String,
}

impl TestContext {
    /// Creates a new test context with a freshly registered user
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Migrations live in the shared crate (path relative to Cargo.toml)
        sqlx::migrate!("../teamhub-shared/migrations").run(&db).await?;

        seed_roles(&db, &RolePermissions::new()).await?;

        let user = register_user(
            &db,
            RegisterUser {
                name: "Test User".to_string(),
                email: format!("test-{}@example.com", Uuid::new_v4()),
                password: "SecureP@ss123".to_string(),
            },
        )
        .await?;

        let workspace_id = user
            .current_workspace_id
            .ok_or_else(|| anyhow::anyhow!("registration left no current workspace"))?;
        let workspace = Workspace::find_by_id(&db, workspace_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("default workspace missing"))?;

        let jwt_token = create_token(&Claims::new(user.id), &config.jwt.secret)?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            user,
            workspace,
            jwt_token,
        })
    }

    /// Returns authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Registers another user and returns them with a signed token
    pub async fn register_second_user(&self) -> anyhow::Result<(User, String)> {
        let user = register_user(
            &self.db,
            RegisterUser {
                name: "Second User".to_string(),
                email: format!("second-{}@example.com", Uuid::new_v4()),
                password: "SecureP@ss123".to_string(),
            },
        )
        .await?;

        let token = create_token(&Claims::new(user.id), &self.config.jwt.secret)?;
        Ok((user, token))
    }
}
