/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with
/// all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use teamhub_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = teamhub_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```
use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use teamhub_shared::auth::jwt;
use teamhub_shared::auth::permissions::{Permission, RoleName, RolePermissions};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use uuid::Uuid;

use crate::config::Config;
use crate::error::ApiError;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Immutable role/permission table, built once at startup
    pub roles: Arc<RolePermissions>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
            roles: Arc::new(RolePermissions::new()),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Resolves the caller's role in a workspace and checks permissions
    ///
    /// Every workspace-scoped handler calls this before touching data.
    pub async fn authorize(
        &self,
        user_id: Uuid,
        workspace_id: Uuid,
        required: &[Permission],
    ) -> Result<RoleName, ApiError> {
        let role =
            teamhub_shared::services::workspace::get_member_role(&self.db, user_id, workspace_id)
                .await?;

        self.roles.guard(role, required)?;
        Ok(role)
    }
}

/// Authenticated caller, injected into request extensions by the JWT gate
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                          # Health check (public)
/// └── /api/
///     ├── /auth/                       # register, login (public), logout
///     ├── /user/                       # current user
///     ├── /workspaces/                 # workspace CRUD, members, analytics
///     ├── /members/                    # invite-code join
///     ├── /projects/                   # project CRUD + analytics
///     └── /tasks/                      # task CRUD + filtered listing
/// ```
///
/// Everything under `/api` except `/api/auth/register` and
/// `/api/auth/login` sits behind the JWT gate.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Everything below requires a valid Bearer token
    let user_routes = Router::new().route("/me", get(routes::user::current_user));

    let logout_routes = Router::new().route("/logout", post(routes::auth::logout));

    let workspace_routes = Router::new()
        .route("/create", post(routes::workspace::create_workspace))
        .route("/all", get(routes::workspace::list_workspaces))
        .route("/:id", get(routes::workspace::get_workspace))
        .route("/update/:id", put(routes::workspace::update_workspace))
        .route("/delete/:id", delete(routes::workspace::delete_workspace))
        .route("/members/:id", get(routes::workspace::get_members))
        .route(
            "/change/member/role/:id",
            put(routes::workspace::change_member_role),
        )
        .route(
            "/reset/invite/:id",
            post(routes::workspace::reset_invite_code),
        )
        .route("/analytics/:id", get(routes::workspace::analytics));

    let member_routes = Router::new().route(
        "/workspaces/:invite_code/join",
        post(routes::member::join_workspace),
    );

    let project_routes = Router::new()
        .route(
            "/workspaces/:workspace_id/create",
            post(routes::project::create_project),
        )
        .route(
            "/workspaces/:workspace_id/all",
            get(routes::project::list_projects),
        )
        .route(
            "/:project_id/workspaces/:workspace_id",
            get(routes::project::get_project)
                .put(routes::project::update_project)
                .delete(routes::project::delete_project),
        )
        .route(
            "/:project_id/workspaces/:workspace_id/analytics",
            get(routes::project::analytics),
        );

    let task_routes = Router::new()
        .route(
            "/projects/:project_id/workspaces/:workspace_id/create",
            post(routes::task::create_task),
        )
        .route(
            "/:id/projects/:project_id/workspaces/:workspace_id/update",
            post(routes::task::update_task),
        )
        .route(
            "/workspaces/:workspace_id/all",
            get(routes::task::list_tasks),
        )
        .route(
            "/:id/projects/:project_id/workspaces/:workspace_id",
            get(routes::task::get_task),
        )
        .route(
            "/:id/workspaces/:workspace_id/delete",
            delete(routes::task::delete_task),
        );

    let protected_routes = Router::new()
        .nest("/auth", logout_routes)
        .nest("/user", user_routes)
        .nest("/workspaces", workspace_routes)
        .nest("/members", member_routes)
        .nest("/projects", project_routes)
        .nest("/tasks", task_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the Bearer token from the Authorization
/// header, then injects `AuthUser` into request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::BadRequest("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    req.extensions_mut().insert(AuthUser {
        user_id: claims.sub,
    });

    Ok(next.run(req).await)
}
