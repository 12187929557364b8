//! # Teamhub API Server
//!
//! REST API for multi-tenant project and task management:
//! workspaces with role-based membership, projects, tasks with filtered
//! listing, and count-based analytics.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p teamhub-api
//! ```

use teamhub_api::{
    app::{build_router, AppState},
    config::Config,
};
use teamhub_shared::auth::permissions::RolePermissions;
use teamhub_shared::db::migrations::run_migrations;
use teamhub_shared::db::pool::{create_pool, DatabaseConfig};
use teamhub_shared::services::roles::seed_roles;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "teamhub_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Teamhub API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..DatabaseConfig::default()
    })
    .await?;

    run_migrations(&pool).await?;
    seed_roles(&pool, &RolePermissions::new()).await?;

    let state = AppState::new(pool, config);
    let app = build_router(state.clone());

    let listener = tokio::net::TcpListener::bind(state.config.bind_address()).await?;
    tracing::info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
