/// Database migration runner
///
/// Migrations live in the `migrations/` directory at the crate root and are
/// embedded at compile time via `sqlx::migrate!`. The role table is seeded
/// separately (see [`crate::services::roles::seed_roles`]) because the
/// permission sets are defined in code, not in SQL.
use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Runs all pending database migrations
///
/// # Errors
///
/// Returns an error if a migration file is malformed or fails to execute.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    let migrations = sqlx::migrate!("./migrations");

    match migrations.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
