/// Role seeding
///
/// The role table in the database mirrors the in-memory permission table
/// and exists so memberships have a stable row to reference. Seeding runs
/// at startup and is idempotent: rerunning it updates the permission
/// arrays in place without touching role ids.
use sqlx::PgPool;
use tracing::info;

use crate::auth::permissions::{RoleName, RolePermissions};
use crate::error::ServiceError;
use crate::models::role::Role;

/// Upserts one role row per role name, in a single transaction
pub async fn seed_roles(pool: &PgPool, table: &RolePermissions) -> Result<(), ServiceError> {
    let mut tx = pool.begin().await?;

    for role in RoleName::all() {
        let permissions: Vec<String> = table
            .permissions_for(role)
            .iter()
            .map(|p| p.as_str().to_string())
            .collect();

        Role::upsert(&mut *tx, role, &permissions).await?;
    }

    tx.commit().await?;

    info!("Seeded role permissions");
    Ok(())
}
