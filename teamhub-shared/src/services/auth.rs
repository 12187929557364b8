/// Identity and account workflows
///
/// Registration and provider login both provision the same default
/// workspace (workspace + OWNER membership + current-workspace pointer)
/// inside one transaction, so a failure at any step leaves no partial
/// account behind.
use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::permissions::RoleName;
use crate::error::ServiceError;
use crate::models::account::{Account, CreateAccount, Provider};
use crate::models::member::{CreateMember, Member};
use crate::models::role::Role;
use crate::models::user::{CreateUser, User};
use crate::models::workspace::{CreateWorkspace, Workspace};

/// Name given to the workspace provisioned at signup
pub const DEFAULT_WORKSPACE_NAME: &str = "My Workspace";

/// Input for password registration
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Profile asserted by an external identity provider
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    pub provider: Provider,
    pub provider_id: String,
    pub name: Option<String>,
    pub email: String,
    pub picture: Option<String>,
}

/// Registers a new user with email/password credentials
///
/// Creates the user, the email account link, the default workspace, the
/// OWNER membership, and the current-workspace pointer in one transaction.
///
/// # Errors
///
/// - `Conflict` when a user already exists for the email
/// - `NotFound` when the role table was never seeded
pub async fn register_user(pool: &PgPool, data: RegisterUser) -> Result<User, ServiceError> {
    let mut tx = pool.begin().await?;

    if User::find_by_email(&mut *tx, &data.email).await?.is_some() {
        return Err(ServiceError::Conflict(
            "User with this email already exists".to_string(),
        ));
    }

    let password_hash = hash_password(&data.password)?;

    let mut user = User::create(
        &mut *tx,
        CreateUser {
            name: Some(data.name),
            email: data.email.clone(),
            password_hash: Some(password_hash),
            profile_picture: None,
        },
    )
    .await?;

    Account::create(
        &mut *tx,
        CreateAccount {
            user_id: user.id,
            provider: Provider::Email,
            provider_id: data.email,
        },
    )
    .await?;

    let workspace = provision_default_workspace(&mut tx, &user).await?;
    user.current_workspace_id = Some(workspace.id);

    tx.commit().await?;

    info!(user_id = %user.id, "Registered new user");
    Ok(user)
}

/// Resolves or creates a user from an external identity-provider assertion
///
/// An existing user (matched by email) is returned as-is; no
/// re-provisioning happens. A new user gets the same default-workspace
/// sequence as registration, linked to the provider identity instead of a
/// password. The whole create path is one transaction.
pub async fn login_or_create_account(
    pool: &PgPool,
    profile: ProviderProfile,
) -> Result<User, ServiceError> {
    let mut tx = pool.begin().await?;

    if let Some(user) = User::find_by_email(&mut *tx, &profile.email).await? {
        tx.commit().await?;
        return Ok(user);
    }

    let mut user = User::create(
        &mut *tx,
        CreateUser {
            name: profile.name,
            email: profile.email,
            password_hash: None,
            profile_picture: profile.picture,
        },
    )
    .await?;

    Account::create(
        &mut *tx,
        CreateAccount {
            user_id: user.id,
            provider: profile.provider,
            provider_id: profile.provider_id,
        },
    )
    .await?;

    let workspace = provision_default_workspace(&mut tx, &user).await?;
    user.current_workspace_id = Some(workspace.id);

    tx.commit().await?;

    info!(user_id = %user.id, "Provisioned user from provider login");
    Ok(user)
}

/// Verifies email/password credentials
///
/// # Errors
///
/// - `NotFound` when no email account or linked user exists
/// - `Unauthorized` with a generic message when the password is wrong
pub async fn verify_user(pool: &PgPool, email: &str, password: &str) -> Result<User, ServiceError> {
    let account = Account::find_by_provider(pool, Provider::Email, email)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound("User not found for the given account".to_string())
        })?;

    let user = User::find_by_id(pool, account.user_id).await?.ok_or_else(|| {
        ServiceError::NotFound("User not found for the given account".to_string())
    })?;

    let matches = match &user.password_hash {
        Some(hash) => verify_password(password, hash)?,
        None => false,
    };

    if !matches {
        return Err(ServiceError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    User::update_last_login(pool, user.id).await?;

    Ok(user)
}

/// Creates the default workspace, OWNER membership, and current-workspace
/// pointer for a freshly created user
///
/// Runs inside the caller's transaction.
async fn provision_default_workspace(
    tx: &mut Transaction<'_, Postgres>,
    user: &User,
) -> Result<Workspace, ServiceError> {
    let display_name = user.name.as_deref().unwrap_or("User");

    let workspace = Workspace::create(
        &mut **tx,
        CreateWorkspace {
            name: DEFAULT_WORKSPACE_NAME.to_string(),
            description: Some(format!("Workspace created for {display_name}")),
            owner_id: user.id,
        },
    )
    .await?;

    let owner_role = Role::find_by_name(&mut **tx, RoleName::Owner)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Owner role not found".to_string()))?;

    Member::create(
        &mut **tx,
        CreateMember {
            user_id: user.id,
            workspace_id: workspace.id,
            role_id: owner_role.id,
        },
    )
    .await?;

    User::set_current_workspace(&mut **tx, user.id, Some(workspace.id)).await?;

    Ok(workspace)
}
