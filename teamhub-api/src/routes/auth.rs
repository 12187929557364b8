/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register and provision a default workspace
/// - `POST /api/auth/login` - Verify credentials and issue a token
/// - `POST /api/auth/logout` - Stateless acknowledgement
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use teamhub_shared::auth::jwt::{create_token, Claims};
use teamhub_shared::models::user::User;
use teamhub_shared::services::auth::{self, RegisterUser};
use validator::Validate;

use crate::{
    app::AppState,
    error::{validation_error, ApiResult},
};

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub status: String,
    pub message: String,
    pub user: User,
    pub access_token: String,
}

/// Register a new user
///
/// Creates the user, their email account link, and a default workspace
/// the user owns. The default workspace becomes their current workspace.
///
/// # Errors
///
/// - `409 Conflict`: Email already registered
/// - `422 Unprocessable Entity`: Validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    req.validate().map_err(|e| validation_error(&e))?;

    auth::register_user(
        &state.db,
        RegisterUser {
            name: req.name,
            email: req.email,
            password: req.password,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": "User created successfully",
        })),
    ))
}

/// Login with email and password
///
/// Verifies credentials and returns the user together with a signed
/// access token.
///
/// # Errors
///
/// - `401 Unauthorized`: Wrong password
/// - `404 Not Found`: No account for the email
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate().map_err(|e| validation_error(&e))?;

    let user = auth::verify_user(&state.db, &req.email, &req.password).await?;
    let access_token = create_token(&Claims::new(user.id), state.jwt_secret())?;

    Ok(Json(LoginResponse {
        status: "success".to_string(),
        message: "Logged in successfully".to_string(),
        user,
        access_token,
    }))
}

/// Logout acknowledgement
///
/// Tokens are stateless, so there is nothing to revoke server-side. The
/// endpoint exists so clients have a uniform logout call.
pub async fn logout() -> Json<Value> {
    Json(json!({
        "status": "success",
        "message": "Logged out successfully",
    }))
}
