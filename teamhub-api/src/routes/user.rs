/// Current-user endpoint
///
/// # Endpoints
///
/// - `GET /api/user/me` - The authenticated user, password omitted
use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};
use teamhub_shared::models::user::User;

use crate::{
    app::{AppState, AuthUser},
    error::{ApiError, ApiResult},
};

/// Returns the authenticated user
///
/// The `User` serializer never emits the password hash.
pub async fn current_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<Value>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(json!({
        "status": "success",
        "message": "User fetched successfully",
        "user": user,
    })))
}
