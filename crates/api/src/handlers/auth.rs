//! Handlers for `/auth`.

use axum::extract::State;
use axum::Json;
use helpdesk_core::error::CoreError;
use helpdesk_db::repositories::UserRepo;
use serde::Deserialize;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email address.
    pub login: String,
    pub password: String,
}

/// POST /api/v1/auth/login
///
/// Exchange credentials for a JWT access token. The login may be a
/// username or an email address; soft-deleted and deactivated accounts
/// never match.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let user = UserRepo::find_by_login(&state.pool, &input.login)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid credentials".to_string()))
        })?;

    let matches = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    if !matches {
        return Err(CoreError::Unauthorized("Invalid credentials".to_string()).into());
    }

    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = user.id, role = %user.role, "User logged in");

    Ok(Json(serde_json::json!({
        "data": {
            "access_token": token,
            "user": user,
        }
    })))
}
