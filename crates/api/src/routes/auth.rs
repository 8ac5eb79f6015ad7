//! Login routes for operators and app users.

use axum::{Json, Router, extract::State, routing::post};
use chrono::Utc;
use serde::Serialize;
use sleepdash_core::auth::{AuthError, verify_password};
use sleepdash_core::users::User;
use sleepdash_shared::{AdminLoginRequest, AdminLoginResponse, AdminRole, AppError};
use tracing::info;

use crate::AppState;
use crate::error::ApiResult;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/login", post(admin_login))
        .route("/auth/login", post(user_login))
}

/// POST /admin/login - Authenticate the operator and issue a token.
async fn admin_login(
    State(state): State<AppState>,
    Json(payload): Json<AdminLoginRequest>,
) -> ApiResult<Json<AdminLoginResponse>> {
    let admin = match state
        .admin
        .authenticate(&payload.email, &payload.password, Utc::now())
    {
        Ok(profile) => profile,
        Err(AuthError::InvalidCredentials) => {
            info!(email = %payload.email, "Failed operator login");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()).into());
        }
        Err(AuthError::Password(e)) => return Err(AppError::Internal(e.to_string()).into()),
    };

    let token = state
        .jwt_service
        .generate_access_token(&admin.email, admin.role)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    info!(email = %admin.email, "Operator logged in");
    Ok(Json(AdminLoginResponse {
        success: true,
        token,
        admin,
        expires_in: state.jwt_service.access_token_expires_in(),
    }))
}

/// Response of the app user login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLoginResponse {
    /// Always true on a 200 response.
    pub success: bool,
    /// Member token. Not accepted by operator routes.
    pub token: String,
    /// The signed-in user.
    pub user: User,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

/// POST /auth/login - Authenticate an app user.
async fn user_login(
    State(state): State<AppState>,
    Json(payload): Json<AdminLoginRequest>,
) -> ApiResult<Json<UserLoginResponse>> {
    let Some(user) = state.store.find_by_email(&payload.email) else {
        info!(email = %payload.email, "Login attempt for unknown user");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()).into());
    };

    let valid = verify_password(&payload.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if !valid {
        info!(user_id = %user.id, "Failed login attempt - invalid password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()).into());
    }

    let token = state
        .jwt_service
        .generate_access_token(&user.email, AdminRole::Member)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(UserLoginResponse {
        success: true,
        token,
        user,
        expires_in: state.jwt_service.access_token_expires_in(),
    }))
}
