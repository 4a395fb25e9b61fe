//! Authentication Handlers

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::{AdminAccount, CurrentUser};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::validation::{MAX_EMAIL_LEN, MAX_PASSWORD_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: CurrentUser,
    /// Seconds until the token expires
    pub expires_in: i64,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    validate_required_text(&req.email, "email", MAX_EMAIL_LEN)?;
    validate_required_text(&req.password, "password", MAX_PASSWORD_LEN)?;

    if !state.admin.verify(&req.email, &req.password) {
        security_log!("WARN", "login_failed", email = req.email.trim().to_lowercase());
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .jwt_service
        .generate_token(&state.admin.email, AdminAccount::ROLE)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    security_log!("INFO", "login_success", email = state.admin.email.clone());

    Ok(Json(LoginResponse {
        token,
        user: CurrentUser {
            email: state.admin.email.clone(),
            role: AdminAccount::ROLE.to_string(),
        },
        expires_in: state.config.jwt.expiration_minutes * 60,
    }))
}

/// GET /api/auth/me
pub async fn me(user: CurrentUser) -> AppResult<Json<CurrentUser>> {
    Ok(Json(user))
}

/// POST /api/auth/logout
///
/// Tokens are stateless; the client discards its copy.
pub async fn logout(user: CurrentUser) -> AppResult<Json<()>> {
    tracing::info!(email = %user.email, "User logged out");
    Ok(Json(()))
}
