//! Auth API handlers

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{CurrentUser, Role};
use crate::core::{AppError, AppResult, AppState};
use crate::db;
use crate::security_log;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Serialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub branch_id: i64,
}

/// POST /api/auth/login - exchange credentials for a bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let username = req.username.trim();

    let user = db::users::find_auth_by_username(&state.pool, username)
        .await
        .map_err(AppError::from)?
        .ok_or_else(AppError::invalid_credentials)?;

    if !verify_password(&req.password, &user.hashed_password) {
        security_log!("WARN", "login_failed", username = username.to_string());
        return Err(AppError::invalid_credentials());
    }

    let role = Role::parse(&user.role)
        .ok_or_else(|| AppError::internal(format!("corrupt role for user {}", user.id)))?;

    let token = state
        .jwt
        .generate_token(user.id, &user.username, role, user.branch_id)
        .map_err(|e| AppError::internal(format!("JWT creation failed: {e}")))?;

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: user.id,
            username: user.username,
            role: user.role,
            branch_id: user.branch_id,
        },
    }))
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: String,
    pub branch_id: i64,
}

/// POST /api/auth/register - create a user account (requires ManageUsers)
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<db::users::UserRow>> {
    if req.username.trim().is_empty() {
        return Err(AppError::validation("Username must not be empty"));
    }
    if req.password.len() < 8 {
        return Err(AppError::validation(
            "Password must be at least 8 characters",
        ));
    }
    if Role::parse(&req.role).is_none() {
        return Err(AppError::validation(format!("Unknown role {}", req.role)));
    }

    let hash = hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

    let data = db::users::UserCreate {
        username: req.username.trim().to_string(),
        role: req.role,
        branch_id: req.branch_id,
    };
    let user = db::users::create(&state.pool, &data, &hash)
        .await
        .map_err(AppError::from)?;

    Ok(Json(user))
}

/// GET /api/auth/me - current identity from the token
pub async fn me(Extension(user): Extension<CurrentUser>) -> Json<UserInfo> {
    Json(UserInfo {
        id: user.id,
        username: user.username.clone(),
        role: user.role.as_str().to_string(),
        branch_id: user.branch_id,
    })
}
