//! User API handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::auth::password::hash_password;
use crate::auth::{CurrentUser, Role};
use crate::core::{AppError, AppResult, AppState};
use crate::db::users::{self, UserCreate, UserRow, UserUpdate};

/// GET /api/users
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<UserRow>>> {
    let rows = users::find_all(&state.pool).await.map_err(AppError::from)?;
    Ok(Json(rows))
}

#[derive(Deserialize)]
pub struct UserCreateRequest {
    pub username: String,
    pub password: String,
    pub role: String,
    pub branch_id: i64,
}

/// POST /api/users
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<UserCreateRequest>,
) -> AppResult<Json<UserRow>> {
    if payload.username.trim().is_empty() {
        return Err(AppError::validation("Username must not be empty"));
    }
    if payload.password.len() < 8 {
        return Err(AppError::validation(
            "Password must be at least 8 characters",
        ));
    }
    if Role::parse(&payload.role).is_none() {
        return Err(AppError::validation(format!("Unknown role {}", payload.role)));
    }

    let hash = hash_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

    let data = UserCreate {
        username: payload.username.trim().to_string(),
        role: payload.role,
        branch_id: payload.branch_id,
    };
    let row = users::create(&state.pool, &data, &hash)
        .await
        .map_err(AppError::from)?;
    Ok(Json(row))
}

/// PUT /api/users/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<UserRow>> {
    if let Some(role) = &payload.role {
        if Role::parse(role).is_none() {
            return Err(AppError::validation(format!("Unknown role {role}")));
        }
    }
    let hash = match &payload.password {
        Some(password) => {
            if password.len() < 8 {
                return Err(AppError::validation(
                    "Password must be at least 8 characters",
                ));
            }
            Some(
                hash_password(password)
                    .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?,
            )
        }
        None => None,
    };

    let row = users::update(&state.pool, id, &payload, hash.as_deref())
        .await
        .map_err(AppError::from)?;
    Ok(Json(row))
}

/// DELETE /api/users/{id} - deleting your own account is refused
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if user.id == id {
        return Err(AppError::validation("You cannot delete your own account"));
    }
    users::delete(&state.pool, id)
        .await
        .map_err(AppError::from)?;
    Ok(Json(true))
}
