//! Branch API handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::{AppError, AppResult, AppState};
use crate::db::branches::{self, BranchCreate, BranchRow};

/// GET /api/branches
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<BranchRow>>> {
    let rows = branches::find_all(&state.pool)
        .await
        .map_err(AppError::from)?;
    Ok(Json(rows))
}

/// POST /api/branches
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<BranchCreate>,
) -> AppResult<Json<BranchRow>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Branch name must not be empty"));
    }
    let row = branches::create(&state.pool, &payload)
        .await
        .map_err(AppError::from)?;
    Ok(Json(row))
}

/// DELETE /api/branches/{id} - branch 1 (main) is refused
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    branches::delete(&state.pool, id)
        .await
        .map_err(AppError::from)?;
    Ok(Json(true))
}
