//! Supplier API handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::{AppError, AppResult, AppState};
use crate::db::suppliers::{self, SupplierCreate, SupplierRow};

/// GET /api/suppliers
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<SupplierRow>>> {
    let rows = suppliers::find_all(&state.pool)
        .await
        .map_err(AppError::from)?;
    Ok(Json(rows))
}

/// POST /api/suppliers
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<SupplierCreate>,
) -> AppResult<Json<SupplierRow>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Supplier name must not be empty"));
    }
    let row = suppliers::create(&state.pool, &payload)
        .await
        .map_err(AppError::from)?;
    Ok(Json(row))
}

/// DELETE /api/suppliers/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    suppliers::delete(&state.pool, id)
        .await
        .map_err(AppError::from)?;
    Ok(Json(true))
}
