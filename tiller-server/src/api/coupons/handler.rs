//! Coupon API handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::{AppError, AppResult, AppState};
use crate::db::coupons::{self, CouponCreate, CouponRow};

/// GET /api/coupons
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<CouponRow>>> {
    let rows = coupons::find_all(&state.pool)
        .await
        .map_err(AppError::from)?;
    Ok(Json(rows))
}

/// POST /api/coupons
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CouponCreate>,
) -> AppResult<Json<CouponRow>> {
    if payload.code.trim().is_empty() {
        return Err(AppError::validation("Coupon code must not be empty"));
    }
    let row = coupons::create(&state.pool, &payload)
        .await
        .map_err(AppError::from)?;
    Ok(Json(row))
}

/// DELETE /api/coupons/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    coupons::delete(&state.pool, id)
        .await
        .map_err(AppError::from)?;
    Ok(Json(true))
}
