//! Inventory API handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::core::{AppError, AppResult, AppState};
use crate::db::products::{self, BranchQuantity, ProductCreate, ProductRow, ProductUpdate};
use crate::db::transfers::{self, TransferInput, TransferRow};

/// GET /api/inventory - full catalog with global stock
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<ProductRow>>> {
    let rows = products::find_all(&state.pool)
        .await
        .map_err(AppError::from)?;
    Ok(Json(rows))
}

#[derive(Serialize)]
pub struct ProductWithBranches {
    #[serde(flatten)]
    pub product: ProductRow,
    pub branches: Vec<BranchQuantity>,
}

/// GET /api/inventory/{id} - product plus its per-branch quantities
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ProductWithBranches>> {
    let product = products::find_by_id(&state.pool, id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found(format!("Product {id}")))?;
    let branches = products::branch_quantities(&state.pool, id)
        .await
        .map_err(AppError::from)?;
    Ok(Json(ProductWithBranches { product, branches }))
}

/// GET /api/inventory/barcode/{code} - POS scanner lookup
pub async fn get_by_barcode(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<ProductRow>> {
    let product = products::find_by_barcode(&state.pool, &code)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found(format!("Barcode {code}")))?;
    Ok(Json(product))
}

/// POST /api/inventory - initial stock lands in the caller's branch
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<ProductRow>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Product name must not be empty"));
    }
    let row = products::create(&state.pool, user.branch_id, &payload)
        .await
        .map_err(AppError::from)?;
    Ok(Json(row))
}

/// PUT /api/inventory/{id} - a declared stock change is redistributed into
/// the caller's branch and the global value re-derived, never trusted raw
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<ProductRow>> {
    let row = products::update(&state.pool, id, user.branch_id, &payload)
        .await
        .map_err(AppError::from)?;
    Ok(Json(row))
}

/// DELETE /api/inventory/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    products::delete(&state.pool, id)
        .await
        .map_err(AppError::from)?;
    Ok(Json(true))
}

#[derive(Serialize)]
pub struct TransferResponse {
    pub transfer_id: i64,
}

/// POST /api/inventory/transfer - atomic branch-to-branch move
pub async fn transfer(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<TransferInput>,
) -> AppResult<Json<TransferResponse>> {
    let transfer_id = transfers::create(&state.pool, user.id, &payload)
        .await
        .map_err(AppError::from)?;
    Ok(Json(TransferResponse { transfer_id }))
}

/// GET /api/inventory/transfers - transfer history
pub async fn list_transfers(State(state): State<AppState>) -> AppResult<Json<Vec<TransferRow>>> {
    let rows = transfers::list(&state.pool, 200)
        .await
        .map_err(AppError::from)?;
    Ok(Json(rows))
}

#[derive(Serialize)]
pub struct SyncResponse {
    pub products_synced: u64,
}

/// POST /api/inventory/sync-global - drift repair: re-derive every global
/// stock value from branch truth
pub async fn sync_global(State(state): State<AppState>) -> AppResult<Json<SyncResponse>> {
    let products_synced = products::sync_global(&state.pool)
        .await
        .map_err(AppError::from)?;
    tracing::info!(products_synced, "Global stock resynchronized");
    Ok(Json(SyncResponse { products_synced }))
}
