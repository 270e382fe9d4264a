//! Sales API handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::alerts;
use crate::auth::CurrentUser;
use crate::auth::password::verify_password;
use crate::core::{AppError, AppResult, AppState};
use crate::db;
use crate::db::sales::{CreatedSale, ReturnItemInput, SaleInput, SaleRow, SaleWithDetails};
use crate::security_log;

#[derive(Deserialize)]
pub struct SalesQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub branch_id: Option<i64>,
}

/// GET /api/sales - recent sales, optionally filtered
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<SalesQuery>,
) -> AppResult<Json<Vec<SaleRow>>> {
    let rows = db::sales::list(&state.pool, query.from, query.to, query.branch_id)
        .await
        .map_err(AppError::from)?;
    Ok(Json(rows))
}

/// GET /api/sales/{id} - sale with line items and return ledger
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<SaleWithDetails>> {
    let sale = db::sales::find_with_details(&state.pool, id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found(format!("Sale {id}")))?;
    Ok(Json(sale))
}

/// POST /api/sales - the transactional sale flow
///
/// Acting branch comes from the caller's credential. On success any
/// low-stock alerts queued inside the transaction are dispatched here,
/// after commit, best-effort.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<SaleInput>,
) -> AppResult<Json<CreatedSale>> {
    let sale = db::sales::create(&state.pool, user.branch_id, user.id, &payload)
        .await
        .map_err(AppError::from)?;

    alerts::dispatch_low_stock(&state.config, &sale.low_stock).await;

    Ok(Json(sale))
}

#[derive(Deserialize)]
pub struct DeleteSaleRequest {
    /// Step-up confirmation: the acting user's own password
    pub password: String,
}

/// DELETE /api/sales/{id} - full reversal; requires password re-entry
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<DeleteSaleRequest>,
) -> AppResult<Json<bool>> {
    let auth = db::users::find_auth_by_id(&state.pool, user.id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(AppError::unauthorized)?;

    if !verify_password(&payload.password, &auth.hashed_password) {
        security_log!(
            "WARN",
            "sale_delete_stepup_failed",
            user_id = user.id,
            sale_id = id
        );
        return Err(AppError::forbidden("Password confirmation failed"));
    }

    db::sales::delete(&state.pool, id)
        .await
        .map_err(AppError::from)?;
    Ok(Json(true))
}

#[derive(Deserialize)]
pub struct ReturnRequest {
    pub items: Vec<ReturnItemInput>,
}

#[derive(serde::Serialize)]
pub struct ReturnResponse {
    pub return_id: i64,
}

/// POST /api/sales/{id}/return - partial return; restores stock and writes
/// a ledger entry, the sale total stays as charged
pub async fn partial_return(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<ReturnRequest>,
) -> AppResult<Json<ReturnResponse>> {
    let return_id = db::sales::partial_return(&state.pool, id, user.id, &payload.items)
        .await
        .map_err(AppError::from)?;
    Ok(Json(ReturnResponse { return_id }))
}

/// GET /api/sales/{id}/ticket - printable PDF, layout per store settings
pub async fn ticket(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Response> {
    let data = db::sales::ticket_data(&state.pool, id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found(format!("Sale {id}")))?;

    let settings = db::settings::get(&state.pool).await.map_err(AppError::from)?;
    let format = tiller_ticket::TicketFormat::from_setting(&settings.ticket_format);

    let pdf = tiller_ticket::render(&data, format)
        .map_err(|e| AppError::internal(format!("Ticket rendering failed: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"ticket-{id}.pdf\""),
            ),
        ],
        pdf,
    )
        .into_response())
}
