//! Client API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::{AppError, AppResult, AppState};
use crate::db::clients::{self, ClientCreate, ClientRow, ClientUpdate};

/// GET /api/clients - all clients
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<ClientRow>>> {
    let rows = clients::find_all(&state.pool).await.map_err(AppError::from)?;
    Ok(Json(rows))
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// GET /api/clients/search?q= - name/phone search
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<ClientRow>>> {
    let rows = clients::search(&state.pool, &query.q)
        .await
        .map_err(AppError::from)?;
    Ok(Json(rows))
}

/// GET /api/clients/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ClientRow>> {
    let row = clients::find_by_id(&state.pool, id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found(format!("Client {id}")))?;
    Ok(Json(row))
}

/// POST /api/clients
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ClientCreate>,
) -> AppResult<Json<ClientRow>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Client name must not be empty"));
    }
    let row = clients::create(&state.pool, &payload)
        .await
        .map_err(AppError::from)?;
    Ok(Json(row))
}

/// PUT /api/clients/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ClientUpdate>,
) -> AppResult<Json<ClientRow>> {
    let row = clients::update(&state.pool, id, &payload)
        .await
        .map_err(AppError::from)?;
    Ok(Json(row))
}

/// DELETE /api/clients/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    clients::delete(&state.pool, id)
        .await
        .map_err(AppError::from)?;
    Ok(Json(true))
}
