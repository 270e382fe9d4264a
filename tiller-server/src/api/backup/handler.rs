//! Backup API handlers
//!
//! Export streams the whole dataset as one SQL script; restore replays an
//! uploaded script inside a single transaction. Both run as one blocking
//! unit - there is no progress protocol and no cancellation.

use axum::{
    Json,
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Serialize;

use crate::core::{AppError, AppResult, AppState};
use crate::db;

/// GET /api/backup - download a SQL dump of every table
pub async fn export(State(state): State<AppState>) -> AppResult<Response> {
    let dump = db::backup::export(&state.pool)
        .await
        .map_err(AppError::from)?;

    let filename = format!("tiller-backup-{}.sql", Utc::now().format("%Y%m%d-%H%M%S"));
    tracing::info!(bytes = dump.len(), %filename, "Backup exported");

    Ok((
        [
            (header::CONTENT_TYPE, "application/sql".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        dump,
    )
        .into_response())
}

#[derive(Serialize)]
pub struct RestoreResponse {
    pub statements_executed: u64,
}

/// POST /api/restore - multipart SQL file, field name "file"
pub async fn restore(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<RestoreResponse>> {
    let mut dump: Option<String> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            dump = Some(field.text().await?);
            break;
        }
    }
    let Some(dump) = dump else {
        return Err(AppError::validation("Missing 'file' field"));
    };

    let statements_executed = db::backup::restore(&state.pool, &dump)
        .await
        .map_err(AppError::from)?;

    tracing::info!(statements_executed, "Backup restored");
    Ok(Json(RestoreResponse {
        statements_executed,
    }))
}
