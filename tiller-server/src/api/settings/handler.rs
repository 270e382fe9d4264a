//! Settings API handlers
//!
//! Store profile plus the logo upload. Uploaded images are validated,
//! re-encoded to JPEG and stored under the static assets directory.

use axum::{
    Json,
    extract::{Multipart, State},
};
use image::ImageFormat;
use std::io::Cursor;

use crate::core::{AppError, AppResult, AppState};
use crate::db::settings::{self, SettingsRow, SettingsUpdate};

/// Maximum upload size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// GET /api/settings
pub async fn get_settings(State(state): State<AppState>) -> AppResult<Json<SettingsRow>> {
    let row = settings::get(&state.pool).await.map_err(AppError::from)?;
    Ok(Json(row))
}

/// PUT /api/settings
pub async fn update_settings(
    State(state): State<AppState>,
    Json(payload): Json<SettingsUpdate>,
) -> AppResult<Json<SettingsRow>> {
    let row = settings::update(&state.pool, &payload)
        .await
        .map_err(AppError::from)?;
    Ok(Json(row))
}

/// POST /api/settings/logo - multipart upload, field name "file"
pub async fn upload_logo(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<SettingsRow>> {
    let mut data: Option<Vec<u8>> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            data = Some(field.bytes().await?.to_vec());
            break;
        }
    }
    let Some(data) = data else {
        return Err(AppError::validation("Missing 'file' field"));
    };
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::validation("Logo exceeds the 5MB limit"));
    }

    let img = image::load_from_memory(&data)
        .map_err(|e| AppError::validation(format!("Invalid image: {e}")))?;

    let mut jpeg = Vec::new();
    img.to_rgb8()
        .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
        .map_err(|e| AppError::internal(format!("Logo re-encoding failed: {e}")))?;

    let path = std::path::Path::new(&state.config.assets_dir).join("logo.jpg");
    std::fs::write(&path, &jpeg)
        .map_err(|e| AppError::internal(format!("Failed to store logo: {e}")))?;

    let stored = path.to_string_lossy();
    settings::set_logo_path(&state.pool, &stored)
        .await
        .map_err(AppError::from)?;

    let row = settings::get(&state.pool).await.map_err(AppError::from)?;
    Ok(Json(row))
}
