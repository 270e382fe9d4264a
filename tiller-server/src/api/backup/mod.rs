//! Backup API module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{Action, require_action};
use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/backup", get(handler::export))
        .route("/api/restore", post(handler::restore))
        .layer(middleware::from_fn(require_action(Action::Backup)))
}
