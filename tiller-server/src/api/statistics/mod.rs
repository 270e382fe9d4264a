//! Statistics API module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::{Action, require_action};
use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/statistics", get(handler::get_statistics))
        .layer(middleware::from_fn(require_action(Action::ViewReports)))
}
