//! Settings API module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::{Action, require_action};
use crate::core::AppState;

pub fn router() -> Router<AppState> {
    let read_routes = Router::new().route("/api/settings", get(handler::get_settings));

    let manage_routes = Router::new()
        .route("/api/settings", put(handler::update_settings))
        .route("/api/settings/logo", post(handler::upload_logo))
        .layer(middleware::from_fn(require_action(Action::ManageSettings)));

    read_routes.merge(manage_routes)
}
