//! Branch API module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{Action, require_action};
use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/branches", routes())
}

fn routes() -> Router<AppState> {
    let read_routes = Router::new().route("/", get(handler::list));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", axum::routing::delete(handler::delete))
        .layer(middleware::from_fn(require_action(Action::ManageBranches)));

    read_routes.merge(manage_routes)
}
