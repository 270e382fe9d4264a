//! Inventory API module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::{Action, require_action};
use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/inventory", routes())
}

fn routes() -> Router<AppState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/transfers", get(handler::list_transfers))
        .route("/barcode/{code}", get(handler::get_by_barcode))
        .route("/{id}", get(handler::get_by_id));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route("/transfer", post(handler::transfer))
        .route("/sync-global", post(handler::sync_global))
        .layer(middleware::from_fn(require_action(Action::ManageInventory)));

    read_routes.merge(manage_routes)
}
