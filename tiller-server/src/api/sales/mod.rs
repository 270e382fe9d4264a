//! Sales API module

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::auth::{Action, require_action};
use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/sales", routes())
}

fn routes() -> Router<AppState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/ticket", get(handler::ticket))
        .layer(middleware::from_fn(require_action(Action::ViewSales)));

    let create_routes = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn(require_action(Action::CreateSale)));

    // Deletion additionally demands the caller's own password (step-up)
    let delete_routes = Router::new()
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_action(Action::DeleteSale)));

    let return_routes = Router::new()
        .route("/{id}/return", post(handler::partial_return))
        .layer(middleware::from_fn(require_action(Action::ReturnSale)));

    read_routes
        .merge(create_routes)
        .merge(delete_routes)
        .merge(return_routes)
}
