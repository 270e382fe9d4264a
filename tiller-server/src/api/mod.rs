//! API routes
//!
//! One module per resource, each exposing `router()`. Write operations
//! carry a `require_action` capability layer; `require_auth` wraps the
//! whole `/api` surface.

pub mod auth;
pub mod backup;
pub mod branches;
pub mod clients;
pub mod coupons;
pub mod health;
pub mod inventory;
pub mod sales;
pub mod settings;
pub mod statistics;
pub mod suppliers;
pub mod users;

use axum::Router;
use axum::middleware as axum_middleware;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::core::AppState;

/// Build the application router with all middleware and state.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(clients::router())
        .merge(suppliers::router())
        .merge(branches::router())
        .merge(coupons::router())
        .merge(users::router())
        .merge(inventory::router())
        .merge(sales::router())
        .merge(statistics::router())
        .merge(settings::router())
        .merge(backup::router())
        // CORS - the browser frontend is served from its own origin
        .layer(CorsLayer::permissive())
        // Request tracing
        .layer(TraceLayer::new_for_http())
        // JWT authentication - outermost, runs first, injects CurrentUser
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ))
        .with_state(state)
}
