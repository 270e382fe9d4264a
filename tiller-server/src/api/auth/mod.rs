//! Auth API module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{Action, require_action};
use crate::core::AppState;

pub fn router() -> Router<AppState> {
    // Login is on the public skip list of require_auth; register is a
    // protected user-management operation (the first admin is seeded at
    // startup).
    let register = Router::new()
        .route("/api/auth/register", post(handler::register))
        .layer(middleware::from_fn(require_action(Action::ManageUsers)));

    Router::new()
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/me", get(handler::me))
        .merge(register)
}
