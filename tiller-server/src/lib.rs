//! Tiller Server - store management backend
//!
//! # Module structure
//!
//! ```text
//! tiller-server/src/
//! ├── core/          # config, state, errors
//! ├── auth/          # JWT authentication, capability checks
//! ├── db/            # database layer (sqlx / PostgreSQL)
//! ├── api/           # HTTP routes and handlers
//! └── alerts.rs      # best-effort low-stock notifications
//! ```

pub mod alerts;
pub mod api;
pub mod auth;
pub mod core;
pub mod db;

// Re-export public types
pub use crate::auth::{CurrentUser, JwtService};
pub use crate::core::{AppError, AppResult, AppState, Config};

// Security logging macro - structured events for auth failures
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
