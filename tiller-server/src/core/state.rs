//! Shared application state

use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::JwtService;
use crate::core::Config;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state - cheap to clone, one per request via axum.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Config,
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// JWT token service
    pub jwt: Arc<JwtService>,
}

impl AppState {
    /// Connect the pool, apply pending migrations, ensure the assets
    /// directory and the bootstrap admin user exist.
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        std::fs::create_dir_all(&config.assets_dir)?;

        let jwt = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_expiration_minutes,
        ));

        let state = Self {
            config: config.clone(),
            pool,
            jwt,
        };

        // First start on an empty database: seed the admin account so the
        // instance is reachable without out-of-band SQL.
        if crate::db::users::count(&state.pool).await? == 0 {
            let hash = crate::auth::password::hash_password(&config.admin_password)
                .map_err(|e| format!("failed to hash bootstrap password: {e}"))?;
            crate::db::users::create_admin(&state.pool, "admin", &hash).await?;
            tracing::info!("Bootstrap admin user created");
        }

        Ok(state)
    }
}
