//! Server configuration
//!
//! All settings come from environment variables (a `.env` file is loaded
//! in `main` before this runs).
//!
//! | Variable | Default | Purpose |
//! |----------|---------|---------|
//! | DATABASE_URL | (required) | PostgreSQL connection string |
//! | HTTP_PORT | 8080 | HTTP API port |
//! | ENVIRONMENT | development | development / staging / production |
//! | JWT_SECRET | dev placeholder | token signing key, required outside development |
//! | JWT_EXPIRATION_MINUTES | 1440 | token lifetime |
//! | ADMIN_PASSWORD | dev placeholder | bootstrap admin password, required outside development |
//! | ASSETS_DIR | assets | static files (uploaded logo) |
//! | LOW_STOCK_WEBHOOK_URL | (unset) | optional POST target for low-stock alerts |

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP API port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// JWT signing secret
    pub jwt_secret: String,
    /// Token lifetime in minutes
    pub jwt_expiration_minutes: i64,
    /// Password for the bootstrap `admin` user (first start only)
    pub admin_password: String,
    /// Directory for uploaded static assets (logo)
    pub assets_dir: String,
    /// Optional webhook notified on low stock
    pub low_stock_webhook_url: Option<String>,
}

impl Config {
    /// Require a secret env var: must be set and non-empty outside development.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            jwt_expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1440),
            admin_password: Self::require_secret("ADMIN_PASSWORD", &environment)?,
            assets_dir: std::env::var("ASSETS_DIR").unwrap_or_else(|_| "assets".into()),
            low_stock_webhook_url: std::env::var("LOW_STOCK_WEBHOOK_URL")
                .ok()
                .filter(|s| !s.is_empty()),
            environment,
        })
    }

    /// Whether we run in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
