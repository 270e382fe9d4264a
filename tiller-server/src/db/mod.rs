//! Database access layer
//!
//! Module-level async functions over `&PgPool`, runtime-checked queries
//! with `$N` binds. Multi-row consistency goes through explicit
//! transactions with `FOR UPDATE` row locks on the stock rows involved.

pub mod backup;
pub mod branches;
pub mod clients;
pub mod coupons;
pub mod products;
pub mod reports;
pub mod sales;
pub mod settings;
pub mod suppliers;
pub mod transfers;
pub mod users;

use crate::core::AppError;

/// Database layer errors. Domain failures that must reach the client keep
/// their own variants; everything else is a plain sqlx error.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Insufficient stock for {product}")]
    StockInsufficient { product: String },

    #[error("{0}")]
    Invalid(String),
}

pub type RepoResult<T> = Result<T, RepoError>;

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Sqlx(err) => {
                if let Some(db_err) = err.as_database_error() {
                    if db_err.is_unique_violation() {
                        return AppError::conflict("Duplicate value for a unique field");
                    }
                    if db_err.is_foreign_key_violation() {
                        return AppError::conflict("Row is referenced by other records");
                    }
                }
                AppError::database(err.to_string())
            }
            RepoError::NotFound(what) => AppError::not_found(what),
            RepoError::Conflict(msg) => AppError::conflict(msg),
            RepoError::StockInsufficient { product } => {
                AppError::validation(format!("Insufficient stock for {product}"))
            }
            RepoError::Invalid(msg) => AppError::validation(msg),
        }
    }
}
