//! Branch database operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::{RepoError, RepoResult};

/// Branch id=1 is the main branch and can never be deleted.
pub const MAIN_BRANCH_ID: i64 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BranchRow {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct BranchCreate {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

pub async fn find_all(pool: &PgPool) -> RepoResult<Vec<BranchRow>> {
    let rows = sqlx::query_as::<_, BranchRow>(
        "SELECT id, name, address, phone, created_at FROM branches ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> RepoResult<Option<BranchRow>> {
    let row = sqlx::query_as::<_, BranchRow>(
        "SELECT id, name, address, phone, created_at FROM branches WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &PgPool, data: &BranchCreate) -> RepoResult<BranchRow> {
    let row = sqlx::query_as::<_, BranchRow>(
        "INSERT INTO branches (name, address, phone) VALUES ($1, $2, $3)
         RETURNING id, name, address, phone, created_at",
    )
    .bind(&data.name)
    .bind(&data.address)
    .bind(&data.phone)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Deleting a branch cascades into its branch_stocks rows; product global
/// stock is re-derived right after so the invariant holds.
pub async fn delete(pool: &PgPool, id: i64) -> RepoResult<()> {
    if id == MAIN_BRANCH_ID {
        return Err(RepoError::Invalid(
            "The main branch cannot be deleted".into(),
        ));
    }

    let mut tx = pool.begin().await?;

    let rows = sqlx::query("DELETE FROM branches WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Branch {id}")));
    }

    sqlx::query(
        "UPDATE products SET stock = COALESCE(
             (SELECT SUM(bs.quantity) FROM branch_stocks bs WHERE bs.product_id = products.id), 0)",
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
