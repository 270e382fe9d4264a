//! Branch-to-branch stock transfers
//!
//! Moves quantity between two branch ledgers atomically and records an
//! immutable history row. Global stock is unaffected - the units only
//! change location.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::{RepoError, RepoResult};

#[derive(Debug, Deserialize)]
pub struct TransferInput {
    pub product_id: i64,
    pub from_branch: i64,
    pub to_branch: i64,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TransferRow {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub from_branch: i64,
    pub from_branch_name: String,
    pub to_branch: i64,
    pub to_branch_name: String,
    pub quantity: i32,
    pub transferred_by: Option<i64>,
    pub transferred_at: DateTime<Utc>,
}

pub async fn create(pool: &PgPool, user_id: i64, input: &TransferInput) -> RepoResult<i64> {
    if input.quantity <= 0 {
        return Err(RepoError::Invalid("Transfer quantity must be positive".into()));
    }
    if input.from_branch == input.to_branch {
        return Err(RepoError::Invalid(
            "Source and destination branch must differ".into(),
        ));
    }

    let mut tx = pool.begin().await?;

    let source: Option<(i32, String)> = sqlx::query_as(
        "SELECT bs.quantity, p.name
         FROM branch_stocks bs
         JOIN products p ON p.id = bs.product_id
         WHERE bs.branch_id = $1 AND bs.product_id = $2
         FOR UPDATE",
    )
    .bind(input.from_branch)
    .bind(input.product_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some((available, product_name)) = source else {
        return Err(RepoError::StockInsufficient {
            product: format!("product {}", input.product_id),
        });
    };
    if available < input.quantity {
        return Err(RepoError::StockInsufficient {
            product: product_name,
        });
    }

    sqlx::query(
        "UPDATE branch_stocks SET quantity = quantity - $1
         WHERE branch_id = $2 AND product_id = $3",
    )
    .bind(input.quantity)
    .bind(input.from_branch)
    .bind(input.product_id)
    .execute(&mut *tx)
    .await?;

    super::products::upsert_branch_stock(&mut tx, input.to_branch, input.product_id, input.quantity)
        .await?;

    let (transfer_id,): (i64,) = sqlx::query_as(
        "INSERT INTO inventory_transfers (product_id, from_branch, to_branch, quantity, transferred_by)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(input.product_id)
    .bind(input.from_branch)
    .bind(input.to_branch)
    .bind(input.quantity)
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(transfer_id)
}

pub async fn list(pool: &PgPool, limit: i64) -> RepoResult<Vec<TransferRow>> {
    let rows = sqlx::query_as::<_, TransferRow>(
        "SELECT t.id, t.product_id, p.name AS product_name,
                t.from_branch, bf.name AS from_branch_name,
                t.to_branch, bt.name AS to_branch_name,
                t.quantity, t.transferred_by, t.transferred_at
         FROM inventory_transfers t
         JOIN products p ON p.id = t.product_id
         JOIN branches bf ON bf.id = t.from_branch
         JOIN branches bt ON bt.id = t.to_branch
         ORDER BY t.transferred_at DESC
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
