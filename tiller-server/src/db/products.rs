//! Product / inventory database operations
//!
//! The `products.stock` column is the denormalized sum of the per-branch
//! quantities. Every mutation here changes both sides inside one
//! transaction; `sync_global` re-derives the column for drift repair when
//! rows were touched out of band.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::{RepoError, RepoResult};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub barcode: Option<String>,
    pub unit_price: Decimal,
    pub unit_cost: Decimal,
    pub stock: i32,
    pub supplier_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-branch quantity for one product.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BranchQuantity {
    pub branch_id: i64,
    pub branch_name: String,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub category: Option<String>,
    pub barcode: Option<String>,
    pub unit_price: Decimal,
    pub unit_cost: Option<Decimal>,
    pub supplier_id: Option<i64>,
    /// Initial stock, assigned to the acting user's branch
    pub stock: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub barcode: Option<String>,
    pub unit_price: Option<Decimal>,
    pub unit_cost: Option<Decimal>,
    pub supplier_id: Option<i64>,
    /// New declared global stock; the delta lands in the acting branch
    pub stock: Option<i32>,
}

const SELECT: &str = "SELECT id, name, category, barcode, unit_price, unit_cost, stock, \
                      supplier_id, created_at, updated_at FROM products";

pub async fn find_all(pool: &PgPool) -> RepoResult<Vec<ProductRow>> {
    let sql = format!("{SELECT} ORDER BY name");
    let rows = sqlx::query_as::<_, ProductRow>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> RepoResult<Option<ProductRow>> {
    let sql = format!("{SELECT} WHERE id = $1");
    let row = sqlx::query_as::<_, ProductRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_barcode(pool: &PgPool, barcode: &str) -> RepoResult<Option<ProductRow>> {
    let sql = format!("{SELECT} WHERE barcode = $1");
    let row = sqlx::query_as::<_, ProductRow>(&sql)
        .bind(barcode)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn branch_quantities(pool: &PgPool, product_id: i64) -> RepoResult<Vec<BranchQuantity>> {
    let rows = sqlx::query_as::<_, BranchQuantity>(
        "SELECT b.id AS branch_id, b.name AS branch_name, COALESCE(bs.quantity, 0) AS quantity
         FROM branches b
         LEFT JOIN branch_stocks bs ON bs.branch_id = b.id AND bs.product_id = $1
         ORDER BY b.id",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(pool: &PgPool, branch_id: i64, data: &ProductCreate) -> RepoResult<ProductRow> {
    let initial = data.stock.unwrap_or(0);
    if initial < 0 {
        return Err(RepoError::Invalid("Initial stock cannot be negative".into()));
    }

    let mut tx = pool.begin().await?;

    let (product_id,): (i64,) = sqlx::query_as(
        "INSERT INTO products (name, category, barcode, unit_price, unit_cost, supplier_id, stock)
         VALUES ($1, COALESCE($2, 'general'), $3, $4, COALESCE($5, 0), $6, 0)
         RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.category)
    .bind(&data.barcode)
    .bind(data.unit_price)
    .bind(data.unit_cost)
    .bind(data.supplier_id)
    .fetch_one(&mut *tx)
    .await?;

    if initial > 0 {
        upsert_branch_stock(&mut tx, branch_id, product_id, initial).await?;
    }
    resync_product(&mut tx, product_id).await?;

    let sql = format!("{SELECT} WHERE id = $1");
    let row = sqlx::query_as::<_, ProductRow>(&sql)
        .bind(product_id)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(row)
}

/// Edit a product. A declared stock change is redistributed: the delta
/// against the current global value lands in the acting user's branch, then
/// the global column is re-derived from branch truth - the caller's number
/// is never written directly.
pub async fn update(
    pool: &PgPool,
    id: i64,
    branch_id: i64,
    data: &ProductUpdate,
) -> RepoResult<ProductRow> {
    let mut tx = pool.begin().await?;

    let current: Option<(i32,)> =
        sqlx::query_as("SELECT stock FROM products WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some((current_stock,)) = current else {
        return Err(RepoError::NotFound(format!("Product {id}")));
    };

    sqlx::query(
        "UPDATE products SET
             name = COALESCE($1, name),
             category = COALESCE($2, category),
             barcode = COALESCE($3, barcode),
             unit_price = COALESCE($4, unit_price),
             unit_cost = COALESCE($5, unit_cost),
             supplier_id = COALESCE($6, supplier_id),
             updated_at = now()
         WHERE id = $7",
    )
    .bind(&data.name)
    .bind(&data.category)
    .bind(&data.barcode)
    .bind(data.unit_price)
    .bind(data.unit_cost)
    .bind(data.supplier_id)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if let Some(declared) = data.stock {
        if declared < 0 {
            return Err(RepoError::Invalid("Stock cannot be negative".into()));
        }
        let delta = declared - current_stock;
        if delta != 0 {
            let new_branch_qty = upsert_branch_stock(&mut tx, branch_id, id, delta).await?;
            if new_branch_qty < 0 {
                let held = new_branch_qty + delta.abs();
                return Err(RepoError::Invalid(format!(
                    "Stock reduction exceeds the {held} units held by this branch"
                )));
            }
        }
        resync_product(&mut tx, id).await?;
    }

    let sql = format!("{SELECT} WHERE id = $1");
    let row = sqlx::query_as::<_, ProductRow>(&sql)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(row)
}

pub async fn delete(pool: &PgPool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|d| d.is_foreign_key_violation())
            {
                RepoError::Conflict("Product has recorded sales and cannot be deleted".into())
            } else {
                RepoError::Sqlx(e)
            }
        })?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id}")));
    }
    Ok(())
}

/// Recompute every product's global stock from branch truth. Idempotent;
/// returns the number of products touched.
pub async fn sync_global(pool: &PgPool) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE products SET stock = COALESCE(
             (SELECT SUM(bs.quantity) FROM branch_stocks bs WHERE bs.product_id = products.id), 0)",
    )
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// Add `delta` (may be negative) to a branch's stock row, creating it
/// lazily. Returns the resulting quantity.
pub(super) async fn upsert_branch_stock(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    branch_id: i64,
    product_id: i64,
    delta: i32,
) -> RepoResult<i32> {
    let (quantity,): (i32,) = sqlx::query_as(
        "INSERT INTO branch_stocks (branch_id, product_id, quantity)
         VALUES ($1, $2, $3)
         ON CONFLICT (branch_id, product_id)
         DO UPDATE SET quantity = branch_stocks.quantity + EXCLUDED.quantity
         RETURNING quantity",
    )
    .bind(branch_id)
    .bind(product_id)
    .bind(delta)
    .fetch_one(&mut **tx)
    .await?;
    Ok(quantity)
}

/// Re-derive one product's global stock inside an open transaction.
pub(super) async fn resync_product(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    product_id: i64,
) -> RepoResult<()> {
    sqlx::query(
        "UPDATE products SET stock = COALESCE(
             (SELECT SUM(bs.quantity) FROM branch_stocks bs WHERE bs.product_id = $1), 0)
         WHERE id = $1",
    )
    .bind(product_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
