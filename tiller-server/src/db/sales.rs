//! Sale database operations
//!
//! The sale flow is the transactional core of the system:
//!
//! 1. Lock every (branch, product) stock row being sold (`FOR UPDATE`)
//!    and read the unit price in the same statement.
//! 2. Abort on the first line whose locked quantity is short - nothing is
//!    persisted.
//! 3. Apply the coupon (unknown codes silently grant no discount), insert
//!    the sale, its details, and decrement branch + global stock.
//! 4. Report branches that dropped to the low-stock threshold; the caller
//!    dispatches alerts after commit, best-effort.
//!
//! Two concurrent sales on the same stock row serialize at the database
//! lock; the loser re-reads an already-decremented quantity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;

use super::coupons;
use super::{RepoError, RepoResult};

/// Branch quantity at or below this triggers a notification.
pub const LOW_STOCK_THRESHOLD: i32 = 10;

// ── Input / output types ──

#[derive(Debug, Clone, Deserialize)]
pub struct SaleLineInput {
    pub product_id: i64,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct SaleInput {
    pub client_id: Option<i64>,
    pub items: Vec<SaleLineInput>,
    pub sold_at: Option<DateTime<Utc>>,
    pub coupon_code: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedSale {
    pub id: i64,
    pub total: Decimal,
    pub discount: Decimal,
    #[serde(skip)]
    pub low_stock: Vec<LowStockAlert>,
}

/// Queued inside the sale transaction, dispatched after commit.
#[derive(Debug, Clone, Serialize)]
pub struct LowStockAlert {
    pub product_id: i64,
    pub product_name: String,
    pub branch_id: i64,
    pub remaining: i32,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SaleRow {
    pub id: i64,
    pub client_id: Option<i64>,
    pub client_name: Option<String>,
    pub branch_id: i64,
    pub user_id: i64,
    pub cashier_name: String,
    pub total: Decimal,
    pub discount: Decimal,
    pub coupon_code: Option<String>,
    pub notes: Option<String>,
    pub sold_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SaleDetailRow {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub subtotal: Decimal,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SaleReturnRow {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub returned_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SaleWithDetails {
    #[serde(flatten)]
    pub sale: SaleRow,
    pub details: Vec<SaleDetailRow>,
    pub returns: Vec<SaleReturnRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReturnItemInput {
    pub product_id: i64,
    pub quantity: i32,
}

// ── Sale creation ──

pub async fn create(
    pool: &PgPool,
    branch_id: i64,
    user_id: i64,
    input: &SaleInput,
) -> RepoResult<CreatedSale> {
    if input.items.is_empty() {
        return Err(RepoError::Invalid("Sale has no items".into()));
    }
    let mut seen = std::collections::HashSet::new();
    for line in &input.items {
        if line.quantity <= 0 {
            return Err(RepoError::Invalid(format!(
                "Invalid quantity for product {}",
                line.product_id
            )));
        }
        // Duplicate lines would each pass the stock check against the same
        // locked quantity and overdraw it on decrement.
        if !seen.insert(line.product_id) {
            return Err(RepoError::Invalid(format!(
                "Product {} appears more than once",
                line.product_id
            )));
        }
    }

    let mut tx = pool.begin().await?;

    // Lock stock rows and price every line
    struct PricedLine {
        product_id: i64,
        product_name: String,
        quantity: i32,
        subtotal: Decimal,
    }

    let mut subtotal_sum = Decimal::ZERO;
    let mut priced: Vec<PricedLine> = Vec::with_capacity(input.items.len());
    for line in &input.items {
        let row: Option<(i32, Decimal, String)> = sqlx::query_as(
            "SELECT bs.quantity, p.unit_price, p.name
             FROM branch_stocks bs
             JOIN products p ON p.id = bs.product_id
             WHERE bs.branch_id = $1 AND bs.product_id = $2
             FOR UPDATE",
        )
        .bind(branch_id)
        .bind(line.product_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((available, unit_price, name)) = row else {
            return Err(RepoError::StockInsufficient {
                product: format!("product {}", line.product_id),
            });
        };
        if available < line.quantity {
            return Err(RepoError::StockInsufficient { product: name });
        }

        let subtotal = unit_price * Decimal::from(line.quantity);
        subtotal_sum += subtotal;
        priced.push(PricedLine {
            product_id: line.product_id,
            product_name: name,
            quantity: line.quantity,
            subtotal,
        });
    }

    // Coupon lookup is a soft-fail: a miss means no discount, no error.
    let mut discount = Decimal::ZERO;
    let mut applied_code: Option<String> = None;
    if let Some(code) = input.coupon_code.as_deref().filter(|c| !c.is_empty()) {
        if let Some(coupon) = coupons::find_usable(&mut *tx, code).await? {
            discount = coupons::discount_for(&coupon.kind, coupon.value, subtotal_sum);
            applied_code = Some(coupon.code);
        }
    }
    let total = coupons::effective_total(subtotal_sum, discount);
    let sold_at = input.sold_at.unwrap_or_else(Utc::now);

    let (sale_id,): (i64,) = sqlx::query_as(
        "INSERT INTO sales (client_id, branch_id, user_id, total, discount, coupon_code, notes, sold_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING id",
    )
    .bind(input.client_id)
    .bind(branch_id)
    .bind(user_id)
    .bind(total)
    .bind(discount)
    .bind(&applied_code)
    .bind(&input.notes)
    .bind(sold_at)
    .fetch_one(&mut *tx)
    .await?;

    let mut low_stock = Vec::new();
    for line in &priced {
        sqlx::query(
            "INSERT INTO sale_details (sale_id, product_id, quantity, subtotal)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(sale_id)
        .bind(line.product_id)
        .bind(line.quantity)
        .bind(line.subtotal)
        .execute(&mut *tx)
        .await?;

        let (remaining,): (i32,) = sqlx::query_as(
            "UPDATE branch_stocks SET quantity = quantity - $1
             WHERE branch_id = $2 AND product_id = $3
             RETURNING quantity",
        )
        .bind(line.quantity)
        .bind(branch_id)
        .bind(line.product_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE products SET stock = stock - $1, updated_at = now() WHERE id = $2")
            .bind(line.quantity)
            .bind(line.product_id)
            .execute(&mut *tx)
            .await?;

        if remaining <= LOW_STOCK_THRESHOLD {
            low_stock.push(LowStockAlert {
                product_id: line.product_id,
                product_name: line.product_name.clone(),
                branch_id,
                remaining,
            });
        }
    }

    tx.commit().await?;

    Ok(CreatedSale {
        id: sale_id,
        total,
        discount,
        low_stock,
    })
}

// ── Reads ──

const SALE_SELECT: &str = "SELECT s.id, s.client_id, c.name AS client_name, s.branch_id, \
                           s.user_id, u.username AS cashier_name, s.total, s.discount, \
                           s.coupon_code, s.notes, s.sold_at \
                           FROM sales s \
                           JOIN users u ON u.id = s.user_id \
                           LEFT JOIN clients c ON c.id = s.client_id";

pub async fn list(
    pool: &PgPool,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
    branch_id: Option<i64>,
) -> RepoResult<Vec<SaleRow>> {
    let sql = format!(
        "{SALE_SELECT}
         WHERE ($1::timestamptz IS NULL OR s.sold_at >= $1)
           AND ($2::timestamptz IS NULL OR s.sold_at < $2)
           AND ($3::bigint IS NULL OR s.branch_id = $3)
         ORDER BY s.sold_at DESC
         LIMIT 200"
    );
    let rows = sqlx::query_as::<_, SaleRow>(&sql)
        .bind(from)
        .bind(to)
        .bind(branch_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_with_details(pool: &PgPool, id: i64) -> RepoResult<Option<SaleWithDetails>> {
    let sql = format!("{SALE_SELECT} WHERE s.id = $1");
    let Some(sale) = sqlx::query_as::<_, SaleRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };

    let details = sqlx::query_as::<_, SaleDetailRow>(
        "SELECT d.id, d.product_id, p.name AS product_name, d.quantity, d.subtotal
         FROM sale_details d
         JOIN products p ON p.id = d.product_id
         WHERE d.sale_id = $1
         ORDER BY d.id",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let returns = sqlx::query_as::<_, SaleReturnRow>(
        "SELECT ri.id, ri.product_id, p.name AS product_name, ri.quantity, r.returned_at
         FROM sale_return_items ri
         JOIN sale_returns r ON r.id = ri.return_id
         JOIN products p ON p.id = ri.product_id
         WHERE r.sale_id = $1
         ORDER BY ri.id",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(Some(SaleWithDetails {
        sale,
        details,
        returns,
    }))
}

// ── Deletion (full reversal) ──

/// Restore every line's quantity to branch and global stock, then remove
/// the return ledger, the details and the sale itself. One transaction.
pub async fn delete(pool: &PgPool, id: i64) -> RepoResult<()> {
    let mut tx = pool.begin().await?;

    let sale: Option<(i64,)> = sqlx::query_as("SELECT branch_id FROM sales WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    let Some((branch_id,)) = sale else {
        return Err(RepoError::NotFound(format!("Sale {id}")));
    };

    let details: Vec<(i64, i32)> =
        sqlx::query_as("SELECT product_id, quantity FROM sale_details WHERE sale_id = $1")
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

    // Quantities already returned through the ledger are back in stock;
    // restoring them again would double-count.
    let returned: Vec<(i64, i64)> = sqlx::query_as(
        "SELECT ri.product_id, SUM(ri.quantity)::bigint
         FROM sale_return_items ri
         JOIN sale_returns r ON r.id = ri.return_id
         WHERE r.sale_id = $1
         GROUP BY ri.product_id",
    )
    .bind(id)
    .fetch_all(&mut *tx)
    .await?;
    let returned: HashMap<i64, i64> = returned.into_iter().collect();

    for (product_id, quantity) in &details {
        let restore = *quantity as i64 - returned.get(product_id).copied().unwrap_or(0);
        if restore <= 0 {
            continue;
        }
        super::products::upsert_branch_stock(&mut tx, branch_id, *product_id, restore as i32)
            .await?;
        sqlx::query("UPDATE products SET stock = stock + $1, updated_at = now() WHERE id = $2")
            .bind(restore as i32)
            .bind(product_id)
            .execute(&mut *tx)
            .await?;
    }

    sqlx::query(
        "DELETE FROM sale_return_items WHERE return_id IN
             (SELECT id FROM sale_returns WHERE sale_id = $1)",
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;
    sqlx::query("DELETE FROM sale_returns WHERE sale_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM sale_details WHERE sale_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM sales WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

// ── Partial return ──

/// Return a subset of the sale's items: stock is restored and a ledger
/// entry is written. The sale, its details and its total stay untouched.
pub async fn partial_return(
    pool: &PgPool,
    sale_id: i64,
    user_id: i64,
    items: &[ReturnItemInput],
) -> RepoResult<i64> {
    if items.is_empty() {
        return Err(RepoError::Invalid("Return has no items".into()));
    }

    let mut tx = pool.begin().await?;

    let sale: Option<(i64,)> = sqlx::query_as("SELECT branch_id FROM sales WHERE id = $1 FOR UPDATE")
        .bind(sale_id)
        .fetch_optional(&mut *tx)
        .await?;
    let Some((branch_id,)) = sale else {
        return Err(RepoError::NotFound(format!("Sale {sale_id}")));
    };

    let sold: Vec<(i64, i64)> = sqlx::query_as(
        "SELECT product_id, SUM(quantity)::bigint FROM sale_details
         WHERE sale_id = $1 GROUP BY product_id",
    )
    .bind(sale_id)
    .fetch_all(&mut *tx)
    .await?;
    let sold: HashMap<i64, i64> = sold.into_iter().collect();

    let returned: Vec<(i64, i64)> = sqlx::query_as(
        "SELECT ri.product_id, SUM(ri.quantity)::bigint
         FROM sale_return_items ri
         JOIN sale_returns r ON r.id = ri.return_id
         WHERE r.sale_id = $1
         GROUP BY ri.product_id",
    )
    .bind(sale_id)
    .fetch_all(&mut *tx)
    .await?;
    let returned: HashMap<i64, i64> = returned.into_iter().collect();

    let mut seen = std::collections::HashSet::new();
    for item in items {
        if item.quantity <= 0 {
            return Err(RepoError::Invalid(format!(
                "Invalid return quantity for product {}",
                item.product_id
            )));
        }
        if !seen.insert(item.product_id) {
            return Err(RepoError::Invalid(format!(
                "Product {} appears more than once",
                item.product_id
            )));
        }
        let sold_qty = sold.get(&item.product_id).copied().unwrap_or(0);
        let returned_qty = returned.get(&item.product_id).copied().unwrap_or(0);
        if item.quantity as i64 > sold_qty - returned_qty {
            return Err(RepoError::Invalid(format!(
                "Return exceeds remaining quantity for product {}",
                item.product_id
            )));
        }
    }

    let (return_id,): (i64,) = sqlx::query_as(
        "INSERT INTO sale_returns (sale_id, returned_by) VALUES ($1, $2) RETURNING id",
    )
    .bind(sale_id)
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;

    for item in items {
        sqlx::query(
            "INSERT INTO sale_return_items (return_id, product_id, quantity) VALUES ($1, $2, $3)",
        )
        .bind(return_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .execute(&mut *tx)
        .await?;

        super::products::upsert_branch_stock(&mut tx, branch_id, item.product_id, item.quantity)
            .await?;
        sqlx::query("UPDATE products SET stock = stock + $1, updated_at = now() WHERE id = $2")
            .bind(item.quantity)
            .bind(item.product_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(return_id)
}

// ── Ticket data ──

/// Everything the ticket renderer needs for one sale.
pub async fn ticket_data(pool: &PgPool, id: i64) -> RepoResult<Option<tiller_ticket::TicketData>> {
    let Some(sale) = find_with_details(pool, id).await? else {
        return Ok(None);
    };

    let branch: Option<(String,)> = sqlx::query_as("SELECT name FROM branches WHERE id = $1")
        .bind(sale.sale.branch_id)
        .fetch_optional(pool)
        .await?;
    let branch_name = branch.map(|(n,)| n).unwrap_or_else(|| "-".into());

    let settings = super::settings::get(pool).await?;

    let subtotal: Decimal = sale.details.iter().map(|d| d.subtotal).sum();

    Ok(Some(tiller_ticket::TicketData {
        store: tiller_ticket::StoreProfile {
            name: settings.store_name,
            address: settings.address,
            phone: settings.phone,
            tax_id: settings.tax_id,
            currency: settings.currency,
        },
        sale: tiller_ticket::TicketSale {
            id: sale.sale.id,
            branch_name,
            client_name: sale.sale.client_name,
            cashier_name: sale.sale.cashier_name,
            sold_at: sale.sale.sold_at,
            subtotal,
            discount: sale.sale.discount,
            coupon_code: sale.sale.coupon_code,
            total: sale.sale.total,
            notes: sale.sale.notes,
        },
        lines: sale
            .details
            .into_iter()
            .map(|d| tiller_ticket::TicketLine {
                product_name: d.product_name,
                quantity: d.quantity,
                unit_price: if d.quantity > 0 {
                    (d.subtotal / Decimal::from(d.quantity)).round_dp(2)
                } else {
                    Decimal::ZERO
                },
                subtotal: d.subtotal,
            })
            .collect(),
    }))
}
