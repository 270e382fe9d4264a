//! Read-only reporting aggregations
//!
//! Pure grouping/summing over a half-open [from, to) range. No mutation;
//! a failed query surfaces as a 500 at the handler.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use super::RepoResult;

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Overview {
    pub revenue: Decimal,
    pub sales: i64,
    pub new_clients: i64,
    /// Sum of global stock across all products
    pub units_in_stock: i64,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct TrendPoint {
    pub day: String,
    pub value: Decimal,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CategorySale {
    pub category: String,
    pub value: Decimal,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct TopClient {
    pub name: String,
    pub total: Decimal,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct HourBucket {
    pub hour: i32,
    pub count: i64,
}

pub async fn overview(
    pool: &PgPool,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> RepoResult<Overview> {
    let (revenue, sales): (Decimal, i64) = sqlx::query_as(
        "SELECT COALESCE(SUM(total), 0), COUNT(*)
         FROM sales WHERE sold_at >= $1 AND sold_at < $2",
    )
    .bind(from)
    .bind(to)
    .fetch_one(pool)
    .await?;

    let (new_clients,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM clients WHERE created_at >= $1 AND created_at < $2",
    )
    .bind(from)
    .bind(to)
    .fetch_one(pool)
    .await?;

    let (units_in_stock,): (i64,) =
        sqlx::query_as("SELECT COALESCE(SUM(stock), 0)::bigint FROM products")
            .fetch_one(pool)
            .await?;

    Ok(Overview {
        revenue,
        sales,
        new_clients,
        units_in_stock,
    })
}

pub async fn revenue_trend(
    pool: &PgPool,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> RepoResult<Vec<TrendPoint>> {
    let rows = sqlx::query_as::<_, TrendPoint>(
        "SELECT to_char(date_trunc('day', sold_at), 'YYYY-MM-DD') AS day,
                SUM(total) AS value
         FROM sales
         WHERE sold_at >= $1 AND sold_at < $2
         GROUP BY 1
         ORDER BY 1",
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn category_sales(
    pool: &PgPool,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> RepoResult<Vec<CategorySale>> {
    let rows = sqlx::query_as::<_, CategorySale>(
        "SELECT p.category, SUM(d.subtotal) AS value
         FROM sale_details d
         JOIN sales s ON s.id = d.sale_id
         JOIN products p ON p.id = d.product_id
         WHERE s.sold_at >= $1 AND s.sold_at < $2
         GROUP BY p.category
         ORDER BY value DESC
         LIMIT 10",
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn top_clients(
    pool: &PgPool,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> RepoResult<Vec<TopClient>> {
    let rows = sqlx::query_as::<_, TopClient>(
        "SELECT c.name, SUM(s.total) AS total
         FROM sales s
         JOIN clients c ON c.id = s.client_id
         WHERE s.sold_at >= $1 AND s.sold_at < $2
         GROUP BY c.name
         ORDER BY total DESC
         LIMIT 5",
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn hourly_histogram(
    pool: &PgPool,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> RepoResult<Vec<HourBucket>> {
    let rows = sqlx::query_as::<_, HourBucket>(
        "SELECT EXTRACT(HOUR FROM sold_at)::int AS hour, COUNT(*) AS count
         FROM sales
         WHERE sold_at >= $1 AND sold_at < $2
         GROUP BY 1
         ORDER BY 1",
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
