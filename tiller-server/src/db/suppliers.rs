//! Supplier database operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::{RepoError, RepoResult};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SupplierRow {
    pub id: i64,
    pub name: String,
    pub contact: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SupplierCreate {
    pub name: String,
    pub contact: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

pub async fn find_all(pool: &PgPool) -> RepoResult<Vec<SupplierRow>> {
    let rows = sqlx::query_as::<_, SupplierRow>(
        "SELECT id, name, contact, phone, email, address, created_at
         FROM suppliers ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(pool: &PgPool, data: &SupplierCreate) -> RepoResult<SupplierRow> {
    let row = sqlx::query_as::<_, SupplierRow>(
        "INSERT INTO suppliers (name, contact, phone, email, address)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, name, contact, phone, email, address, created_at",
    )
    .bind(&data.name)
    .bind(&data.contact)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(&data.address)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn delete(pool: &PgPool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM suppliers WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Supplier {id}")));
    }
    Ok(())
}
