//! Client database operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::{RepoError, RepoResult};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ClientRow {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ClientCreate {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClientUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

const SELECT: &str = "SELECT id, name, phone, email, address, created_at FROM clients";

pub async fn find_all(pool: &PgPool) -> RepoResult<Vec<ClientRow>> {
    let sql = format!("{SELECT} ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, ClientRow>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> RepoResult<Option<ClientRow>> {
    let sql = format!("{SELECT} WHERE id = $1");
    let row = sqlx::query_as::<_, ClientRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn search(pool: &PgPool, query: &str) -> RepoResult<Vec<ClientRow>> {
    let pattern = format!("%{query}%");
    let sql = format!("{SELECT} WHERE name ILIKE $1 OR phone ILIKE $1 ORDER BY name LIMIT 50");
    let rows = sqlx::query_as::<_, ClientRow>(&sql)
        .bind(&pattern)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create(pool: &PgPool, data: &ClientCreate) -> RepoResult<ClientRow> {
    let row = sqlx::query_as::<_, ClientRow>(
        "INSERT INTO clients (name, phone, email, address) VALUES ($1, $2, $3, $4)
         RETURNING id, name, phone, email, address, created_at",
    )
    .bind(&data.name)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(&data.address)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update(pool: &PgPool, id: i64, data: &ClientUpdate) -> RepoResult<ClientRow> {
    let row = sqlx::query_as::<_, ClientRow>(
        "UPDATE clients SET
             name = COALESCE($1, name),
             phone = COALESCE($2, phone),
             email = COALESCE($3, email),
             address = COALESCE($4, address)
         WHERE id = $5
         RETURNING id, name, phone, email, address, created_at",
    )
    .bind(&data.name)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(&data.address)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.ok_or_else(|| RepoError::NotFound(format!("Client {id}")))
}

pub async fn delete(pool: &PgPool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM clients WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Client {id}")));
    }
    Ok(())
}
