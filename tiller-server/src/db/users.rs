//! User database operations
//!
//! The password hash never leaves this module except through
//! [`find_auth_by_username`] / [`find_auth_by_id`], used by login and the
//! step-up confirmation on sale deletion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::{RepoError, RepoResult};

/// Public view - no hash.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub branch_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Credential view for password verification.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserAuthRow {
    pub id: i64,
    pub username: String,
    pub hashed_password: String,
    pub role: String,
    pub branch_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub role: String,
    pub branch_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct UserUpdate {
    pub password: Option<String>,
    pub role: Option<String>,
    pub branch_id: Option<i64>,
}

pub async fn count(pool: &PgPool) -> RepoResult<i64> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(n)
}

pub async fn find_all(pool: &PgPool) -> RepoResult<Vec<UserRow>> {
    let rows = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, role, branch_id, created_at FROM users ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_auth_by_username(pool: &PgPool, username: &str) -> RepoResult<Option<UserAuthRow>> {
    let row = sqlx::query_as::<_, UserAuthRow>(
        "SELECT id, username, hashed_password, role, branch_id FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_auth_by_id(pool: &PgPool, id: i64) -> RepoResult<Option<UserAuthRow>> {
    let row = sqlx::query_as::<_, UserAuthRow>(
        "SELECT id, username, hashed_password, role, branch_id FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// First-start bootstrap: admin on the main branch.
pub async fn create_admin(pool: &PgPool, username: &str, hashed_password: &str) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO users (username, hashed_password, role, branch_id)
         VALUES ($1, $2, 'admin', $3)",
    )
    .bind(username)
    .bind(hashed_password)
    .bind(super::branches::MAIN_BRANCH_ID)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn create(
    pool: &PgPool,
    data: &UserCreate,
    hashed_password: &str,
) -> RepoResult<UserRow> {
    let row = sqlx::query_as::<_, UserRow>(
        "INSERT INTO users (username, hashed_password, role, branch_id)
         VALUES ($1, $2, $3, $4)
         RETURNING id, username, role, branch_id, created_at",
    )
    .bind(&data.username)
    .bind(hashed_password)
    .bind(&data.role)
    .bind(data.branch_id)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &UserUpdate,
    hashed_password: Option<&str>,
) -> RepoResult<UserRow> {
    let row = sqlx::query_as::<_, UserRow>(
        "UPDATE users SET
             hashed_password = COALESCE($1, hashed_password),
             role = COALESCE($2, role),
             branch_id = COALESCE($3, branch_id)
         WHERE id = $4
         RETURNING id, username, role, branch_id, created_at",
    )
    .bind(hashed_password)
    .bind(&data.role)
    .bind(data.branch_id)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.ok_or_else(|| RepoError::NotFound(format!("User {id}")))
}

pub async fn delete(pool: &PgPool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id}")));
    }
    Ok(())
}
