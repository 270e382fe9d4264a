//! Store settings (single row, id = 1)

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::{RepoError, RepoResult};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SettingsRow {
    pub id: i64,
    pub store_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub tax_id: Option<String>,
    pub ticket_format: String,
    pub currency: String,
    pub logo_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SettingsUpdate {
    pub store_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub tax_id: Option<String>,
    pub ticket_format: Option<String>,
    pub currency: Option<String>,
}

const SELECT: &str = "SELECT id, store_name, address, phone, tax_id, ticket_format, currency, \
                      logo_path FROM settings WHERE id = 1";

pub async fn get(pool: &PgPool) -> RepoResult<SettingsRow> {
    let row = sqlx::query_as::<_, SettingsRow>(SELECT)
        .fetch_optional(pool)
        .await?;
    row.ok_or_else(|| RepoError::NotFound("Settings".into()))
}

pub async fn update(pool: &PgPool, data: &SettingsUpdate) -> RepoResult<SettingsRow> {
    if let Some(format) = &data.ticket_format {
        if format != "thermal" && format != "invoice" {
            return Err(RepoError::Invalid(
                "ticket_format must be 'thermal' or 'invoice'".into(),
            ));
        }
    }

    let row = sqlx::query_as::<_, SettingsRow>(
        "UPDATE settings SET
             store_name = COALESCE($1, store_name),
             address = COALESCE($2, address),
             phone = COALESCE($3, phone),
             tax_id = COALESCE($4, tax_id),
             ticket_format = COALESCE($5, ticket_format),
             currency = COALESCE($6, currency)
         WHERE id = 1
         RETURNING id, store_name, address, phone, tax_id, ticket_format, currency, logo_path",
    )
    .bind(&data.store_name)
    .bind(&data.address)
    .bind(&data.phone)
    .bind(&data.tax_id)
    .bind(&data.ticket_format)
    .bind(&data.currency)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn set_logo_path(pool: &PgPool, path: &str) -> RepoResult<()> {
    sqlx::query("UPDATE settings SET logo_path = $1 WHERE id = 1")
        .bind(path)
        .execute(pool)
        .await?;
    Ok(())
}
