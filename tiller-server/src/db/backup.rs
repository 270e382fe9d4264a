//! SQL backup export / restore
//!
//! The export is a plain-text SQL script: per-table DELETEs (reverse FK
//! order) followed by INSERTs (FK order) and sequence resets, so feeding
//! the file back through [`restore`] reproduces the exact dataset. The
//! restore executes the whole script inside one transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::RepoResult;

/// Tables in FK-safe insert order.
const TABLES: &[&str] = &[
    "branches",
    "users",
    "clients",
    "suppliers",
    "products",
    "branch_stocks",
    "coupons",
    "sales",
    "sale_details",
    "settings",
    "sale_returns",
    "sale_return_items",
    "inventory_transfers",
];

// ── Value formatting ──

fn sql_str(v: &str) -> String {
    format!("'{}'", v.replace('\'', "''"))
}

fn opt_str(v: &Option<String>) -> String {
    match v {
        Some(s) => sql_str(s),
        None => "NULL".into(),
    }
}

fn opt_i64(v: &Option<i64>) -> String {
    match v {
        Some(n) => n.to_string(),
        None => "NULL".into(),
    }
}

fn ts(v: &DateTime<Utc>) -> String {
    format!("'{}'", v.to_rfc3339())
}

fn opt_ts(v: &Option<DateTime<Utc>>) -> String {
    match v {
        Some(t) => ts(t),
        None => "NULL".into(),
    }
}

fn money(v: &Decimal) -> String {
    v.to_string()
}

// ── Export ──

pub async fn export(pool: &PgPool) -> RepoResult<String> {
    let mut out = String::with_capacity(64 * 1024);
    out.push_str(&format!("-- tiller backup {}\n", Utc::now().to_rfc3339()));
    out.push_str("BEGIN;\n");

    for table in TABLES.iter().rev() {
        out.push_str(&format!("DELETE FROM {table};\n"));
    }

    let branches: Vec<(i64, String, Option<String>, Option<String>, DateTime<Utc>)> =
        sqlx::query_as("SELECT id, name, address, phone, created_at FROM branches ORDER BY id")
            .fetch_all(pool)
            .await?;
    for (id, name, address, phone, created_at) in &branches {
        out.push_str(&format!(
            "INSERT INTO branches (id, name, address, phone, created_at) VALUES ({}, {}, {}, {}, {});\n",
            id, sql_str(name), opt_str(address), opt_str(phone), ts(created_at)
        ));
    }

    let users: Vec<(i64, String, String, String, i64, DateTime<Utc>)> = sqlx::query_as(
        "SELECT id, username, hashed_password, role, branch_id, created_at FROM users ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    for (id, username, hash, role, branch_id, created_at) in &users {
        out.push_str(&format!(
            "INSERT INTO users (id, username, hashed_password, role, branch_id, created_at) VALUES ({}, {}, {}, {}, {}, {});\n",
            id, sql_str(username), sql_str(hash), sql_str(role), branch_id, ts(created_at)
        ));
    }

    let clients: Vec<(i64, String, Option<String>, Option<String>, Option<String>, DateTime<Utc>)> =
        sqlx::query_as("SELECT id, name, phone, email, address, created_at FROM clients ORDER BY id")
            .fetch_all(pool)
            .await?;
    for (id, name, phone, email, address, created_at) in &clients {
        out.push_str(&format!(
            "INSERT INTO clients (id, name, phone, email, address, created_at) VALUES ({}, {}, {}, {}, {}, {});\n",
            id, sql_str(name), opt_str(phone), opt_str(email), opt_str(address), ts(created_at)
        ));
    }

    let suppliers: Vec<(
        i64,
        String,
        Option<String>,
        Option<String>,
        Option<String>,
        Option<String>,
        DateTime<Utc>,
    )> = sqlx::query_as(
        "SELECT id, name, contact, phone, email, address, created_at FROM suppliers ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    for (id, name, contact, phone, email, address, created_at) in &suppliers {
        out.push_str(&format!(
            "INSERT INTO suppliers (id, name, contact, phone, email, address, created_at) VALUES ({}, {}, {}, {}, {}, {}, {});\n",
            id, sql_str(name), opt_str(contact), opt_str(phone), opt_str(email), opt_str(address), ts(created_at)
        ));
    }

    let products = super::products::find_all(pool).await?;
    for p in &products {
        out.push_str(&format!(
            "INSERT INTO products (id, name, category, barcode, unit_price, unit_cost, stock, supplier_id, created_at, updated_at) VALUES ({}, {}, {}, {}, {}, {}, {}, {}, {}, {});\n",
            p.id,
            sql_str(&p.name),
            sql_str(&p.category),
            opt_str(&p.barcode),
            money(&p.unit_price),
            money(&p.unit_cost),
            p.stock,
            opt_i64(&p.supplier_id),
            ts(&p.created_at),
            ts(&p.updated_at)
        ));
    }

    let branch_stocks: Vec<(i64, i64, i64, i32)> = sqlx::query_as(
        "SELECT id, branch_id, product_id, quantity FROM branch_stocks ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    for (id, branch_id, product_id, quantity) in &branch_stocks {
        out.push_str(&format!(
            "INSERT INTO branch_stocks (id, branch_id, product_id, quantity) VALUES ({id}, {branch_id}, {product_id}, {quantity});\n"
        ));
    }

    let coupons: Vec<(i64, String, String, Decimal, bool, Option<DateTime<Utc>>, DateTime<Utc>)> =
        sqlx::query_as(
            "SELECT id, code, kind, value, active, expires_at, created_at FROM coupons ORDER BY id",
        )
        .fetch_all(pool)
        .await?;
    for (id, code, kind, value, active, expires_at, created_at) in &coupons {
        out.push_str(&format!(
            "INSERT INTO coupons (id, code, kind, value, active, expires_at, created_at) VALUES ({}, {}, {}, {}, {}, {}, {});\n",
            id,
            sql_str(code),
            sql_str(kind),
            money(value),
            if *active { "TRUE" } else { "FALSE" },
            opt_ts(expires_at),
            ts(created_at)
        ));
    }

    let sales: Vec<(
        i64,
        Option<i64>,
        i64,
        i64,
        Decimal,
        Decimal,
        Option<String>,
        Option<String>,
        DateTime<Utc>,
    )> = sqlx::query_as(
        "SELECT id, client_id, branch_id, user_id, total, discount, coupon_code, notes, sold_at \
         FROM sales ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    for (id, client_id, branch_id, user_id, total, discount, coupon_code, notes, sold_at) in &sales {
        out.push_str(&format!(
            "INSERT INTO sales (id, client_id, branch_id, user_id, total, discount, coupon_code, notes, sold_at) VALUES ({}, {}, {}, {}, {}, {}, {}, {}, {});\n",
            id,
            opt_i64(client_id),
            branch_id,
            user_id,
            money(total),
            money(discount),
            opt_str(coupon_code),
            opt_str(notes),
            ts(sold_at)
        ));
    }

    let details: Vec<(i64, i64, i64, i32, Decimal)> = sqlx::query_as(
        "SELECT id, sale_id, product_id, quantity, subtotal FROM sale_details ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    for (id, sale_id, product_id, quantity, subtotal) in &details {
        out.push_str(&format!(
            "INSERT INTO sale_details (id, sale_id, product_id, quantity, subtotal) VALUES ({}, {}, {}, {}, {});\n",
            id, sale_id, product_id, quantity, money(subtotal)
        ));
    }

    let settings: Vec<(
        i64,
        String,
        Option<String>,
        Option<String>,
        Option<String>,
        String,
        String,
        Option<String>,
    )> = sqlx::query_as(
        "SELECT id, store_name, address, phone, tax_id, ticket_format, currency, logo_path \
         FROM settings ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    for (id, store_name, address, phone, tax_id, ticket_format, currency, logo_path) in &settings {
        out.push_str(&format!(
            "INSERT INTO settings (id, store_name, address, phone, tax_id, ticket_format, currency, logo_path) VALUES ({}, {}, {}, {}, {}, {}, {}, {});\n",
            id,
            sql_str(store_name),
            opt_str(address),
            opt_str(phone),
            opt_str(tax_id),
            sql_str(ticket_format),
            sql_str(currency),
            opt_str(logo_path)
        ));
    }

    let returns: Vec<(i64, i64, Option<i64>, DateTime<Utc>)> = sqlx::query_as(
        "SELECT id, sale_id, returned_by, returned_at FROM sale_returns ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    for (id, sale_id, returned_by, returned_at) in &returns {
        out.push_str(&format!(
            "INSERT INTO sale_returns (id, sale_id, returned_by, returned_at) VALUES ({}, {}, {}, {});\n",
            id,
            sale_id,
            opt_i64(returned_by),
            ts(returned_at)
        ));
    }

    let return_items: Vec<(i64, i64, i64, i32)> = sqlx::query_as(
        "SELECT id, return_id, product_id, quantity FROM sale_return_items ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    for (id, return_id, product_id, quantity) in &return_items {
        out.push_str(&format!(
            "INSERT INTO sale_return_items (id, return_id, product_id, quantity) VALUES ({id}, {return_id}, {product_id}, {quantity});\n"
        ));
    }

    let transfers: Vec<(i64, i64, i64, i64, i32, Option<i64>, DateTime<Utc>)> = sqlx::query_as(
        "SELECT id, product_id, from_branch, to_branch, quantity, transferred_by, transferred_at \
         FROM inventory_transfers ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    for (id, product_id, from_branch, to_branch, quantity, transferred_by, transferred_at) in
        &transfers
    {
        out.push_str(&format!(
            "INSERT INTO inventory_transfers (id, product_id, from_branch, to_branch, quantity, transferred_by, transferred_at) VALUES ({}, {}, {}, {}, {}, {}, {});\n",
            id,
            product_id,
            from_branch,
            to_branch,
            quantity,
            opt_i64(transferred_by),
            ts(transferred_at)
        ));
    }

    // Serial sequences continue past the restored ids; settings has no serial.
    for table in TABLES.iter().filter(|t| **t != "settings") {
        out.push_str(&format!(
            "SELECT setval(pg_get_serial_sequence('{table}', 'id'), (SELECT COALESCE(MAX(id), 1) FROM {table}));\n"
        ));
    }

    out.push_str("COMMIT;\n");
    Ok(out)
}

// ── Restore ──

/// Split a dump into individual statements. Semicolons inside
/// single-quoted strings do not terminate a statement ('' is the quote
/// escape); `--` comments are dropped.
pub fn split_statements(dump: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_string = false;
    let mut chars = dump.chars().peekable();

    while let Some(c) = chars.next() {
        if in_string {
            current.push(c);
            if c == '\'' {
                in_string = false;
            }
            continue;
        }
        match c {
            '\'' => {
                in_string = true;
                current.push(c);
            }
            '-' if chars.peek() == Some(&'-') => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        break;
                    }
                }
            }
            ';' => {
                let stmt = current.trim().to_string();
                if !stmt.is_empty() {
                    statements.push(stmt);
                }
                current.clear();
            }
            _ => current.push(c),
        }
    }
    let stmt = current.trim().to_string();
    if !stmt.is_empty() {
        statements.push(stmt);
    }
    statements
}

/// Execute a dump inside one transaction. The script's own BEGIN/COMMIT
/// markers are skipped. Rolls back entirely on any failed statement.
pub async fn restore(pool: &PgPool, dump: &str) -> RepoResult<u64> {
    let mut tx = pool.begin().await?;
    let mut executed = 0u64;

    for stmt in split_statements(dump) {
        let keyword = stmt.to_uppercase();
        if keyword == "BEGIN" || keyword == "COMMIT" {
            continue;
        }
        sqlx::query(&stmt).execute(&mut *tx).await?;
        executed += 1;
    }

    tx.commit().await?;
    Ok(executed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain_statements() {
        let dump = "DELETE FROM a;\nINSERT INTO a (id) VALUES (1);\n";
        let stmts = split_statements(dump);
        assert_eq!(stmts, vec!["DELETE FROM a", "INSERT INTO a (id) VALUES (1)"]);
    }

    #[test]
    fn test_split_respects_quoted_semicolons() {
        let dump = "INSERT INTO t (name) VALUES ('a;b');INSERT INTO t (name) VALUES ('it''s; fine');";
        let stmts = split_statements(dump);
        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].contains("'a;b'"));
        assert!(stmts[1].contains("'it''s; fine'"));
    }

    #[test]
    fn test_split_drops_comments() {
        let dump = "-- header comment\nDELETE FROM a;\n-- trailing\n";
        let stmts = split_statements(dump);
        assert_eq!(stmts, vec!["DELETE FROM a"]);
    }

    #[test]
    fn test_escaping() {
        assert_eq!(sql_str("O'Brien"), "'O''Brien'");
        assert_eq!(opt_str(&None), "NULL");
    }

    #[test]
    fn test_round_trip_statement_shape() {
        // an escaped value survives split intact
        let stmt = format!("INSERT INTO clients (name) VALUES ({})", sql_str("O'Brien; Ltd"));
        let dump = format!("{stmt};\n");
        let stmts = split_statements(&dump);
        assert_eq!(stmts, vec![stmt]);
    }
}
