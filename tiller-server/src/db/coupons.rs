//! Coupon database operations and discount math

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::{RepoError, RepoResult};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CouponRow {
    pub id: i64,
    pub code: String,
    /// 'percent' or 'fixed'
    pub kind: String,
    pub value: Decimal,
    pub active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CouponCreate {
    pub code: String,
    pub kind: String,
    pub value: Decimal,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Discount granted by a coupon on a given subtotal.
pub fn discount_for(kind: &str, value: Decimal, subtotal: Decimal) -> Decimal {
    match kind {
        "percent" => (subtotal * value / Decimal::from(100)).round_dp(2),
        _ => value.round_dp(2),
    }
}

/// Final charged amount, never negative.
pub fn effective_total(subtotal: Decimal, discount: Decimal) -> Decimal {
    (subtotal - discount).max(Decimal::ZERO)
}

pub async fn find_all(pool: &PgPool) -> RepoResult<Vec<CouponRow>> {
    let rows = sqlx::query_as::<_, CouponRow>(
        "SELECT id, code, kind, value, active, expires_at, created_at
         FROM coupons ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Active, unexpired coupon by code. `None` both for unknown codes and for
/// known-but-unusable ones: the sale flow treats every miss as "no discount".
pub async fn find_usable<'e, E>(executor: E, code: &str) -> RepoResult<Option<CouponRow>>
where
    E: sqlx::PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, CouponRow>(
        "SELECT id, code, kind, value, active, expires_at, created_at
         FROM coupons
         WHERE code = $1 AND active AND (expires_at IS NULL OR expires_at > now())",
    )
    .bind(code)
    .fetch_optional(executor)
    .await?;
    Ok(row)
}

pub async fn create(pool: &PgPool, data: &CouponCreate) -> RepoResult<CouponRow> {
    if data.kind != "percent" && data.kind != "fixed" {
        return Err(RepoError::Invalid(
            "Coupon kind must be 'percent' or 'fixed'".into(),
        ));
    }
    if data.value <= Decimal::ZERO {
        return Err(RepoError::Invalid("Coupon value must be positive".into()));
    }

    let row = sqlx::query_as::<_, CouponRow>(
        "INSERT INTO coupons (code, kind, value, expires_at) VALUES ($1, $2, $3, $4)
         RETURNING id, code, kind, value, active, expires_at, created_at",
    )
    .bind(&data.code)
    .bind(&data.kind)
    .bind(data.value)
    .bind(data.expires_at)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn delete(pool: &PgPool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM coupons WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Coupon {id}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percent_discount() {
        // SAVE10: 10% off a 100.00 subtotal -> 90.00 charged
        let discount = discount_for("percent", dec!(10), dec!(100.00));
        assert_eq!(discount, dec!(10.00));
        assert_eq!(effective_total(dec!(100.00), discount), dec!(90.00));
    }

    #[test]
    fn test_fixed_discount() {
        let discount = discount_for("fixed", dec!(15), dec!(100.00));
        assert_eq!(effective_total(dec!(100.00), discount), dec!(85.00));
    }

    #[test]
    fn test_total_never_negative() {
        let discount = discount_for("fixed", dec!(500), dec!(20.00));
        assert_eq!(effective_total(dec!(20.00), discount), dec!(0));
    }

    #[test]
    fn test_percent_rounds_to_cents() {
        let discount = discount_for("percent", dec!(7.5), dec!(9.99));
        assert_eq!(discount, dec!(0.75));
    }
}
