//! Low-stock notifications
//!
//! Dispatched after the sale transaction commits. Strictly best-effort: a
//! failed delivery is logged and forgotten, the sale stands.

use crate::core::Config;
use crate::db::sales::LowStockAlert;

pub async fn dispatch_low_stock(config: &Config, alerts: &[LowStockAlert]) {
    if alerts.is_empty() {
        return;
    }

    for alert in alerts {
        tracing::warn!(
            product_id = alert.product_id,
            product = %alert.product_name,
            branch_id = alert.branch_id,
            remaining = alert.remaining,
            "Low stock"
        );
    }

    let Some(url) = &config.low_stock_webhook_url else {
        return;
    };

    let payload = serde_json::json!({
        "type": "low_stock",
        "items": alerts,
    });

    match reqwest::Client::new().post(url).json(&payload).send().await {
        Ok(resp) if !resp.status().is_success() => {
            tracing::warn!(status = %resp.status(), "Low-stock webhook rejected");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Low-stock webhook unreachable");
        }
        _ => {}
    }
}
