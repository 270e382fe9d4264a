//! Ticket input data
//!
//! Plain data handed over by the server. Amounts are already final —
//! the renderer only formats, it never recomputes totals.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which layout to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketFormat {
    /// 80mm roll receipt, height sized to content
    Thermal,
    /// A4 full-page invoice
    Invoice,
}

impl TicketFormat {
    /// Parse the persisted settings value, defaulting to thermal.
    pub fn from_setting(value: &str) -> Self {
        match value {
            "invoice" => TicketFormat::Invoice,
            _ => TicketFormat::Thermal,
        }
    }
}

/// Store identity printed on every document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreProfile {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub tax_id: Option<String>,
    /// Currency symbol prefix, e.g. "$"
    pub currency: String,
}

/// Header data of the sale being printed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketSale {
    pub id: i64,
    pub branch_name: String,
    pub client_name: Option<String>,
    pub cashier_name: String,
    pub sold_at: DateTime<Utc>,
    /// Sum of line subtotals before discount
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub coupon_code: Option<String>,
    /// Final charged amount
    pub total: Decimal,
    pub notes: Option<String>,
}

/// One sold line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketLine {
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// Everything the renderer needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketData {
    pub store: StoreProfile,
    pub sale: TicketSale,
    pub lines: Vec<TicketLine>,
}
