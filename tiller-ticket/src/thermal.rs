//! Thermal receipt renderer
//!
//! Composes the classic 80mm roll receipt: centered store header, sale
//! metadata, one item block per line, totals and footer. The body is
//! monospaced, so rows are prepared as padded strings and the page
//! height is computed from the row list before anything is drawn.

use crate::error::TicketResult;
use crate::layout;
use crate::pdf::{Face, Sheet};
use crate::types::TicketData;

/// 80mm roll, 4mm side margins
const PAGE_WIDTH_MM: f32 = 80.0;
const MARGIN_MM: f32 = 4.0;
/// Characters per body line at 8pt Courier on the printable width
const WIDTH: usize = 42;

const BODY_PT: f32 = 8.0;
const LINE_MM: f32 = 3.6;

enum Row {
    /// Centered text, exact mono centering
    Center { text: String, face: Face, size: f32 },
    /// Padded body line at the left margin, 8pt mono
    Body(String),
    /// Label left, amount right-aligned at the right margin
    Split { left: String, right: String, face: Face, size: f32 },
    Rule,
    Blank,
}

impl Row {
    fn height(&self) -> f32 {
        match self {
            Row::Center { size, .. } | Row::Split { size, .. } => size * 0.5,
            Row::Body(_) => LINE_MM,
            Row::Rule => LINE_MM,
            Row::Blank => LINE_MM * 0.6,
        }
    }
}

pub struct ThermalRenderer;

impl ThermalRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, data: &TicketData) -> TicketResult<Vec<u8>> {
        let rows = self.compose(data);

        let content_mm: f32 = rows.iter().map(Row::height).sum();
        let height_mm = content_mm + 2.0 * MARGIN_MM + 6.0;

        let mut sheet = Sheet::new(
            &format!("Ticket #{}", data.sale.id),
            PAGE_WIDTH_MM,
            height_mm,
            MARGIN_MM + 4.0,
        )?;

        let right_edge = PAGE_WIDTH_MM - MARGIN_MM;
        for row in &rows {
            match row {
                Row::Center { text, face, size } => {
                    sheet.text_centered(*size, *face, text);
                }
                Row::Body(text) => {
                    sheet.text_at(MARGIN_MM, BODY_PT, Face::Mono, text);
                }
                Row::Split { left, right, face, size } => {
                    sheet.text_at(MARGIN_MM, *size, *face, left);
                    sheet.text_right(right_edge, *size, *face, right);
                }
                Row::Rule => {
                    sheet.rule(MARGIN_MM, right_edge);
                }
                Row::Blank => {}
            }
            sheet.advance(row.height());
        }

        sheet.finish()
    }

    fn compose(&self, data: &TicketData) -> Vec<Row> {
        let store = &data.store;
        let sale = &data.sale;
        let cur = store.currency.as_str();
        let mut rows = Vec::new();

        // Store header
        rows.push(Row::Center {
            text: store.name.clone(),
            face: Face::MonoBold,
            size: 10.0,
        });
        if let Some(address) = &store.address {
            for line in layout::wrap(address, WIDTH) {
                rows.push(Row::Center { text: line, face: Face::Mono, size: BODY_PT });
            }
        }
        if let Some(phone) = &store.phone {
            rows.push(Row::Center {
                text: format!("Tel: {phone}"),
                face: Face::Mono,
                size: BODY_PT,
            });
        }
        if let Some(tax_id) = &store.tax_id {
            rows.push(Row::Center {
                text: format!("Tax ID: {tax_id}"),
                face: Face::Mono,
                size: BODY_PT,
            });
        }
        rows.push(Row::Rule);

        // Sale metadata
        rows.push(Row::Body(layout::two_columns(
            &format!("Ticket #{}", sale.id),
            &sale.sold_at.format("%Y-%m-%d %H:%M").to_string(),
            WIDTH,
        )));
        rows.push(Row::Body(layout::truncate(
            &format!("Branch: {}", sale.branch_name),
            WIDTH,
        )));
        rows.push(Row::Body(layout::truncate(
            &format!("Cashier: {}", sale.cashier_name),
            WIDTH,
        )));
        if let Some(client) = &sale.client_name {
            rows.push(Row::Body(layout::truncate(&format!("Client: {client}"), WIDTH)));
        }
        rows.push(Row::Rule);

        // Items: name line, then quantity x unit price with the line total
        for line in &data.lines {
            rows.push(Row::Body(layout::truncate(&line.product_name, WIDTH)));
            rows.push(Row::Body(layout::two_columns(
                &format!(
                    "  {} x {}",
                    line.quantity,
                    layout::fmt_money(line.unit_price)
                ),
                &layout::fmt_currency(cur, line.subtotal),
                WIDTH,
            )));
        }
        rows.push(Row::Rule);

        // Totals
        rows.push(Row::Body(layout::two_columns(
            "Subtotal",
            &layout::fmt_currency(cur, sale.subtotal),
            WIDTH,
        )));
        if sale.discount > rust_decimal::Decimal::ZERO {
            let label = match &sale.coupon_code {
                Some(code) => format!("Discount ({code})"),
                None => "Discount".to_string(),
            };
            rows.push(Row::Body(layout::two_columns(
                &label,
                &format!("-{}", layout::fmt_currency(cur, sale.discount)),
                WIDTH,
            )));
        }
        rows.push(Row::Split {
            left: "TOTAL".to_string(),
            right: layout::fmt_currency(cur, sale.total),
            face: Face::MonoBold,
            size: 10.0,
        });

        // Footer
        if let Some(notes) = sale.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            rows.push(Row::Blank);
            for line in layout::wrap(notes, WIDTH) {
                rows.push(Row::Body(line));
            }
        }
        rows.push(Row::Blank);
        rows.push(Row::Center {
            text: "Thank you for your purchase!".to_string(),
            face: Face::Mono,
            size: BODY_PT,
        });

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{StoreProfile, TicketLine, TicketSale};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn sample() -> TicketData {
        TicketData {
            store: StoreProfile {
                name: "Corner Store".into(),
                address: Some("12 Main St".into()),
                phone: Some("555-0101".into()),
                tax_id: None,
                currency: "$".into(),
            },
            sale: TicketSale {
                id: 42,
                branch_name: "Main".into(),
                client_name: Some("Alice".into()),
                cashier_name: "bob".into(),
                sold_at: Utc::now(),
                subtotal: dec!(100.00),
                discount: dec!(10.00),
                coupon_code: Some("SAVE10".into()),
                total: dec!(90.00),
                notes: None,
            },
            lines: vec![TicketLine {
                product_name: "Coffee Beans 1kg".into(),
                quantity: 2,
                unit_price: dec!(50.00),
                subtotal: dec!(100.00),
            }],
        }
    }

    #[test]
    fn test_renders_pdf_bytes() {
        let pdf = ThermalRenderer::new().render(&sample()).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn test_height_grows_with_lines() {
        let renderer = ThermalRenderer::new();
        let short = renderer.compose(&sample());

        let mut data = sample();
        for i in 0..20 {
            data.lines.push(TicketLine {
                product_name: format!("Item {i}"),
                quantity: 1,
                unit_price: dec!(1.00),
                subtotal: dec!(1.00),
            });
        }
        let long = renderer.compose(&data);
        let short_mm: f32 = short.iter().map(Row::height).sum();
        let long_mm: f32 = long.iter().map(Row::height).sum();
        assert!(long_mm > short_mm);
    }

    #[test]
    fn test_discount_row_present_only_with_discount() {
        let renderer = ThermalRenderer::new();
        let with = renderer.compose(&sample());
        let has_discount = with.iter().any(|r| match r {
            Row::Body(text) => text.contains("SAVE10"),
            _ => false,
        });
        assert!(has_discount);

        let mut data = sample();
        data.sale.discount = dec!(0);
        data.sale.coupon_code = None;
        let without = renderer.compose(&data);
        let has_discount = without.iter().any(|r| match r {
            Row::Body(text) => text.contains("Discount"),
            _ => false,
        });
        assert!(!has_discount);
    }
}
