//! A4 invoice renderer
//!
//! Full-page layout: store block top-left, document block top-right,
//! bill-to section, item table with page breaks, totals block.
//! Numeric cells use the monospaced face so right alignment is exact.

use crate::error::TicketResult;
use crate::layout;
use crate::pdf::{Face, Sheet};
use crate::types::TicketData;

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 20.0;
const RIGHT: f32 = PAGE_W - MARGIN;

// Table column anchors (mm)
const COL_ITEM: f32 = MARGIN;
const COL_QTY: f32 = 120.0;
const COL_UNIT: f32 = 155.0;
const COL_TOTAL: f32 = RIGHT;

const ROW_MM: f32 = 6.0;

pub struct InvoiceRenderer;

impl InvoiceRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, data: &TicketData) -> TicketResult<Vec<u8>> {
        let store = &data.store;
        let sale = &data.sale;
        let cur = store.currency.as_str();

        let mut sheet = Sheet::new(&format!("Invoice #{}", sale.id), PAGE_W, PAGE_H, MARGIN)?;

        // Store block (left) and document block (right) share baselines
        sheet.text_at(MARGIN, 16.0, Face::Bold, &store.name);
        sheet.text_right(RIGHT, 16.0, Face::Bold, "INVOICE");
        sheet.advance(7.0);

        if let Some(address) = &store.address {
            sheet.text_at(MARGIN, 9.0, Face::Regular, address);
        }
        sheet.text_right(RIGHT, 9.0, Face::Regular, &format!("No. {}", sale.id));
        sheet.advance(5.0);

        if let Some(phone) = &store.phone {
            sheet.text_at(MARGIN, 9.0, Face::Regular, &format!("Tel: {phone}"));
        }
        sheet.text_right(
            RIGHT,
            9.0,
            Face::Regular,
            &sale.sold_at.format("%Y-%m-%d %H:%M").to_string(),
        );
        sheet.advance(5.0);

        if let Some(tax_id) = &store.tax_id {
            sheet.text_at(MARGIN, 9.0, Face::Regular, &format!("Tax ID: {tax_id}"));
            sheet.advance(5.0);
        }
        sheet.advance(6.0);

        // Bill-to
        sheet.text_at(MARGIN, 10.0, Face::Bold, "Billed to");
        sheet.advance(5.5);
        let client = sale.client_name.as_deref().unwrap_or("Walk-in customer");
        sheet.text_at(MARGIN, 10.0, Face::Regular, client);
        sheet.advance(5.0);
        sheet.text_at(
            MARGIN,
            9.0,
            Face::Regular,
            &format!("Branch: {} / Cashier: {}", sale.branch_name, sale.cashier_name),
        );
        sheet.advance(10.0);

        // Table header
        sheet.text_at(COL_ITEM, 9.0, Face::Bold, "Item");
        sheet.text_right(COL_QTY, 9.0, Face::Bold, "Qty");
        sheet.text_right(COL_UNIT, 9.0, Face::Bold, "Unit price");
        sheet.text_right(COL_TOTAL, 9.0, Face::Bold, "Amount");
        sheet.advance(2.0);
        sheet.rule(MARGIN, RIGHT);
        sheet.advance(ROW_MM - 2.0);

        for line in &data.lines {
            sheet.ensure_space(ROW_MM + 30.0, MARGIN, MARGIN);
            sheet.text_at(COL_ITEM, 10.0, Face::Regular, &layout::truncate(&line.product_name, 48));
            sheet.text_right(COL_QTY, 10.0, Face::Mono, &line.quantity.to_string());
            sheet.text_right(COL_UNIT, 10.0, Face::Mono, &layout::fmt_money(line.unit_price));
            sheet.text_right(COL_TOTAL, 10.0, Face::Mono, &layout::fmt_money(line.subtotal));
            sheet.advance(ROW_MM);
        }

        sheet.advance(2.0);
        sheet.rule(COL_QTY, RIGHT);
        sheet.advance(ROW_MM);

        // Totals block, right-aligned
        sheet.text_right(COL_UNIT, 10.0, Face::Regular, "Subtotal");
        sheet.text_right(COL_TOTAL, 10.0, Face::Mono, &layout::fmt_currency(cur, sale.subtotal));
        sheet.advance(ROW_MM);

        if sale.discount > rust_decimal::Decimal::ZERO {
            let label = match &sale.coupon_code {
                Some(code) => format!("Discount ({code})"),
                None => "Discount".to_string(),
            };
            sheet.text_right(COL_UNIT, 10.0, Face::Regular, &label);
            sheet.text_right(
                COL_TOTAL,
                10.0,
                Face::Mono,
                &format!("-{}", layout::fmt_currency(cur, sale.discount)),
            );
            sheet.advance(ROW_MM);
        }

        sheet.text_right(COL_UNIT, 11.0, Face::Bold, "Total");
        sheet.text_right(COL_TOTAL, 11.0, Face::MonoBold, &layout::fmt_currency(cur, sale.total));
        sheet.advance(ROW_MM + 4.0);

        if let Some(notes) = sale.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            sheet.text_at(MARGIN, 9.0, Face::Bold, "Notes");
            sheet.advance(5.0);
            for line in layout::wrap(notes, 90) {
                sheet.ensure_space(5.0, MARGIN, MARGIN);
                sheet.text_at(MARGIN, 9.0, Face::Regular, &line);
                sheet.advance(4.5);
            }
        }

        sheet.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{StoreProfile, TicketLine, TicketSale};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn sample(lines: usize) -> TicketData {
        TicketData {
            store: StoreProfile {
                name: "Corner Store".into(),
                address: None,
                phone: None,
                tax_id: Some("B-1234".into()),
                currency: "$".into(),
            },
            sale: TicketSale {
                id: 7,
                branch_name: "Main".into(),
                client_name: None,
                cashier_name: "bob".into(),
                sold_at: Utc::now(),
                subtotal: dec!(25.00),
                discount: dec!(0),
                coupon_code: None,
                total: dec!(25.00),
                notes: Some("paid in cash".into()),
            },
            lines: (0..lines)
                .map(|i| TicketLine {
                    product_name: format!("Item {i}"),
                    quantity: 1,
                    unit_price: dec!(5.00),
                    subtotal: dec!(5.00),
                })
                .collect(),
        }
    }

    #[test]
    fn test_renders_pdf_bytes() {
        let pdf = InvoiceRenderer::new().render(&sample(5)).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn test_many_lines_break_pages() {
        // 60 rows cannot fit one A4 content area; must still render fine
        let pdf = InvoiceRenderer::new().render(&sample(60)).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }
}
