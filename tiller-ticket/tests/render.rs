//! End-to-end rendering tests over the public API

use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;
use tiller_ticket::{
    StoreProfile, TicketData, TicketFormat, TicketLine, TicketSale, render,
};

fn sample() -> TicketData {
    TicketData {
        store: StoreProfile {
            name: "Corner Store".into(),
            address: Some("12 Main St, Springfield".into()),
            phone: Some("555-0101".into()),
            tax_id: Some("B-1234".into()),
            currency: "$".into(),
        },
        sale: TicketSale {
            id: 1001,
            branch_name: "Main".into(),
            client_name: Some("Alice O'Brien".into()),
            cashier_name: "bob".into(),
            sold_at: Utc.with_ymd_and_hms(2026, 3, 14, 15, 9, 26).unwrap(),
            subtotal: dec!(100.00),
            discount: dec!(10.00),
            coupon_code: Some("SAVE10".into()),
            total: dec!(90.00),
            notes: Some("paid in cash".into()),
        },
        lines: vec![
            TicketLine {
                product_name: "Coffee Beans 1kg".into(),
                quantity: 2,
                unit_price: dec!(35.00),
                subtotal: dec!(70.00),
            },
            TicketLine {
                product_name: "Filter Papers".into(),
                quantity: 6,
                unit_price: dec!(5.00),
                subtotal: dec!(30.00),
            },
        ],
    }
}

#[test]
fn thermal_renders_valid_pdf() {
    let pdf = render(&sample(), TicketFormat::Thermal).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
    assert!(pdf.len() > 500);
}

#[test]
fn invoice_renders_valid_pdf() {
    let pdf = render(&sample(), TicketFormat::Invoice).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
    assert!(pdf.len() > 500);
}

#[test]
fn format_setting_parses_with_thermal_fallback() {
    assert_eq!(TicketFormat::from_setting("invoice"), TicketFormat::Invoice);
    assert_eq!(TicketFormat::from_setting("thermal"), TicketFormat::Thermal);
    assert_eq!(TicketFormat::from_setting("bogus"), TicketFormat::Thermal);
}

#[test]
fn sale_without_lines_still_renders() {
    let mut data = sample();
    data.lines.clear();
    data.sale.subtotal = dec!(0);
    data.sale.discount = dec!(0);
    data.sale.total = dec!(0);
    for format in [TicketFormat::Thermal, TicketFormat::Invoice] {
        let pdf = render(&data, format).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }
}
